// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph configuration

use crate::error::{GraphError, GraphResult};
use crate::storage::{MAX_BATCH_GET, MAX_BATCH_WRITE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment; non-production graphs log their store dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Production,
    Beta,
    Development,
}

impl Default for Env {
    fn default() -> Self {
        Env::Development
    }
}

impl FromStr for Env {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Env::Production),
            "beta" => Ok(Env::Beta),
            "development" => Ok(Env::Development),
            _ => Err(GraphError::invalid(format!(
                "Unknown env: {}. Valid options: production, beta, development",
                s
            ))),
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Env::Production => "production",
            Env::Beta => "beta",
            Env::Development => "development",
        };
        write!(f, "{}", name)
    }
}

/// Region hosting the graph's tables; `Local` targets a store on this machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "us-east-1")]
    UsEast1,
    #[serde(rename = "us-west-1")]
    UsWest1,
    #[serde(rename = "us-west-2")]
    UsWest2,
    #[serde(rename = "ap-south-1")]
    ApSouth1,
    #[serde(rename = "ap-northeast-1")]
    ApNortheast1,
    #[serde(rename = "ap-northeast-2")]
    ApNortheast2,
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast1,
    #[serde(rename = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "eu-central-1")]
    EuCentral1,
    #[serde(rename = "eu-west-1")]
    EuWest1,
    #[serde(rename = "sa-east-1")]
    SaEast1,
    #[serde(rename = "local")]
    Local,
}

impl Region {
    pub const ALL: [Region; 12] = [
        Region::UsEast1,
        Region::UsWest1,
        Region::UsWest2,
        Region::ApSouth1,
        Region::ApNortheast1,
        Region::ApNortheast2,
        Region::ApSoutheast1,
        Region::ApSoutheast2,
        Region::EuCentral1,
        Region::EuWest1,
        Region::SaEast1,
        Region::Local,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsWest1 => "us-west-1",
            Region::UsWest2 => "us-west-2",
            Region::ApSouth1 => "ap-south-1",
            Region::ApNortheast1 => "ap-northeast-1",
            Region::ApNortheast2 => "ap-northeast-2",
            Region::ApSoutheast1 => "ap-southeast-1",
            Region::ApSoutheast2 => "ap-southeast-2",
            Region::EuCentral1 => "eu-central-1",
            Region::EuWest1 => "eu-west-1",
            Region::SaEast1 => "sa-east-1",
            Region::Local => "local",
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::UsEast1
    }
}

impl FromStr for Region {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Region::ALL
            .iter()
            .copied()
            .find(|region| region.as_str() == wanted)
            .ok_or_else(|| GraphError::invalid(format!("Unknown region: {}", s)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Batching cache adapter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Keys per store batch get
    pub max_get_batch: usize,

    /// Requests per store batch write
    pub max_write_batch: usize,

    /// Keep fetched and written records in memory
    pub cache_enabled: bool,

    /// Log each store dispatch at debug level (never in production)
    pub log_dispatch: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            max_get_batch: MAX_BATCH_GET,
            max_write_batch: MAX_BATCH_WRITE,
            cache_enabled: true,
            log_dispatch: true,
        }
    }
}

impl AdapterConfig {
    /// Configuration without a cache; every get reaches the store
    pub fn uncached() -> Self {
        Self {
            cache_enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GraphResult<()> {
        if self.max_get_batch == 0 || self.max_get_batch > MAX_BATCH_GET {
            return Err(GraphError::invalid(format!(
                "max_get_batch must be between 1 and {}, got {}",
                MAX_BATCH_GET, self.max_get_batch
            )));
        }
        if self.max_write_batch == 0 || self.max_write_batch > MAX_BATCH_WRITE {
            return Err(GraphError::invalid(format!(
                "max_write_batch must be between 1 and {}, got {}",
                MAX_BATCH_WRITE, self.max_write_batch
            )));
        }
        Ok(())
    }
}

/// Configuration of one graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub env: Env,
    pub region: Region,
    pub adapter: AdapterConfig,
}

impl GraphConfig {
    pub fn new(env: Env, region: Region) -> Self {
        Self {
            env,
            region,
            adapter: AdapterConfig::default(),
        }
    }

    pub fn with_adapter(mut self, adapter: AdapterConfig) -> Self {
        self.adapter = adapter;
        self
    }

    /// Whether store dispatches of this graph are logged
    pub fn logs_dispatch(&self) -> bool {
        self.adapter.log_dispatch && self.env != Env::Production
    }

    pub fn validate(&self) -> GraphResult<()> {
        self.adapter.validate()
    }

    /// Two configs describe the same deployment
    pub(crate) fn same_deployment(&self, other: &GraphConfig) -> bool {
        self.env == other.env && self.region == other.region
    }
}
