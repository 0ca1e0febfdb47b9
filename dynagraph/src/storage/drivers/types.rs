// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store driver types and error handling
//!
//! This module defines the request/response shapes exchanged with a
//! [`DocumentStore`](super::DocumentStore), the table schema description,
//! and the driver error type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use thiserror::Error;

/// Maximum number of keys a single batch get may carry
pub const MAX_BATCH_GET: usize = 100;

/// Maximum number of requests a single batch write may carry
pub const MAX_BATCH_WRITE: usize = 25;

/// A stored item: a flat JSON document
pub type Item = Map<String, Value>;

/// Store driver type configuration
///
/// Specifies which driver backs a graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoreType {
    /// Sled - Pure Rust embedded database
    /// Best for: persistent single-process deployments
    Sled,

    /// Memory - In-memory storage
    /// Best for: Unit testing, development
    Memory,
}

impl Default for StoreType {
    fn default() -> Self {
        StoreType::Memory
    }
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(StoreType::Sled),
            "memory" => Ok(StoreType::Memory),
            _ => Err(format!(
                "Unknown store type: {}. Valid options: sled, memory",
                s
            )),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreType::Sled => "sled",
            StoreType::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

/// Error type for store driver operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Driver-specific error (Sled, remote client, etc.)
    #[error("Store driver error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Item or key missing one of the table's key attributes
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Index '{index}' not found on table '{table}'")]
    IndexNotFound { table: String, index: String },

    #[error("Batch of {got} exceeds the limit of {limit}")]
    BatchLimitExceeded { limit: usize, got: usize },

    /// A queued request whose dispatch was lost before completing
    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

#[cfg(feature = "sled-backend")]
impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Result type for store driver operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Hash attribute plus optional range attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    pub hash: String,
    pub range: Option<String>,
}

impl KeySchema {
    pub fn hash(hash: &str) -> Self {
        Self {
            hash: hash.to_string(),
            range: None,
        }
    }

    pub fn composite(hash: &str, range: &str) -> Self {
        Self {
            hash: hash.to_string(),
            range: Some(range.to_string()),
        }
    }

    /// Attribute names making up this key
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.hash.as_str()).chain(self.range.as_deref())
    }
}

/// Named secondary index over a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    pub name: String,
    pub key: KeySchema,
}

/// Table description handed to [`DocumentStore::create_table`](super::DocumentStore::create_table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub key: KeySchema,
    pub indexes: Vec<IndexSchema>,
}

impl TableSchema {
    /// Key schema of the named index, or the primary key when `index` is None
    pub fn key_for(&self, index: Option<&str>) -> StoreResult<&KeySchema> {
        match index {
            None => Ok(&self.key),
            Some(name) => self
                .indexes
                .iter()
                .find(|i| i.name == name)
                .map(|i| &i.key)
                .ok_or_else(|| StoreError::IndexNotFound {
                    table: self.name.clone(),
                    index: name.to_string(),
                }),
        }
    }
}

/// One entry of a batch write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteRequest {
    /// Insert or fully replace the item with the same primary key
    Put(Item),
    /// Delete the item with this primary key; absent keys are ignored
    Delete(Item),
}

/// Comparison applied to the range attribute of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Lt,
    Gt,
    Eq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeCondition {
    pub comparison: Comparison,
    pub value: Value,
}

impl RangeCondition {
    pub fn lt(value: impl Into<Value>) -> Self {
        Self {
            comparison: Comparison::Lt,
            value: value.into(),
        }
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        Self {
            comparison: Comparison::Gt,
            value: value.into(),
        }
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        Self {
            comparison: Comparison::Eq,
            value: value.into(),
        }
    }
}

/// A single bounded query against a table or one of its indexes
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub table: String,
    /// Secondary index to query, None for the primary key
    pub index: Option<String>,
    /// Required value of the index's hash attribute
    pub hash_value: Value,
    pub range: Option<RangeCondition>,
    pub scan_forward: bool,
    pub limit: Option<usize>,
    /// Continuation token returned by the previous page
    pub exclusive_start_key: Option<Item>,
    /// Return only the number of matches, no items
    pub count_only: bool,
}

/// One page of query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub items: Vec<Item>,
    pub count: usize,
    /// Present when the scan stopped before exhausting the matches
    pub last_evaluated_key: Option<Item>,
}
