// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph registry
//!
//! Graph handles are singletons per name within a registry. Defining a name
//! again with the same env and region returns the registered handle; any
//! other deployment under that name is a conflict.

use super::config::GraphConfig;
use super::handle::Graph;
use crate::error::{GraphError, GraphResult};
use crate::storage::DocumentStore;
use log::info;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

static GRAPH_NAME: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$"));

/// Process-wide registry
static GLOBAL_REGISTRY: Lazy<GraphRegistry> = Lazy::new(GraphRegistry::new);

/// Check that a graph name is usable as a table prefix
pub fn validate_name(name: &str) -> GraphResult<()> {
    let pattern = GRAPH_NAME
        .as_ref()
        .map_err(|e| GraphError::invalid(e.to_string()))?;
    if !pattern.is_match(name) {
        return Err(GraphError::invalid(format!(
            "Invalid graph name '{}': use letters, digits, '_' and '-'",
            name
        )));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct GraphRegistry {
    graphs: RwLock<HashMap<String, Arc<Graph>>>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process
    pub fn global() -> &'static GraphRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a graph, or return the one already registered under `name`
    ///
    /// When the name is taken, `store` and the adapter settings are ignored.
    pub fn define(
        &self,
        name: &str,
        config: GraphConfig,
        store: Arc<dyn DocumentStore>,
    ) -> GraphResult<Arc<Graph>> {
        validate_name(name)?;
        config.validate()?;

        let mut graphs = self.graphs.write();
        if let Some(existing) = graphs.get(name) {
            if !existing.config().same_deployment(&config) {
                return Err(GraphError::conflict(format!(
                    "There already exists a distinct graph named \"{}\" ({} in {})",
                    name,
                    existing.config().env,
                    existing.config().region
                )));
            }
            return Ok(Arc::clone(existing));
        }

        info!(
            "Defining graph {} ({} in {}, {} store)",
            name,
            config.env,
            config.region,
            store.store_type()
        );
        let graph = Arc::new(Graph::new(name, config, store)?);
        graphs.insert(name.to_string(), Arc::clone(&graph));
        Ok(graph)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Graph>> {
        self.graphs.read().get(name).cloned()
    }

    /// Forget a graph; its tables are untouched
    pub fn remove(&self, name: &str) -> Option<Arc<Graph>> {
        self.graphs.write().remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.graphs.read().keys().cloned().collect();
        names.sort();
        names
    }
}
