// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Table provisioning

use super::handle::Graph;
use crate::error::GraphResult;
use crate::storage::tables::{ID_COUNTER, WEIGHT_COUNTER};
use crate::storage::TableKind;
use log::info;

/// Create the graph's missing tables and seed its system counters
///
/// Safe to run repeatedly: existing tables and counters are left as they are.
pub async fn generate(graph: &Graph) -> GraphResult<()> {
    info!("Generating tables for {}", graph.name());

    let existing = graph.store().list_tables().await?;
    for kind in TableKind::all() {
        let schema = kind.schema(graph.name());
        if existing.contains(&schema.name) {
            info!("Table \"{}\" already exists", schema.name);
            continue;
        }
        graph.store().create_table(&schema).await?;
        info!("Table \"{}\" created", schema.name);
    }

    for counter in [ID_COUNTER, WEIGHT_COUNTER] {
        let table = graph.table_name(TableKind::System);
        if graph.create_counter(counter).await? {
            info!("Created {}.{}", table, counter);
        } else {
            let value = graph.counter_value(counter).await?.unwrap_or_default();
            info!("{}.{} exists with value {}", table, counter, value);
        }
    }

    Ok(())
}

impl Graph {
    /// Create the graph's missing tables and seed its system counters
    pub async fn generate(&self) -> GraphResult<()> {
        generate(self).await
    }
}
