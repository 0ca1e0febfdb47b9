// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph handle
//!
//! A [`Graph`] is the only component that talks to the backing store on
//! behalf of the vertex and edge stores. It owns:
//! - The system counters drawn for vertex ids and edge weights
//! - One batching adapter per record table
//! - Query and count dispatch that follow continuation tokens until the
//!   requested number of items is reached
//! - The label registry of its vertex and edge definitions

use super::config::GraphConfig;
use super::schema::{DefinitionRegistry, EdgeDef, Multiplicity, VertexDef};
use crate::edge::{Edge, EdgeStore};
use crate::error::{GraphError, GraphResult};
use crate::storage::tables::{COUNTER_VALUE, ID_COUNTER, WEIGHT_COUNTER};
use crate::storage::{
    DocumentStore, Index, Item, QueryRequest, RangeCondition, Record, TableAdapter, TableKind,
};
use crate::types::{id, CursorQuery, Id, Page, PageInfo, Timestamp, Weight};
use crate::vertex::{Vertex, VertexStore};
use chrono::Utc;
use log::debug;
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

pub struct Graph {
    name: String,
    config: GraphConfig,
    store: Arc<dyn DocumentStore>,
    vertices: TableAdapter<Vertex>,
    edges: TableAdapter<Edge>,
    definitions: DefinitionRegistry,
    /// Last timestamp handed out by `now`
    clock: AtomicI64,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("store", &self.store.store_type())
            .finish()
    }
}

/// Items and match count of a query run to completion
struct QueryRun {
    items: Vec<Item>,
    count: usize,
}

impl Graph {
    /// Build a handle; names are validated by the registry
    pub(crate) fn new(
        name: &str,
        config: GraphConfig,
        store: Arc<dyn DocumentStore>,
    ) -> GraphResult<Self> {
        let log_dispatch = config.logs_dispatch();
        let vertices = TableAdapter::new(
            Arc::clone(&store),
            TableKind::Vertex.table_name(name),
            config.adapter,
            log_dispatch,
        )?;
        let edges = TableAdapter::new(
            Arc::clone(&store),
            TableKind::Edge.table_name(name),
            config.adapter,
            log_dispatch,
        )?;

        Ok(Self {
            name: name.to_string(),
            config,
            store,
            vertices,
            edges,
            definitions: DefinitionRegistry::new(),
            clock: AtomicI64::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn table_name(&self, table: TableKind) -> String {
        table.table_name(&self.name)
    }

    /// Vertex operations of this graph
    pub fn vertices(&self) -> VertexStore<'_> {
        VertexStore::new(self)
    }

    /// Edge operations of this graph
    pub fn edges(&self) -> EdgeStore<'_> {
        EdgeStore::new(self)
    }

    pub fn vertex_table(&self) -> &TableAdapter<Vertex> {
        &self.vertices
    }

    pub fn edge_table(&self) -> &TableAdapter<Edge> {
        &self.edges
    }

    pub fn definitions(&self) -> &DefinitionRegistry {
        &self.definitions
    }

    pub fn define_vertex(&self, label: &str) -> GraphResult<VertexDef> {
        self.definitions.define_vertex(label)
    }

    pub fn define_edge(&self, label: &str, multiplicity: Multiplicity) -> GraphResult<EdgeDef> {
        self.definitions.define_edge(label, multiplicity)
    }

    /// Draw a new vertex id
    pub async fn fresh_id(&self) -> GraphResult<Id> {
        let n = self.increment_counter(ID_COUNTER, 1).await?;
        let n = u64::try_from(n).map_err(|_| {
            GraphError::invalid(format!("id counter of '{}' is negative: {}", self.name, n))
        })?;
        id::encode(n)
    }

    /// Draw a new edge weight
    pub async fn fresh_weight(&self) -> GraphResult<Weight> {
        self.increment_counter(WEIGHT_COUNTER, 1).await
    }

    /// Create a counter at 0; returns false if it already exists
    pub async fn create_counter(&self, key: &str) -> GraphResult<bool> {
        let created = self
            .store
            .put_item_if_absent(&self.table_name(TableKind::System), counter_item(key, Some(0)))
            .await?;
        Ok(created)
    }

    /// Atomically add `amount` to a counter and return its new value
    pub async fn increment_counter(&self, key: &str, amount: i64) -> GraphResult<i64> {
        let value = self
            .store
            .increment(
                &self.table_name(TableKind::System),
                counter_item(key, None),
                COUNTER_VALUE,
                amount,
            )
            .await?;
        Ok(value)
    }

    pub async fn counter_value(&self, key: &str) -> GraphResult<Option<i64>> {
        let item = self
            .store
            .get_item(&self.table_name(TableKind::System), counter_item(key, None))
            .await?;
        Ok(item.and_then(|item| item.get(COUNTER_VALUE).and_then(Value::as_i64)))
    }

    /// Milliseconds since the epoch, strictly increasing across calls on this handle
    pub fn now(&self) -> Timestamp {
        let wall = Utc::now().timestamp_millis();
        let previous = self
            .clock
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wall.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        wall.max(previous + 1)
    }

    /// One page of records from an index, as described by a parsed cursor
    ///
    /// When the cursor carries a page size, `total` counts every match of the
    /// bound without that size.
    pub async fn query<R: Record>(
        &self,
        index: Index,
        hash_value: impl Into<Value>,
        cursor: &CursorQuery,
    ) -> GraphResult<Page<R>> {
        let hash_value = hash_value.into();
        let records = self
            .find::<R>(
                index,
                hash_value.clone(),
                cursor.bound.clone(),
                cursor.scan_forward,
                cursor.limit,
            )
            .await?;

        let total = match cursor.limit {
            Some(_) => Some(
                self.run(index, hash_value, cursor.bound.clone(), cursor.scan_forward, None, true)
                    .await?
                    .count,
            ),
            None => None,
        };
        Ok(Page::new(records, total))
    }

    /// Sizes of the page a cursor would select
    pub async fn count(
        &self,
        index: Index,
        hash_value: impl Into<Value>,
        cursor: &CursorQuery,
    ) -> GraphResult<PageInfo> {
        let hash_value = hash_value.into();
        let total = self
            .run(index, hash_value, cursor.bound.clone(), cursor.scan_forward, None, true)
            .await?
            .count;

        Ok(match cursor.limit {
            Some(limit) => PageInfo {
                count: total.min(limit),
                total: Some(total),
            },
            None => PageInfo { count: total, total: None },
        })
    }

    /// Records from an index matching a hash value and optional range condition
    pub async fn find<R: Record>(
        &self,
        index: Index,
        hash_value: impl Into<Value>,
        range: Option<RangeCondition>,
        scan_forward: bool,
        limit: Option<usize>,
    ) -> GraphResult<Vec<R>> {
        if index.table() != R::TABLE {
            return Err(GraphError::invalid(format!(
                "index '{}' does not belong to the {} table",
                index.name(),
                R::TABLE.suffix()
            )));
        }
        let run = self
            .run(index, hash_value.into(), range, scan_forward, limit, false)
            .await?;
        let records = run
            .items
            .into_iter()
            .map(R::from_item)
            .collect::<Result<Vec<R>, _>>()?;
        Ok(records)
    }

    /// Issue bounded store queries until `limit` items are collected or the
    /// matches run out
    async fn run(
        &self,
        index: Index,
        hash_value: Value,
        range: Option<RangeCondition>,
        scan_forward: bool,
        limit: Option<usize>,
        count_only: bool,
    ) -> GraphResult<QueryRun> {
        let mut request = QueryRequest {
            table: self.table_name(index.table()),
            index: Some(index.name().to_string()),
            hash_value,
            range,
            scan_forward,
            limit,
            exclusive_start_key: None,
            count_only,
        };

        let mut run = QueryRun {
            items: Vec::new(),
            count: 0,
        };
        let mut remaining = limit;
        let mut pages = 0usize;
        loop {
            request.limit = remaining;
            let output = self.store.query(&request).await?;
            pages += 1;
            run.count += output.count;
            run.items.extend(output.items);

            if let Some(left) = remaining.as_mut() {
                *left = left.saturating_sub(output.count);
                if *left == 0 {
                    break;
                }
            }
            match output.last_evaluated_key {
                Some(token) => request.exclusive_start_key = Some(token),
                None => break,
            }
        }

        if pages > 1 {
            debug!(
                "query `{}` on {} took {} pages for {} items",
                request.table,
                index.name(),
                pages,
                run.count
            );
        }
        Ok(run)
    }
}

fn counter_item(key: &str, value: Option<i64>) -> Item {
    let mut item = Item::new();
    item.insert("key".to_string(), json!(key));
    if let Some(value) = value {
        item.insert(COUNTER_VALUE.to_string(), json!(value));
    }
    item
}
