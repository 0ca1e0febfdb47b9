// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory store driver implementation for testing

use super::eval::{apply_increment, check_batch, primary_key, run_query};
use super::traits::DocumentStore;
use super::types::{
    Item, QueryOutput, QueryRequest, StoreError, StoreResult, StoreType, TableSchema,
    WriteRequest, MAX_BATCH_GET, MAX_BATCH_WRITE,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Default number of items a single query page may return
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// In-memory store driver
///
/// Besides serving as a development store, it records how many calls of each
/// kind it received and can be told to fail upcoming writes, so callers'
/// batching and failure handling can be observed.
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, MemoryTable>>>,
    page_size: usize,
    stats: CallCounters,
    failing_writes: AtomicUsize,
}

/// In-memory table: schema plus items ordered by serialized primary key
struct MemoryTable {
    schema: TableSchema,
    rows: BTreeMap<String, Item>,
}

#[derive(Default)]
struct CallCounters {
    batch_gets: AtomicU64,
    batch_writes: AtomicU64,
    queries: AtomicU64,
    increments: AtomicU64,
}

/// Snapshot of the calls a [`MemoryStore`] has served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub batch_gets: u64,
    pub batch_writes: u64,
    pub queries: u64,
    pub increments: u64,
}

impl MemoryStore {
    /// Create a new memory store
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create a memory store whose query pages hold at most `page_size` items
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            page_size: page_size.max(1),
            stats: CallCounters::default(),
            failing_writes: AtomicUsize::new(0),
        }
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            batch_gets: self.stats.batch_gets.load(Ordering::SeqCst),
            batch_writes: self.stats.batch_writes.load(Ordering::SeqCst),
            queries: self.stats.queries.load(Ordering::SeqCst),
            increments: self.stats.increments.load(Ordering::SeqCst),
        }
    }

    /// Make the next `count` batch writes fail without applying anything
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Number of items currently held by a table
    pub fn item_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .get(table)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }

    fn take_write_failure(&self) -> bool {
        self.failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_table(&self, schema: &TableSchema) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        if tables.contains_key(&schema.name) {
            return Ok(false);
        }
        tables.insert(
            schema.name.clone(),
            MemoryTable {
                schema: schema.clone(),
                rows: BTreeMap::new(),
            },
        );
        Ok(true)
    }

    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        Ok(self.tables.read().keys().cloned().collect())
    }

    async fn batch_get(&self, table: &str, keys: Vec<Item>) -> StoreResult<Vec<Item>> {
        check_batch(MAX_BATCH_GET, keys.len())?;
        self.stats.batch_gets.fetch_add(1, Ordering::SeqCst);

        let tables = self.tables.read();
        let data = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let mut results = Vec::with_capacity(keys.len());
        // Unspecified order: answer from the back
        for key in keys.iter().rev() {
            let pk = primary_key(&data.schema.key, key)?;
            if let Some(item) = data.rows.get(&pk) {
                results.push(item.clone());
            }
        }
        Ok(results)
    }

    async fn batch_write(&self, table: &str, requests: Vec<WriteRequest>) -> StoreResult<()> {
        check_batch(MAX_BATCH_WRITE, requests.len())?;
        self.stats.batch_writes.fetch_add(1, Ordering::SeqCst);

        if self.take_write_failure() {
            return Err(StoreError::Backend(format!(
                "injected write failure on '{}'",
                table
            )));
        }

        let mut tables = self.tables.write();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        for request in requests {
            match request {
                WriteRequest::Put(item) => {
                    let pk = primary_key(&data.schema.key, &item)?;
                    data.rows.insert(pk, item);
                }
                WriteRequest::Delete(key) => {
                    let pk = primary_key(&data.schema.key, &key)?;
                    data.rows.remove(&pk);
                }
            }
        }
        Ok(())
    }

    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryOutput> {
        self.stats.queries.fetch_add(1, Ordering::SeqCst);

        let tables = self.tables.read();
        let data = tables
            .get(&request.table)
            .ok_or_else(|| StoreError::TableNotFound(request.table.clone()))?;

        run_query(
            &data.schema,
            data.rows.values().cloned(),
            request,
            self.page_size,
        )
    }

    async fn get_item(&self, table: &str, key: Item) -> StoreResult<Option<Item>> {
        let tables = self.tables.read();
        let data = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let pk = primary_key(&data.schema.key, &key)?;
        Ok(data.rows.get(&pk).cloned())
    }

    async fn put_item_if_absent(&self, table: &str, item: Item) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let pk = primary_key(&data.schema.key, &item)?;
        if data.rows.contains_key(&pk) {
            return Ok(false);
        }
        data.rows.insert(pk, item);
        Ok(true)
    }

    async fn increment(
        &self,
        table: &str,
        key: Item,
        attribute: &str,
        amount: i64,
    ) -> StoreResult<i64> {
        self.stats.increments.fetch_add(1, Ordering::SeqCst);

        let mut tables = self.tables.write();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let pk = primary_key(&data.schema.key, &key)?;
        let item = data.rows.entry(pk).or_insert(key);
        apply_increment(item, attribute, amount)
    }

    fn store_type(&self) -> StoreType {
        StoreType::Memory
    }
}
