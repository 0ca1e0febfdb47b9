// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store driver trait
//!
//! This module defines the interface the graph core consumes. It models a
//! document store that only offers hash+range composite keys, bounded batch
//! operations and single-index range queries. All drivers must implement it.

use super::types::{Item, QueryOutput, QueryRequest, StoreResult, StoreType, TableSchema, WriteRequest};
use async_trait::async_trait;

/// Main store driver trait
///
/// Implementations must reject batch gets above
/// [`MAX_BATCH_GET`](super::types::MAX_BATCH_GET) keys and batch writes above
/// [`MAX_BATCH_WRITE`](super::types::MAX_BATCH_WRITE) requests with
/// [`StoreError::BatchLimitExceeded`](super::types::StoreError::BatchLimitExceeded).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a table; returns false if a table with that name already exists
    async fn create_table(&self, schema: &TableSchema) -> StoreResult<bool>;

    /// List all table names
    async fn list_tables(&self) -> StoreResult<Vec<String>>;

    /// Fetch items by primary key
    ///
    /// Missing keys are omitted and the result order is unspecified.
    async fn batch_get(&self, table: &str, keys: Vec<Item>) -> StoreResult<Vec<Item>>;

    /// Apply independent put/delete requests, with no cross-item atomicity
    async fn batch_write(&self, table: &str, requests: Vec<WriteRequest>) -> StoreResult<()>;

    /// Run one bounded page of a query
    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryOutput>;

    /// Fetch a single item by primary key
    async fn get_item(&self, table: &str, key: Item) -> StoreResult<Option<Item>>;

    /// Write an item only if its primary key is unused; returns whether it was written
    async fn put_item_if_absent(&self, table: &str, item: Item) -> StoreResult<bool>;

    /// Atomically add `amount` to a numeric attribute and return the new value
    ///
    /// A missing item or attribute counts as zero.
    async fn increment(
        &self,
        table: &str,
        key: Item,
        attribute: &str,
        amount: i64,
    ) -> StoreResult<i64>;

    /// Get store type
    fn store_type(&self) -> StoreType;
}
