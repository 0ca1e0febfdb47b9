// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph storage over a hash+range document store
//!
//! This module provides:
//! - The store driver trait and its Memory/Sled drivers
//! - The physical table layout of a graph and its secondary indices
//! - The `Record` mapping between typed records and store items
//! - The batching cache adapter the graph handle talks through

pub mod drivers;
pub mod record;
pub mod table_adapter;
pub mod tables;

pub use drivers::{
    create_store, Comparison, DocumentStore, IndexSchema, Item, KeySchema, MemoryStore,
    QueryOutput, QueryRequest, RangeCondition, StoreError, StoreResult, StoreStats, StoreType,
    TableSchema, WriteRequest, MAX_BATCH_GET, MAX_BATCH_WRITE,
};
#[cfg(feature = "sled-backend")]
pub use drivers::SledStore;
pub use record::Record;
pub use table_adapter::TableAdapter;
pub use tables::{Index, TableKind};
