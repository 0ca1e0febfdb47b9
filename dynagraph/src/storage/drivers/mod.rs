// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store drivers
//!
//! This module provides the trait-based abstraction over the backing
//! document store, allowing different drivers to be used interchangeably.
//!
//! # Architecture
//!
//! ```text
//! TableAdapter (typed records, batching, cache)
//!     ↓
//! DocumentStore (hash+range items, bounded batches, index queries)
//!     ↓
//! Concrete Implementations (Memory, Sled)
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! use dynagraph::{create_store, StoreType};
//!
//! let store = create_store(StoreType::Memory, "")?;
//! let tables = store.list_tables().await?;
//! ```

// Core modules
pub mod eval;
pub mod factory;
pub mod traits;
pub mod types;

// Driver implementations
pub mod memory;
#[cfg(feature = "sled-backend")]
pub mod sled;

// Public API re-exports
pub use factory::create_store;
pub use memory::{MemoryStore, StoreStats};
#[cfg(feature = "sled-backend")]
pub use self::sled::SledStore;
pub use traits::DocumentStore;
pub use types::{
    Comparison, IndexSchema, Item, KeySchema, QueryOutput, QueryRequest, RangeCondition,
    StoreError, StoreResult, StoreType, TableSchema, WriteRequest, MAX_BATCH_GET,
    MAX_BATCH_WRITE,
};
