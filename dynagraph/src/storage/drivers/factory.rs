// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store driver factory
//!
//! This module provides factory functions for creating store drivers based on configuration.

use super::memory::MemoryStore;
use super::traits::DocumentStore;
use super::types::{StoreResult, StoreType};
use std::path::Path;
use std::sync::Arc;

/// Factory function to create a store driver based on configuration
///
/// # Arguments
/// * `store_type` - The type of store driver to create
/// * `path` - Filesystem path for persistent drivers, ignored by the memory driver
///
/// # Examples
/// ```ignore
/// use dynagraph::{create_store, StoreType};
///
/// let store = create_store(StoreType::Sled, "./data")?;
/// ```
pub fn create_store<P: AsRef<Path>>(
    store_type: StoreType,
    path: P,
) -> StoreResult<Arc<dyn DocumentStore>> {
    match store_type {
        #[cfg(feature = "sled-backend")]
        StoreType::Sled => {
            use super::sled::SledStore;
            let store = SledStore::open(path)?;
            Ok(Arc::new(store) as Arc<dyn DocumentStore>)
        }
        #[cfg(not(feature = "sled-backend"))]
        StoreType::Sled => {
            let _ = path;
            Err(super::types::StoreError::Backend(
                "Sled store backend not compiled in".to_string(),
            ))
        }
        StoreType::Memory => Ok(Arc::new(MemoryStore::new()) as Arc<dyn DocumentStore>),
    }
}
