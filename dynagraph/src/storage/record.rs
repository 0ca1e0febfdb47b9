// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Mapping between typed records and store items

use super::drivers::{Item, StoreError, StoreResult};
use super::tables::TableKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A record stored in one of a graph's tables
///
/// The serialized key is the record's identity inside caches and batch
/// deduplication: two records with the same serialized key are the same item.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Key: Clone + Send + Sync + 'static;

    const TABLE: TableKind;

    fn key(&self) -> Self::Key;

    /// String identity of a key
    fn serialize_key(key: &Self::Key) -> String;

    /// Primary key attributes as a store item
    fn key_item(key: &Self::Key) -> Item;

    fn to_item(&self) -> StoreResult<Item> {
        match serde_json::to_value(self)? {
            Value::Object(item) => Ok(item),
            other => Err(StoreError::Serialization(format!(
                "record serialized to a non-object: {}",
                other
            ))),
        }
    }

    fn from_item(item: Item) -> StoreResult<Self> {
        Ok(serde_json::from_value(Value::Object(item))?)
    }

    fn identity(&self) -> String {
        Self::serialize_key(&self.key())
    }
}
