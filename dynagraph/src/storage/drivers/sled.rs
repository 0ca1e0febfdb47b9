// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sled store driver implementation
//!
//! Each table is a sled tree keyed by the serialized primary key with
//! JSON-encoded items as values. Table schemas live in a metadata tree so a
//! reopened database knows its key layouts. Index queries scan the table
//! tree.

use super::eval::{apply_increment, check_batch, primary_key, run_query};
use super::traits::DocumentStore;
use super::types::{
    Item, QueryOutput, QueryRequest, StoreError, StoreResult, StoreType, TableSchema,
    WriteRequest, MAX_BATCH_GET, MAX_BATCH_WRITE,
};
use super::memory::DEFAULT_PAGE_SIZE;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;

const SCHEMA_TREE: &str = "__dynagraph_tables";

/// Sled driver implementation
pub struct SledStore {
    db: sled::Db,
    schemas: sled::Tree,
    cached: RwLock<HashMap<String, TableSchema>>,
}

impl SledStore {
    /// Open or create a sled database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)?;
        let schemas = db.open_tree(SCHEMA_TREE)?;
        Ok(SledStore {
            db,
            schemas,
            cached: RwLock::new(HashMap::new()),
        })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }

    fn schema(&self, table: &str) -> StoreResult<TableSchema> {
        if let Some(schema) = self.cached.read().get(table) {
            return Ok(schema.clone());
        }
        let bytes = self
            .schemas
            .get(table.as_bytes())?
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let schema: TableSchema = serde_json::from_slice(&bytes)?;
        self.cached
            .write()
            .insert(table.to_string(), schema.clone());
        Ok(schema)
    }

    fn tree(&self, table: &str) -> StoreResult<(TableSchema, sled::Tree)> {
        let schema = self.schema(table)?;
        let tree = self.db.open_tree(table)?;
        Ok((schema, tree))
    }
}

fn decode(bytes: &[u8]) -> StoreResult<Item> {
    Ok(serde_json::from_slice(bytes)?)
}

#[async_trait]
impl DocumentStore for SledStore {
    async fn create_table(&self, schema: &TableSchema) -> StoreResult<bool> {
        let encoded = serde_json::to_vec(schema)?;
        let created = self
            .schemas
            .compare_and_swap(schema.name.as_bytes(), None as Option<&[u8]>, Some(encoded))?
            .is_ok();
        if created {
            self.db.open_tree(&schema.name)?;
        }
        Ok(created)
    }

    async fn list_tables(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in self.schemas.iter() {
            let (name, _) = entry?;
            names.push(String::from_utf8_lossy(&name).to_string());
        }
        Ok(names)
    }

    async fn batch_get(&self, table: &str, keys: Vec<Item>) -> StoreResult<Vec<Item>> {
        check_batch(MAX_BATCH_GET, keys.len())?;
        let (schema, tree) = self.tree(table)?;

        let mut results = Vec::with_capacity(keys.len());
        for key in &keys {
            let pk = primary_key(&schema.key, key)?;
            if let Some(bytes) = tree.get(pk.as_bytes())? {
                results.push(decode(&bytes)?);
            }
        }
        Ok(results)
    }

    async fn batch_write(&self, table: &str, requests: Vec<WriteRequest>) -> StoreResult<()> {
        check_batch(MAX_BATCH_WRITE, requests.len())?;
        let (schema, tree) = self.tree(table)?;

        let mut batch = sled::Batch::default();
        for request in requests {
            match request {
                WriteRequest::Put(item) => {
                    let pk = primary_key(&schema.key, &item)?;
                    batch.insert(pk.as_bytes(), serde_json::to_vec(&item)?);
                }
                WriteRequest::Delete(key) => {
                    let pk = primary_key(&schema.key, &key)?;
                    batch.remove(pk.as_bytes());
                }
            }
        }
        tree.apply_batch(batch)?;
        Ok(())
    }

    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryOutput> {
        let (schema, tree) = self.tree(&request.table)?;

        let mut rows = Vec::new();
        for entry in tree.iter() {
            let (_, bytes) = entry?;
            rows.push(decode(&bytes)?);
        }
        run_query(&schema, rows, request, DEFAULT_PAGE_SIZE)
    }

    async fn get_item(&self, table: &str, key: Item) -> StoreResult<Option<Item>> {
        let (schema, tree) = self.tree(table)?;
        let pk = primary_key(&schema.key, &key)?;
        match tree.get(pk.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put_item_if_absent(&self, table: &str, item: Item) -> StoreResult<bool> {
        let (schema, tree) = self.tree(table)?;
        let pk = primary_key(&schema.key, &item)?;
        let swapped = tree
            .compare_and_swap(
                pk.as_bytes(),
                None as Option<&[u8]>,
                Some(serde_json::to_vec(&item)?),
            )?
            .is_ok();
        Ok(swapped)
    }

    async fn increment(
        &self,
        table: &str,
        key: Item,
        attribute: &str,
        amount: i64,
    ) -> StoreResult<i64> {
        let (schema, tree) = self.tree(table)?;
        let pk = primary_key(&schema.key, &key)?;

        // update_and_fetch may rerun the closure; keep only the last outcome
        let mut outcome: StoreResult<i64> = Ok(0);
        tree.update_and_fetch(pk.as_bytes(), |old| {
            let mut item = match old {
                Some(bytes) => match decode(bytes) {
                    Ok(item) => item,
                    Err(e) => {
                        outcome = Err(e);
                        return Some(bytes.to_vec());
                    }
                },
                None => key.clone(),
            };
            match apply_increment(&mut item, attribute, amount) {
                Ok(value) => match serde_json::to_vec(&item) {
                    Ok(encoded) => {
                        outcome = Ok(value);
                        Some(encoded)
                    }
                    Err(e) => {
                        outcome = Err(e.into());
                        old.map(|b| b.to_vec())
                    }
                },
                Err(e) => {
                    outcome = Err(e);
                    old.map(|b| b.to_vec())
                }
            }
        })?;
        outcome
    }

    fn store_type(&self) -> StoreType {
        StoreType::Sled
    }
}
