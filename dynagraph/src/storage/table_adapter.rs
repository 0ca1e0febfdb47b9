// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Batching cache adapter
//!
//! A [`TableAdapter`] sits between record-level calls and a table of the
//! backing store. It:
//! - Coalesces every get issued before the next scheduling tick into one
//!   dispatch, chunked at the store's batch-get limit
//! - Shares one store lookup between concurrent gets of the same key
//! - Deduplicates writes by key (last record wins) and chunks them at the
//!   batch-write limit
//! - Caches present records by serialized key
//!
//! The cache never serves a record for a key after that key was deleted or
//! touched by a failed write. Every write bumps a generation counter, and a
//! batch get only populates the cache when no write happened while it was in
//! flight.

use super::drivers::{DocumentStore, Item, StoreError, WriteRequest};
use super::record::Record;
use crate::error::{GraphError, GraphResult};
use crate::graph::config::AdapterConfig;
use log::debug;
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

type Reply<R> = oneshot::Sender<GraphResult<Option<R>>>;

/// Typed, batching, caching view of one table
pub struct TableAdapter<R: Record> {
    inner: Arc<AdapterInner<R>>,
}

impl<R: Record> Clone for TableAdapter<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AdapterInner<R: Record> {
    store: Arc<dyn DocumentStore>,
    table: String,
    config: AdapterConfig,
    log_dispatch: bool,
    cache: Mutex<HashMap<String, R>>,
    /// Bumped under the cache lock by every write and cache mutation
    generation: AtomicU64,
    pending: Mutex<PendingGets<R>>,
}

/// Gets waiting for the next dispatch
struct PendingGets<R: Record> {
    keys: Vec<R::Key>,
    waiters: HashMap<String, Vec<Reply<R>>>,
    scheduled: bool,
}

impl<R: Record> Default for PendingGets<R> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            waiters: HashMap::new(),
            scheduled: false,
        }
    }
}

/// A get either answered from the cache or waiting on a dispatch
enum Lookup<R> {
    Ready(Option<R>),
    Waiting(oneshot::Receiver<GraphResult<Option<R>>>),
}

impl<R> Lookup<R> {
    async fn resolve(self) -> GraphResult<Option<R>> {
        match self {
            Lookup::Ready(value) => Ok(value),
            Lookup::Waiting(rx) => rx.await.map_err(|_| {
                GraphError::StoreFailure(StoreError::Dispatch(
                    "batch get dispatch ended without a reply".to_string(),
                ))
            })?,
        }
    }
}

impl<R: Record> TableAdapter<R> {
    /// Build an adapter over `table`; fails on batch sizes the store cannot serve
    pub fn new(
        store: Arc<dyn DocumentStore>,
        table: impl Into<String>,
        config: AdapterConfig,
        log_dispatch: bool,
    ) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(AdapterInner {
                store,
                table: table.into(),
                config,
                log_dispatch,
                cache: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
                pending: Mutex::new(PendingGets::default()),
            }),
        })
    }

    pub fn table(&self) -> &str {
        &self.inner.table
    }

    pub fn get_cached(&self, key: &R::Key) -> Option<R> {
        self.inner.cache.lock().get(&R::serialize_key(key)).cloned()
    }

    pub fn cached_len(&self) -> usize {
        self.inner.cache.lock().len()
    }

    /// Load one record
    pub async fn get(&self, key: &R::Key) -> GraphResult<Option<R>> {
        self.enqueue(key)?.resolve().await
    }

    /// Load many records, answering in the order of `keys`
    ///
    /// All keys are queued before awaiting, so they share a dispatch.
    pub async fn get_many(&self, keys: &[R::Key]) -> GraphResult<Vec<Option<R>>> {
        let lookups = keys
            .iter()
            .map(|key| self.enqueue(key))
            .collect::<GraphResult<Vec<_>>>()?;

        let mut records = Vec::with_capacity(lookups.len());
        for lookup in lookups {
            records.push(lookup.resolve().await?);
        }
        Ok(records)
    }

    pub async fn put(&self, record: R) -> GraphResult<R> {
        self.put_many(vec![record.clone()]).await?;
        Ok(record)
    }

    /// Write records; on success every written record is primed
    pub async fn put_many(&self, records: Vec<R>) -> GraphResult<()> {
        let records = dedupe(records, |record| record.identity());
        if records.is_empty() {
            return Ok(());
        }

        let requests = records
            .iter()
            .map(|(_, record)| record.to_item().map(WriteRequest::Put))
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<String> = records.iter().map(|(id, _)| id.clone()).collect();

        self.inner.invalidate(&ids);
        if let Err(e) = self.inner.batch_write("put", requests).await {
            self.inner.invalidate(&ids);
            return Err(e);
        }
        self.prime_many(records.into_iter().map(|(_, record)| record));
        Ok(())
    }

    pub async fn del(&self, key: &R::Key) -> GraphResult<()> {
        self.del_many(vec![key.clone()]).await
    }

    /// Delete records by key; absent keys are not an error
    pub async fn del_many(&self, keys: Vec<R::Key>) -> GraphResult<()> {
        let keys = dedupe(keys, R::serialize_key);
        if keys.is_empty() {
            return Ok(());
        }

        let requests: Vec<WriteRequest> = keys
            .iter()
            .map(|(_, key)| WriteRequest::Delete(R::key_item(key)))
            .collect();
        let ids: Vec<String> = keys.into_iter().map(|(id, _)| id).collect();

        self.inner.invalidate(&ids);
        let result = self.inner.batch_write("del", requests).await;
        self.inner.invalidate(&ids);
        result
    }

    /// Seed the cache with a record without a store round-trip
    pub fn prime(&self, record: R) -> R {
        self.prime_many(std::iter::once(record.clone()));
        record
    }

    pub fn prime_many(&self, records: impl IntoIterator<Item = R>) {
        if !self.inner.config.cache_enabled {
            return;
        }
        let mut cache = self.inner.cache.lock();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        for record in records {
            cache.insert(record.identity(), record);
        }
    }

    pub fn clear(&self, key: &R::Key) {
        self.inner.invalidate(&[R::serialize_key(key)]);
    }

    pub fn clear_all(&self) {
        let mut cache = self.inner.cache.lock();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        cache.clear();
    }

    fn enqueue(&self, key: &R::Key) -> GraphResult<Lookup<R>> {
        let id = R::serialize_key(key);
        if self.inner.config.cache_enabled {
            if let Some(hit) = self.inner.cache.lock().get(&id) {
                return Ok(Lookup::Ready(Some(hit.clone())));
            }
        }

        let runtime = Handle::try_current().map_err(|e| {
            StoreError::Dispatch(format!("batch get requires a tokio runtime: {}", e))
        })?;

        let (tx, rx) = oneshot::channel();
        let schedule = {
            let mut pending = self.inner.pending.lock();
            match pending.waiters.entry(id) {
                Entry::Occupied(mut waiting) => waiting.get_mut().push(tx),
                Entry::Vacant(slot) => {
                    slot.insert(vec![tx]);
                    pending.keys.push(key.clone());
                }
            }
            !std::mem::replace(&mut pending.scheduled, true)
        };

        if schedule {
            let inner = Arc::clone(&self.inner);
            runtime.spawn(async move {
                // let the current tick queue up its gets
                tokio::task::yield_now().await;
                inner.flush_gets().await;
            });
        }
        Ok(Lookup::Waiting(rx))
    }
}

impl<R: Record> AdapterInner<R> {
    fn invalidate(&self, ids: &[String]) {
        let mut cache = self.cache.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        for id in ids {
            cache.remove(id);
        }
    }

    async fn flush_gets(&self) {
        let (keys, waiters) = {
            let mut pending = self.pending.lock();
            pending.scheduled = false;
            (
                std::mem::take(&mut pending.keys),
                std::mem::take(&mut pending.waiters),
            )
        };
        if keys.is_empty() {
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        match self.batch_get(keys).await {
            Ok(found) => {
                if self.config.cache_enabled {
                    let mut cache = self.cache.lock();
                    if self.generation.load(Ordering::SeqCst) == generation {
                        for (id, record) in &found {
                            cache.insert(id.clone(), record.clone());
                        }
                    }
                }
                for (id, replies) in waiters {
                    let record = found.get(&id);
                    for reply in replies {
                        let _ = reply.send(Ok(record.cloned()));
                    }
                }
            }
            Err(e) => {
                for reply in waiters.into_values().flatten() {
                    let _ = reply.send(Err(e.clone()));
                }
            }
        }
    }

    /// Fetch keys in chunks, keyed by serialized identity
    async fn batch_get(&self, keys: Vec<R::Key>) -> GraphResult<HashMap<String, R>> {
        let op = self.start_log(&format!(
            "batch get `{}` with {} keys",
            self.table,
            keys.len()
        ));

        let mut found = HashMap::with_capacity(keys.len());
        for chunk in keys.chunks(self.config.max_get_batch) {
            let items: Vec<Item> = chunk.iter().map(R::key_item).collect();
            for item in self.store.batch_get(&self.table, items).await? {
                let record = R::from_item(item)?;
                found.insert(record.identity(), record);
            }
        }

        self.end_log(op);
        Ok(found)
    }

    /// Write chunks in order, stopping at the first failure
    async fn batch_write(&self, kind: &str, requests: Vec<WriteRequest>) -> GraphResult<()> {
        let op = self.start_log(&format!(
            "batch {} `{}` with {} items",
            kind,
            self.table,
            requests.len()
        ));

        for chunk in requests.chunks(self.config.max_write_batch) {
            self.store.batch_write(&self.table, chunk.to_vec()).await?;
        }

        self.end_log(op);
        Ok(())
    }

    fn start_log(&self, name: &str) -> Option<(String, Instant)> {
        if !self.log_dispatch {
            return None;
        }
        let op = format!("{} (opId: {})", name, fastrand::u32(1..100_000));
        debug!("Dispatching {}", op);
        Some((op, Instant::now()))
    }

    fn end_log(&self, op: Option<(String, Instant)>) {
        if let Some((op, started)) = op {
            debug!("{}: {:?}", op, started.elapsed());
        }
    }
}

/// Keep the last value per identity, at the position of its first occurrence
fn dedupe<T, F>(values: Vec<T>, identity: F) -> Vec<(String, T)>
where
    F: Fn(&T) -> String,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<(String, T)> = Vec::with_capacity(values.len());
    for value in values {
        let id = identity(&value);
        match positions.get(&id) {
            Some(&at) => deduped[at].1 = value,
            None => {
                positions.insert(id.clone(), deduped.len());
                deduped.push((id, value));
            }
        }
    }
    deduped
}
