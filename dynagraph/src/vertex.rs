// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Vertices and the vertex store
//!
//! A vertex is an id, a label and an attribute map. It may also carry a key,
//! unique within its label, and always carries `updatedAt`, the time of its
//! last write, which orders label-scoped scans.

use crate::edge::Edge;
use crate::error::{GraphError, GraphResult};
use crate::graph::schema::VertexDef;
use crate::graph::Graph;
use crate::storage::{Index, Item, RangeCondition, Record, TableKind};
use crate::types::{attributes, cursor, validate_id, Cursor, Id, Key, Label, Page, Timestamp};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    pub id: Id,
    pub label: Label,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub attrs: Value,
}

impl Vertex {
    /// Whether this vertex is of the given type
    pub fn is(&self, def: &VertexDef) -> bool {
        self.label == def.label()
    }
}

impl Record for Vertex {
    type Key = Id;

    const TABLE: TableKind = TableKind::Vertex;

    fn key(&self) -> Id {
        self.id.clone()
    }

    fn serialize_key(key: &Id) -> String {
        key.clone()
    }

    fn key_item(key: &Id) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), json!(key));
        item
    }
}

/// Vertex operations of one graph
pub struct VertexStore<'g> {
    graph: &'g Graph,
}

impl<'g> VertexStore<'g> {
    pub(crate) fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Create a vertex under a fresh id
    pub async fn create(&self, def: &VertexDef, attrs: Value) -> GraphResult<Vertex> {
        let attrs = attributes(attrs)?;
        let id = self.graph.fresh_id().await?;
        self.write(def, id, None, attrs).await
    }

    /// Replace the attributes of an existing vertex, keeping its id and key
    pub async fn update(&self, def: &VertexDef, id: &str, attrs: Value) -> GraphResult<Vertex> {
        let attrs = attributes(attrs)?;
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| GraphError::not_found(format!("vertex '{}'", id)))?;
        if !existing.is(def) {
            return Err(GraphError::invalid(format!(
                "vertex '{}' is a {}, not a {}",
                id,
                existing.label,
                def.label()
            )));
        }
        self.write(def, existing.id, existing.key, attrs).await
    }

    /// Write a vertex at a caller-chosen id, creating or overwriting it
    ///
    /// An overwritten vertex of the same label keeps its key; a vertex of
    /// another label is replaced outright.
    pub async fn put(&self, def: &VertexDef, id: &str, attrs: Value) -> GraphResult<Vertex> {
        validate_id(id)?;
        let attrs = attributes(attrs)?;
        let key = self
            .get(id)
            .await?
            .filter(|existing| existing.is(def))
            .and_then(|existing| existing.key);
        self.write(def, id.to_string(), key, attrs).await
    }

    /// Upsert the vertex identified by `(label, key)`
    ///
    /// Two concurrent callers may both miss the lookup and create duplicates.
    pub async fn put_by_key(&self, def: &VertexDef, key: &str, attrs: Value) -> GraphResult<Vertex> {
        if key.is_empty() {
            return Err(GraphError::invalid("vertex key must be non-empty"));
        }
        let attrs = attributes(attrs)?;
        let id = match self.get_by_key(def, key).await? {
            Some(existing) => existing.id,
            None => self.graph.fresh_id().await?,
        };
        self.write(def, id, Some(key.to_string()), attrs).await
    }

    pub async fn get(&self, id: &str) -> GraphResult<Option<Vertex>> {
        self.graph.vertex_table().get(&id.to_string()).await
    }

    /// Vertices in the order of `ids`, None where absent
    pub async fn get_many(&self, ids: &[Id]) -> GraphResult<Vec<Option<Vertex>>> {
        self.graph.vertex_table().get_many(ids).await
    }

    pub async fn get_by_key(&self, def: &VertexDef, key: &str) -> GraphResult<Option<Vertex>> {
        let found = self
            .graph
            .find::<Vertex>(
                Index::VertexKey,
                def.label(),
                Some(RangeCondition::eq(key)),
                true,
                Some(1),
            )
            .await?;
        Ok(found
            .into_iter()
            .next()
            .map(|vertex| self.graph.vertex_table().prime(vertex)))
    }

    /// Vertices of a type ordered by `updatedAt`
    ///
    /// Cursor bounds are `updatedAt` values.
    pub async fn all(&self, def: &VertexDef, cursor: Option<&Cursor>) -> GraphResult<Page<Vertex>> {
        let query = cursor::parse(cursor)?;
        let page: Page<Vertex> = self
            .graph
            .query(Index::VertexAll, def.label(), &query)
            .await?;
        self.graph.vertex_table().prime_many(page.items.iter().cloned());
        Ok(page)
    }

    /// Delete a vertex and every edge incident to it
    pub async fn remove(&self, id: &str) -> GraphResult<Vertex> {
        let vertex = self
            .get(id)
            .await?
            .ok_or_else(|| GraphError::not_found(format!("vertex '{}'", id)))?;

        let incident = self
            .graph
            .find::<Edge>(Index::EdgeFrom, id, None, true, None)
            .await?;
        if !incident.is_empty() {
            debug!(
                "removing {} edge records incident to vertex '{}'",
                incident.len(),
                id
            );
            let keys = incident
                .iter()
                .flat_map(|edge| [edge.key(), edge.invert().key()])
                .collect();
            self.graph.edge_table().del_many(keys).await?;
        }

        self.graph.vertex_table().del(&vertex.id).await?;
        Ok(vertex)
    }

    async fn write(
        &self,
        def: &VertexDef,
        id: Id,
        key: Option<Key>,
        attrs: Value,
    ) -> GraphResult<Vertex> {
        let vertex = Vertex {
            id,
            label: def.label().to_string(),
            key,
            updated_at: self.graph.now(),
            attrs,
        };
        self.graph.vertex_table().put(vertex).await
    }
}
