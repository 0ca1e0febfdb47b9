// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Edges and the edge store
//!
//! An edge is a directed, weighted, labelled arc with an attribute map. Every
//! logical edge is stored twice, once from each endpoint:
//!
//! ```text
//! (a4X, Posted, >, 10, lzE)   hk = Posted>a4X
//! (lzE, Posted, <, 10, a4X)   hk = Posted<lzE
//! ```
//!
//! The store only indexes a single hash attribute, so the anchor
//! `(label, direction, from)` is folded into `hk`. Adjacency lists are
//! `hk-weight-index` scans; `from-index` finds every record anchored at a
//! vertex, whatever its label or direction.

use crate::error::GraphResult;
use crate::graph::schema::{Cardinality, EdgeDef};
use crate::graph::Graph;
use crate::storage::tables::EDGE_KEY_SEPARATOR;
use crate::storage::{Index, Item, Record, StoreError, StoreResult, TableKind};
use crate::types::{
    attributes, cursor, validate_id, Cursor, Direction, Id, Label, Page, PageInfo, Timestamp,
    Weight, WeightArg,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from: Id,
    pub label: Label,
    pub direction: Direction,
    pub weight: Weight,
    pub to: Id,
    #[serde(default)]
    pub attrs: Value,
    pub updated_at: Timestamp,
}

/// Primary key of an edge record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub hk: String,
    pub to: Id,
}

impl EdgeKey {
    pub fn new(from: &str, label: &str, direction: Direction, to: &str) -> Self {
        Self {
            hk: hash_key(from, label, direction),
            to: to.to_string(),
        }
    }
}

/// Composite anchor attribute: `label`, direction marker, `from`
pub fn hash_key(from: &str, label: &str, direction: Direction) -> String {
    format!("{}{}{}", label, direction.marker(), from)
}

impl Edge {
    pub fn hk(&self) -> String {
        hash_key(&self.from, &self.label, self.direction)
    }

    /// The same edge seen from its other endpoint
    pub fn invert(&self) -> Edge {
        Edge {
            from: self.to.clone(),
            direction: self.direction.invert(),
            to: self.from.clone(),
            ..self.clone()
        }
    }

    pub fn is(&self, def: &EdgeDef) -> bool {
        self.label == def.label()
    }
}

impl Record for Edge {
    type Key = EdgeKey;

    const TABLE: TableKind = TableKind::Edge;

    fn key(&self) -> EdgeKey {
        EdgeKey {
            hk: self.hk(),
            to: self.to.clone(),
        }
    }

    fn serialize_key(key: &EdgeKey) -> String {
        format!("{}{}{}", key.hk, EDGE_KEY_SEPARATOR, key.to)
    }

    fn key_item(key: &EdgeKey) -> Item {
        let mut item = Item::new();
        item.insert("hk".to_string(), json!(key.hk));
        item.insert("to".to_string(), json!(key.to));
        item
    }

    fn to_item(&self) -> StoreResult<Item> {
        let mut item = match serde_json::to_value(self)? {
            Value::Object(item) => item,
            other => {
                return Err(StoreError::Serialization(format!(
                    "edge serialized to a non-object: {}",
                    other
                )))
            }
        };
        item.insert("hk".to_string(), json!(self.hk()));
        Ok(item)
    }
}

/// Edge operations of one graph
pub struct EdgeStore<'g> {
    graph: &'g Graph,
}

impl<'g> EdgeStore<'g> {
    pub(crate) fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Create or overwrite the edge `(from, label, direction, to)`
    ///
    /// Edges that would break the definition's multiplicity are removed
    /// first. The probe and the write are separate store calls, so
    /// concurrent writers to the same anchor may still both succeed.
    pub async fn set(
        &self,
        from: &str,
        def: &EdgeDef,
        direction: Direction,
        weight: impl Into<WeightArg>,
        to: &str,
        attrs: Value,
    ) -> GraphResult<Edge> {
        validate_id(from)?;
        validate_id(to)?;
        let attrs = attributes(attrs)?;
        let weight = match weight.into() {
            WeightArg::Generate => self.graph.fresh_weight().await?,
            WeightArg::Fixed(weight) => weight,
        };

        // normalize to the outgoing record
        let (source, target) = match direction {
            Direction::Out => (from, to),
            Direction::In => (to, from),
        };

        let multiplicity = def.multiplicity();
        let mut stale: Vec<Edge> = Vec::new();
        if multiplicity.incoming == Cardinality::One {
            stale.extend(
                self.adjacent(target, def, Direction::In)
                    .await?
                    .into_iter()
                    .filter(|edge| edge.to != source),
            );
        }
        if multiplicity.outgoing == Cardinality::One {
            stale.extend(
                self.adjacent(source, def, Direction::Out)
                    .await?
                    .into_iter()
                    .filter(|edge| edge.to != target),
            );
        }
        if !stale.is_empty() {
            debug!(
                "evicting {} '{}' edges to keep {}",
                stale.len(),
                def.label(),
                multiplicity
            );
            let keys = stale
                .iter()
                .flat_map(|edge| [edge.key(), edge.invert().key()])
                .collect();
            self.graph.edge_table().del_many(keys).await?;
        }

        let outgoing = Edge {
            from: source.to_string(),
            label: def.label().to_string(),
            direction: Direction::Out,
            weight,
            to: target.to_string(),
            attrs,
            updated_at: self.graph.now(),
        };
        let incoming = outgoing.invert();
        self.graph
            .edge_table()
            .put_many(vec![outgoing.clone(), incoming.clone()])
            .await?;

        Ok(match direction {
            Direction::Out => outgoing,
            Direction::In => incoming,
        })
    }

    pub async fn get(
        &self,
        from: &str,
        def: &EdgeDef,
        direction: Direction,
        to: &str,
    ) -> GraphResult<Option<Edge>> {
        validate_id(from)?;
        validate_id(to)?;
        self.graph
            .edge_table()
            .get(&EdgeKey::new(from, def.label(), direction, to))
            .await
    }

    /// Adjacency list of `from` ordered by weight
    ///
    /// Cursor bounds are weights.
    pub async fn range(
        &self,
        from: &str,
        def: &EdgeDef,
        direction: Direction,
        cursor: Option<&Cursor>,
    ) -> GraphResult<Page<Edge>> {
        validate_id(from)?;
        let query = cursor::parse(cursor)?;
        let page: Page<Edge> = self
            .graph
            .query(Index::Adjacency, hash_key(from, def.label(), direction), &query)
            .await?;
        self.graph.edge_table().prime_many(page.items.iter().cloned());
        Ok(page)
    }

    /// Sizes of the page `range` would return, without fetching it
    pub async fn count(
        &self,
        from: &str,
        def: &EdgeDef,
        direction: Direction,
        cursor: Option<&Cursor>,
    ) -> GraphResult<PageInfo> {
        validate_id(from)?;
        let query = cursor::parse(cursor)?;
        self.graph
            .count(Index::Adjacency, hash_key(from, def.label(), direction), &query)
            .await
    }

    /// Delete both records of an edge; None when it does not exist
    pub async fn remove(
        &self,
        from: &str,
        def: &EdgeDef,
        direction: Direction,
        to: &str,
    ) -> GraphResult<Option<Edge>> {
        let edge = match self.get(from, def, direction, to).await? {
            Some(edge) => edge,
            None => return Ok(None),
        };
        self.graph
            .edge_table()
            .del_many(vec![edge.key(), edge.invert().key()])
            .await?;
        Ok(Some(edge))
    }

    /// Every record at an anchor, unpaged
    async fn adjacent(&self, from: &str, def: &EdgeDef, direction: Direction) -> GraphResult<Vec<Edge>> {
        self.graph
            .find::<Edge>(
                Index::Adjacency,
                hash_key(from, def.label(), direction),
                None,
                true,
                None,
            )
            .await
    }
}
