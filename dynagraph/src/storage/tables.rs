// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Physical table layout of a graph
//!
//! Each graph `<name>` is stored in three tables:
//! - `<name>-vertex`: primary key `id`
//! - `<name>-edge`: primary key `(hk, to)` where `hk = label + marker + from`
//! - `<name>-system`: primary key `key`, counters keep their value in `value`
//!
//! The store only offers single hash+range indices, so every lookup the graph
//! needs is served by one of the indices below.

use super::drivers::{IndexSchema, KeySchema, TableSchema};

/// Attribute holding a system counter's value
pub const COUNTER_VALUE: &str = "value";

/// System counter drawn for vertex ids
pub const ID_COUNTER: &str = "id";

/// System counter drawn for edge weights
pub const WEIGHT_COUNTER: &str = "weight";

/// Separator between the two parts of a serialized edge key
pub const EDGE_KEY_SEPARATOR: &str = "~$~";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Vertex,
    Edge,
    System,
}

impl TableKind {
    pub fn suffix(self) -> &'static str {
        match self {
            TableKind::Vertex => "vertex",
            TableKind::Edge => "edge",
            TableKind::System => "system",
        }
    }

    /// Physical table name for a graph
    pub fn table_name(self, graph: &str) -> String {
        format!("{}-{}", graph, self.suffix())
    }

    pub fn key(self) -> KeySchema {
        match self {
            TableKind::Vertex => KeySchema::hash("id"),
            TableKind::Edge => KeySchema::composite("hk", "to"),
            TableKind::System => KeySchema::hash("key"),
        }
    }

    pub fn indexes(self) -> &'static [Index] {
        match self {
            TableKind::Vertex => &[Index::VertexKey, Index::VertexAll],
            TableKind::Edge => &[Index::Adjacency, Index::EdgeFrom],
            TableKind::System => &[],
        }
    }

    pub fn schema(self, graph: &str) -> TableSchema {
        TableSchema {
            name: self.table_name(graph),
            key: self.key(),
            indexes: self.indexes().iter().map(|index| index.schema()).collect(),
        }
    }

    pub fn all() -> [TableKind; 3] {
        [TableKind::System, TableKind::Vertex, TableKind::Edge]
    }
}

/// Secondary indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    /// `(label, key)`: vertices by unique key
    VertexKey,
    /// `(label, updatedAt)`: label-scoped vertex scans
    VertexAll,
    /// `(hk, weight)`: adjacency lists ordered by weight
    Adjacency,
    /// `from`: every edge record anchored at a vertex
    EdgeFrom,
}

impl Index {
    pub fn name(self) -> &'static str {
        match self {
            Index::VertexKey => "label-key-index",
            Index::VertexAll => "label-updatedAt-index",
            Index::Adjacency => "hk-weight-index",
            Index::EdgeFrom => "from-index",
        }
    }

    pub fn table(self) -> TableKind {
        match self {
            Index::VertexKey | Index::VertexAll => TableKind::Vertex,
            Index::Adjacency | Index::EdgeFrom => TableKind::Edge,
        }
    }

    pub fn key(self) -> KeySchema {
        match self {
            Index::VertexKey => KeySchema::composite("label", "key"),
            Index::VertexAll => KeySchema::composite("label", "updatedAt"),
            Index::Adjacency => KeySchema::composite("hk", "weight"),
            Index::EdgeFrom => KeySchema::hash("from"),
        }
    }

    pub fn schema(self) -> IndexSchema {
        IndexSchema {
            name: self.name().to_string(),
            key: self.key(),
        }
    }
}
