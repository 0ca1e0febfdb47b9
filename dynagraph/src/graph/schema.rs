// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Vertex and edge definitions
//!
//! A definition names a vertex or edge type by its label. Definitions are
//! registered once per label in the [`DefinitionRegistry`] of a graph;
//! redefining a label returns the registered definition when it agrees and
//! fails with [`GraphError::DefinitionConflict`] when it does not.

use crate::error::{GraphError, GraphResult};
use crate::types::{validate_label, Label};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How many edges of one label a vertex may take part in on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cardinality {
    One,
    Many,
}

impl FromStr for Cardinality {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ONE" => Ok(Cardinality::One),
            "MANY" => Ok(Cardinality::Many),
            _ => Err(GraphError::invalid(format!(
                "Unknown cardinality: {}. Valid options: ONE, MANY",
                s
            ))),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::One => write!(f, "ONE"),
            Cardinality::Many => write!(f, "MANY"),
        }
    }
}

/// Cardinality constraint of an edge label
///
/// `incoming: One` allows at most one `from` per `(to, label)`;
/// `outgoing: One` allows at most one `to` per `(from, label)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiplicity {
    #[serde(rename = "in")]
    pub incoming: Cardinality,
    #[serde(rename = "out")]
    pub outgoing: Cardinality,
}

pub const MANY_TO_MANY: Multiplicity = Multiplicity {
    incoming: Cardinality::Many,
    outgoing: Cardinality::Many,
};

pub const MANY_TO_ONE: Multiplicity = Multiplicity {
    incoming: Cardinality::Many,
    outgoing: Cardinality::One,
};

pub const ONE_TO_MANY: Multiplicity = Multiplicity {
    incoming: Cardinality::One,
    outgoing: Cardinality::Many,
};

pub const ONE_TO_ONE: Multiplicity = Multiplicity {
    incoming: Cardinality::One,
    outgoing: Cardinality::One,
};

impl FromStr for Multiplicity {
    type Err = GraphError;

    /// Parses `<IN>2<OUT>`, e.g. `ONE2MANY`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (incoming, outgoing) = s.split_once('2').ok_or_else(|| {
            GraphError::invalid(format!("Multiplicity must look like ONE2MANY, got {}", s))
        })?;
        Ok(Multiplicity {
            incoming: incoming.parse()?,
            outgoing: outgoing.parse()?,
        })
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}2{}", self.incoming, self.outgoing)
    }
}

/// Type descriptor of a vertex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexDef {
    label: Label,
}

impl VertexDef {
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Type descriptor of an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeDef {
    label: Label,
    multiplicity: Multiplicity,
}

impl EdgeDef {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }
}

/// Label-keyed definitions of one graph
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    vertices: RwLock<HashMap<Label, VertexDef>>,
    edges: RwLock<HashMap<Label, EdgeDef>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_vertex(&self, label: &str) -> GraphResult<VertexDef> {
        validate_label(label)?;

        let mut vertices = self.vertices.write();
        let def = vertices
            .entry(label.to_string())
            .or_insert_with(|| VertexDef {
                label: label.to_string(),
            });
        Ok(def.clone())
    }

    pub fn define_edge(&self, label: &str, multiplicity: Multiplicity) -> GraphResult<EdgeDef> {
        validate_label(label)?;

        let mut edges = self.edges.write();
        if let Some(existing) = edges.get(label) {
            if existing.multiplicity != multiplicity {
                return Err(GraphError::conflict(format!(
                    "edge '{}' is already defined as {}, cannot redefine it as {}",
                    label, existing.multiplicity, multiplicity
                )));
            }
            return Ok(existing.clone());
        }

        let def = EdgeDef {
            label: label.to_string(),
            multiplicity,
        };
        edges.insert(label.to_string(), def.clone());
        Ok(def)
    }

    pub fn vertex(&self, label: &str) -> Option<VertexDef> {
        self.vertices.read().get(label).cloned()
    }

    pub fn edge(&self, label: &str) -> Option<EdgeDef> {
        self.edges.read().get(label).cloned()
    }

    pub fn vertex_labels(&self) -> Vec<Label> {
        let mut labels: Vec<Label> = self.vertices.read().keys().cloned().collect();
        labels.sort();
        labels
    }

    pub fn edge_labels(&self) -> Vec<Label> {
        let mut labels: Vec<Label> = self.edges.read().keys().cloned().collect();
        labels.sort();
        labels
    }
}
