// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Core value types shared by vertices and edges
//!
//! - Identifiers, labels and keys are plain strings
//! - Weights and timestamps are signed integers, both usable as sort keys
//! - Attribute maps are JSON objects, stored as given

pub mod cursor;
pub mod id;
pub mod page;

pub use cursor::{Cursor, CursorQuery};
pub use page::{Page, PageInfo};

use crate::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Uniquely identifies a vertex
pub type Id = String;

/// Type name of a vertex or edge
pub type Label = String;

/// Unique string identifying a vertex within its label
pub type Key = String;

/// Sort key of an edge within its adjacency list
pub type Weight = i64;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Direction of an edge relative to its `from` vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = ">")]
    Out,
    #[serde(rename = "<")]
    In,
}

impl Direction {
    /// Marker character used inside composite keys
    pub fn marker(self) -> char {
        match self {
            Direction::Out => '>',
            Direction::In => '<',
        }
    }

    pub fn invert(self) -> Self {
        match self {
            Direction::Out => Direction::In,
            Direction::In => Direction::Out,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Out => "OUT",
            Direction::In => "IN",
        };
        write!(f, "{}", name)
    }
}

/// Weight argument of an edge write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightArg {
    /// Draw a fresh weight from the graph's weight counter
    Generate,
    Fixed(Weight),
}

impl From<Weight> for WeightArg {
    fn from(weight: Weight) -> Self {
        WeightArg::Fixed(weight)
    }
}

/// Shorthand for [`WeightArg::Generate`]
pub const GENERATE: WeightArg = WeightArg::Generate;

/// Check that a label is non-empty and free of direction markers
pub(crate) fn validate_label(label: &str) -> GraphResult<()> {
    if label.is_empty() {
        return Err(GraphError::invalid("label must be non-empty"));
    }
    if label.contains(['>', '<']) {
        return Err(GraphError::invalid(format!(
            "label '{}' may not contain '>' or '<'",
            label
        )));
    }
    Ok(())
}

/// Check that a vertex id can take part in an edge composite key
pub(crate) fn validate_id(id: &str) -> GraphResult<()> {
    if id.is_empty() {
        return Err(GraphError::invalid("id must be non-empty"));
    }
    if id.contains(['>', '<']) {
        return Err(GraphError::invalid(format!(
            "id '{}' may not contain '>' or '<'",
            id
        )));
    }
    Ok(())
}

/// Normalize an attribute payload: objects pass through, null becomes `{}`
pub(crate) fn attributes(attrs: Value) -> GraphResult<Value> {
    match attrs {
        Value::Object(_) => Ok(attrs),
        Value::Null => Ok(Value::Object(Map::new())),
        other => Err(GraphError::invalid(format!(
            "attributes must be a JSON object, got {}",
            other
        ))),
    }
}
