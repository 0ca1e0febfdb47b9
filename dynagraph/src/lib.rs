// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! dynagraph - A property graph over hash+range key-value stores
//!
//! dynagraph stores vertices, directed weighted edges and their attribute
//! maps in a document store that offers nothing beyond single hash+range
//! indices and size-bounded batch operations.
//!
//! # Features
//!
//! - **Composite keys**: edge anchors `(label, direction, from)` are folded
//!   into one indexed attribute
//! - **Bidirectional edges**: every edge is stored from both endpoints
//! - **Multiplicity**: `ONE`/`MANY` constraints enforced on every edge write
//! - **Cursor pagination**: relay-style cursors become range queries
//! - **Batching cache**: gets are coalesced per scheduling tick, writes are
//!   deduplicated and chunked to the store's batch limits
//! - **Pluggable stores**: in-memory and Sled drivers ship with the crate
//!
//! # Usage
//!
//! ```ignore
//! use dynagraph::{create_store, Direction, GraphConfig, GraphRegistry, StoreType, GENERATE, MANY_TO_MANY};
//! use serde_json::json;
//!
//! let store = create_store(StoreType::Memory, "")?;
//! let g = GraphRegistry::global().define("social", GraphConfig::default(), store)?;
//! g.generate().await?;
//!
//! let person = g.define_vertex("Person")?;
//! let follows = g.define_edge("Follows", MANY_TO_MANY)?;
//!
//! let ada = g.vertices().create(&person, json!({ "name": "Ada" })).await?;
//! let alan = g.vertices().put_by_key(&person, "alan", json!({ "name": "Alan" })).await?;
//! g.edges().set(&ada.id, &follows, Direction::Out, GENERATE, &alan.id, json!({})).await?;
//! ```

pub mod edge;
pub mod error;
pub mod graph;
pub mod storage;
pub mod types;
pub mod vertex;

pub use edge::{Edge, EdgeKey, EdgeStore};
pub use error::{GraphError, GraphResult};
pub use graph::{
    AdapterConfig, Cardinality, DefinitionRegistry, EdgeDef, Env, Graph, GraphConfig,
    GraphRegistry, Multiplicity, Region, VertexDef, MANY_TO_MANY, MANY_TO_ONE, ONE_TO_MANY,
    ONE_TO_ONE,
};
pub use storage::{create_store, DocumentStore, MemoryStore, StoreError, StoreType};
#[cfg(feature = "sled-backend")]
pub use storage::SledStore;
pub use types::{
    Cursor, Direction, Id, Key, Label, Page, PageInfo, Timestamp, Weight, WeightArg, GENERATE,
};
pub use vertex::{Vertex, VertexStore};

/// dynagraph version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
