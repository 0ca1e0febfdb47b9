// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graphs: handles, registries, definitions and configuration

pub mod config;
pub mod handle;
pub mod provision;
pub mod registry;
pub mod schema;

pub use config::{AdapterConfig, Env, GraphConfig, Region};
pub use handle::Graph;
pub use registry::GraphRegistry;
pub use schema::{
    Cardinality, DefinitionRegistry, EdgeDef, Multiplicity, VertexDef, MANY_TO_MANY, MANY_TO_ONE,
    ONE_TO_MANY, ONE_TO_ONE,
};
