//! Test utilities for dynagraph integration tests
//!
//! GraphFixture builds a provisioned graph on a fresh MemoryStore, under a
//! unique name and in its own registry, so tests can run in parallel.

pub mod graph_fixture;
