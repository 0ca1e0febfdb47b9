//! Graph fixture for dynagraph integration tests

use dynagraph::storage::{MemoryStore, TableKind};
use dynagraph::{DocumentStore, Graph, GraphConfig, GraphRegistry, Vertex, VertexDef};
use serde_json::json;
use std::sync::Arc;

/// A provisioned graph backed by an inspectable in-memory store
pub struct GraphFixture {
    pub graph: Arc<Graph>,
    pub store: Arc<MemoryStore>,
    _registry: GraphRegistry,
}

impl GraphFixture {
    /// Graph with default configuration and store page size
    pub async fn new() -> Self {
        Self::build(GraphConfig::default(), MemoryStore::new()).await
    }

    /// Graph whose store answers queries in pages of at most `page_size` items
    pub async fn with_page_size(page_size: usize) -> Self {
        Self::build(GraphConfig::default(), MemoryStore::with_page_size(page_size)).await
    }

    pub async fn with_config(config: GraphConfig) -> Self {
        Self::build(config, MemoryStore::new()).await
    }

    async fn build(config: GraphConfig, store: MemoryStore) -> Self {
        init_logging();

        let store = Arc::new(store);
        let shared: Arc<dyn DocumentStore> = store.clone();
        let registry = GraphRegistry::new();
        let name = format!("test_graph_{}", fastrand::u64(..));
        let graph = registry
            .define(&name, config, shared)
            .expect("Failed to define test graph");
        graph.generate().await.expect("Failed to generate test graph");

        Self {
            graph,
            store,
            _registry: registry,
        }
    }

    pub fn g(&self) -> &Graph {
        &self.graph
    }

    /// Number of physical edge records currently stored
    pub fn edge_records(&self) -> usize {
        self.store
            .item_count(&self.graph.table_name(TableKind::Edge))
    }

    pub fn vertex_records(&self) -> usize {
        self.store
            .item_count(&self.graph.table_name(TableKind::Vertex))
    }

    /// Create `n` vertices of a type, named `v0`, `v1`, ...
    pub async fn people(&self, def: &VertexDef, n: usize) -> Vec<Vertex> {
        let mut vertices = Vec::with_capacity(n);
        for i in 0..n {
            let vertex = self
                .graph
                .vertices()
                .create(def, json!({ "name": format!("v{}", i) }))
                .await
                .expect("Failed to create vertex");
            vertices.push(vertex);
        }
        vertices
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
