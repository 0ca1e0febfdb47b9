//! Edge store tests
//!
//! Covers bidirectional materialization, upserts, removal and multiplicity
//! enforcement.

#[path = "testutils/mod.rs"]
mod testutils;

use dynagraph::{Direction, GraphError, WeightArg, GENERATE, MANY_TO_MANY, MANY_TO_ONE, ONE_TO_MANY, ONE_TO_ONE};
use serde_json::json;
use testutils::graph_fixture::GraphFixture;

#[tokio::test]
async fn test_set_materializes_both_directions() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let follows = g.define_edge("Follows", MANY_TO_MANY).unwrap();
    let people = fixture.people(&person, 2).await;
    let (v1, v2) = (&people[0], &people[1]);

    let edge = g
        .edges()
        .set(&v1.id, &follows, Direction::Out, GENERATE, &v2.id, json!({ "since": 2016 }))
        .await
        .unwrap();
    assert_eq!(edge.from, v1.id);
    assert_eq!(edge.to, v2.id);
    assert_eq!(edge.direction, Direction::Out);
    assert_ne!(edge.weight, 0);
    assert_eq!(fixture.edge_records(), 2);

    let forward = g
        .edges()
        .get(&v1.id, &follows, Direction::Out, &v2.id)
        .await
        .unwrap();
    assert_eq!(forward, Some(edge.clone()));

    let mirror = g
        .edges()
        .get(&v2.id, &follows, Direction::In, &v1.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mirror, edge.invert());
    assert_eq!(mirror.direction, Direction::In);
    assert_eq!(mirror.weight, edge.weight);
    assert_eq!(mirror.attrs, edge.attrs);
}

#[tokio::test]
async fn test_set_from_the_incoming_side() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let posted = g.define_edge("Posted", MANY_TO_MANY).unwrap();

    let edge = g
        .edges()
        .set("post", &posted, Direction::In, WeightArg::Fixed(42), "author", json!({}))
        .await
        .unwrap();
    assert_eq!(edge.from, "post");
    assert_eq!(edge.direction, Direction::In);
    assert_eq!(edge.weight, 42);

    let outgoing = g
        .edges()
        .get("author", &posted, Direction::Out, "post")
        .await
        .unwrap();
    assert_eq!(outgoing, Some(edge.invert()));
}

#[tokio::test]
async fn test_edge_lifecycle() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let knows = g.define_edge("Knows", MANY_TO_MANY).unwrap();

    assert_eq!(
        g.edges().get("a", &knows, Direction::Out, "b").await.unwrap(),
        None
    );

    g.edges()
        .set("a", &knows, Direction::Out, WeightArg::Fixed(5), "b", json!({ "v": 1 }))
        .await
        .unwrap();
    let replaced = g
        .edges()
        .set("a", &knows, Direction::Out, WeightArg::Fixed(7), "b", json!({ "v": 2 }))
        .await
        .unwrap();
    assert_eq!(fixture.edge_records(), 2);

    let stored = g
        .edges()
        .get("b", &knows, Direction::In, "a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.attrs, json!({ "v": 2 }));
    assert_eq!(stored.weight, 7);

    let removed = g
        .edges()
        .remove("b", &knows, Direction::In, "a")
        .await
        .unwrap();
    assert_eq!(removed, Some(replaced.invert()));
    assert_eq!(fixture.edge_records(), 0);
    assert_eq!(
        g.edges().get("a", &knows, Direction::Out, "b").await.unwrap(),
        None
    );
    assert_eq!(
        g.edges().remove("a", &knows, Direction::Out, "b").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_out_one_keeps_latest_target() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let lives_in = g.define_edge("LivesIn", MANY_TO_ONE).unwrap();

    g.edges()
        .set("a", &lives_in, Direction::Out, GENERATE, "x", json!({}))
        .await
        .unwrap();
    g.edges()
        .set("b", &lives_in, Direction::Out, GENERATE, "x", json!({}))
        .await
        .unwrap();
    g.edges()
        .set("a", &lives_in, Direction::Out, GENERATE, "y", json!({}))
        .await
        .unwrap();

    let from_a = g
        .edges()
        .range("a", &lives_in, Direction::Out, None)
        .await
        .unwrap();
    assert_eq!(from_a.items.len(), 1);
    assert_eq!(from_a.items[0].to, "y");
    assert!(g
        .edges()
        .get("x", &lives_in, Direction::In, "a")
        .await
        .unwrap()
        .is_none());

    // in: MANY leaves other sources alone
    let into_x = g
        .edges()
        .range("x", &lives_in, Direction::In, None)
        .await
        .unwrap();
    assert_eq!(into_x.items.len(), 1);
    assert_eq!(into_x.items[0].to, "b");
    assert_eq!(fixture.edge_records(), 4);
}

#[tokio::test]
async fn test_in_one_keeps_latest_source() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let owns = g.define_edge("Owns", ONE_TO_MANY).unwrap();

    g.edges()
        .set("a", &owns, Direction::Out, GENERATE, "x", json!({}))
        .await
        .unwrap();
    g.edges()
        .set("a", &owns, Direction::Out, GENERATE, "z", json!({}))
        .await
        .unwrap();
    g.edges()
        .set("b", &owns, Direction::Out, GENERATE, "x", json!({}))
        .await
        .unwrap();

    let into_x = g.edges().range("x", &owns, Direction::In, None).await.unwrap();
    assert_eq!(into_x.items.len(), 1);
    assert_eq!(into_x.items[0].to, "b");

    let from_a = g.edges().range("a", &owns, Direction::Out, None).await.unwrap();
    assert_eq!(from_a.items.len(), 1);
    assert_eq!(from_a.items[0].to, "z");

    // the same constraint written from the incoming side
    g.edges()
        .set("x", &owns, Direction::In, GENERATE, "c", json!({}))
        .await
        .unwrap();
    let into_x = g.edges().range("x", &owns, Direction::In, None).await.unwrap();
    assert_eq!(into_x.items.len(), 1);
    assert_eq!(into_x.items[0].to, "c");
    assert!(g
        .edges()
        .range("b", &owns, Direction::Out, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_one_to_one_never_evicts_the_identical_edge() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let married = g.define_edge("MarriedTo", ONE_TO_ONE).unwrap();

    let first = g
        .edges()
        .set("a", &married, Direction::Out, GENERATE, "b", json!({ "year": 1990 }))
        .await
        .unwrap();
    let again = g
        .edges()
        .set("a", &married, Direction::Out, GENERATE, "b", json!({ "year": 1991 }))
        .await
        .unwrap();
    assert!(again.weight > first.weight);
    assert_eq!(fixture.edge_records(), 2);

    g.edges()
        .set("c", &married, Direction::Out, GENERATE, "b", json!({}))
        .await
        .unwrap();
    g.edges()
        .set("c", &married, Direction::Out, GENERATE, "d", json!({}))
        .await
        .unwrap();

    assert_eq!(fixture.edge_records(), 2);
    assert!(g
        .edges()
        .get("c", &married, Direction::Out, "d")
        .await
        .unwrap()
        .is_some());
    assert!(g
        .edges()
        .range("a", &married, Direction::Out, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_labels_do_not_share_adjacency() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let follows = g.define_edge("Follows", MANY_TO_MANY).unwrap();
    let blocks = g.define_edge("Blocks", ONE_TO_ONE).unwrap();

    g.edges()
        .set("a", &follows, Direction::Out, GENERATE, "b", json!({}))
        .await
        .unwrap();
    g.edges()
        .set("a", &blocks, Direction::Out, GENERATE, "c", json!({}))
        .await
        .unwrap();

    let follows_page = g.edges().range("a", &follows, Direction::Out, None).await.unwrap();
    assert_eq!(follows_page.items.len(), 1);
    assert!(follows_page.items[0].is(&follows));
    assert!(!follows_page.items[0].is(&blocks));
}

#[tokio::test]
async fn test_invalid_endpoints_and_attributes() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let follows = g.define_edge("Follows", MANY_TO_MANY).unwrap();

    for (from, to) in [("", "b"), ("a", ""), ("a>b", "c"), ("a", "c<d")] {
        let result = g
            .edges()
            .set(from, &follows, Direction::Out, WeightArg::Fixed(1), to, json!({}))
            .await;
        assert!(matches!(result, Err(GraphError::InvalidArgument(_))));
    }
    let result = g
        .edges()
        .set("a", &follows, Direction::Out, WeightArg::Fixed(1), "b", json!("text"))
        .await;
    assert!(matches!(result, Err(GraphError::InvalidArgument(_))));
    assert_eq!(fixture.edge_records(), 0);
    assert_eq!(g.counter_value("weight").await.unwrap(), Some(0));
}
