//! Vertex store tests
//!
//! Covers creation, keyed upserts, updates, lookups and cascading removal.

#[path = "testutils/mod.rs"]
mod testutils;

use dynagraph::{Cursor, Direction, GraphError, GENERATE, MANY_TO_MANY};
use serde_json::json;
use testutils::graph_fixture::GraphFixture;

#[tokio::test]
async fn test_create_and_get() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();

    let ada = g
        .vertices()
        .create(&person, json!({ "name": "Ada" }))
        .await
        .unwrap();
    assert_eq!(ada.label, "Person");
    assert_eq!(ada.key, None);
    assert_eq!(ada.attrs, json!({ "name": "Ada" }));
    assert!(ada.updated_at > 0);
    assert!(ada.is(&person));

    let fetched = g.vertices().get(&ada.id).await.unwrap();
    assert_eq!(fetched, Some(ada.clone()));

    let alan = g.vertices().create(&person, json!(null)).await.unwrap();
    assert_ne!(alan.id, ada.id);
    assert_eq!(alan.attrs, json!({}));
}

#[tokio::test]
async fn test_create_rejects_non_object_attributes() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();

    let result = g.vertices().create(&person, json!([1, 2, 3])).await;
    assert!(matches!(result, Err(GraphError::InvalidArgument(_))));
    assert_eq!(fixture.vertex_records(), 0);
    assert_eq!(g.counter_value("id").await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_get_many_keeps_order_and_reports_missing() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let people = fixture.people(&person, 3).await;

    let ids = vec![
        people[2].id.clone(),
        "zzz".to_string(),
        people[0].id.clone(),
    ];
    let found = g.vertices().get_many(&ids).await.unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].as_ref(), Some(&people[2]));
    assert_eq!(found[1], None);
    assert_eq!(found[2].as_ref(), Some(&people[0]));
}

#[tokio::test]
async fn test_update_replaces_attributes() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();

    let keyed = g
        .vertices()
        .put_by_key(&person, "ada", json!({ "name": "Ada", "born": 1815 }))
        .await
        .unwrap();
    let updated = g
        .vertices()
        .update(&person, &keyed.id, json!({ "name": "Ada Lovelace" }))
        .await
        .unwrap();

    assert_eq!(updated.id, keyed.id);
    assert_eq!(updated.key.as_deref(), Some("ada"));
    assert_eq!(updated.attrs, json!({ "name": "Ada Lovelace" }));
    assert!(updated.updated_at > keyed.updated_at);

    g.vertex_table().clear_all();
    assert_eq!(g.vertices().get(&keyed.id).await.unwrap(), Some(updated));
}

#[tokio::test]
async fn test_update_errors() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let place = g.define_vertex("Place").unwrap();

    let missing = g.vertices().update(&person, "nope", json!({})).await;
    assert!(matches!(missing, Err(GraphError::NotFound(_))));

    let ada = g.vertices().create(&person, json!({})).await.unwrap();
    let wrong_label = g.vertices().update(&place, &ada.id, json!({})).await;
    assert!(matches!(wrong_label, Err(GraphError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_put_by_key_upserts() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();

    let first = g
        .vertices()
        .put_by_key(&person, "alice", json!({ "age": 30 }))
        .await
        .unwrap();
    let second = g
        .vertices()
        .put_by_key(&person, "alice", json!({ "age": 31 }))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.attrs["age"], 31);
    assert_eq!(fixture.vertex_records(), 1);

    let by_key = g.vertices().get_by_key(&person, "alice").await.unwrap();
    assert_eq!(by_key, Some(second));
}

#[tokio::test]
async fn test_put_creates_at_a_chosen_id() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();

    let imported = g
        .vertices()
        .put(&person, "legacy:42", json!({ "name": "Ada" }))
        .await
        .unwrap();
    assert_eq!(imported.id, "legacy:42");
    assert_eq!(imported.key, None);
    assert_eq!(g.vertex_table().get_cached(&imported.id), Some(imported.clone()));
    // no id is drawn from the counter
    assert_eq!(g.counter_value("id").await.unwrap(), Some(0));

    g.vertex_table().clear_all();
    assert_eq!(g.vertices().get("legacy:42").await.unwrap(), Some(imported));

    for bad in ["", "a>b", "a<b"] {
        assert!(matches!(
            g.vertices().put(&person, bad, json!({})).await,
            Err(GraphError::InvalidArgument(_))
        ));
    }
    assert_eq!(fixture.vertex_records(), 1);
}

#[tokio::test]
async fn test_put_overwrites_and_keeps_the_key() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let place = g.define_vertex("Place").unwrap();

    let keyed = g
        .vertices()
        .put_by_key(&person, "ada", json!({ "born": 1815 }))
        .await
        .unwrap();
    let overwritten = g
        .vertices()
        .put(&person, &keyed.id, json!({ "born": 1816 }))
        .await
        .unwrap();
    assert_eq!(overwritten.id, keyed.id);
    assert_eq!(overwritten.key.as_deref(), Some("ada"));
    assert_eq!(overwritten.attrs, json!({ "born": 1816 }));
    assert!(overwritten.updated_at > keyed.updated_at);
    assert_eq!(
        g.vertices().get_by_key(&person, "ada").await.unwrap(),
        Some(overwritten.clone())
    );

    // a new label replaces the vertex, key included
    let relabelled = g
        .vertices()
        .put(&place, &keyed.id, json!({}))
        .await
        .unwrap();
    assert!(relabelled.is(&place));
    assert_eq!(relabelled.key, None);
    assert!(g
        .vertices()
        .get_by_key(&person, "ada")
        .await
        .unwrap()
        .is_none());
    assert_eq!(fixture.vertex_records(), 1);
}

#[tokio::test]
async fn test_keys_are_scoped_by_label() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let place = g.define_vertex("Place").unwrap();

    let alice = g
        .vertices()
        .put_by_key(&person, "paris", json!({}))
        .await
        .unwrap();
    let city = g
        .vertices()
        .put_by_key(&place, "paris", json!({}))
        .await
        .unwrap();
    assert_ne!(alice.id, city.id);

    assert!(g
        .vertices()
        .get_by_key(&person, "london")
        .await
        .unwrap()
        .is_none());
    assert!(matches!(
        g.vertices().put_by_key(&person, "", json!({})).await,
        Err(GraphError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_all_lists_a_label_by_update_time() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let place = g.define_vertex("Place").unwrap();
    let people = fixture.people(&person, 4).await;
    g.vertices().create(&place, json!({})).await.unwrap();

    let page = g.vertices().all(&person, None).await.unwrap();
    assert_eq!(page.items, people);
    assert_eq!(page.count, 4);
    assert_eq!(page.total, None);

    // touching a vertex moves it to the end
    let touched = g
        .vertices()
        .update(&person, &people[0].id, json!({ "touched": true }))
        .await
        .unwrap();
    let page = g.vertices().all(&person, None).await.unwrap();
    assert_eq!(page.last(), Some(&touched));

    let newest = g
        .vertices()
        .all(&person, Some(&Cursor::last(1)))
        .await
        .unwrap();
    assert_eq!(newest.items, vec![touched]);
    assert_eq!(newest.total, Some(4));
}

#[tokio::test]
async fn test_remove_vertex_without_edges() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let ada = g.vertices().create(&person, json!({})).await.unwrap();

    let removed = g.vertices().remove(&ada.id).await.unwrap();
    assert_eq!(removed, ada);
    assert_eq!(g.vertices().get(&ada.id).await.unwrap(), None);
    assert!(matches!(
        g.vertices().remove(&ada.id).await,
        Err(GraphError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_remove_vertex_with_one_edge() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let follows = g.define_edge("Follows", MANY_TO_MANY).unwrap();
    let people = fixture.people(&person, 2).await;
    let (ada, alan) = (&people[0], &people[1]);

    g.edges()
        .set(&ada.id, &follows, Direction::Out, GENERATE, &alan.id, json!({}))
        .await
        .unwrap();
    assert_eq!(fixture.edge_records(), 2);

    g.vertices().remove(&alan.id).await.unwrap();

    assert_eq!(fixture.edge_records(), 0);
    assert!(g
        .edges()
        .range(&ada.id, &follows, Direction::Out, None)
        .await
        .unwrap()
        .is_empty());
    assert!(g
        .edges()
        .range(&alan.id, &follows, Direction::In, None)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        g.edges()
            .get(&ada.id, &follows, Direction::Out, &alan.id)
            .await
            .unwrap(),
        None
    );
    assert_eq!(g.vertices().get(&ada.id).await.unwrap().as_ref(), Some(ada));
}

#[tokio::test]
async fn test_remove_vertex_cascades_to_edges() {
    let fixture = GraphFixture::new().await;
    let g = fixture.g();
    let person = g.define_vertex("Person").unwrap();
    let follows = g.define_edge("Follows", MANY_TO_MANY).unwrap();
    let likes = g.define_edge("Likes", MANY_TO_MANY).unwrap();
    let people = fixture.people(&person, 4).await;
    let (hub, a, b, bystander) = (&people[0], &people[1], &people[2], &people[3]);

    g.edges()
        .set(&hub.id, &follows, Direction::Out, GENERATE, &a.id, json!({}))
        .await
        .unwrap();
    g.edges()
        .set(&b.id, &follows, Direction::Out, GENERATE, &hub.id, json!({}))
        .await
        .unwrap();
    g.edges()
        .set(&hub.id, &likes, Direction::In, GENERATE, &a.id, json!({}))
        .await
        .unwrap();
    g.edges()
        .set(&hub.id, &likes, Direction::Out, GENERATE, "TEST:0", json!({}))
        .await
        .unwrap();
    g.edges()
        .set(&a.id, &follows, Direction::Out, GENERATE, &bystander.id, json!({}))
        .await
        .unwrap();
    assert_eq!(fixture.edge_records(), 10);

    g.vertices().remove(&hub.id).await.unwrap();

    assert_eq!(fixture.edge_records(), 2);
    for (vertex, def, direction) in [
        (&a.id, &follows, Direction::In),
        (&b.id, &follows, Direction::Out),
        (&a.id, &likes, Direction::Out),
        (&hub.id, &follows, Direction::Out),
        (&hub.id, &likes, Direction::Out),
    ] {
        let page = g.edges().range(vertex, def, direction, None).await.unwrap();
        assert!(page.is_empty(), "{} {} {}", vertex, def.label(), direction);
    }
    let foreign = g
        .edges()
        .range("TEST:0", &likes, Direction::In, None)
        .await
        .unwrap();
    assert!(foreign.is_empty());

    let survivor = g
        .edges()
        .get(&a.id, &follows, Direction::Out, &bystander.id)
        .await
        .unwrap();
    assert!(survivor.is_some());
}
