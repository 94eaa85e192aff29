//! Integration tests for document writes and point lookups.

use proptest::prelude::*;
use searchit::gateway::{Operation, Request, WriteMode};
use searchit::{Error, ItemRepository, SearchableItem};
use serde_json::{Map, Value, json};

use crate::common::{TestHarness, article, user};

#[tokio::test]
async fn test_insert_then_find_round_trips() {
    let harness = TestHarness::with_schemas().await;
    let item = user("u1", "Ada", "Writes engines").with_tags(["math", "engines"]);

    harness.items().insert(item.clone(), true).await.unwrap();
    let found = harness.items().find_by_identifier("u1", "user").await.unwrap();

    assert_eq!(found.attributes, item.attributes);
    assert_eq!(found.tags, item.tags);
}

#[tokio::test]
async fn test_insert_checks_then_creates() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(article("a1", "Hello", "World").with_tags(["greeting"]), true)
        .await
        .unwrap();

    let requests = harness.gateway.requests();
    assert_eq!(
        harness.gateway.operations(),
        vec![Operation::DocumentExists, Operation::IndexDocument]
    );
    let Request::IndexDocument { mode, body, .. } = &requests[1] else {
        panic!("expected index-document, got {:?}", requests[1]);
    };
    assert_eq!(*mode, WriteMode::Create);
    assert_eq!(body["tags_list"], json!(["greeting"]));
    assert_eq!(
        body["name_suggest"],
        json!({"input": ["greeting"], "contexts": {"suggest_type": ["article"]}})
    );
}

#[tokio::test]
async fn test_second_insert_fails() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(article("a1", "Hello", "World"), true)
        .await
        .unwrap();

    let err = harness
        .items()
        .insert(article("a1", "Other", "Text"), true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DocumentAlreadyExists { .. }));

    let found = harness.items().find_by_identifier("a1", "article").await.unwrap();
    assert_eq!(found.attributes["title"], "Hello");
}

#[tokio::test]
async fn test_same_identifier_in_two_types() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(article("x1", "Hello", "World"), true)
        .await
        .unwrap();
    harness
        .items()
        .insert(user("x1", "Ada", "Bio"), true)
        .await
        .unwrap();

    let found = harness.items().find_by_identifier("x1", "user").await.unwrap();
    assert_eq!(found.attributes["name"], "Ada");
}

#[tokio::test]
async fn test_concurrent_inserts_have_one_winner() {
    let harness = TestHarness::with_schemas().await;
    let items = harness.items();

    let (first, second) = tokio::join!(
        items.insert(article("a1", "one", "x"), true),
        items.insert(article("a1", "two", "y"), true),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(Error::DocumentAlreadyExists { .. })
    )));
}

#[tokio::test]
async fn test_delete_then_find_is_not_found() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(article("a1", "Hello", "World"), true)
        .await
        .unwrap();

    harness.items().delete_by_identifier("a1", "article").await.unwrap();

    let err = harness
        .items()
        .find_by_identifier("a1", "article")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "document", .. }));
}

#[tokio::test]
async fn test_updates_require_existing_document() {
    let harness = TestHarness::with_schemas().await;

    let err = harness
        .items()
        .update_by_identifier(article("ghost", "x", "y"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound { .. }));

    let err = harness
        .items()
        .update_by_type(article("ghost", "x", "y"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound { .. }));

    let err = harness
        .items()
        .find_by_identifier("ghost", "article")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_partial_and_full_updates() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(article("a1", "Hello", "World").with_tags(["rust"]), true)
        .await
        .unwrap();

    harness
        .items()
        .update_by_identifier(
            SearchableItem::new("a1", "article").with_attribute("title", json!("Hi")),
        )
        .await
        .unwrap();
    let partial = harness.items().find_by_identifier("a1", "article").await.unwrap();
    assert_eq!(partial.attributes["title"], "Hi");
    assert_eq!(partial.attributes["body"], "World");
    assert_eq!(partial.tags, vec!["rust"]);

    harness
        .items()
        .update_by_type(SearchableItem::new("a1", "article").with_attribute("title", json!("Only")))
        .await
        .unwrap();
    let full = harness.items().find_by_identifier("a1", "article").await.unwrap();
    assert_eq!(full.attributes.len(), 1);
    assert!(full.tags.is_empty());
}

#[tokio::test]
async fn test_bulk_insert_then_list() {
    let harness = TestHarness::with_schemas().await;
    let batch: Vec<SearchableItem> = (0..4)
        .map(|i| article(&format!("a{i}"), "Bulk", "Body").with_tags(["bulk"]))
        .collect();

    let written = harness.items().insert_bulk(batch).await.unwrap();
    assert_eq!(written.len(), 4);
    assert_eq!(harness.gateway.operations(), vec![Operation::BulkWrite]);

    let page = harness.items().find_all("article").await.unwrap();
    assert_eq!(page.total, 4);
    assert!(page.items.iter().all(|i| i.tags == vec!["bulk"]));
}

#[tokio::test]
async fn test_bulk_item_error_fails_whole_batch() {
    let harness = TestHarness::with_schemas().await;
    let err = harness
        .items()
        .insert_bulk(vec![article("a1", "ok", "ok"), article("", "bad", "bad")])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
    assert_eq!(err.response().map(|r| r["errors"].clone()), Some(json!(true)));
}

fn attributes() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,6}_f", "[ -~]{0,12}", 0..5).prop_map(|fields| {
        fields
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_inserted_attributes_read_back(
        attributes in attributes(),
        tags in prop::collection::vec("[a-z]{1,6}", 0..4),
        index_tags in any::<bool>(),
    ) {
        let item = SearchableItem::new("d1", "article")
            .with_attributes(attributes)
            .with_tags(tags);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let found = runtime.block_on(async {
            let harness = TestHarness::with_schemas().await;
            harness.items().insert(item.clone(), index_tags).await.unwrap();
            harness.items().find_by_identifier("d1", "article").await.unwrap()
        });

        prop_assert_eq!(&found.attributes, &item.attributes);
        prop_assert_eq!(&found.tags, &item.tags);
    }
}
