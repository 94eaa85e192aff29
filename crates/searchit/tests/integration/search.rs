//! Integration tests for search, suggestions, and tag aggregation.

use searchit::gateway::{Operation, Request};
use searchit::{Error, ItemRepository, SearchOptions, TagBucket};

use crate::common::{TestHarness, article, user};

async fn seeded() -> TestHarness {
    let harness = TestHarness::with_schemas().await;
    let items = harness.items();
    for i in 0..12 {
        items
            .insert(article(&format!("a{i:02}"), "x article", "body"), true)
            .await
            .unwrap();
        items
            .insert(user(&format!("u{i:02}"), "x user", "bio"), true)
            .await
            .unwrap();
    }
    harness.gateway.clear();
    harness
}

#[tokio::test]
async fn test_single_type_search_finds_document() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(article("a1", "Hello", "World"), true)
        .await
        .unwrap();
    harness
        .items()
        .insert(article("a2", "Other", "Text"), true)
        .await
        .unwrap();

    let page = harness
        .items()
        .search_single_type("Hello", "article", 10, 0)
        .await
        .unwrap();
    assert!(page.identifiers().contains(&"a1"));
    assert!(page.total >= 1);
    assert!(!page.identifiers().contains(&"a2"));
}

#[tokio::test]
async fn test_single_type_search_is_scoped_to_type() {
    let harness = seeded().await;
    let page = harness
        .items()
        .search_single_type("x", "user", 20, 0)
        .await
        .unwrap();
    assert_eq!(page.total, 12);
    assert!(page.items.iter().all(|i| i.doc_type == "user"));
}

#[tokio::test]
async fn test_multi_type_search_with_per_type_limit() {
    let harness = seeded().await;
    let options = SearchOptions::from_pairs([("article_limit", 5)]);

    let results = harness
        .items()
        .search_multiple_types("x", &["article", "user"], &options)
        .await
        .unwrap();

    assert_eq!(harness.gateway.operations(), vec![Operation::MultiSearch]);
    assert_eq!(results.get("article").unwrap().items.len(), 5);
    assert_eq!(results.get("user").unwrap().items.len(), 10);
    assert_eq!(results.get("article").unwrap().total, 12);

    let json = serde_json::to_value(&results).unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["article", "user", "query"]);
    assert_eq!(json["query"], "x");
}

#[tokio::test]
async fn test_multi_type_result_order_follows_request() {
    let harness = seeded().await;
    let results = harness
        .items()
        .search_multiple_types("x", &["user", "article"], &SearchOptions::new())
        .await
        .unwrap();

    assert_eq!(results.types().collect::<Vec<_>>(), vec!["user", "article"]);
    let json = serde_json::to_value(&results).unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["user", "article", "query"]);
}

#[tokio::test]
async fn test_multi_type_offsets() {
    let harness = seeded().await;
    let options = SearchOptions::new()
        .with_limit("article", 4)
        .with_offset("article", 10);

    let results = harness
        .items()
        .search_multiple_types("x", &["article"], &options)
        .await
        .unwrap();
    assert_eq!(results.get("article").unwrap().identifiers(), vec!["a10", "a11"]);

    let requests = harness.gateway.requests();
    let Request::MultiSearch { searches } = &requests[0] else {
        panic!("expected multi-search, got {:?}", requests[0]);
    };
    assert_eq!(searches[0].body["from"], 10);
    assert_eq!(searches[0].body["size"], 4);
}

#[tokio::test]
async fn test_hits_expose_tags_not_suggestion_fields() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(user("u1", "Ada", "engines").with_tags(["math"]), true)
        .await
        .unwrap();

    let results = harness
        .items()
        .search_multiple_types("Ada", &["user"], &SearchOptions::new())
        .await
        .unwrap();
    let hit = &results.get("user").unwrap().items[0];
    assert_eq!(hit.tags, vec!["math"]);
    assert!(!hit.attributes.contains_key("name_suggest"));
    assert!(!hit.attributes.contains_key("tags_list"));
}

#[tokio::test]
async fn test_find_all_is_a_single_default_page() {
    let harness = seeded().await;
    let page = harness.items().find_all("article").await.unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.items.len(), 10);
}

#[tokio::test]
async fn test_autocomplete_scoped_by_type() {
    let harness = TestHarness::with_schemas().await;
    let items = harness.items();
    items
        .insert(user("u1", "Ada", "bio").with_tags(["rust", "math"]), true)
        .await
        .unwrap();
    items
        .insert(article("a1", "Post", "body").with_tags(["rustfmt"]), true)
        .await
        .unwrap();

    let users = items.autocomplete("ru", &["user"], 10).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].doc_type, "user");
    assert_eq!(users[0].matched, "rust");
    assert_eq!(users[0].entity.identifier, "u1");
    assert!(!users[0].entity.attributes.contains_key("name_suggest"));

    let both = items
        .autocomplete("ru", &["user", "article"], 10)
        .await
        .unwrap();
    assert_eq!(both.len(), 2);

    let none = items.autocomplete("zz", &["user"], 10).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_untagged_documents_are_not_suggested() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(user("u1", "rust fan", "bio").with_tags(["rust"]), false)
        .await
        .unwrap();

    let suggestions = harness
        .items()
        .autocomplete("ru", &["user"], 10)
        .await
        .unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn test_most_used_tags_counts_per_type() {
    let harness = TestHarness::with_schemas().await;
    let items = harness.items();
    items
        .insert(article("a1", "t", "b").with_tags(["rust", "db"]), true)
        .await
        .unwrap();
    items
        .insert(article("a2", "t", "b").with_tags(["rust"]), true)
        .await
        .unwrap();
    items
        .insert(user("u1", "n", "b").with_tags(["rust"]), false)
        .await
        .unwrap();

    let buckets = items.most_used_tags(&["article", "user"]).await.unwrap();
    assert_eq!(
        buckets,
        vec![
            TagBucket {
                name: "article".into(),
                value: "rust".into(),
                count: 2
            },
            TagBucket {
                name: "article".into(),
                value: "db".into(),
                count: 1
            },
            TagBucket {
                name: "user".into(),
                value: "rust".into(),
                count: 1
            },
        ]
    );

    let users_only = items.most_used_tags(&["user"]).await.unwrap();
    assert_eq!(users_only.len(), 1);
}

#[tokio::test]
async fn test_multi_type_search_rejects_duplicate_types() {
    let harness = TestHarness::with_schemas().await;
    let err = harness
        .items()
        .search_multiple_types("x", &["user", "user"], &SearchOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(harness.gateway.requests().is_empty());
}
