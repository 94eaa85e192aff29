//! Integration tests for searchable type management.

use proptest::prelude::*;
use searchit::gateway::Operation;
use searchit::{Error, FieldKind, SearchableType, TypeRepository};

use crate::common::{TestHarness, article_type, user_type};

#[tokio::test]
async fn test_insert_then_find_by_identifier() {
    let harness = TestHarness::new().await;
    harness.types().insert(user_type()).await.unwrap();

    let found = harness.types().find_by_identifier("user").await.unwrap();
    assert_eq!(found.identifier, "user");
    assert_eq!(found.field_set(), user_type().field_set());
    assert!(found.autocomplete);
    assert_eq!(found.description.as_deref(), Some("Registered users"));
}

#[tokio::test]
async fn test_insert_probes_before_creating() {
    let harness = TestHarness::new().await;
    harness.types().insert(article_type()).await.unwrap();

    assert_eq!(
        harness.gateway.operations(),
        vec![Operation::TypeExists, Operation::PutMapping]
    );
}

#[tokio::test]
async fn test_second_insert_fails_and_schema_is_unchanged() {
    let harness = TestHarness::new().await;
    harness.types().insert(article_type()).await.unwrap();
    harness.gateway.clear();

    let changed = SearchableType::new("article")
        .with_field("title", FieldKind::Keyword)
        .with_autocomplete(true);
    let err = harness.types().insert(changed).await.unwrap_err();
    assert!(matches!(err, Error::SchemaAlreadyExists { .. }));
    assert_eq!(harness.gateway.operations(), vec![Operation::TypeExists]);

    let found = harness.types().find_by_name("article").await.unwrap();
    assert_eq!(found.field_set(), article_type().field_set());
    assert!(!found.autocomplete);
}

#[tokio::test]
async fn test_prefixed_identifiers_are_normalized() {
    let harness = TestHarness::new().await;
    let inserted = harness
        .types()
        .insert(SearchableType::new("search_article").with_field("title", FieldKind::Text))
        .await
        .unwrap();
    assert_eq!(inserted.identifier, "article");

    let found = harness
        .types()
        .find_by_identifier("search_article")
        .await
        .unwrap();
    assert_eq!(found.identifier, "article");

    let err = harness
        .types()
        .find_by_name("search_article")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_find_all_and_batches() {
    let harness = TestHarness::with_schemas().await;

    let all: Vec<String> = harness
        .types()
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.identifier)
        .collect();
    assert_eq!(all, vec!["article", "user"]);

    let many = harness
        .types()
        .find_many_by_identifiers(&["search_user", "missing", "article"])
        .await
        .unwrap();
    let names: Vec<&str> = many.iter().map(|t| t.identifier.as_str()).collect();
    assert_eq!(names, vec!["user", "article"]);

    let by_name = harness
        .types()
        .find_many_by_names(&["search_user", "user"])
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
}

#[tokio::test]
async fn test_type_deletion_is_always_rejected() {
    let harness = TestHarness::with_schemas().await;

    for identifier in ["article", "never-created"] {
        let err = harness
            .types()
            .delete_by_identifier(identifier)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { .. }));
    }

    assert!(harness.gateway.requests().is_empty());
    assert!(harness.types().find_by_name("article").await.is_ok());
}

fn field_kind() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::Text),
        Just(FieldKind::Keyword),
        Just(FieldKind::Long),
        Just(FieldKind::Double),
        Just(FieldKind::Date),
        Just(FieldKind::Boolean),
        Just(FieldKind::GeoPoint),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_inserted_type_reads_back(
        identifier in "[a-z]{1,10}",
        fields in prop::collection::btree_map("[a-z]{1,8}", field_kind(), 0..6),
        autocomplete in any::<bool>(),
    ) {
        let mut ty = SearchableType::new(identifier.as_str()).with_autocomplete(autocomplete);
        for (name, kind) in &fields {
            ty = ty.with_field(name.as_str(), *kind);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let found = runtime.block_on(async {
            let harness = TestHarness::new().await;
            harness.types().insert(ty.clone()).await.unwrap();
            harness.types().find_by_identifier(&identifier).await.unwrap()
        });

        prop_assert_eq!(&found.identifier, &ty.identifier);
        prop_assert_eq!(found.field_set(), ty.field_set());
        prop_assert_eq!(found.autocomplete, ty.autocomplete);
    }
}
