//! Integration tests for configuration and wiring.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use searchit::gateway::Operation;
use searchit::{
    ElasticItemRepository, Error, GatewayConfig, ItemRepository, MemoryGateway, SearchGateway,
    Searchit, TypeRepository,
};

use crate::common::{RecordingGateway, StalledGateway, TestHarness, article, article_type};

#[tokio::test]
async fn test_connect_creates_index_once() {
    let gateway = Arc::new(RecordingGateway::new(MemoryGateway::new()));
    let searchit = Searchit::with_gateway(gateway.clone(), GatewayConfig::memory());

    assert!(searchit.types().ensure_index().await.unwrap());
    assert!(!searchit.types().ensure_index().await.unwrap());
    assert_eq!(
        gateway.operations(),
        vec![
            Operation::IndexExists,
            Operation::CreateIndex,
            Operation::IndexExists
        ]
    );
}

#[tokio::test]
async fn test_connect_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "backend = \"memory\"\nindex = \"catalog\"\ntimeout_secs = 5").unwrap();

    let config = GatewayConfig::from_file(file.path()).unwrap();
    let searchit = Searchit::connect(config).await.unwrap();

    assert_eq!(searchit.index(), "catalog");
    assert_eq!(searchit.gateway().name(), "memory");
    assert_eq!(searchit.types().timeout(), Some(Duration::from_secs(5)));

    searchit.types().insert(article_type()).await.unwrap();
    let found = searchit
        .types()
        .find_by_identifier("catalog_article")
        .await
        .unwrap();
    assert_eq!(found.identifier, "article");
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = GatewayConfig {
        index: String::new(),
        ..GatewayConfig::memory()
    };
    let err = Searchit::from_config(config).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[cfg(not(feature = "http"))]
#[test]
fn test_http_backend_requires_feature() {
    let err = Searchit::from_config(GatewayConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("gateway-http"));
}

#[tokio::test]
async fn test_search_uses_configured_default_limit() {
    let config = GatewayConfig {
        default_limit: 3,
        ..GatewayConfig::memory()
    };
    let harness = TestHarness::with_config(config).await;
    for i in 0..5 {
        harness
            .items()
            .insert(article(&format!("a{i}"), "shared", "text"), true)
            .await
            .unwrap();
    }

    let page = harness.searchit.search("shared", "article", 0).await.unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total, 5);

    let options = harness.searchit.default_options(&["article"]);
    assert_eq!(options.limit_for("article"), 3);
}

#[tokio::test]
async fn test_timeout_is_retryable_transport_failure() {
    let items = ElasticItemRepository::new(Arc::new(StalledGateway), "search")
        .with_timeout(Duration::from_millis(20));

    let err = items
        .find_by_identifier("a1", "article")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert!(err.is_retryable());
    assert!(err.to_string().contains("get-document timed out"));
}

#[tokio::test]
async fn test_repositories_share_one_gateway() {
    let harness = TestHarness::with_schemas().await;
    harness
        .items()
        .insert(article("a1", "Hello", "World"), true)
        .await
        .unwrap();
    harness.types().find_by_name("article").await.unwrap();

    assert_eq!(
        harness.gateway.operations(),
        vec![
            Operation::DocumentExists,
            Operation::IndexDocument,
            Operation::GetMapping
        ]
    );
}
