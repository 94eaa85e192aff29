//! Common test utilities and harness for Searchit integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use searchit::gateway::{Operation, Request, Response};
use searchit::{
    ElasticItemRepository, ElasticTypeRepository, FieldKind, GatewayConfig, MemoryGateway,
    Result, SearchGateway, SearchableItem, SearchableType, Searchit, TypeRepository,
};
use serde_json::json;

/// Test harness for integration tests.
///
/// Wires a [`Searchit`] over an in-memory engine behind a [`RecordingGateway`].
/// The index exists and the recorder is empty when construction returns.
pub struct TestHarness {
    /// Recorder in front of the in-memory engine
    pub gateway: Arc<RecordingGateway>,
    /// Repositories under test
    pub searchit: Searchit,
}

impl TestHarness {
    /// Creates a harness with an empty index.
    pub async fn new() -> Self {
        Self::with_config(GatewayConfig::memory()).await
    }

    /// Creates a harness with an empty index and custom configuration.
    pub async fn with_config(config: GatewayConfig) -> Self {
        let gateway = Arc::new(RecordingGateway::new(MemoryGateway::new()));
        let searchit = Searchit::with_gateway(gateway.clone(), config);
        searchit.types().ensure_index().await.unwrap();
        gateway.clear();
        Self { gateway, searchit }
    }

    /// Creates a harness with the `article` and `user` types registered.
    pub async fn with_schemas() -> Self {
        let harness = Self::new().await;
        harness.types().insert(article_type()).await.unwrap();
        harness.types().insert(user_type()).await.unwrap();
        harness.gateway.clear();
        harness
    }

    pub fn types(&self) -> &ElasticTypeRepository {
        self.searchit.types()
    }

    pub fn items(&self) -> &ElasticItemRepository {
        self.searchit.items()
    }
}

/// Gateway that records every request before forwarding it.
pub struct RecordingGateway {
    inner: Arc<dyn SearchGateway>,
    requests: Mutex<Vec<Request>>,
}

impl RecordingGateway {
    pub fn new(inner: impl SearchGateway + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Operation kinds seen so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.requests().iter().map(Request::operation).collect()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl SearchGateway for RecordingGateway {
    async fn execute(&self, request: Request) -> Result<Response> {
        self.requests.lock().unwrap().push(request.clone());
        self.inner.execute(request).await
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Gateway that never answers within any reasonable deadline.
pub struct StalledGateway;

#[async_trait]
impl SearchGateway for StalledGateway {
    async fn execute(&self, _request: Request) -> Result<Response> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Response::Exists(true))
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

/// `article`: title and body text, no autocomplete.
pub fn article_type() -> SearchableType {
    SearchableType::new("article")
        .with_field("title", FieldKind::Text)
        .with_field("body", FieldKind::Text)
}

/// `user`: name and bio text, with autocomplete.
pub fn user_type() -> SearchableType {
    SearchableType::new("user")
        .with_field("name", FieldKind::Text)
        .with_field("bio", FieldKind::Text)
        .with_autocomplete(true)
        .with_description("Registered users")
}

pub fn article(id: &str, title: &str, body: &str) -> SearchableItem {
    SearchableItem::new(id, "article")
        .with_attribute("title", json!(title))
        .with_attribute("body", json!(body))
}

pub fn user(id: &str, name: &str, bio: &str) -> SearchableItem {
    SearchableItem::new(id, "user")
        .with_attribute("name", json!(name))
        .with_attribute("bio", json!(bio))
}
