//! Searchit umbrella crate.
//!
//! This crate re-exports the Searchit components and wires them together.
//! [`Searchit`] holds both repositories over one shared gateway handle.
//!
//! # Features
//!
//! - `http`: Enable the REST engine gateway
//! - `full`: Everything
//!
//! # Example
//!
//! ```rust,ignore
//! use searchit::{FieldKind, GatewayConfig, ItemRepository, SearchableType, Searchit, TypeRepository};
//!
//! let searchit = Searchit::connect(GatewayConfig::load(None)?).await?;
//! searchit
//!     .types()
//!     .insert(SearchableType::new("article").with_field("title", FieldKind::Text))
//!     .await?;
//! let page = searchit.search("hello", "article", 0).await?;
//! ```

use std::fmt;
use std::sync::Arc;

pub use searchit_core as core;
pub use searchit_gateway as gateway;
pub use searchit_repository as repository;

pub use searchit_core::{Error, FieldKind, Result, SearchableField, SearchableItem, SearchableType};
pub use searchit_gateway::{GatewayConfig, MemoryGateway, SearchGateway, create_gateway};
pub use searchit_repository::{
    ElasticItemRepository, ElasticTypeRepository, ItemPage, ItemRepository, MultiTypeResults,
    SearchOptions, Suggestion, TagBucket, TypeRepository,
};

/// Type and item repositories sharing one gateway.
#[derive(Clone)]
pub struct Searchit {
    config: GatewayConfig,
    gateway: Arc<dyn SearchGateway>,
    types: ElasticTypeRepository,
    items: ElasticItemRepository,
}

impl Searchit {
    /// Build the configured gateway and both repositories.
    ///
    /// No request is sent; see [`connect`](Self::connect).
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let gateway = create_gateway(&config)?;
        Ok(Self::with_gateway(gateway, config))
    }

    /// Wire both repositories over an existing gateway.
    pub fn with_gateway(gateway: Arc<dyn SearchGateway>, config: GatewayConfig) -> Self {
        let timeout = config.timeout();
        let types =
            ElasticTypeRepository::new(gateway.clone(), config.index.as_str()).with_timeout(timeout);
        let items =
            ElasticItemRepository::new(gateway.clone(), config.index.as_str()).with_timeout(timeout);
        Self {
            config,
            gateway,
            types,
            items,
        }
    }

    /// Build from configuration and create the index if it is missing.
    pub async fn connect(config: GatewayConfig) -> Result<Self> {
        let searchit = Self::from_config(config)?;
        if searchit.types.ensure_index().await? {
            log::info!("Initialized index {}", searchit.index());
        }
        Ok(searchit)
    }

    /// Schema repository.
    pub fn types(&self) -> &ElasticTypeRepository {
        &self.types
    }

    /// Document repository.
    pub fn items(&self) -> &ElasticItemRepository {
        &self.items
    }

    /// Shared gateway handle.
    pub fn gateway(&self) -> &Arc<dyn SearchGateway> {
        &self.gateway
    }

    /// Active configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Index holding every type and document.
    pub fn index(&self) -> &str {
        &self.config.index
    }

    /// Single-type search paged by the configured default limit.
    pub async fn search(&self, query: &str, doc_type: &str, offset: usize) -> Result<ItemPage> {
        self.items
            .search_single_type(query, doc_type, self.config.default_limit, offset)
            .await
    }

    /// Options applying the configured default limit to each of `types`.
    pub fn default_options(&self, types: &[&str]) -> SearchOptions {
        types.iter().fold(SearchOptions::new(), |options, doc_type| {
            options.with_limit(doc_type, self.config.default_limit)
        })
    }
}

impl fmt::Debug for Searchit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searchit")
            .field("gateway", &self.gateway.name())
            .field("index", &self.config.index)
            .finish()
    }
}
