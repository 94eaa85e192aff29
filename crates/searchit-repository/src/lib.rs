//! # searchit-repository
//!
//! Schema and document repositories over a search engine.
//!
//! This crate turns typed repository calls into engine requests and engine
//! responses back into typed results:
//! - Searchable type management (create, look up, list)
//! - Document writes guarded by existence checks
//! - Single- and multi-type substring search with per-type paging
//! - Tag suggestions and tag usage aggregation
//!
//! Both repositories hold a shared [`SearchGateway`](searchit_gateway::SearchGateway)
//! handle and are cheap to clone.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use searchit_core::{FieldKind, SearchableItem, SearchableType};
//! use searchit_gateway::MemoryGateway;
//! use searchit_repository::{
//!     ElasticItemRepository, ElasticTypeRepository, ItemRepository, TypeRepository,
//! };
//! use serde_json::json;
//!
//! tokio_test::block_on(async {
//!     let gateway = Arc::new(MemoryGateway::new());
//!     let types = ElasticTypeRepository::new(gateway.clone(), "search");
//!     let items = ElasticItemRepository::new(gateway, "search");
//!
//!     types.ensure_index().await.unwrap();
//!     types
//!         .insert(SearchableType::new("article").with_field("title", FieldKind::Text))
//!         .await
//!         .unwrap();
//!
//!     let item = SearchableItem::new("a1", "article").with_attribute("title", json!("Hello"));
//!     items.insert(item, true).await.unwrap();
//!
//!     let page = items.search_single_type("ell", "article", 10, 0).await.unwrap();
//!     assert_eq!(page.identifiers(), vec!["a1"]);
//! });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod exchange;
pub mod items;
pub mod mapping;
pub mod query;
pub mod repository;
pub mod results;
pub mod types;

#[cfg(test)]
mod testing;

pub use items::ElasticItemRepository;
pub use repository::{ItemRepository, TypeRepository};
pub use results::{DEFAULT_LIMIT, ItemPage, MultiTypeResults, SearchOptions, Suggestion, TagBucket};
pub use types::ElasticTypeRepository;
