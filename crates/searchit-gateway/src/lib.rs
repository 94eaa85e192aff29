//! Search engine gateway for Searchit.
//!
//! This crate is the only place that talks to the search engine. Repositories
//! build typed [`Request`]s, a [`SearchGateway`] executes them, and every
//! answer comes back as a [`Response`] shape that callers match exhaustively.
//!
//! # Features
//!
//! - `gateway-http`: Enable the reqwest-based REST gateway
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    searchit-gateway                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchGateway trait                                        │
//! │  ├── MemoryGateway (in-process engine)                      │
//! │  └── HttpGateway (REST over reqwest)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Request (one variant per engine operation)                 │
//! │  Response (Exists / Body / NotFound / Conflict)             │
//! │  Typed bodies (WriteResult, SearchResult, BulkResult, ...)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  GatewayConfig (TOML file + environment overrides)          │
//! │  Wildcard patterns (escaping and matching)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use searchit_gateway::{GatewayConfig, Request, Response, SearchGateway, create_gateway};
//!
//! tokio_test::block_on(async {
//!     let config = GatewayConfig::memory();
//!     let gateway = create_gateway(&config).unwrap();
//!
//!     let probe = Request::IndexExists { index: config.index.clone() };
//!     assert_eq!(gateway.execute(probe).await.unwrap(), Response::Exists(false));
//! });
//! ```

// Core modules (always available)
pub mod config;
pub mod gateway;
pub mod memory;
pub mod request;
pub mod response;
pub mod wildcard;

// Feature-gated REST gateway
#[cfg(feature = "gateway-http")]
pub mod http;

// Re-exports
pub use config::GatewayConfig;
pub use gateway::{SearchGateway, create_gateway};
pub use memory::MemoryGateway;
pub use request::{BulkItem, DocumentRef, Operation, Request, SearchSpec, WriteMode};
pub use response::{Response, decode};
pub use wildcard::{WildcardPattern, escape_wildcard, wildcard_match};

#[cfg(feature = "gateway-http")]
pub use http::{Host, HttpGateway};
