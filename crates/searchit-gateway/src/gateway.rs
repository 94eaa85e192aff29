//! Search gateway trait and factory.
//!
//! This module defines the `SearchGateway` trait that every engine
//! connection must satisfy. Repositories talk to the engine only through it.
//!
//! # Backends
//!
//! - `HttpGateway`: REST client for a live engine (requires `gateway-http` feature)
//! - `MemoryGateway`: In-process engine for tests and local development
//!
//! # Example
//!
//! ```rust,ignore
//! use searchit_gateway::{create_gateway, GatewayConfig, Request};
//!
//! let config = GatewayConfig::default();
//! let gateway = create_gateway(&config)?;
//!
//! let response = gateway
//!     .execute(Request::IndexExists { index: config.index.clone() })
//!     .await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use searchit_core::{Error, Result};

use crate::config::GatewayConfig;
use crate::memory::MemoryGateway;
use crate::request::Request;
use crate::response::Response;

/// Abstract search engine gateway.
///
/// One call per engine exchange. Implementations classify the engine's
/// answer into a [`Response`] shape; every other failure (connection,
/// unexpected status, malformed body) is an `Error::Transport`.
///
/// # Async
///
/// `execute` is async because engine exchanges are network I/O. Gateways
/// are shared behind `Arc` and must tolerate concurrent calls.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Execute one request.
    async fn execute(&self, request: Request) -> Result<Response>;

    /// Get the gateway name for diagnostics.
    fn name(&self) -> &str;
}

#[async_trait]
impl<G: SearchGateway + ?Sized> SearchGateway for Arc<G> {
    async fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Create a search gateway based on configuration.
///
/// Selection logic:
/// 1. `"memory"` → `MemoryGateway`
/// 2. `"http"` with the `gateway-http` feature → `HttpGateway`
///
/// # Errors
///
/// Returns `Error::Config` for an unknown backend name, or for `"http"`
/// when the crate was built without the `gateway-http` feature.
pub fn create_gateway(config: &GatewayConfig) -> Result<Arc<dyn SearchGateway>> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryGateway::new())),
        #[cfg(feature = "gateway-http")]
        "http" => Ok(Arc::new(crate::http::HttpGateway::new(config)?)),
        #[cfg(not(feature = "gateway-http"))]
        "http" => Err(Error::config(
            "backend \"http\" requires the gateway-http feature",
        )),
        other => Err(Error::config(format!("unknown gateway backend: {other}"))),
    }
}

// ============================================================================
// Tests
// ============================================================================
