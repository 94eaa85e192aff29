//! One request/response round trip with the gateway.
//!
//! Both repositories send every request through an [`Exchange`], which
//! applies the optional per-call deadline and logs the exchange.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use searchit_core::{Error, Result};
use searchit_gateway::{Request, Response, SearchGateway};
use serde_json::Value;

/// Shared gateway handle plus call policy.
#[derive(Clone)]
pub(crate) struct Exchange {
    gateway: Arc<dyn SearchGateway>,
    timeout: Option<Duration>,
}

impl Exchange {
    pub(crate) fn new(gateway: Arc<dyn SearchGateway>) -> Self {
        Self {
            gateway,
            timeout: None,
        }
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Execute one request. An elapsed deadline is a retryable transport failure.
    pub(crate) async fn send(&self, request: Request) -> Result<Response> {
        let operation = request.operation();
        log::debug!(
            "{operation} {} via {} gateway",
            request.target(),
            self.gateway.name()
        );

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.gateway.execute(request))
                .await
                .map_err(|_| Error::timeout(operation, limit))?,
            None => self.gateway.execute(request).await,
        }
    }

    /// Execute an existence probe.
    pub(crate) async fn probe(&self, request: Request) -> Result<bool> {
        let operation = request.operation();
        match self.send(request).await? {
            Response::Exists(found) => Ok(found),
            other => Err(other.unexpected(operation)),
        }
    }

    /// Execute a request whose only acceptable answer is a body.
    pub(crate) async fn body(&self, request: Request) -> Result<Value> {
        let operation = request.operation();
        match self.send(request).await? {
            Response::Body(body) => Ok(body),
            other => Err(other.unexpected(operation)),
        }
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("gateway", &self.gateway.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
