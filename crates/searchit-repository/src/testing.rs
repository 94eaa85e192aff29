//! Test double for the gateway.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use searchit_core::{Error, Result};
use searchit_gateway::{Operation, Request, Response, SearchGateway};

/// Gateway that answers from a fixed script and records every request.
pub(crate) struct ScriptedGateway {
    script: Mutex<VecDeque<Result<Response>>>,
    requests: Mutex<Vec<Request>>,
    delay: Option<Duration>,
}

impl ScriptedGateway {
    pub(crate) fn new(script: impl IntoIterator<Item = Result<Response>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    pub(crate) fn delayed(
        script: impl IntoIterator<Item = Result<Response>>,
        delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn operations(&self) -> Vec<Operation> {
        self.requests().iter().map(Request::operation).collect()
    }
}

#[async_trait]
impl SearchGateway for ScriptedGateway {
    async fn execute(&self, request: Request) -> Result<Response> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport("script exhausted")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
