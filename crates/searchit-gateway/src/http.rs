//! REST gateway to a live engine.
//!
//! Each [`Request`] is planned into one HTTP call (method, path segments,
//! query pairs, body), sent to the next host in round-robin order, and the
//! answer is classified into a [`Response`] shape by status code.
//!
//! Requires the `gateway-http` feature.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use searchit_core::{Error, Result};
use serde_json::{Value, json};

use crate::config::GatewayConfig;
use crate::gateway::SearchGateway;
use crate::request::{DocumentRef, Operation, Request, SearchSpec, WriteMode};
use crate::response::Response;

const NDJSON: &str = "application/x-ndjson";

// ============================================================================
// Hosts
// ============================================================================

/// One engine endpoint, with credentials split out of the URL.
#[derive(Clone, PartialEq, Eq)]
pub struct Host {
    base: Url,
    credentials: Option<(String, String)>,
}

impl Host {
    /// Parse `[scheme://][user:password@]host[:port][/prefix]`.
    ///
    /// A missing scheme defaults to `http`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::config("empty engine host"));
        }
        let with_scheme = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };

        let mut base = Url::parse(&with_scheme)
            .map_err(|e| Error::config(format!("invalid engine host {raw}: {e}")))?;
        if base.cannot_be_a_base() || base.host_str().is_none() {
            return Err(Error::config(format!("invalid engine host {raw}")));
        }

        let credentials = if base.username().is_empty() {
            None
        } else {
            Some((
                base.username().to_string(),
                base.password().unwrap_or_default().to_string(),
            ))
        };
        // Credentials travel in the Authorization header, never in the URL.
        let _ = base.set_username("");
        let _ = base.set_password(None);

        Ok(Self { base, credentials })
    }

    /// Base URL without credentials.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Username of the host credentials, if any.
    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|(user, _)| user.as_str())
    }

    /// Build the URL of a call against this host.
    fn url(&self, call: &HttpCall) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::config(format!("invalid engine host {}", self.base)))?;
            segments.pop_if_empty();
            segments.extend(call.segments.iter().map(String::as_str));
        }
        if !call.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(call.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("base", &self.base.as_str())
            .field("username", &self.username())
            .finish()
    }
}

// ============================================================================
// Request planning
// ============================================================================

/// Body of a planned call.
#[derive(Debug, Clone, PartialEq)]
enum CallBody {
    None,
    Json(Value),
    NdJson(String),
}

/// One HTTP call, independent of the host it is sent to.
#[derive(Debug, Clone, PartialEq)]
struct HttpCall {
    method: Method,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: CallBody,
}

impl HttpCall {
    fn new(method: Method, segments: Vec<String>) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            body: CallBody::None,
        }
    }

    fn json(mut self, body: Value) -> Self {
        self.body = CallBody::Json(body);
        self
    }

    fn ndjson(mut self, lines: Vec<Value>) -> Self {
        let mut body = String::new();
        for line in lines {
            body.push_str(&line.to_string());
            body.push('\n');
        }
        self.body = CallBody::NdJson(body);
        self
    }
}

fn document_path(target: &DocumentRef) -> Vec<String> {
    vec![
        target.index.clone(),
        target.doc_type.clone(),
        target.id.clone(),
    ]
}

fn search_path(spec: &SearchSpec) -> Vec<String> {
    let mut path = vec![spec.index.clone()];
    if !spec.doc_types.is_empty() {
        path.push(spec.doc_types.join(","));
    }
    path.push("_search".to_string());
    path
}

/// Map a request to its REST call.
fn plan(request: Request) -> HttpCall {
    match request {
        Request::IndexExists { index } => HttpCall::new(Method::HEAD, vec![index]),
        Request::CreateIndex { index } => HttpCall::new(Method::PUT, vec![index]),
        Request::GetMapping { index } => {
            HttpCall::new(Method::GET, vec![index, "_mapping".into()])
        }
        Request::PutMapping {
            index,
            doc_type,
            body,
        } => HttpCall::new(Method::PUT, vec![index, "_mapping".into(), doc_type]).json(body),
        Request::TypeExists { index, doc_type } => {
            HttpCall::new(Method::HEAD, vec![index, "_mapping".into(), doc_type])
        }
        Request::DocumentExists(target) => HttpCall::new(Method::HEAD, document_path(&target)),
        Request::GetDocument(target) => HttpCall::new(Method::GET, document_path(&target)),
        Request::IndexDocument { target, body, mode } => {
            let mut call = HttpCall::new(Method::PUT, document_path(&target)).json(Value::Object(body));
            if mode == WriteMode::Create {
                call.query.push(("op_type", "create".to_string()));
            }
            call
        }
        Request::UpdateDocument { target, doc } => {
            let mut path = document_path(&target);
            path.push("_update".into());
            HttpCall::new(Method::POST, path).json(json!({ "doc": doc }))
        }
        Request::DeleteDocument(target) => HttpCall::new(Method::DELETE, document_path(&target)),
        Request::Bulk { items } => {
            let mut lines = Vec::with_capacity(items.len() * 2);
            for item in items {
                lines.push(json!({"index": {
                    "_index": item.target.index,
                    "_type": item.target.doc_type,
                    "_id": item.target.id
                }}));
                lines.push(Value::Object(item.body));
            }
            HttpCall::new(Method::POST, vec!["_bulk".into()]).ndjson(lines)
        }
        Request::Search(spec) => {
            let path = search_path(&spec);
            HttpCall::new(Method::POST, path).json(spec.body)
        }
        Request::MultiSearch { searches } => {
            let mut lines = Vec::with_capacity(searches.len() * 2);
            for spec in searches {
                let mut header = json!({"index": spec.index});
                if !spec.doc_types.is_empty()
                    && let Some(header) = header.as_object_mut()
                {
                    header.insert("type".into(), json!(spec.doc_types));
                }
                lines.push(header);
                lines.push(spec.body);
            }
            HttpCall::new(Method::POST, vec!["_msearch".into()]).ndjson(lines)
        }
        Request::Suggest { index, body } => {
            HttpCall::new(Method::POST, vec![index, "_search".into()]).json(body)
        }
    }
}

// ============================================================================
// Response classification
// ============================================================================

/// Parse a response body; non-JSON text is kept as a string value.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Classify an HTTP status into a response shape.
fn classify(operation: Operation, status: u16, body: Value) -> Result<Response> {
    if operation.is_probe() {
        return match status {
            200..=299 => Ok(Response::Exists(true)),
            404 => Ok(Response::Exists(false)),
            _ => Err(Error::transport_with_response(
                format!("engine returned HTTP {status} for {operation}"),
                body,
            )),
        };
    }

    match status {
        200..=299 => Ok(Response::Body(body)),
        404 => Ok(Response::NotFound(body)),
        409 => Ok(Response::Conflict(body)),
        _ => Err(Error::transport_with_response(
            format!("engine returned HTTP {status} for {operation}"),
            body,
        )),
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Gateway speaking the engine's REST protocol over reqwest.
pub struct HttpGateway {
    client: Client,
    hosts: Vec<Host>,
    next: AtomicUsize,
    timeout: Duration,
}

impl HttpGateway {
    /// Create a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no host is configured, a host does not
    /// parse, or the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let hosts = config
            .hosts
            .iter()
            .map(|raw| Host::parse(raw))
            .collect::<Result<Vec<_>>>()?;
        if hosts.is_empty() {
            return Err(Error::config("http backend requires at least one host"));
        }

        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            hosts,
            next: AtomicUsize::new(0),
            timeout,
        })
    }

    /// Configured hosts, in rotation order.
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    fn next_host(&self) -> &Host {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        &self.hosts[n % self.hosts.len()]
    }
}

#[async_trait]
impl SearchGateway for HttpGateway {
    async fn execute(&self, request: Request) -> Result<Response> {
        let operation = request.operation();
        let target = request.target();
        let call = plan(request);
        let host = self.next_host();
        let url = host.url(&call)?;

        log::debug!("HttpGateway: {operation} {target} -> {} {url}", call.method);

        let mut builder = self.client.request(call.method.clone(), url);
        if let Some((user, password)) = &host.credentials {
            builder = builder.basic_auth(user, Some(password));
        }
        builder = match call.body {
            CallBody::None => builder,
            CallBody::Json(body) => builder.json(&body),
            CallBody::NdJson(body) => builder.header(CONTENT_TYPE, NDJSON).body(body),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(operation, self.timeout)
            } else {
                Error::transport_with_source(format!("{operation} request failed"), e)
            }
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            Error::transport_with_source(format!("{operation} response could not be read"), e)
        })?;

        classify(operation, status, parse_body(&bytes))
    }

    fn name(&self) -> &str {
        "http"
    }
}

impl fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGateway")
            .field("hosts", &self.hosts)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
