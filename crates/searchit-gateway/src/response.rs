//! Gateway responses and the typed engine bodies decoded from them.
//!
//! The gateway classifies every answer into a [`Response`] shape. Callers
//! match on that shape exhaustively, then decode a `Body` into one of the
//! typed structures below. A body that does not decode is a transport
//! failure carrying the raw payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use searchit_core::{Error, Result};

use crate::request::Operation;

/// Shape of an engine answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Result of an existence probe.
    Exists(bool),
    /// Successful response body.
    Body(Value),
    /// The addressed index, type, or document does not exist.
    NotFound(Value),
    /// The engine rejected a write because of an existing document.
    Conflict(Value),
}

impl Response {
    /// Short name of the shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Exists(_) => "exists",
            Self::Body(_) => "body",
            Self::NotFound(_) => "not-found",
            Self::Conflict(_) => "conflict",
        }
    }

    /// Raw payload of the response, if it carries one.
    pub fn into_raw(self) -> Value {
        match self {
            Self::Exists(found) => Value::Bool(found),
            Self::Body(v) | Self::NotFound(v) | Self::Conflict(v) => v,
        }
    }

    /// Build the error for a response shape the caller did not expect.
    pub fn unexpected(self, operation: Operation) -> Error {
        let kind = self.kind();
        Error::transport_with_response(
            format!("unexpected {kind} response to {operation}"),
            self.into_raw(),
        )
    }
}

/// Decode a successful body into a typed engine structure.
pub fn decode<T: DeserializeOwned>(operation: Operation, body: Value) -> Result<T> {
    match serde_json::from_value::<T>(body.clone()) {
        Ok(decoded) => Ok(decoded),
        Err(e) => Err(Error::transport_with_response(
            format!("malformed {operation} response: {e}"),
            body,
        )),
    }
}

// ============================================================================
// Acknowledgement and writes
// ============================================================================

/// `{ "acknowledged": true }` answer to index and mapping administration.
#[derive(Debug, Clone, Deserialize)]
pub struct Acknowledged {
    /// Whether the engine applied the change.
    #[serde(default)]
    pub acknowledged: bool,
}

/// Answer to a single-document write, update, or delete.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteResult {
    /// Document identifier.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Outcome: `created`, `updated`, `deleted`, `noop`, `not_found`.
    #[serde(default)]
    pub result: Option<String>,
    /// Legacy creation flag reported by older engines.
    #[serde(default)]
    pub created: Option<bool>,
}

impl WriteResult {
    /// Returns `true` if the write created a new document.
    pub fn is_created(&self) -> bool {
        match (self.created, self.result.as_deref()) {
            (Some(created), _) => created,
            (None, Some(result)) => result == "created",
            (None, None) => false,
        }
    }

    /// Returns `true` if the write created or replaced/updated a document.
    pub fn is_written(&self) -> bool {
        self.is_created()
            || matches!(self.result.as_deref(), Some("updated") | Some("noop"))
    }
}

/// Answer to a point lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct GetResult {
    /// Document identifier.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Mapping type name.
    #[serde(rename = "_type", default)]
    pub doc_type: Option<String>,
    /// Whether the document exists.
    #[serde(default)]
    pub found: bool,
    /// Stored document.
    #[serde(rename = "_source", default)]
    pub source: Option<Map<String, Value>>,
}

/// Answer to a bulk write.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResult {
    /// Whether any item failed.
    pub errors: bool,
    /// Per-item outcomes.
    #[serde(default)]
    pub items: Vec<Value>,
}

// ============================================================================
// Search
// ============================================================================

/// Answer to a query.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Matching documents.
    pub hits: Hits,
    /// Aggregation results, when requested.
    #[serde(default)]
    pub aggregations: Option<Map<String, Value>>,
}

/// Hit list of a query.
#[derive(Debug, Clone, Deserialize)]
pub struct Hits {
    /// Number of matching documents (may exceed `hits.len()`).
    #[serde(deserialize_with = "deserialize_total")]
    pub total: u64,
    /// Returned page of documents.
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One matching document.
#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Mapping type name.
    #[serde(rename = "_type", default)]
    pub doc_type: Option<String>,
    /// Relevance score.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    /// Stored document.
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

/// Total hit count: a plain integer on older engines, `{ "value": n }` on newer.
fn deserialize_total<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Total {
        Count(u64),
        Object { value: u64 },
    }

    Ok(match Total::deserialize(deserializer)? {
        Total::Count(n) | Total::Object { value: n } => n,
    })
}

/// Answer to a multi-search.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiSearchResult {
    /// One entry per query, in request order.
    pub responses: Vec<MultiSearchEntry>,
}

/// One entry of a multi-search answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MultiSearchEntry {
    /// The query failed.
    Failed {
        /// Engine error description.
        error: Value,
    },
    /// The query succeeded.
    Hits(SearchResult),
}

/// One bucket of a `terms` aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct TermsBucket {
    /// Bucket key.
    #[serde(deserialize_with = "deserialize_key")]
    pub key: String,
    /// Number of documents in the bucket.
    pub doc_count: u64,
    /// Sub-aggregations, keyed by name.
    #[serde(flatten)]
    pub sub: Map<String, Value>,
}

/// A `terms` aggregation result.
#[derive(Debug, Clone, Deserialize)]
pub struct TermsAggregation {
    /// Buckets, in engine order.
    #[serde(default)]
    pub buckets: Vec<TermsBucket>,
}

/// Bucket keys are strings for keyword fields and numbers for numeric ones.
fn deserialize_key<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// ============================================================================
// Suggest
// ============================================================================

/// Answer to a completion-suggest query.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestResult {
    /// Suggestion entries, keyed by suggester name.
    #[serde(default)]
    pub suggest: Map<String, Value>,
}

/// One suggestion entry (the analyzed prefix).
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestEntry {
    /// Prefix text the options complete.
    #[serde(default)]
    pub text: String,
    /// Completions, best first.
    #[serde(default)]
    pub options: Vec<SuggestOption>,
}

/// One completion.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestOption {
    /// Matched suggestion input.
    pub text: String,
    /// Document identifier.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Mapping type name.
    #[serde(rename = "_type", default)]
    pub doc_type: Option<String>,
    /// Stored document.
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl SuggestResult {
    /// Entries of the named suggester.
    pub fn entries(&self, name: &str) -> Result<Vec<SuggestEntry>> {
        match self.suggest.get(name) {
            Some(raw) => decode(Operation::Suggest, raw.clone()),
            None => Ok(Vec::new()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
