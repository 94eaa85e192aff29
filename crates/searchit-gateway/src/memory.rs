//! In-process search engine.
//!
//! `MemoryGateway` answers every [`Request`] with the same body shapes a
//! live engine returns, so repositories behave identically against it.
//! It is meant for tests and local development.
//!
//! # Limitations
//!
//! - O(n) scans, no relevance ranking (every hit scores 1.0)
//! - Queries: `match_all`, `wildcard`, `term`
//! - Aggregations: `terms`, arbitrarily nested
//! - Mappings are explicit; indexing a document never changes a mapping

use std::collections::BTreeMap;

use async_trait::async_trait;
use searchit_core::entity::{SUGGEST_CONTEXT, SUGGEST_FIELD};
use searchit_core::{Error, Result};
use serde_json::{Map, Value, json};
use tokio::sync::RwLock;

use crate::gateway::SearchGateway;
use crate::request::{BulkItem, DocumentRef, Request, SearchSpec, WriteMode};
use crate::response::Response;
use crate::wildcard::WildcardPattern;

const DEFAULT_SEARCH_SIZE: usize = 10;
const DEFAULT_TERMS_SIZE: usize = 10;
const DEFAULT_SUGGEST_SIZE: usize = 5;

#[derive(Debug, Clone)]
struct StoredDocument {
    doc_type: String,
    id: String,
    version: u64,
    source: Map<String, Value>,
}

#[derive(Debug, Default)]
struct IndexState {
    mappings: Map<String, Value>,
    documents: Vec<StoredDocument>,
}

impl IndexState {
    fn position(&self, doc_type: &str, id: &str) -> Option<usize> {
        self.documents
            .iter()
            .position(|d| d.doc_type == doc_type && d.id == id)
    }

    fn get(&self, target: &DocumentRef) -> Option<&StoredDocument> {
        self.position(&target.doc_type, &target.id)
            .map(|pos| &self.documents[pos])
    }

    /// Create or replace a document. Returns the new version and whether it was created.
    fn upsert(&mut self, doc_type: &str, id: &str, source: Map<String, Value>) -> (u64, bool) {
        match self.position(doc_type, id) {
            Some(pos) => {
                let doc = &mut self.documents[pos];
                doc.version += 1;
                doc.source = source;
                (doc.version, false)
            }
            None => {
                self.documents.push(StoredDocument {
                    doc_type: doc_type.to_string(),
                    id: id.to_string(),
                    version: 1,
                    source,
                });
                (1, true)
            }
        }
    }
}

/// Why a query could not be answered.
enum Failure {
    /// The index does not exist.
    Missing(Value),
    /// The engine rejected the request body.
    Rejected(Value),
}

impl Failure {
    fn into_body(self) -> Value {
        match self {
            Self::Missing(body) | Self::Rejected(body) => body,
        }
    }
}

/// In-process engine backed by ordered in-memory collections.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    indices: RwLock<BTreeMap<String, IndexState>>,
}

impl MemoryGateway {
    /// Create an engine with no indices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents stored in `index` (zero if it does not exist).
    pub async fn document_count(&self, index: &str) -> usize {
        self.indices
            .read()
            .await
            .get(index)
            .map_or(0, |state| state.documents.len())
    }

    async fn create_index(&self, index: String) -> Result<Response> {
        let mut indices = self.indices.write().await;
        if indices.contains_key(&index) {
            return Err(Error::transport_with_response(
                format!("index already exists: {index}"),
                error_body(
                    "resource_already_exists_exception",
                    format!("index [{index}] already exists"),
                    400,
                ),
            ));
        }
        indices.insert(index.clone(), IndexState::default());
        Ok(Response::Body(
            json!({"acknowledged": true, "shards_acknowledged": true, "index": index}),
        ))
    }

    async fn get_mapping(&self, index: String) -> Result<Response> {
        let indices = self.indices.read().await;
        let Some(state) = indices.get(&index) else {
            return Ok(Response::NotFound(index_not_found(&index)));
        };
        let mut entry = Map::new();
        entry.insert("mappings".into(), Value::Object(state.mappings.clone()));
        let mut body = Map::new();
        body.insert(index, Value::Object(entry));
        Ok(Response::Body(Value::Object(body)))
    }

    async fn put_mapping(&self, index: String, doc_type: String, body: Value) -> Result<Response> {
        let mapping = match body {
            Value::Object(mut outer) if outer.len() == 1 && outer.contains_key(&doc_type) => {
                outer.remove(&doc_type).unwrap_or(Value::Null)
            }
            other => other,
        };
        let Value::Object(mut mapping) = mapping else {
            return Err(Error::transport_with_response(
                format!("mapping for {doc_type} is not an object"),
                error_body("mapper_parsing_exception", "mapping must be an object", 400),
            ));
        };

        let mut indices = self.indices.write().await;
        let Some(state) = indices.get_mut(&index) else {
            return Ok(Response::NotFound(index_not_found(&index)));
        };

        let incoming = match mapping.remove("properties") {
            Some(Value::Object(props)) => props,
            _ => Map::new(),
        };
        let existing = state
            .mappings
            .entry(doc_type.clone())
            .or_insert_with(|| json!({"properties": {}}));
        let Some(existing) = existing.as_object_mut() else {
            return Err(Error::transport(format!("corrupt mapping for {doc_type}")));
        };

        let current = existing
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        for (field, definition) in &incoming {
            let old = current.get(field).and_then(|d| d.get("type"));
            let new = definition.get("type");
            if let (Some(old), Some(new)) = (old, new)
                && old != new
            {
                return Err(Error::transport_with_response(
                    format!("conflicting mapping for {doc_type}.{field}"),
                    error_body(
                        "illegal_argument_exception",
                        format!("mapper [{field}] cannot be changed from type [{old}] to [{new}]"),
                        400,
                    ),
                ));
            }
        }

        let mut merged = current;
        merged.extend(incoming);
        existing.insert("properties".into(), Value::Object(merged));
        existing.extend(mapping);

        Ok(Response::Body(json!({"acknowledged": true})))
    }

    async fn type_exists(&self, index: String, doc_type: String) -> Result<Response> {
        let indices = self.indices.read().await;
        let found = indices
            .get(&index)
            .is_some_and(|state| state.mappings.contains_key(&doc_type));
        Ok(Response::Exists(found))
    }

    async fn document_exists(&self, target: DocumentRef) -> Result<Response> {
        let indices = self.indices.read().await;
        let found = indices
            .get(&target.index)
            .is_some_and(|state| state.get(&target).is_some());
        Ok(Response::Exists(found))
    }

    async fn get_document(&self, target: DocumentRef) -> Result<Response> {
        let indices = self.indices.read().await;
        let Some(state) = indices.get(&target.index) else {
            return Ok(Response::NotFound(index_not_found(&target.index)));
        };
        match state.get(&target) {
            Some(doc) => {
                let mut body = document_header(&target.index, doc);
                body.insert("_version".into(), json!(doc.version));
                body.insert("found".into(), json!(true));
                body.insert("_source".into(), Value::Object(doc.source.clone()));
                Ok(Response::Body(Value::Object(body)))
            }
            None => Ok(Response::NotFound(json!({
                "_index": target.index,
                "_type": target.doc_type,
                "_id": target.id,
                "found": false
            }))),
        }
    }

    async fn index_document(
        &self,
        target: DocumentRef,
        body: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<Response> {
        let mut indices = self.indices.write().await;
        let state = indices.entry(target.index.clone()).or_default();

        if mode == WriteMode::Create && state.get(&target).is_some() {
            return Ok(Response::Conflict(error_body(
                "version_conflict_engine_exception",
                format!(
                    "[{}][{}]: version conflict, document already exists",
                    target.doc_type, target.id
                ),
                409,
            )));
        }

        let (version, created) = state.upsert(&target.doc_type, &target.id, body);
        Ok(Response::Body(write_body(
            &target,
            version,
            if created { "created" } else { "updated" },
            created,
        )))
    }

    async fn update_document(
        &self,
        target: DocumentRef,
        doc: Map<String, Value>,
    ) -> Result<Response> {
        let mut indices = self.indices.write().await;
        let position = indices
            .get(&target.index)
            .and_then(|state| state.position(&target.doc_type, &target.id));
        let (Some(state), Some(pos)) = (indices.get_mut(&target.index), position) else {
            return Ok(Response::NotFound(error_body(
                "document_missing_exception",
                format!("[{}][{}]: document missing", target.doc_type, target.id),
                404,
            )));
        };

        let stored = &mut state.documents[pos];
        let result = if merge_object(&mut stored.source, doc) {
            stored.version += 1;
            "updated"
        } else {
            "noop"
        };
        Ok(Response::Body(write_body(
            &target,
            stored.version,
            result,
            false,
        )))
    }

    async fn delete_document(&self, target: DocumentRef) -> Result<Response> {
        let mut indices = self.indices.write().await;
        let removed = indices.get_mut(&target.index).and_then(|state| {
            let pos = state.position(&target.doc_type, &target.id)?;
            Some(state.documents.remove(pos))
        });
        match removed {
            Some(doc) => {
                let mut body = write_body(&target, doc.version + 1, "deleted", false);
                if let Some(body) = body.as_object_mut() {
                    body.insert("found".into(), json!(true));
                }
                Ok(Response::Body(body))
            }
            None => Ok(Response::NotFound(json!({
                "_index": target.index,
                "_type": target.doc_type,
                "_id": target.id,
                "found": false,
                "result": "not_found"
            }))),
        }
    }

    async fn bulk(&self, items: Vec<BulkItem>) -> Result<Response> {
        let mut indices = self.indices.write().await;
        let mut errors = false;
        let mut outcomes = Vec::with_capacity(items.len());

        for BulkItem { target, body } in items {
            if target.doc_type.is_empty() || target.id.is_empty() {
                errors = true;
                outcomes.push(json!({"index": {
                    "_index": target.index,
                    "_type": target.doc_type,
                    "_id": target.id,
                    "status": 400,
                    "error": {
                        "type": "action_request_validation_exception",
                        "reason": "Validation Failed: type and id are required"
                    }
                }}));
                continue;
            }

            let state = indices.entry(target.index.clone()).or_default();
            let (version, created) = state.upsert(&target.doc_type, &target.id, body);
            let (result, status) = if created {
                ("created", 201)
            } else {
                ("updated", 200)
            };
            outcomes.push(json!({"index": {
                "_index": target.index,
                "_type": target.doc_type,
                "_id": target.id,
                "_version": version,
                "result": result,
                "status": status
            }}));
        }

        Ok(Response::Body(
            json!({"took": 0, "errors": errors, "items": outcomes}),
        ))
    }

    async fn search(&self, spec: SearchSpec) -> Result<Response> {
        let indices = self.indices.read().await;
        match run_search(&indices, &spec) {
            Ok(body) => Ok(Response::Body(body)),
            Err(Failure::Missing(body)) => Ok(Response::NotFound(body)),
            Err(Failure::Rejected(body)) => Err(Error::transport_with_response(
                format!("search rejected on {}", spec.index),
                body,
            )),
        }
    }

    async fn multi_search(&self, searches: Vec<SearchSpec>) -> Result<Response> {
        let indices = self.indices.read().await;
        let responses: Vec<Value> = searches
            .iter()
            .map(|spec| run_search(&indices, spec).unwrap_or_else(Failure::into_body))
            .collect();
        Ok(Response::Body(json!({"responses": responses})))
    }

    async fn suggest(&self, index: String, body: Value) -> Result<Response> {
        let indices = self.indices.read().await;
        let Some(state) = indices.get(&index) else {
            return Ok(Response::NotFound(index_not_found(&index)));
        };
        match run_suggest(&index, state, &body) {
            Ok(body) => Ok(Response::Body(body)),
            Err(failure) => Err(Error::transport_with_response(
                format!("suggest rejected on {index}"),
                failure.into_body(),
            )),
        }
    }
}

#[async_trait]
impl SearchGateway for MemoryGateway {
    async fn execute(&self, request: Request) -> Result<Response> {
        log::debug!(
            "MemoryGateway: {} {}",
            request.operation(),
            request.target()
        );

        match request {
            Request::IndexExists { index } => {
                let found = self.indices.read().await.contains_key(&index);
                Ok(Response::Exists(found))
            }
            Request::CreateIndex { index } => self.create_index(index).await,
            Request::GetMapping { index } => self.get_mapping(index).await,
            Request::PutMapping {
                index,
                doc_type,
                body,
            } => self.put_mapping(index, doc_type, body).await,
            Request::TypeExists { index, doc_type } => self.type_exists(index, doc_type).await,
            Request::DocumentExists(target) => self.document_exists(target).await,
            Request::GetDocument(target) => self.get_document(target).await,
            Request::IndexDocument { target, body, mode } => {
                self.index_document(target, body, mode).await
            }
            Request::UpdateDocument { target, doc } => self.update_document(target, doc).await,
            Request::DeleteDocument(target) => self.delete_document(target).await,
            Request::Bulk { items } => self.bulk(items).await,
            Request::Search(spec) => self.search(spec).await,
            Request::MultiSearch { searches } => self.multi_search(searches).await,
            Request::Suggest { index, body } => self.suggest(index, body).await,
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Response bodies
// ============================================================================

fn error_body(kind: &str, reason: impl Into<String>, status: u16) -> Value {
    let reason = reason.into();
    json!({
        "error": {
            "root_cause": [{"type": kind, "reason": reason}],
            "type": kind,
            "reason": reason
        },
        "status": status
    })
}

fn index_not_found(index: &str) -> Value {
    error_body(
        "index_not_found_exception",
        format!("no such index [{index}]"),
        404,
    )
}

fn document_header(index: &str, doc: &StoredDocument) -> Map<String, Value> {
    let mut header = Map::new();
    header.insert("_index".into(), json!(index));
    header.insert("_type".into(), json!(doc.doc_type));
    header.insert("_id".into(), json!(doc.id));
    header
}

fn write_body(target: &DocumentRef, version: u64, result: &str, created: bool) -> Value {
    json!({
        "_index": target.index,
        "_type": target.doc_type,
        "_id": target.id,
        "_version": version,
        "result": result,
        "created": created,
        "_shards": {"total": 1, "successful": 1, "failed": 0}
    })
}

/// Merge `patch` into `target`, recursing into objects present on both sides.
fn merge_object(target: &mut Map<String, Value>, patch: Map<String, Value>) -> bool {
    let mut changed = false;
    for (key, value) in patch {
        if let Value::Object(inner) = value {
            if let Some(Value::Object(existing)) = target.get_mut(&key) {
                changed |= merge_object(existing, inner);
                continue;
            }
            changed = true;
            target.insert(key, Value::Object(inner));
        } else if target.get(&key) != Some(&value) {
            changed = true;
            target.insert(key, value);
        }
    }
    changed
}

// ============================================================================
// Queries
// ============================================================================

enum Query {
    MatchAll,
    Wildcard {
        field: String,
        pattern: WildcardPattern,
    },
    Term {
        field: String,
        value: Value,
    },
}

impl Query {
    fn parse(query: Option<&Value>) -> std::result::Result<Self, Failure> {
        let Some(query) = query else {
            return Ok(Self::MatchAll);
        };
        let Some((kind, clause)) = query.as_object().and_then(|q| q.iter().next()) else {
            return Err(rejected("query must be an object with one clause"));
        };

        match kind.as_str() {
            "match_all" => Ok(Self::MatchAll),
            "wildcard" => {
                let (field, value) = single_field(clause)?;
                let pattern = value
                    .get("value")
                    .or_else(|| value.get("wildcard"))
                    .unwrap_or(value)
                    .as_str()
                    .ok_or_else(|| rejected("wildcard value must be a string"))?;
                Ok(Self::Wildcard {
                    field,
                    pattern: WildcardPattern::new(&pattern.to_lowercase()),
                })
            }
            "term" => {
                let (field, value) = single_field(clause)?;
                let value = value.get("value").unwrap_or(value).clone();
                Ok(Self::Term { field, value })
            }
            other => Err(rejected(format!("unsupported query [{other}]"))),
        }
    }

    fn matches(&self, doc: &StoredDocument) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Wildcard { field, pattern } => {
                let mut texts = Vec::new();
                if field == "_all" {
                    for (name, value) in &doc.source {
                        if name != SUGGEST_FIELD {
                            collect_text(value, &mut texts);
                        }
                    }
                } else if let Some(value) = field_value(doc, field) {
                    collect_text(&value, &mut texts);
                }
                texts.iter().any(|text| text_matches(pattern, text))
            }
            Self::Term { field, value } => match field_value(doc, field) {
                Some(Value::Array(items)) => items.contains(value),
                Some(found) => &found == value,
                None => false,
            },
        }
    }
}

fn single_field(clause: &Value) -> std::result::Result<(String, &Value), Failure> {
    clause
        .as_object()
        .and_then(|c| c.iter().next())
        .map(|(field, value)| (field.clone(), value))
        .ok_or_else(|| rejected("query clause must name one field"))
}

fn rejected(reason: impl Into<String>) -> Failure {
    Failure::Rejected(error_body("parsing_exception", reason, 400))
}

/// Value of a (dotted) field, with `_type` and `_id` resolved from metadata.
fn field_value(doc: &StoredDocument, field: &str) -> Option<Value> {
    match field {
        "_type" => Some(Value::String(doc.doc_type.clone())),
        "_id" => Some(Value::String(doc.id.clone())),
        path => {
            let mut parts = path.split('.');
            let mut current = doc.source.get(parts.next()?)?;
            for part in parts {
                current = current.get(part)?;
            }
            Some(current.clone())
        }
    }
}

fn collect_text(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Array(items) => items.iter().for_each(|item| collect_text(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_text(item, out)),
        Value::Null => {}
    }
}

/// Match against the whole lowercased value or any of its word tokens.
fn text_matches(pattern: &WildcardPattern, text: &str) -> bool {
    let text = text.to_lowercase();
    pattern.is_match(&text)
        || text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .any(|token| pattern.is_match(token))
}

fn run_search(
    indices: &BTreeMap<String, IndexState>,
    spec: &SearchSpec,
) -> std::result::Result<Value, Failure> {
    let Some(state) = indices.get(&spec.index) else {
        return Err(Failure::Missing(index_not_found(&spec.index)));
    };

    let query = Query::parse(spec.body.get("query"))?;
    let from = usize_option(&spec.body, "from")?.unwrap_or(0);
    let size = usize_option(&spec.body, "size")?.unwrap_or(DEFAULT_SEARCH_SIZE);

    let matched: Vec<&StoredDocument> = state
        .documents
        .iter()
        .filter(|doc| spec.doc_types.is_empty() || spec.doc_types.contains(&doc.doc_type))
        .filter(|doc| query.matches(doc))
        .collect();

    let hits: Vec<Value> = matched
        .iter()
        .skip(from)
        .take(size)
        .map(|doc| {
            let mut hit = document_header(&spec.index, doc);
            hit.insert("_score".into(), json!(1.0));
            hit.insert("_source".into(), Value::Object(doc.source.clone()));
            Value::Object(hit)
        })
        .collect();

    let max_score = if hits.is_empty() {
        Value::Null
    } else {
        json!(1.0)
    };
    let mut body = json!({
        "took": 0,
        "timed_out": false,
        "hits": {"total": matched.len(), "max_score": max_score, "hits": hits}
    });

    let aggs = spec
        .body
        .get("aggs")
        .or_else(|| spec.body.get("aggregations"));
    if let (Some(aggs), Some(out)) = (aggs, body.as_object_mut()) {
        let aggs = aggs
            .as_object()
            .ok_or_else(|| rejected("aggregations must be an object"))?;
        out.insert(
            "aggregations".into(),
            Value::Object(aggregate(aggs, &matched)?),
        );
    }

    Ok(body)
}

fn usize_option(body: &Value, key: &str) -> std::result::Result<Option<usize>, Failure> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| rejected(format!("[{key}] must be a non-negative integer"))),
    }
}

// ============================================================================
// Aggregations
// ============================================================================

fn aggregate(
    aggs: &Map<String, Value>,
    docs: &[&StoredDocument],
) -> std::result::Result<Map<String, Value>, Failure> {
    let mut out = Map::new();

    for (name, definition) in aggs {
        let terms = definition
            .get("terms")
            .and_then(Value::as_object)
            .ok_or_else(|| rejected(format!("aggregation [{name}] must be a terms aggregation")))?;
        let field = terms
            .get("field")
            .and_then(Value::as_str)
            .ok_or_else(|| rejected(format!("aggregation [{name}] requires a field")))?;
        let size = terms
            .get("size")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_TERMS_SIZE);
        let sub = definition
            .get("aggs")
            .or_else(|| definition.get("aggregations"))
            .and_then(Value::as_object);

        // Rendered key -> (original key, documents in bucket)
        let mut groups: BTreeMap<String, (Value, Vec<&StoredDocument>)> = BTreeMap::new();
        for doc in docs {
            let mut keys: Vec<Value> = match field_value(doc, field) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(value) => vec![value],
            };
            keys.dedup();
            for key in keys {
                let rendered = match &key {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let group = groups.entry(rendered).or_insert_with(|| (key, Vec::new()));
                if !group.1.iter().any(|d| std::ptr::eq(*d, *doc)) {
                    group.1.push(*doc);
                }
            }
        }

        let mut ranked: Vec<(String, (Value, Vec<&StoredDocument>))> =
            groups.into_iter().collect();
        ranked.sort_by(|a, b| b.1.1.len().cmp(&a.1.1.len()).then_with(|| a.0.cmp(&b.0)));

        let other: usize = ranked.iter().skip(size).map(|(_, (_, d))| d.len()).sum();
        let mut buckets = Vec::new();
        for (_, (key, members)) in ranked.into_iter().take(size) {
            let mut bucket = Map::new();
            bucket.insert("key".into(), key);
            bucket.insert("doc_count".into(), json!(members.len()));
            if let Some(sub) = sub {
                bucket.extend(aggregate(sub, &members)?);
            }
            buckets.push(Value::Object(bucket));
        }

        out.insert(
            name.clone(),
            json!({
                "doc_count_error_upper_bound": 0,
                "sum_other_doc_count": other,
                "buckets": buckets
            }),
        );
    }

    Ok(out)
}

// ============================================================================
// Suggestions
// ============================================================================

fn run_suggest(
    index: &str,
    state: &IndexState,
    body: &Value,
) -> std::result::Result<Value, Failure> {
    let suggesters = body
        .get("suggest")
        .and_then(Value::as_object)
        .ok_or_else(|| rejected("request has no suggest section"))?;

    let mut results = Map::new();
    for (name, definition) in suggesters {
        let prefix = definition
            .get("prefix")
            .or_else(|| definition.get("text"))
            .and_then(Value::as_str)
            .ok_or_else(|| rejected(format!("suggester [{name}] requires a prefix")))?;
        let completion = definition
            .get("completion")
            .ok_or_else(|| rejected(format!("suggester [{name}] must be a completion suggester")))?;
        let field = completion
            .get("field")
            .and_then(Value::as_str)
            .unwrap_or(SUGGEST_FIELD);
        let size = completion
            .get("size")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_SUGGEST_SIZE);
        let wanted = context_values(
            completion
                .get("contexts")
                .and_then(|c| c.get(SUGGEST_CONTEXT)),
        );

        let lowered = prefix.to_lowercase();
        let mut options = Vec::new();
        for doc in &state.documents {
            if options.len() >= size {
                break;
            }
            let Some(suggestion) = doc.source.get(field) else {
                continue;
            };
            if !wanted.is_empty() {
                let contexts = context_values(
                    suggestion
                        .get("contexts")
                        .and_then(|c| c.get(SUGGEST_CONTEXT)),
                );
                if !contexts.iter().any(|c| wanted.contains(c)) {
                    continue;
                }
            }

            let inputs = suggestion.get("input").unwrap_or(suggestion);
            let mut texts = Vec::new();
            collect_text(inputs, &mut texts);
            if let Some(matched) = texts
                .into_iter()
                .find(|text| text.to_lowercase().starts_with(&lowered))
            {
                let mut option = document_header(index, doc);
                option.insert("text".into(), json!(matched));
                option.insert("_score".into(), json!(1.0));
                option.insert("_source".into(), Value::Object(doc.source.clone()));
                options.push(Value::Object(option));
            }
        }

        results.insert(
            name.clone(),
            json!([{
                "text": prefix,
                "offset": 0,
                "length": prefix.chars().count(),
                "options": options
            }]),
        );
    }

    Ok(json!({
        "took": 0,
        "timed_out": false,
        "hits": {"total": 0, "max_score": 0.0, "hits": []},
        "suggest": results
    }))
}

/// Context values: a string, an array of strings, or an array of `{ "context": .. }`.
fn context_values(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                item.as_str()
                    .or_else(|| item.get("context").and_then(Value::as_str))
                    .map(str::to_string)
            })
            .collect(),
        _ => Vec::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
