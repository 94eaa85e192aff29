//! Engine-backed item repository.
//!
//! Writes are guarded by an existence probe. The probe and the write are two
//! requests, so concurrent writers can both pass it; the engine's own
//! create conflict is the authoritative answer and surfaces as the same
//! `DocumentAlreadyExists` error.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use searchit_core::entity::{SUGGEST_CONTEXT, SUGGEST_FIELD};
use searchit_core::{Error, Result, SearchableItem};
use searchit_gateway::response::{
    BulkResult, GetResult, MultiSearchEntry, MultiSearchResult, SearchResult, SuggestResult,
    TermsAggregation, WriteResult,
};
use searchit_gateway::{
    BulkItem, DocumentRef, Operation, Request, Response, SearchGateway, SearchSpec, WriteMode,
    decode,
};
use serde_json::{Map, Value};

use crate::exchange::Exchange;
use crate::query::{
    SUGGESTER_NAME, TAGS_AGGREGATION, TYPES_AGGREGATION, document_body, match_all_body,
    search_body, suggest_body, tags_aggregation_body, update_body,
};
use crate::repository::ItemRepository;
use crate::results::{ItemPage, MultiTypeResults, QUERY_KEY, SearchOptions, Suggestion, TagBucket};

/// Documents of every searchable type, stored in one engine index.
#[derive(Debug, Clone)]
pub struct ElasticItemRepository {
    exchange: Exchange,
    index: String,
}

impl ElasticItemRepository {
    /// Create a repository over `index`.
    pub fn new(gateway: Arc<dyn SearchGateway>, index: impl Into<String>) -> Self {
        Self {
            exchange: Exchange::new(gateway),
            index: index.into(),
        }
    }

    /// Apply a deadline to every engine call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.exchange.set_timeout(timeout);
        self
    }

    /// Index holding the documents.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Per-call deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.exchange.timeout()
    }

    fn target(&self, doc_type: &str, identifier: &str) -> DocumentRef {
        DocumentRef::new(self.index.as_str(), doc_type, identifier)
    }

    async fn exists(&self, item: &SearchableItem) -> Result<bool> {
        self.exchange
            .probe(Request::DocumentExists(
                self.target(&item.doc_type, &item.identifier),
            ))
            .await
    }

    async fn search(&self, spec: SearchSpec) -> Result<SearchResult> {
        let body = self.exchange.body(Request::Search(spec)).await?;
        decode(Operation::Search, body)
    }
}

fn validate_item(item: &SearchableItem) -> Result<()> {
    if item.identifier.is_empty() {
        return Err(Error::invalid_argument("item identifier must not be empty"));
    }
    if item.doc_type.is_empty() {
        return Err(Error::invalid_argument(format!(
            "item {} has no type",
            item.identifier
        )));
    }
    Ok(())
}

fn validate_type_name(doc_type: &str) -> Result<()> {
    if doc_type.is_empty() {
        return Err(Error::invalid_argument("document type must not be empty"));
    }
    Ok(())
}

fn validate_types(types: &[&str]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for doc_type in types {
        if doc_type.is_empty() {
            return Err(Error::invalid_argument("search type must not be empty"));
        }
        if *doc_type == QUERY_KEY {
            return Err(Error::invalid_argument(format!(
                "'{QUERY_KEY}' cannot be searched as a type"
            )));
        }
        if !seen.insert(*doc_type) {
            return Err(Error::invalid_argument(format!(
                "type {doc_type} requested twice"
            )));
        }
    }
    Ok(())
}

/// Type recorded in a stored suggestion field's context.
fn suggested_type(source: &Map<String, Value>) -> Option<String> {
    match source.get(SUGGEST_FIELD)?.get("contexts")?.get(SUGGEST_CONTEXT)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(values) => values.first()?.as_str().map(str::to_string),
        _ => None,
    }
}

#[async_trait]
impl ItemRepository for ElasticItemRepository {
    async fn insert(&self, item: SearchableItem, index_tags: bool) -> Result<SearchableItem> {
        validate_item(&item)?;
        if self.exists(&item).await? {
            return Err(Error::document_exists(
                item.doc_type.as_str(),
                item.identifier.as_str(),
            ));
        }

        let request = Request::IndexDocument {
            target: self.target(&item.doc_type, &item.identifier),
            body: document_body(&item, index_tags),
            mode: WriteMode::Create,
        };
        match self.exchange.send(request).await? {
            Response::Body(body) => {
                let write: WriteResult = decode(Operation::IndexDocument, body.clone())?;
                if !write.is_created() {
                    return Err(Error::transport_with_response(
                        format!("{}/{} was not created", item.doc_type, item.identifier),
                        body,
                    ));
                }
            }
            Response::Conflict(_) => {
                log::debug!(
                    "{}/{} was created concurrently",
                    item.doc_type,
                    item.identifier
                );
                return Err(Error::document_exists(
                    item.doc_type.as_str(),
                    item.identifier.as_str(),
                ));
            }
            other => return Err(other.unexpected(Operation::IndexDocument)),
        }

        Ok(item)
    }

    async fn insert_bulk(&self, items: Vec<SearchableItem>) -> Result<Vec<SearchableItem>> {
        let Some(first) = items.first() else {
            return Ok(items);
        };
        let doc_type = first.doc_type.clone();

        let mut writes = Vec::with_capacity(items.len());
        let mut written = Vec::with_capacity(items.len());
        for mut item in items {
            if item.doc_type != doc_type {
                log::warn!(
                    "Bulk item {} has type {}, indexing it as {doc_type}",
                    item.identifier,
                    item.doc_type
                );
                item.doc_type = doc_type.clone();
            }
            writes.push(BulkItem {
                target: self.target(&doc_type, &item.identifier),
                body: document_body(&item, true),
            });
            written.push(item);
        }

        let count = writes.len();
        let body = self.exchange.body(Request::Bulk { items: writes }).await?;
        let result: BulkResult = decode(Operation::BulkWrite, body.clone())?;
        if result.errors {
            return Err(Error::transport_with_response(
                format!("bulk write of {count} {doc_type} documents reported item errors"),
                body,
            ));
        }

        log::info!("Indexed {count} {doc_type} documents");
        Ok(written)
    }

    async fn update_by_identifier(&self, item: SearchableItem) -> Result<SearchableItem> {
        validate_item(&item)?;
        if !self.exists(&item).await? {
            return Err(Error::document_not_found(
                item.doc_type.as_str(),
                item.identifier.as_str(),
            ));
        }

        let request = Request::UpdateDocument {
            target: self.target(&item.doc_type, &item.identifier),
            doc: update_body(&item),
        };
        match self.exchange.send(request).await? {
            Response::Body(body) => {
                let write: WriteResult = decode(Operation::UpdateDocument, body.clone())?;
                if !write.is_written() {
                    return Err(Error::transport_with_response(
                        format!("{}/{} was not updated", item.doc_type, item.identifier),
                        body,
                    ));
                }
            }
            Response::NotFound(_) => {
                return Err(Error::document_not_found(
                    item.doc_type.as_str(),
                    item.identifier.as_str(),
                ));
            }
            other => return Err(other.unexpected(Operation::UpdateDocument)),
        }

        Ok(item)
    }

    async fn update_by_type(&self, item: SearchableItem) -> Result<SearchableItem> {
        validate_item(&item)?;
        if !self.exists(&item).await? {
            return Err(Error::document_not_found(
                item.doc_type.as_str(),
                item.identifier.as_str(),
            ));
        }

        let request = Request::IndexDocument {
            target: self.target(&item.doc_type, &item.identifier),
            body: document_body(&item, true),
            mode: WriteMode::Index,
        };
        let body = self.exchange.body(request).await?;
        let write: WriteResult = decode(Operation::IndexDocument, body.clone())?;
        if !write.is_written() {
            return Err(Error::transport_with_response(
                format!("{}/{} was not replaced", item.doc_type, item.identifier),
                body,
            ));
        }

        Ok(item)
    }

    async fn delete_by_identifier(&self, identifier: &str, doc_type: &str) -> Result<()> {
        validate_type_name(doc_type)?;
        let target = self.target(doc_type, identifier);
        match self.exchange.send(Request::DeleteDocument(target)).await? {
            Response::Body(_) => Ok(()),
            Response::NotFound(_) => {
                log::debug!("{doc_type}/{identifier} was already absent");
                Ok(())
            }
            other => Err(other.unexpected(Operation::DeleteDocument)),
        }
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
        doc_type: &str,
    ) -> Result<SearchableItem> {
        validate_type_name(doc_type)?;
        let target = self.target(doc_type, identifier);
        match self.exchange.send(Request::GetDocument(target)).await? {
            Response::Body(body) => {
                let found: GetResult = decode(Operation::GetDocument, body)?;
                if !found.found {
                    return Err(Error::document_missing(identifier));
                }
                Ok(SearchableItem::from_source(
                    identifier,
                    found.doc_type.unwrap_or_else(|| doc_type.to_string()),
                    found.source.unwrap_or_default(),
                ))
            }
            Response::NotFound(_) => Err(Error::document_missing(identifier)),
            other => Err(other.unexpected(Operation::GetDocument)),
        }
    }

    async fn find_all(&self, doc_type: &str) -> Result<ItemPage> {
        validate_type_name(doc_type)?;
        let spec = SearchSpec::for_type(self.index.as_str(), doc_type, match_all_body());
        let result = self.search(spec).await?;
        Ok(ItemPage::from_search(result, doc_type))
    }

    async fn search_single_type(
        &self,
        query: &str,
        doc_type: &str,
        limit: usize,
        offset: usize,
    ) -> Result<ItemPage> {
        validate_type_name(doc_type)?;
        let spec = SearchSpec::for_type(
            self.index.as_str(),
            doc_type,
            search_body(query, limit, offset),
        );
        let result = self.search(spec).await?;
        Ok(ItemPage::from_search(result, doc_type))
    }

    async fn search_multiple_types(
        &self,
        query: &str,
        types: &[&str],
        options: &SearchOptions,
    ) -> Result<MultiTypeResults> {
        validate_types(types)?;
        let mut results = MultiTypeResults::new(query);
        if types.is_empty() {
            return Ok(results);
        }

        let searches = types
            .iter()
            .map(|doc_type| {
                SearchSpec::for_type(
                    self.index.as_str(),
                    *doc_type,
                    search_body(
                        query,
                        options.limit_for(doc_type),
                        options.offset_for(doc_type),
                    ),
                )
            })
            .collect();

        let body = self
            .exchange
            .body(Request::MultiSearch { searches })
            .await?;
        let answer: MultiSearchResult = decode(Operation::MultiSearch, body.clone())?;
        if answer.responses.len() != types.len() {
            return Err(Error::transport_with_response(
                format!(
                    "multi-search returned {} responses for {} types",
                    answer.responses.len(),
                    types.len()
                ),
                body,
            ));
        }

        for (doc_type, entry) in types.iter().zip(answer.responses) {
            match entry {
                MultiSearchEntry::Hits(result) => {
                    results.push(*doc_type, ItemPage::from_search(result, doc_type));
                }
                MultiSearchEntry::Failed { error } => {
                    return Err(Error::transport_with_response(
                        format!("search of type {doc_type} failed"),
                        error,
                    ));
                }
            }
        }

        Ok(results)
    }

    async fn autocomplete(
        &self,
        query: &str,
        types: &[&str],
        size: usize,
    ) -> Result<Vec<Suggestion>> {
        if size == 0 {
            return Ok(Vec::new());
        }
        let request = Request::Suggest {
            index: self.index.clone(),
            body: suggest_body(query, types, size),
        };
        let body = self.exchange.body(request).await?;
        let result: SuggestResult = decode(Operation::Suggest, body)?;

        let mut suggestions = Vec::new();
        for entry in result.entries(SUGGESTER_NAME)? {
            for option in entry.options {
                let doc_type = option
                    .doc_type
                    .or_else(|| suggested_type(&option.source))
                    .unwrap_or_default();
                suggestions.push(Suggestion {
                    entity: SearchableItem::from_source(option.id, doc_type.as_str(), option.source),
                    doc_type,
                    matched: option.text,
                });
            }
        }
        suggestions.truncate(size);
        Ok(suggestions)
    }

    async fn most_used_tags(&self, types: &[&str]) -> Result<Vec<TagBucket>> {
        let spec = SearchSpec {
            index: self.index.clone(),
            doc_types: types.iter().map(|t| (*t).to_string()).collect(),
            body: tags_aggregation_body(),
        };
        let result = self.search(spec).await?;
        let raw = result
            .aggregations
            .and_then(|mut aggs| aggs.remove(TYPES_AGGREGATION))
            .ok_or_else(|| {
                Error::transport(format!(
                    "search response has no {TYPES_AGGREGATION} aggregation"
                ))
            })?;
        let by_type: TermsAggregation = decode(Operation::Search, raw)?;

        let mut buckets = Vec::new();
        for type_bucket in by_type.buckets {
            let Some(raw_tags) = type_bucket.sub.get(TAGS_AGGREGATION) else {
                log::warn!(
                    "Type bucket {} has no {TAGS_AGGREGATION} aggregation",
                    type_bucket.key
                );
                continue;
            };
            let tags: TermsAggregation = decode(Operation::Search, raw_tags.clone())?;
            for tag in tags.buckets {
                buckets.push(TagBucket {
                    name: type_bucket.key.clone(),
                    value: tag.key,
                    count: tag.doc_count,
                });
            }
        }
        Ok(buckets)
    }
}

// ============================================================================
// Tests
// ============================================================================
