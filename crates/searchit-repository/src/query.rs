//! Request body builders.
//!
//! Every search-side body the repositories send is built here, so the
//! engine query dialect lives in one place.

use searchit_core::SearchableItem;
use searchit_core::entity::{RAW_TAGS_FIELD, SUGGEST_CONTEXT, SUGGEST_FIELD, TAGS_LIST_FIELD};
use searchit_gateway::escape_wildcard;
use serde_json::{Map, Value, json};

/// Name of the completion suggester in suggest requests.
pub const SUGGESTER_NAME: &str = "suggestions";

/// Outer aggregation: buckets per document type.
pub const TYPES_AGGREGATION: &str = "types";

/// Inner aggregation: buckets per tag within a type.
pub const TAGS_AGGREGATION: &str = "tags";

/// Maximum number of type buckets requested by tag aggregation.
pub const TYPE_BUCKETS: usize = 100;

/// Maximum number of tag buckets per type requested by tag aggregation.
pub const TAG_BUCKETS: usize = 100;

/// Substring match of `query` against every field of a document.
///
/// The query text is matched literally; wildcard metacharacters in it are escaped.
pub fn contains_query(query: &str) -> Value {
    json!({
        "wildcard": {
            "_all": {"value": format!("*{}*", escape_wildcard(query))}
        }
    })
}

/// Paged substring search body.
pub fn search_body(query: &str, limit: usize, offset: usize) -> Value {
    json!({
        "size": limit,
        "from": offset,
        "query": contains_query(query)
    })
}

/// Unpaged body matching every document (the engine's default page applies).
pub fn match_all_body() -> Value {
    json!({"query": {"match_all": {}}})
}

/// Completion-suggest body scoped to `types` through the suggestion context.
///
/// An empty `types` list leaves the suggester unscoped.
pub fn suggest_body(prefix: &str, types: &[&str], size: usize) -> Value {
    let mut completion = json!({
        "field": SUGGEST_FIELD,
        "size": size
    });
    if !types.is_empty() {
        completion["contexts"] = json!({ SUGGEST_CONTEXT: types });
    }

    json!({
        "size": 0,
        "suggest": {
            SUGGESTER_NAME: {
                "prefix": prefix,
                "completion": completion
            }
        }
    })
}

/// Tag usage per type: `terms` on `_type` with a nested `terms` on `tags_list`.
pub fn tags_aggregation_body() -> Value {
    json!({
        "size": 0,
        "query": {"match_all": {}},
        "aggs": {
            TYPES_AGGREGATION: {
                "terms": {"field": "_type", "size": TYPE_BUCKETS},
                "aggs": {
                    TAGS_AGGREGATION: {
                        "terms": {"field": TAGS_LIST_FIELD, "size": TAG_BUCKETS}
                    }
                }
            }
        }
    })
}

/// Full write payload for an item.
///
/// `tags_list` is always present. With `index_tags` and a non-empty tag
/// list, the suggestion field is added and the raw `tags` attribute dropped.
pub fn document_body(item: &SearchableItem, index_tags: bool) -> Map<String, Value> {
    let mut body = item.attributes.clone();
    body.insert(TAGS_LIST_FIELD.to_string(), json!(item.tags));
    if index_tags && item.has_tags() {
        body.insert(SUGGEST_FIELD.to_string(), suggestion(item));
        body.remove(RAW_TAGS_FIELD);
    }
    body
}

/// Partial update payload: attributes, plus the tag fields only when tags are given.
pub fn update_body(item: &SearchableItem) -> Map<String, Value> {
    let mut body = item.attributes.clone();
    if item.has_tags() {
        body.insert(TAGS_LIST_FIELD.to_string(), json!(item.tags));
        body.insert(SUGGEST_FIELD.to_string(), suggestion(item));
        body.remove(RAW_TAGS_FIELD);
    }
    body
}

fn suggestion(item: &SearchableItem) -> Value {
    json!({
        "input": item.tags,
        "contexts": { SUGGEST_CONTEXT: [item.doc_type] }
    })
}

// ============================================================================
// Tests
// ============================================================================
