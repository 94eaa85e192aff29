//! Typed search results and search options.

use std::collections::BTreeMap;

use searchit_core::SearchableItem;
use searchit_gateway::response::SearchResult;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Page size used when no positive limit is given.
pub const DEFAULT_LIMIT: usize = 10;

/// Key under which a multi-type result echoes the query.
pub const QUERY_KEY: &str = "query";

/// One page of items plus the engine's total hit count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPage {
    /// Returned items, in engine order.
    pub items: Vec<SearchableItem>,
    /// Number of matching documents (may exceed `items.len()`).
    pub total: u64,
}

impl ItemPage {
    /// Build a page from a search response.
    ///
    /// Hits without a `_type` are attributed to `doc_type`.
    pub fn from_search(result: SearchResult, doc_type: &str) -> Self {
        let items = result
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let hit_type = hit.doc_type.unwrap_or_else(|| doc_type.to_string());
                SearchableItem::from_source(hit.id, hit_type, hit.source)
            })
            .collect();
        Self {
            items,
            total: result.hits.total,
        }
    }

    /// Returns `true` if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifiers of the items on the page.
    pub fn identifiers(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.identifier.as_str()).collect()
    }
}

/// Per-type pages of a multi-type search, in request order, plus the query.
///
/// Serializes as one JSON object: a key per type, then `"query"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiTypeResults {
    query: String,
    pages: Vec<(String, ItemPage)>,
}

impl MultiTypeResults {
    /// Create an empty result for `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            pages: Vec::new(),
        }
    }

    /// Append the page of one type.
    pub fn push(&mut self, doc_type: impl Into<String>, page: ItemPage) {
        self.pages.push((doc_type.into(), page));
    }

    /// The echoed query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Page of `doc_type`, if it was searched.
    pub fn get(&self, doc_type: &str) -> Option<&ItemPage> {
        self.pages
            .iter()
            .find(|(t, _)| t == doc_type)
            .map(|(_, page)| page)
    }

    /// Searched types, in request order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|(t, _)| t.as_str())
    }

    /// Number of searched types.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns `true` if no type was searched.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Serialize for MultiTypeResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pages.len() + 1))?;
        for (doc_type, page) in &self.pages {
            map.serialize_entry(doc_type, page)?;
        }
        map.serialize_entry(QUERY_KEY, &self.query)?;
        map.end()
    }
}

/// One autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Type of the suggested document.
    #[serde(rename = "type")]
    pub doc_type: String,
    /// The suggested document, derived fields stripped.
    pub entity: SearchableItem,
    /// Suggestion input that matched the prefix.
    #[serde(rename = "match")]
    pub matched: String,
}

/// Usage count of one tag within one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBucket {
    /// Document type.
    pub name: String,
    /// Tag.
    pub value: String,
    /// Number of documents of the type carrying the tag.
    pub count: u64,
}

/// Per-type paging for multi-type search.
///
/// A typed view of the `"<type>_limit"` / `"<type>_offset"` option keys.
/// Absent or zero values fall back to limit 10 and offset 0.
///
/// ```rust
/// use searchit_repository::SearchOptions;
///
/// let options = SearchOptions::from_pairs([("article_limit", 5)]).with_offset("user", 20);
/// assert_eq!(options.limit_for("article"), 5);
/// assert_eq!(options.limit_for("user"), 10);
/// assert_eq!(options.offset_for("user"), 20);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchOptions {
    values: BTreeMap<String, usize>,
}

impl SearchOptions {
    /// Empty options: every type uses the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw option keys.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, usize)>,
        K: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Set the page size of one type.
    #[must_use]
    pub fn with_limit(mut self, doc_type: &str, limit: usize) -> Self {
        self.values.insert(format!("{doc_type}_limit"), limit);
        self
    }

    /// Set the offset of one type.
    #[must_use]
    pub fn with_offset(mut self, doc_type: &str, offset: usize) -> Self {
        self.values.insert(format!("{doc_type}_offset"), offset);
        self
    }

    /// Page size for `doc_type`.
    pub fn limit_for(&self, doc_type: &str) -> usize {
        self.positive(&format!("{doc_type}_limit"))
            .unwrap_or(DEFAULT_LIMIT)
    }

    /// Offset for `doc_type`.
    pub fn offset_for(&self, doc_type: &str) -> usize {
        self.positive(&format!("{doc_type}_offset")).unwrap_or(0)
    }

    fn positive(&self, key: &str) -> Option<usize> {
        self.values.get(key).copied().filter(|n| *n > 0)
    }
}

// ============================================================================
// Tests
// ============================================================================
