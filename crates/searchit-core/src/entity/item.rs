//! Searchable item (document) representation.
//!
//! A [`SearchableItem`] is one indexable document: a caller-supplied
//! identifier, the type (schema) it belongs to, its attribute payload, and
//! an optional tag list that feeds the suggestion and aggregation fields.
//!
//! ```rust
//! use searchit_core::SearchableItem;
//! use serde_json::json;
//!
//! let item = SearchableItem::new("a1", "article")
//!     .with_attribute("title", json!("Hello"))
//!     .with_tags(["rust", "search"]);
//!
//! assert!(item.has_tags());
//! assert_eq!(item.attributes["title"], "Hello");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{SUGGEST_FIELD, TAGS_LIST_FIELD};

/// One indexable document.
///
/// `(doc_type, identifier)` is the document's addressable key inside an
/// index. Uniqueness is enforced by the engine, not by this value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchableItem {
    /// Unique, caller-supplied key.
    pub identifier: String,

    /// Name of the searchable type this document belongs to.
    #[serde(rename = "type")]
    pub doc_type: String,

    /// Indexed payload, field name to arbitrary JSON value.
    #[serde(default, alias = "entity")]
    pub attributes: Map<String, Value>,

    /// Tags used to populate the derived suggestion field.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SearchableItem {
    /// Create an item with no attributes and no tags.
    pub fn new(identifier: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            doc_type: doc_type.into(),
            attributes: Map::new(),
            tags: Vec::new(),
        }
    }

    /// Set a single attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Replace the attribute payload.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Replace the tag list.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if the item carries at least one tag.
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Rebuild an item from a stored engine `_source`.
    ///
    /// Tags come from the suggestion field's `input` when present, otherwise
    /// from `tags_list`. Both derived fields are removed from the returned
    /// attributes, so callers never see the engine-internal structures.
    pub fn from_source(
        identifier: impl Into<String>,
        doc_type: impl Into<String>,
        mut source: Map<String, Value>,
    ) -> Self {
        let suggested = source.remove(SUGGEST_FIELD).map(|s| suggestion_inputs(&s));
        let listed = source.remove(TAGS_LIST_FIELD).map(|l| string_list(&l));

        let tags = match (suggested, listed) {
            (Some(tags), _) if !tags.is_empty() => tags,
            (_, Some(tags)) => tags,
            (Some(tags), None) => tags,
            (None, None) => Vec::new(),
        };

        Self {
            identifier: identifier.into(),
            doc_type: doc_type.into(),
            attributes: source,
            tags,
        }
    }
}

/// Extract the `input` list of a completion field value.
///
/// The engine accepts `input` as a single string or an array of strings.
fn suggestion_inputs(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.get("input").map(string_list).unwrap_or_default(),
        other => string_list(other),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
