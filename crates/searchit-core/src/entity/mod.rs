//! Searchable entities and the reserved field names they share with the engine.
//!
//! - [`SearchableItem`]: one indexed document of a given type
//! - [`SearchableType`]: the schema (mapping) a document type is indexed under

pub mod item;
pub mod schema;

pub use item::SearchableItem;
pub use schema::{FieldKind, SearchableField, SearchableType};

/// Default index name used when none is configured.
pub const DEFAULT_INDEX: &str = "search";

/// Derived completion field holding a document's tags for autocomplete.
pub const SUGGEST_FIELD: &str = "name_suggest";

/// Completion context scoping suggestions to a document type.
pub const SUGGEST_CONTEXT: &str = "suggest_type";

/// Derived keyword field listing a document's tags, used for aggregation.
pub const TAGS_LIST_FIELD: &str = "tags_list";

/// Raw attribute key superseded by the suggestion field when tags are indexed.
pub const RAW_TAGS_FIELD: &str = "tags";

/// Returns `true` if `name` is a field the gateway derives itself.
pub fn is_derived_field(name: &str) -> bool {
    name == SUGGEST_FIELD || name == TAGS_LIST_FIELD
}
