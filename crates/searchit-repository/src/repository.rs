//! Repository traits.
//!
//! Callers depend on these traits; `ElasticTypeRepository` and
//! `ElasticItemRepository` implement them over a shared `SearchGateway`.
//!
//! # Async
//!
//! Every method is one independent exchange (or a short guarded sequence)
//! with the engine; no method holds state between calls, so repositories
//! can be shared and called concurrently.

use async_trait::async_trait;
use searchit_core::{Result, SearchableItem, SearchableType};

use crate::results::{ItemPage, MultiTypeResults, SearchOptions, Suggestion, TagBucket};

/// Schema management: create and read searchable types.
///
/// There is no update, and deletion is always rejected.
#[async_trait]
pub trait TypeRepository: Send + Sync {
    /// Create a searchable type.
    ///
    /// Any leading `"<index>_"` is stripped before the mapping is created,
    /// so `search_history` in index `search` is stored as `history` and is
    /// found by `find_by_identifier("search_history")` or
    /// `find_by_name("history")`.
    ///
    /// Fails with `SchemaAlreadyExists` if a type with the stripped
    /// identifier exists, whether detected by the pre-check or by the
    /// engine's conflict on put-mapping. Returns the stored type.
    async fn insert(&self, ty: SearchableType) -> Result<SearchableType>;

    /// Look up a type, stripping any `"<index>_"` prefix from `identifier` first.
    async fn find_by_identifier(&self, identifier: &str) -> Result<SearchableType>;

    /// Look up a type by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<SearchableType>;

    /// Every type, in engine order.
    async fn find_all(&self) -> Result<Vec<SearchableType>>;

    /// Batch form of [`find_by_identifier`](Self::find_by_identifier).
    ///
    /// Results follow the order of `identifiers`; unknown ones are skipped.
    async fn find_many_by_identifiers(&self, identifiers: &[&str]) -> Result<Vec<SearchableType>>;

    /// Batch form of [`find_by_name`](Self::find_by_name).
    ///
    /// Results follow the order of `names`; unknown ones are skipped.
    async fn find_many_by_names(&self, names: &[&str]) -> Result<Vec<SearchableType>>;

    /// Always fails with `UnsupportedOperation`.
    async fn delete_by_identifier(&self, identifier: &str) -> Result<()>;
}

/// Document management and search.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Index a new document.
    ///
    /// Fails with `DocumentAlreadyExists` if `(type, identifier)` is taken,
    /// whether detected by the pre-check or by the engine's create conflict.
    async fn insert(&self, item: SearchableItem, index_tags: bool) -> Result<SearchableItem>;

    /// Index many documents of one type in one request.
    ///
    /// The type is taken from the first item. Any per-item engine error fails
    /// the whole call with a `Transport` error carrying the full response.
    async fn insert_bulk(&self, items: Vec<SearchableItem>) -> Result<Vec<SearchableItem>>;

    /// Merge the item's attributes into an existing document.
    ///
    /// Fails with `DocumentNotFound` if the document does not exist.
    async fn update_by_identifier(&self, item: SearchableItem) -> Result<SearchableItem>;

    /// Replace an existing document with the item.
    ///
    /// Fails with `DocumentNotFound` if the document does not exist.
    async fn update_by_type(&self, item: SearchableItem) -> Result<SearchableItem>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete_by_identifier(&self, identifier: &str, doc_type: &str) -> Result<()>;

    /// Point lookup.
    async fn find_by_identifier(&self, identifier: &str, doc_type: &str)
    -> Result<SearchableItem>;

    /// Documents of a type. An empty `doc_type` is an `InvalidArgument`.
    ///
    /// Not paginated: only the engine's default page is returned, while
    /// `total` reports every match. Do not assume completeness.
    async fn find_all(&self, doc_type: &str) -> Result<ItemPage>;

    /// Substring search over every field of one type.
    async fn search_single_type(
        &self,
        query: &str,
        doc_type: &str,
        limit: usize,
        offset: usize,
    ) -> Result<ItemPage>;

    /// Substring search over several types in one multi-search request.
    async fn search_multiple_types(
        &self,
        query: &str,
        types: &[&str],
        options: &SearchOptions,
    ) -> Result<MultiTypeResults>;

    /// Prefix completion over document tags, scoped to `types`.
    ///
    /// Returns at most `size` suggestions; a `size` of zero sends no request.
    async fn autocomplete(&self, query: &str, types: &[&str], size: usize)
    -> Result<Vec<Suggestion>>;

    /// Tag usage counts per type. An empty `types` covers every type.
    async fn most_used_tags(&self, types: &[&str]) -> Result<Vec<TagBucket>>;
}
