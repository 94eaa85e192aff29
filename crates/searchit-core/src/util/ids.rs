//! Identifier normalization utilities.
//!
//! Searchable type identifiers are engine-relative: the mapping type name
//! inside one index. Older callers qualified them with the index name
//! (`search_article`), so lookups by identifier accept both forms.

/// Strip a leading `"{index}_"` qualifier from a type identifier.
///
/// Only a leading qualifier is removed; the rest of the identifier is
/// returned untouched. An identifier that is exactly the qualifier is
/// returned unchanged so it never collapses to an empty name.
///
/// # Examples
///
/// ```
/// use searchit_core::util::ids::strip_index_prefix;
///
/// assert_eq!(strip_index_prefix("search_article", "search"), "article");
/// assert_eq!(strip_index_prefix("article", "search"), "article");
/// assert_eq!(strip_index_prefix("research_article", "search"), "research_article");
/// ```
pub fn strip_index_prefix<'a>(identifier: &'a str, index: &str) -> &'a str {
    if index.is_empty() {
        return identifier;
    }

    match identifier
        .strip_prefix(index)
        .and_then(|rest| rest.strip_prefix('_'))
    {
        Some(rest) if !rest.is_empty() => rest,
        _ => identifier,
    }
}
