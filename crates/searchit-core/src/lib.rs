//! Searchit Core: shared entities, errors, and utilities.
//!
//! This crate provides the foundational types used across all Searchit crates.
//! It has no internal Searchit dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`entity`]: Searchable items, searchable types, reserved field names
//! - [`error`]: Error taxonomy and Result alias
//! - [`util`]: Identifier helpers

pub mod entity;
pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use entity::{FieldKind, SearchableField, SearchableItem, SearchableType};
pub use error::{Error, Result};

pub use util::ids::strip_index_prefix;
