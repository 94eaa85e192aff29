//! Utility helpers shared across Searchit crates.
//!
//! # Modules
//!
//! - [`ids`]: Identifier normalization

pub mod ids;
