//! Searchable type (schema) representation.
//!
//! A [`SearchableType`] names a document type and lists the fields the
//! engine indexes for it. With `autocomplete` set, the gateway adds a
//! derived completion field to the schema and to every document of the type.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Engine field primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Analyzed full-text.
    Text,
    /// Exact-value string.
    Keyword,
    /// Pre-5.x string type, still reported by older engines.
    String,
    /// 64-bit integer.
    Long,
    /// 32-bit integer.
    Integer,
    /// 16-bit integer.
    Short,
    /// 8-bit integer.
    Byte,
    /// 64-bit float.
    Double,
    /// 32-bit float.
    Float,
    /// 16-bit float.
    HalfFloat,
    /// Float stored as a scaled long.
    ScaledFloat,
    /// Date or date-time.
    Date,
    /// Boolean.
    Boolean,
    /// Base64 binary.
    Binary,
    /// IPv4/IPv6 address.
    Ip,
    /// Latitude/longitude point.
    GeoPoint,
    /// Inner object.
    Object,
    /// Independently indexed inner objects.
    Nested,
}

impl FieldKind {
    /// Engine name of the primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::String => "string",
            Self::Long => "long",
            Self::Integer => "integer",
            Self::Short => "short",
            Self::Byte => "byte",
            Self::Double => "double",
            Self::Float => "float",
            Self::HalfFloat => "half_float",
            Self::ScaledFloat => "scaled_float",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Binary => "binary",
            Self::Ip => "ip",
            Self::GeoPoint => "geo_point",
            Self::Object => "object",
            Self::Nested => "nested",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "text" => Self::Text,
            "keyword" => Self::Keyword,
            "string" => Self::String,
            "long" => Self::Long,
            "integer" => Self::Integer,
            "short" => Self::Short,
            "byte" => Self::Byte,
            "double" => Self::Double,
            "float" => Self::Float,
            "half_float" => Self::HalfFloat,
            "scaled_float" => Self::ScaledFloat,
            "date" => Self::Date,
            "boolean" => Self::Boolean,
            "binary" => Self::Binary,
            "ip" => Self::Ip,
            "geo_point" => Self::GeoPoint,
            "object" => Self::Object,
            "nested" => Self::Nested,
            other => {
                return Err(Error::invalid_argument(format!(
                    "unknown field type: {other}"
                )));
            }
        };
        Ok(kind)
    }
}

/// One indexed field of a searchable type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchableField {
    /// Field name.
    pub name: String,
    /// Engine primitive.
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

impl SearchableField {
    /// Create a field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A searchable entity type: the schema documents of this type are indexed under.
///
/// Schemas are append-only: they are created and read, never updated or
/// deleted through the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchableType {
    /// Schema name, also the engine mapping type name.
    pub identifier: String,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether documents of this type feed the completion suggester.
    #[serde(default)]
    pub autocomplete: bool,

    /// Indexed fields, in declaration order.
    #[serde(default)]
    pub searchable_fields: Vec<SearchableField>,
}

impl SearchableType {
    /// Create a schema with no fields.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    /// Append a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.searchable_fields.push(SearchableField::new(name, kind));
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Enable or disable autocomplete.
    #[must_use]
    pub const fn with_autocomplete(mut self, autocomplete: bool) -> Self {
        self.autocomplete = autocomplete;
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&SearchableField> {
        self.searchable_fields.iter().find(|f| f.name == name)
    }

    /// The fields as an unordered set, for order-insensitive comparison.
    pub fn field_set(&self) -> BTreeSet<&SearchableField> {
        self.searchable_fields.iter().collect()
    }
}
