//! Translation between searchable types and engine mappings.
//!
//! A [`SearchableType`] becomes a mapping with one property per searchable
//! field, plus the derived `tags_list` keyword field and, with autocomplete,
//! the `name_suggest` completion field scoped by the `suggest_type` context.
//! Reading a mapping back reverses this: derived fields are excluded from
//! `searchable_fields`, and the suggestion field sets `autocomplete`.

use std::str::FromStr;

use searchit_core::entity::{SUGGEST_CONTEXT, SUGGEST_FIELD, TAGS_LIST_FIELD, is_derived_field};
use searchit_core::{Error, FieldKind, Result, SearchableField, SearchableType};
use serde_json::{Map, Value, json};

/// Mapping name the engine uses for index-wide defaults, never a searchable type.
const DEFAULT_MAPPING: &str = "_default_";

/// Build the put-mapping body for a type, keyed by the type identifier.
pub fn mapping_body(ty: &SearchableType) -> Value {
    let mut properties = Map::new();
    for field in &ty.searchable_fields {
        properties.insert(field.name.clone(), json!({"type": field.kind.as_str()}));
    }
    properties.insert(TAGS_LIST_FIELD.to_string(), json!({"type": "keyword"}));
    if ty.autocomplete {
        properties.insert(
            SUGGEST_FIELD.to_string(),
            json!({
                "type": "completion",
                "contexts": [{"name": SUGGEST_CONTEXT, "type": "category"}]
            }),
        );
    }

    let mut mapping = Map::new();
    mapping.insert("_source".into(), json!({"enabled": true}));
    mapping.insert("properties".into(), Value::Object(properties));
    if let Some(description) = &ty.description {
        mapping.insert("_meta".into(), json!({"description": description}));
    }

    let mut body = Map::new();
    body.insert(ty.identifier.clone(), Value::Object(mapping));
    Value::Object(body)
}

/// Check a type before it is sent to the engine.
pub fn validate_type(ty: &SearchableType) -> Result<()> {
    if ty.identifier.trim().is_empty() {
        return Err(Error::invalid_argument(
            "searchable type identifier must not be empty",
        ));
    }
    if ty.identifier.starts_with('_') {
        return Err(Error::invalid_argument(format!(
            "searchable type identifier must not start with '_': {}",
            ty.identifier
        )));
    }
    for field in &ty.searchable_fields {
        if field.name.is_empty() {
            return Err(Error::invalid_argument(format!(
                "{} has a field with an empty name",
                ty.identifier
            )));
        }
        if is_derived_field(&field.name) {
            return Err(Error::invalid_argument(format!(
                "{} declares reserved field {}",
                ty.identifier, field.name
            )));
        }
    }
    Ok(())
}

/// Translate one mapping definition into a searchable type.
///
/// Fields whose engine type has no [`FieldKind`] are left out with a warning,
/// so one foreign mapping never hides the rest of the index.
pub fn type_from_mapping(identifier: &str, mapping: &Value) -> SearchableType {
    let mut ty = SearchableType::new(identifier);
    ty.description = mapping
        .pointer("/_meta/description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let Some(properties) = mapping.get("properties").and_then(Value::as_object) else {
        return ty;
    };

    for (name, definition) in properties {
        if name == SUGGEST_FIELD {
            ty.autocomplete = true;
            continue;
        }
        if name == TAGS_LIST_FIELD {
            continue;
        }
        let kind = match definition.get("type").and_then(Value::as_str) {
            Some(kind) => match FieldKind::from_str(kind) {
                Ok(kind) => kind,
                Err(_) => {
                    log::warn!("Skipping {identifier}.{name}: unsupported field type {kind}");
                    continue;
                }
            },
            None if definition.get("properties").is_some() => FieldKind::Object,
            None => {
                log::warn!("Skipping {identifier}.{name}: no field type");
                continue;
            }
        };
        ty.searchable_fields.push(SearchableField::new(name.clone(), kind));
    }

    ty
}

/// Translate a get-mapping response into searchable types, in engine order.
///
/// The response is keyed by concrete index name; when `index` is an alias
/// the single entry present is used.
pub fn types_from_mappings(index: &str, body: &Value) -> Result<Vec<SearchableType>> {
    let entries = body
        .as_object()
        .ok_or_else(|| Error::transport_with_response("mapping response is not an object", body.clone()))?;

    let entry = match entries.get(index) {
        Some(entry) => entry,
        None if entries.len() == 1 => entries.values().next().unwrap_or(&Value::Null),
        None => {
            return Err(Error::transport_with_response(
                format!("mapping response has no entry for index {index}"),
                body.clone(),
            ));
        }
    };

    let mappings = entry
        .get("mappings")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            Error::transport_with_response(
                format!("mapping response for {index} has no mappings"),
                body.clone(),
            )
        })?;

    Ok(mappings
        .iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_MAPPING)
        .map(|(name, mapping)| type_from_mapping(name, mapping))
        .collect())
}

// ============================================================================
// Tests
// ============================================================================
