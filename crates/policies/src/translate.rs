//! Bridge between kernel's agnostic domain types and Cedar's internal types.
//!
//! Cedar is encapsulated here and nowhere else in this crate's public API.
//! Callers hand us `kernel::domain::EntityRecord` rows loaded from a `Store`
//! and JSON context values; we hand Cedar back `Entity`/`RestrictedExpression`/
//! `Context`. Entity references are the `{type, id}` tuples described by the
//! data model, textual form `Type::"id"`.

use cedar_policy::{Context, Entity, EntityUid, RestrictedExpression};
use kernel::domain::{AttributeValue, EntityRecord, ParentRef, StoredAttribute};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TranslateError {
    #[error("invalid attribute value: {0}")]
    InvalidAttribute(String),
    #[error("invalid entity: {0}")]
    InvalidEntity(String),
    #[error("invalid context: {0}")]
    InvalidContext(String),
    #[error("invalid entity reference {type_}::{id}: {reason}")]
    InvalidReference {
        type_: String,
        id: String,
        reason: String,
    },
}

/// Builds a Cedar `EntityUid` from a logical `(type, id)` pair, the textual
/// form being `Type::"id"`.
pub fn entity_uid(entity_type: &str, entity_id: &str) -> Result<EntityUid, TranslateError> {
    let escaped = entity_id.replace('\\', "\\\\").replace('"', "\\\"");
    let text = format!("{entity_type}::\"{escaped}\"");
    EntityUid::from_str(&text).map_err(|e| TranslateError::InvalidReference {
        type_: entity_type.to_string(),
        id: entity_id.to_string(),
        reason: e.to_string(),
    })
}

fn parent_euid(parent: &ParentRef) -> Result<EntityUid, TranslateError> {
    entity_uid(&parent.parent_type, &parent.parent_id)
}

/// Converts a persisted attribute (as read back from a `Store`) into the
/// runtime `AttributeValue` Cedar translation works from.
pub fn stored_to_attribute_value(value: &StoredAttribute) -> AttributeValue {
    match value {
        StoredAttribute::Bool(b) => AttributeValue::bool(*b),
        StoredAttribute::Long(n) => AttributeValue::long(*n),
        StoredAttribute::String(s) => AttributeValue::string(s.clone()),
        StoredAttribute::Set(items) => {
            AttributeValue::set(items.iter().map(stored_to_attribute_value).collect())
        }
        StoredAttribute::Record(map) => {
            let converted = map
                .iter()
                .map(|(k, v)| (k.clone(), stored_to_attribute_value(v)))
                .collect();
            AttributeValue::record(converted)
        }
    }
}

fn attribute_value_to_restricted(
    value: &AttributeValue,
) -> Result<RestrictedExpression, TranslateError> {
    if let Some(b) = value.as_bool() {
        return Ok(RestrictedExpression::new_bool(b));
    }
    if let Some(n) = value.as_long() {
        return Ok(RestrictedExpression::new_long(n));
    }
    if let Some(s) = value.as_string() {
        return Ok(RestrictedExpression::new_string(s.to_string()));
    }
    if let Some(items) = value.as_set() {
        let exprs: Result<Vec<_>, _> = items.iter().map(attribute_value_to_restricted).collect();
        return Ok(RestrictedExpression::new_set(exprs?));
    }
    if let Some(map) = value.as_record() {
        let mut record = HashMap::new();
        for (k, v) in map {
            record.insert(k.clone(), attribute_value_to_restricted(v)?);
        }
        return RestrictedExpression::new_record(record)
            .map_err(|e| TranslateError::InvalidAttribute(e.to_string()));
    }
    if let Some(reference) = value.as_entity_ref() {
        let uid = EntityUid::from_str(reference).map_err(|e| {
            TranslateError::InvalidAttribute(format!("bad entity reference {reference}: {e}"))
        })?;
        return Ok(RestrictedExpression::new_entity_uid(uid));
    }
    Err(TranslateError::InvalidAttribute(
        "unrecognized attribute variant".to_string(),
    ))
}

/// Builds a Cedar `Entity` from a stored entity row; parents are resolved
/// to `EntityUid`s directly from their `(type, id)` pairs, matching the
/// contract that parents may reference rows that do not locally exist.
pub fn entity_record_to_cedar(record: &EntityRecord) -> Result<Entity, TranslateError> {
    let uid = entity_uid(&record.entity_type, &record.entity_id)?;

    let mut attrs = HashMap::new();
    for (name, value) in &record.attributes {
        let runtime = stored_to_attribute_value(value);
        attrs.insert(name.clone(), attribute_value_to_restricted(&runtime)?);
    }

    let mut parent_uids = HashSet::with_capacity(record.parents.len());
    for parent in &record.parents {
        parent_uids.insert(parent_euid(parent)?);
    }

    Entity::new(uid.clone(), attrs, parent_uids)
        .map_err(|e| TranslateError::InvalidEntity(format!("{uid}: {e}")))
}

/// Converts a request-context JSON value into a Cedar `Context`, following
/// the fixed conversion rules: strings stay strings, bools stay bools,
/// integers become `Long`, floats that round-trip through truncation become
/// `Long` too (otherwise they are stringified), nested objects become
/// records, arrays become sets, and anything else is stringified.
pub fn json_context_to_cedar(value: &serde_json::Value) -> Result<Context, TranslateError> {
    let record = json_to_restricted_record(value)?;
    let expr = RestrictedExpression::new_record(record).map_err(|e| {
        TranslateError::InvalidContext(format!("context is not a valid record: {e}"))
    })?;
    Context::from_restricted_expression(expr).map_err(|e| TranslateError::InvalidContext(e.to_string()))
}

fn json_to_restricted_record(
    value: &serde_json::Value,
) -> Result<HashMap<String, RestrictedExpression>, TranslateError> {
    match value {
        serde_json::Value::Object(map) => {
            let mut out = HashMap::new();
            for (k, v) in map {
                out.insert(k.clone(), json_value_to_restricted(v)?);
            }
            Ok(out)
        }
        serde_json::Value::Null => Ok(HashMap::new()),
        other => Err(TranslateError::InvalidContext(format!(
            "context must be a JSON object, got {other}"
        ))),
    }
}

fn json_value_to_restricted(
    value: &serde_json::Value,
) -> Result<RestrictedExpression, TranslateError> {
    match value {
        serde_json::Value::String(s) => Ok(RestrictedExpression::new_string(s.clone())),
        serde_json::Value::Bool(b) => Ok(RestrictedExpression::new_bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(RestrictedExpression::new_long(i))
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f == f.trunc() {
                    Ok(RestrictedExpression::new_long(f as i64))
                } else {
                    Ok(RestrictedExpression::new_string(n.to_string()))
                }
            } else {
                Ok(RestrictedExpression::new_string(n.to_string()))
            }
        }
        serde_json::Value::Array(items) => {
            let exprs: Result<Vec<_>, _> = items.iter().map(json_value_to_restricted).collect();
            Ok(RestrictedExpression::new_set(exprs?))
        }
        serde_json::Value::Object(_) => {
            let record = json_to_restricted_record(value)?;
            RestrictedExpression::new_record(record)
                .map_err(|e| TranslateError::InvalidContext(e.to_string()))
        }
        // Any other shape (here, only Null) is stringified for lossless
        // auditing rather than dropped.
        serde_json::Value::Null => Ok(RestrictedExpression::new_string("null".to_string())),
    }
}
