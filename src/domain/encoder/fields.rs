//! Conversion of JSON scalars into canonical field values.
//!
//! Each function returns the reason of a failure; the caller attaches the field path.

use std::cmp::Ordering;

use serde_json::Value;

use crate::{
    constants::{GRAPHENE_MAX_ASSET_SYMBOL_LENGTH, GRAPHENE_MIN_ASSET_SYMBOL_LENGTH},
    models::{FieldValue, ObjectId},
    utils::parse_time_point_sec,
};

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(super) fn expected(what: &str, value: &Value) -> String {
    format!("expected {what}, found {}", type_name(value))
}

/// Unsigned integer given as a JSON number or a decimal string.
pub(super) fn parse_uint(value: &Value, max: u64) -> Result<u64, String> {
    let parsed = match value {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| format!("{number} is not an unsigned integer"))?,
        Value::String(text) => text
            .parse::<u64>()
            .map_err(|_| format!("'{text}' is not an unsigned integer"))?,
        other => return Err(expected("unsigned integer", other)),
    };
    if parsed > max {
        return Err(format!("{parsed} exceeds the maximum of {max}"));
    }
    Ok(parsed)
}

pub(super) fn parse_bool(value: &Value) -> Result<bool, String> {
    value.as_bool().ok_or_else(|| expected("bool", value))
}

pub(super) fn parse_string(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| expected("string", value))
}

/// Object id of a fixed kind, as `"space.type.N"` or the bare instance `N`.
pub(super) fn parse_object_id(value: &Value, space: u8, type_id: u8) -> Result<ObjectId, String> {
    match value {
        Value::String(text) => {
            ObjectId::parse_kind(text, space, type_id).map_err(|e| e.to_string())
        }
        Value::Number(number) => number
            .as_u64()
            .map(|instance| ObjectId::new(space, type_id, instance))
            .ok_or_else(|| format!("{number} is not a valid object instance")),
        other => Err(expected(&format!("object id {space}.{type_id}.N"), other)),
    }
}

/// `time_point_sec` as `YYYY-MM-DDTHH:MM:SS` or as seconds since the epoch.
pub(super) fn parse_time_point(value: &Value) -> Result<u32, String> {
    match value {
        Value::String(text) => parse_time_point_sec(text)
            .ok_or_else(|| format!("'{text}' is not a time point (YYYY-MM-DDTHH:MM:SS)")),
        Value::Number(number) => number
            .as_u64()
            .and_then(|seconds| u32::try_from(seconds).ok())
            .ok_or_else(|| format!("{number} is out of the time point range")),
        other => Err(expected("time point", other)),
    }
}

/// Hex string of any even length, returned lower-cased.
pub(super) fn parse_hex_bytes(value: &Value) -> Result<String, String> {
    let text = parse_string(value)?;
    hex::decode(text).map_err(|e| format!("invalid hex: {e}"))?;
    Ok(text.to_ascii_lowercase())
}

/// Checks the asset symbol rules: upper-case letters and digits with at most one dot,
/// starting with a letter and ending with a letter or digit.
pub(super) fn validate_symbol(symbol: &str) -> Result<(), String> {
    let len = symbol.len();
    if !(GRAPHENE_MIN_ASSET_SYMBOL_LENGTH..=GRAPHENE_MAX_ASSET_SYMBOL_LENGTH).contains(&len) {
        return Err(format!(
            "symbol must be {GRAPHENE_MIN_ASSET_SYMBOL_LENGTH} to {GRAPHENE_MAX_ASSET_SYMBOL_LENGTH} characters"
        ));
    }
    if let Some(c) = symbol
        .chars()
        .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '.'))
    {
        return Err(format!("symbol contains invalid character '{c}'"));
    }
    if !symbol.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Err("symbol must start with a letter".to_string());
    }
    if symbol.ends_with('.') {
        return Err("symbol must end with a letter or digit".to_string());
    }
    if symbol.matches('.').count() > 1 {
        return Err("symbol may contain at most one dot".to_string());
    }
    Ok(())
}

/// Ordering of set elements: object ids by (space, type, instance), other scalars naturally.
pub(super) fn compare_set_elements(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::ObjectId(a), FieldValue::ObjectId(b)) => a.cmp(b),
        (FieldValue::Uint(a), FieldValue::Uint(b)) => a.cmp(b),
        (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
