//! Operation encoder.
//!
//! Validates JSON payloads against the registry schemas and produces canonical
//! [`Operation`]s. Encoding is synchronous and never touches the network. Embedded
//! operations (`[id, payload]` pairs inside container payloads) are re-validated by the
//! same code, at any depth.

use serde_json::{Map, Value};

use crate::{
    constants::MAX_SHARE_AMOUNT,
    domain::registry::{
        DefaultValue, FieldDef, FieldType, OperationRegistry, OperationSchema, Presence,
        VariantArm,
    },
    models::{
        AssetAmount, AssetCreateVariant, BuilderError, FieldValue, ObjectId, Operation,
        OperationId, Payload,
    },
    utils::calculate_scheduled_timestamp,
};

mod fields;
use fields::{
    compare_set_elements, expected, parse_bool, parse_hex_bytes, parse_object_id,
    parse_string, parse_time_point, parse_uint, validate_symbol,
};

mod public_key;
pub use public_key::*;

const ASSET_FIELDS: &[&str] = &["amount", "asset_id"];
const PRICE_FIELDS: &[FieldDef] = &[
    FieldDef::required("base", FieldType::Asset),
    FieldDef::required("quote", FieldType::Asset),
];

fn child(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{path}[{i}]")
}

fn present<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

#[derive(Debug, Clone)]
pub struct OperationEncoder {
    address_prefix: String,
}

impl OperationEncoder {
    /// Creates an encoder accepting public keys with the given address prefix.
    pub fn new(address_prefix: impl Into<String>) -> Self {
        Self {
            address_prefix: address_prefix.into(),
        }
    }

    pub fn address_prefix(&self) -> &str {
        &self.address_prefix
    }

    /// Validates `payload` against the schema of operation `name` and encodes it.
    pub fn encode(&self, name: &str, payload: &Value) -> Result<Operation, BuilderError> {
        let (_, schema) = OperationRegistry::global().lookup(name)?;
        Encoding {
            address_prefix: &self.address_prefix,
            operation: schema.name,
        }
        .operation(schema, payload, "")
    }

    /// Re-validates an already-encoded `[id, payload]` pair, such as a serialized
    /// [`Operation`], against the schema of `id`.
    pub fn encode_pair(&self, pair: &Value) -> Result<Operation, BuilderError> {
        let (schema, payload) = Encoding {
            address_prefix: &self.address_prefix,
            operation: "operation",
        }
        .pair(pair, "")?;
        Encoding {
            address_prefix: &self.address_prefix,
            operation: schema.name,
        }
        .operation(schema, payload, "")
    }
}

/// State of one top-level encode: every violation is reported against `operation`.
struct Encoding<'a> {
    address_prefix: &'a str,
    operation: &'static str,
}

impl Encoding<'_> {
    fn violation(&self, path: &str, reason: impl Into<String>) -> BuilderError {
        let field = if path.is_empty() { "payload" } else { path };
        BuilderError::schema_violation(self.operation, field, reason)
    }

    fn reject_unknown<'v>(
        &self,
        object: &'v Map<String, Value>,
        path: &str,
        known: impl Fn(&str) -> bool,
    ) -> Result<&'v Map<String, Value>, BuilderError> {
        match object.keys().find(|key| !known(key.as_str())) {
            Some(key) => Err(self.violation(&child(path, key), "unknown field")),
            None => Ok(object),
        }
    }

    fn object<'v>(
        &self,
        value: &'v Value,
        path: &str,
    ) -> Result<&'v Map<String, Value>, BuilderError> {
        value
            .as_object()
            .ok_or_else(|| self.violation(path, expected("object", value)))
    }

    fn operation(
        &self,
        schema: &'static OperationSchema,
        payload: &Value,
        path: &str,
    ) -> Result<Operation, BuilderError> {
        let object = self.object(payload, path)?;
        self.reject_unknown(object, path, |key| key == "fee" || schema.field(key).is_some())?;

        let fee = match present(object, "fee") {
            Some(fee) => self.asset(fee, &child(path, "fee"))?,
            None => AssetAmount::zero(ObjectId::core_asset()),
        };

        let arm = match &schema.variant {
            Some(variant) => {
                let tag_path = child(path, variant.tag);
                let tag_value = match present(object, variant.tag) {
                    Some(value) => parse_bool(value).map_err(|e| self.violation(&tag_path, e))?,
                    None => match schema.field(variant.tag).map(|f| f.presence) {
                        Some(Presence::Default(DefaultValue::Bool(default))) => default,
                        _ => return Err(self.violation(&tag_path, "is required")),
                    },
                };
                let arm = variant.arm(tag_value);
                self.check_arm(schema, object, arm, variant.tag, tag_value, path)?;
                Some((variant.tag, arm))
            }
            None => None,
        };

        let mut fields = self.fields(schema.fields, object, path)?;
        let variant = match arm {
            Some((tag, arm)) => {
                let (owned, rest): (Vec<_>, Vec<_>) = fields
                    .into_iter()
                    .filter(|(name, _)| *name != tag)
                    .partition(|(name, _)| arm.fields.contains(name));
                fields = rest;
                let variant = AssetCreateVariant::from_arm(arm.name, owned).ok_or_else(|| {
                    self.violation(path, format!("{} is not a supported variant", arm.name))
                })?;
                Some(variant)
            }
            None => None,
        };
        Ok(Operation {
            id: schema.id,
            name: schema.name,
            payload: Payload::new(fee, fields, variant),
        })
    }

    /// Variant fields must be present exactly when the selected arm lists them.
    fn check_arm(
        &self,
        schema: &OperationSchema,
        object: &Map<String, Value>,
        arm: &VariantArm,
        tag: &str,
        tag_value: bool,
        path: &str,
    ) -> Result<(), BuilderError> {
        for field in schema
            .fields
            .iter()
            .filter(|f| f.presence == Presence::Variant)
        {
            let required = arm.fields.contains(&field.name);
            match (required, present(object, field.name).is_some()) {
                (true, false) => {
                    return Err(self.violation(
                        &child(path, field.name),
                        format!("is required when {tag} is {tag_value} ({})", arm.name),
                    ))
                }
                (false, true) => {
                    return Err(self.violation(
                        &child(path, field.name),
                        format!("is not allowed when {tag} is {tag_value} ({})", arm.name),
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn fields(
        &self,
        defs: &'static [FieldDef],
        object: &Map<String, Value>,
        path: &str,
    ) -> Result<Vec<(&'static str, FieldValue)>, BuilderError> {
        let mut encoded = Vec::with_capacity(defs.len());
        for def in defs {
            let field_path = child(path, def.name);
            let value = match (present(object, def.name), def.presence) {
                (Some(value), _) => self.value(&def.ty, value, &field_path)?,
                (None, Presence::Default(default)) => self.default_value(default, &field_path)?,
                (None, Presence::Required) => {
                    return Err(self.violation(&field_path, "is required"))
                }
                (None, Presence::Optional | Presence::Variant) => continue,
            };
            encoded.push((def.name, value));
        }
        Ok(encoded)
    }

    fn default_value(&self, default: DefaultValue, path: &str) -> Result<FieldValue, BuilderError> {
        Ok(match default {
            DefaultValue::Bool(value) => FieldValue::Bool(value),
            DefaultValue::Uint(value) => FieldValue::Uint(value),
            DefaultValue::EmptyArray => FieldValue::Array(Vec::new()),
            DefaultValue::SecondsFromNow(seconds) => calculate_scheduled_timestamp(seconds)
                .map(FieldValue::TimePointSec)
                .ok_or_else(|| self.violation(path, "default time point is out of range"))?,
        })
    }

    fn value(&self, ty: &FieldType, value: &Value, path: &str) -> Result<FieldValue, BuilderError> {
        let at = |reason: String| self.violation(path, reason);
        Ok(match ty {
            FieldType::Uint { max } => FieldValue::Uint(parse_uint(value, *max).map_err(at)?),
            FieldType::Bool => FieldValue::Bool(parse_bool(value).map_err(at)?),
            FieldType::String => FieldValue::String(parse_string(value).map_err(at)?.to_string()),
            FieldType::ObjectId { space, type_id } => {
                FieldValue::ObjectId(parse_object_id(value, *space, *type_id).map_err(at)?)
            }
            FieldType::Asset => FieldValue::Asset(self.asset(value, path)?),
            FieldType::Price => self.value(&FieldType::Object(PRICE_FIELDS), value, path)?,
            FieldType::PublicKey => {
                let key = parse_string(value).map_err(at)?;
                decode_public_key(key, self.address_prefix).map_err(|e| at(e.to_string()))?;
                FieldValue::String(key.to_string())
            }
            FieldType::TimePointSec => {
                FieldValue::TimePointSec(parse_time_point(value).map_err(at)?)
            }
            FieldType::HexBytes => FieldValue::String(parse_hex_bytes(value).map_err(at)?),
            FieldType::Symbol => {
                let symbol = parse_string(value).map_err(at)?;
                validate_symbol(symbol).map_err(at)?;
                FieldValue::String(symbol.to_string())
            }
            FieldType::Object(defs) => {
                let object = self.object(value, path)?;
                self.reject_unknown(object, path, |key| defs.iter().any(|d| d.name == key))?;
                FieldValue::Object(self.fields(defs, object, path)?)
            }
            FieldType::Array(inner) => FieldValue::Array(self.items(inner, value, path)?),
            FieldType::Set(inner) => {
                let mut items = self.items(inner, value, path)?;
                items.sort_by(compare_set_elements);
                items.dedup();
                FieldValue::Array(items)
            }
            FieldType::Extensions => match value {
                Value::Array(items) if items.is_empty() => FieldValue::Array(Vec::new()),
                Value::Object(map) if map.is_empty() => FieldValue::Array(Vec::new()),
                _ => return Err(at("extensions must be empty".to_string())),
            },
            FieldType::Operation => FieldValue::Operation(Box::new(self.embedded(value, path)?)),
        })
    }

    fn items(
        &self,
        inner: &FieldType,
        value: &Value,
        path: &str,
    ) -> Result<Vec<FieldValue>, BuilderError> {
        let items = value
            .as_array()
            .ok_or_else(|| self.violation(path, expected("array", value)))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.value(inner, item, &index(path, i)))
            .collect()
    }

    fn asset(&self, value: &Value, path: &str) -> Result<AssetAmount, BuilderError> {
        let object = self.object(value, path)?;
        self.reject_unknown(object, path, |key| ASSET_FIELDS.contains(&key))?;

        let amount_path = child(path, "amount");
        let amount = present(object, "amount")
            .ok_or_else(|| self.violation(&amount_path, "is required"))?;
        let amount =
            parse_uint(amount, MAX_SHARE_AMOUNT).map_err(|e| self.violation(&amount_path, e))?;

        let asset_path = child(path, "asset_id");
        let asset_id = present(object, "asset_id")
            .ok_or_else(|| self.violation(&asset_path, "is required"))?;
        let asset_id =
            parse_object_id(asset_id, 1, 3).map_err(|e| self.violation(&asset_path, e))?;

        Ok(AssetAmount::new(amount, asset_id))
    }

    fn pair<'v>(
        &self,
        value: &'v Value,
        path: &str,
    ) -> Result<(&'static OperationSchema, &'v Value), BuilderError> {
        let (id, payload) = match value.as_array().map(Vec::as_slice) {
            Some([id, payload]) => (id, payload),
            _ => return Err(self.violation(path, expected("[id, payload] pair", value))),
        };
        let id = parse_uint(id, u64::from(u16::MAX))
            .map_err(|e| self.violation(&index(path, 0), e))?;
        let schema = OperationRegistry::global().lookup_id(OperationId(id as u16))?;
        Ok((schema, payload))
    }

    /// An already-encoded `[id, payload]` pair, re-validated against the schema of `id`.
    fn embedded(&self, value: &Value, path: &str) -> Result<Operation, BuilderError> {
        let (schema, payload) = self.pair(value, path)?;
        self.operation(schema, payload, path)
    }
}
