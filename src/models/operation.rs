//! Canonical, schema-validated operations.
//!
//! An [`Operation`] is the pair `(OperationId, Payload)` and serializes as the two element
//! array `[id, {..}]` nodes expect. Payload fields keep the order of the registry schema,
//! with the mandatory `fee` always first.

use std::fmt;

use chrono::DateTime;
use serde::{
    ser::{SerializeMap, SerializeTuple},
    Deserialize, Serialize, Serializer,
};

use super::{AssetAmount, ObjectId};
use crate::constants::TIME_POINT_SEC_FORMAT;

/// Numeric identifier of an operation type, e.g. `0` for `transfer`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OperationId(pub u16);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated payload value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Uint(u64),
    Bool(bool),
    String(String),
    ObjectId(ObjectId),
    Asset(AssetAmount),
    /// Seconds since the unix epoch.
    TimePointSec(u32),
    Object(Vec<(&'static str, FieldValue)>),
    Array(Vec<FieldValue>),
    Operation(Box<Operation>),
}

impl FieldValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            FieldValue::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetAmount> {
        match self {
            FieldValue::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&Operation> {
        match self {
            FieldValue::Operation(op) => Some(op),
            _ => None,
        }
    }

    /// Looks up a field of an object value.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Object(fields) => lookup(fields, name),
            _ => None,
        }
    }

    fn walk<F: FnMut(&Operation)>(&self, f: &mut F) {
        match self {
            FieldValue::Object(fields) => fields.iter().for_each(|(_, value)| value.walk(f)),
            FieldValue::Array(items) => items.iter().for_each(|item| item.walk(f)),
            FieldValue::Operation(op) => op.visit(f),
            _ => {}
        }
    }

    fn walk_mut<F: FnMut(&mut Operation)>(&mut self, f: &mut F) {
        match self {
            FieldValue::Object(fields) => fields
                .iter_mut()
                .for_each(|(_, value)| value.walk_mut(f)),
            FieldValue::Array(items) => items.iter_mut().for_each(|item| item.walk_mut(f)),
            FieldValue::Operation(op) => op.visit_mut(f),
            _ => {}
        }
    }
}

fn lookup<'a>(fields: &'a [(&'static str, FieldValue)], name: &str) -> Option<&'a FieldValue> {
    fields
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, value)| value)
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Uint(value) => serializer.serialize_u64(*value),
            FieldValue::Bool(value) => serializer.serialize_bool(*value),
            FieldValue::String(value) => serializer.serialize_str(value),
            FieldValue::ObjectId(id) => id.serialize(serializer),
            FieldValue::Asset(asset) => asset.serialize(serializer),
            FieldValue::TimePointSec(seconds) => {
                let time = DateTime::from_timestamp(i64::from(*seconds), 0).ok_or_else(|| {
                    serde::ser::Error::custom(format!("time_point_sec out of range: {seconds}"))
                })?;
                serializer.collect_str(&time.format(TIME_POINT_SEC_FORMAT))
            }
            FieldValue::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            FieldValue::Array(items) => items.serialize(serializer),
            FieldValue::Operation(op) => op.serialize(serializer),
        }
    }
}

static STANDARD_ASSET_TAG: FieldValue = FieldValue::Bool(false);
static PREDICTION_MARKET_TAG: FieldValue = FieldValue::Bool(true);

/// Arm of the polymorphic `asset_create` payload, selected by `is_prediction_market`.
///
/// The arm owns its tag and its fields, so a standard asset cannot carry
/// `bitasset_opts` and a prediction market cannot lack them.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetCreateVariant {
    StandardAsset,
    PredictionMarketAsset { bitasset_opts: FieldValue },
}

impl AssetCreateVariant {
    pub const TAG: &'static str = "is_prediction_market";
    pub const BITASSET_OPTS: &'static str = "bitasset_opts";

    /// Builds the arm named `name` from exactly the fields it owns.
    pub(crate) fn from_arm(name: &str, fields: Vec<(&'static str, FieldValue)>) -> Option<Self> {
        match name {
            "StandardAsset" if fields.is_empty() => Some(AssetCreateVariant::StandardAsset),
            "PredictionMarketAsset" => {
                let [(field, bitasset_opts)]: [(&'static str, FieldValue); 1] =
                    fields.try_into().ok()?;
                (field == Self::BITASSET_OPTS)
                    .then_some(AssetCreateVariant::PredictionMarketAsset { bitasset_opts })
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssetCreateVariant::StandardAsset => "StandardAsset",
            AssetCreateVariant::PredictionMarketAsset { .. } => "PredictionMarketAsset",
        }
    }

    pub fn is_prediction_market(&self) -> bool {
        matches!(self, AssetCreateVariant::PredictionMarketAsset { .. })
    }

    pub fn bitasset_opts(&self) -> Option<&FieldValue> {
        match self {
            AssetCreateVariant::StandardAsset => None,
            AssetCreateVariant::PredictionMarketAsset { bitasset_opts } => Some(bitasset_opts),
        }
    }

    /// Fields of the arm in wire order, the tag last.
    fn entries(&self) -> Vec<(&'static str, &FieldValue)> {
        match self {
            AssetCreateVariant::StandardAsset => vec![(Self::TAG, &STANDARD_ASSET_TAG)],
            AssetCreateVariant::PredictionMarketAsset { bitasset_opts } => vec![
                (Self::BITASSET_OPTS, bitasset_opts),
                (Self::TAG, &PREDICTION_MARKET_TAG),
            ],
        }
    }
}

/// Schema-ordered payload of an operation.
///
/// Fields owned by a variant arm are kept in the arm and emitted ahead of the trailing
/// `extensions`, where the schema places them.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    fee: AssetAmount,
    fields: Vec<(&'static str, FieldValue)>,
    variant: Option<AssetCreateVariant>,
}

impl Payload {
    pub(crate) fn new(
        fee: AssetAmount,
        fields: Vec<(&'static str, FieldValue)>,
        variant: Option<AssetCreateVariant>,
    ) -> Self {
        Self {
            fee,
            fields,
            variant,
        }
    }

    pub fn fee(&self) -> &AssetAmount {
        &self.fee
    }

    pub(crate) fn set_fee(&mut self, fee: AssetAmount) {
        self.fee = fee;
    }

    /// The arm a polymorphic payload was encoded as.
    pub fn variant(&self) -> Option<&AssetCreateVariant> {
        self.variant.as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        lookup(&self.fields, name).or_else(|| {
            self.variant.as_ref().and_then(|variant| {
                variant
                    .entries()
                    .into_iter()
                    .find(|(field, _)| *field == name)
                    .map(|(_, value)| value)
            })
        })
    }

    /// All fields after `fee`, in wire order, variant fields included.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        let split = self
            .fields
            .iter()
            .position(|(name, _)| *name == "extensions")
            .unwrap_or(self.fields.len());
        let (head, tail) = self.fields.split_at(split);
        head.iter()
            .map(|(name, value)| (*name, value))
            .chain(self.variant.iter().flat_map(AssetCreateVariant::entries))
            .chain(tail.iter().map(|(name, value)| (*name, value)))
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("fee", &self.fee)?;
        for (name, value) in self.entries() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A canonical operation: its registry id and name plus the validated payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub(crate) id: OperationId,
    pub(crate) name: &'static str,
    pub(crate) payload: Payload,
}

impl Operation {
    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn fee(&self) -> &AssetAmount {
        self.payload.fee()
    }

    /// Calls `f` on this operation and then on every operation embedded in it, depth first.
    pub fn visit<F: FnMut(&Operation)>(&self, f: &mut F) {
        f(self);
        self.payload
            .fields
            .iter()
            .for_each(|(_, value)| value.walk(f));
    }

    /// Mutable counterpart of [`Operation::visit`], used to write resolved fees.
    pub fn visit_mut<F: FnMut(&mut Operation)>(&mut self, f: &mut F) {
        f(self);
        self.payload
            .fields
            .iter_mut()
            .for_each(|(_, value)| value.walk_mut(f));
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.id)?;
        tuple.serialize_element(&self.payload)?;
        tuple.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transfer(fee_asset: u64) -> Operation {
        Operation {
            id: OperationId(0),
            name: "transfer",
            payload: Payload::new(
                AssetAmount::zero(ObjectId::asset(fee_asset)),
                vec![
                    ("from", FieldValue::ObjectId(ObjectId::new(1, 2, 1))),
                    ("to", FieldValue::ObjectId(ObjectId::new(1, 2, 2))),
                    ("extensions", FieldValue::Array(vec![])),
                ],
                None,
            ),
        }
    }

    fn proposal(inner: Vec<Operation>) -> Operation {
        let proposed_ops = inner
            .into_iter()
            .map(|op| FieldValue::Object(vec![("op", FieldValue::Operation(Box::new(op)))]))
            .collect();
        Operation {
            id: OperationId(22),
            name: "proposal_create",
            payload: Payload::new(
                AssetAmount::zero(ObjectId::core_asset()),
                vec![("proposed_ops", FieldValue::Array(proposed_ops))],
                None,
            ),
        }
    }

    #[test]
    fn test_operation_serializes_as_pair_with_fee_first() {
        let value = serde_json::to_value(transfer(0)).unwrap();
        assert_eq!(
            value,
            json!([0, {
                "fee": {"amount": 0, "asset_id": "1.3.0"},
                "from": "1.2.1",
                "to": "1.2.2",
                "extensions": []
            }])
        );
        let text = serde_json::to_string(&transfer(0)).unwrap();
        assert!(text.starts_with(r#"[0,{"fee":"#));
    }

    #[test]
    fn test_time_point_sec_serialization() {
        let value = serde_json::to_value(FieldValue::TimePointSec(1_735_689_600)).unwrap();
        assert_eq!(value, json!("2025-01-01T00:00:00"));
    }

    #[test]
    fn test_visit_reaches_nested_operations() {
        let op = proposal(vec![transfer(1), transfer(2)]);
        let mut seen = Vec::new();
        op.visit(&mut |op: &Operation| seen.push((op.name, op.fee().asset_id)));
        assert_eq!(
            seen,
            vec![
                ("proposal_create", ObjectId::asset(0)),
                ("transfer", ObjectId::asset(1)),
                ("transfer", ObjectId::asset(2)),
            ]
        );
    }

    #[test]
    fn test_visit_mut_updates_nested_fees() {
        let mut op = proposal(vec![transfer(0)]);
        op.visit_mut(&mut |op: &mut Operation| op.payload.set_fee(AssetAmount::core(5)));

        let nested = op.payload.get("proposed_ops").unwrap().as_array().unwrap()[0]
            .field("op")
            .unwrap()
            .as_operation()
            .unwrap();
        assert_eq!(nested.fee().amount, 5);
        assert_eq!(op.fee().amount, 5);
    }

    #[test]
    fn test_variant_fields_precede_extensions() {
        let opts = FieldValue::Object(vec![("minimum_feeds", FieldValue::Uint(7))]);
        let payload = Payload::new(
            AssetAmount::zero(ObjectId::core_asset()),
            vec![
                ("symbol", FieldValue::String("PREDICT".to_string())),
                ("extensions", FieldValue::Array(vec![])),
            ],
            AssetCreateVariant::from_arm("PredictionMarketAsset", vec![("bitasset_opts", opts)]),
        );

        let names: Vec<&str> = payload.entries().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            ["symbol", "bitasset_opts", "is_prediction_market", "extensions"]
        );
        assert_eq!(
            payload.get("is_prediction_market").and_then(FieldValue::as_bool),
            Some(true)
        );
        assert!(payload.get("bitasset_opts").is_some());
    }

    #[test]
    fn test_variant_arm_owns_its_fields() {
        let opts = FieldValue::Object(vec![]);
        assert_eq!(
            AssetCreateVariant::from_arm("StandardAsset", vec![]),
            Some(AssetCreateVariant::StandardAsset)
        );
        assert!(AssetCreateVariant::from_arm(
            "StandardAsset",
            vec![("bitasset_opts", opts.clone())]
        )
        .is_none());
        assert!(AssetCreateVariant::from_arm("PredictionMarketAsset", vec![]).is_none());
        assert!(AssetCreateVariant::from_arm("PredictionMarketAsset", vec![("flags", opts)])
            .is_none());
    }
}
