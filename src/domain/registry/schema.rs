//! Field schemas of registered operations.

use crate::{constants::MAX_SHARE_AMOUNT, models::OperationId};

/// Value type of a payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Unsigned integer, inclusive upper bound. Accepts numbers and decimal strings.
    Uint { max: u64 },
    Bool,
    String,
    /// Object id of the given space and type; also accepts a bare instance number.
    ObjectId { space: u8, type_id: u8 },
    /// `{amount, asset_id}`
    Asset,
    /// `{base: asset, quote: asset}`
    Price,
    /// Prefixed base58 public key with ripemd160 checksum.
    PublicKey,
    TimePointSec,
    HexBytes,
    /// Asset symbol.
    Symbol,
    Object(&'static [FieldDef]),
    Array(&'static FieldType),
    /// Array canonicalized to sorted, unique elements.
    Set(&'static FieldType),
    /// Future extensions; only the empty set is accepted.
    Extensions,
    /// An embedded `[id, payload]` operation.
    Operation,
}

impl FieldType {
    pub const UINT8: FieldType = FieldType::Uint {
        max: u8::MAX as u64,
    };
    pub const UINT16: FieldType = FieldType::Uint {
        max: u16::MAX as u64,
    };
    pub const UINT32: FieldType = FieldType::Uint {
        max: u32::MAX as u64,
    };
    pub const UINT64: FieldType = FieldType::Uint { max: u64::MAX };
    pub const SHARE: FieldType = FieldType::Uint {
        max: MAX_SHARE_AMOUNT,
    };
    pub const ACCOUNT: FieldType = FieldType::ObjectId {
        space: 1,
        type_id: 2,
    };
    pub const ASSET_ID: FieldType = FieldType::ObjectId {
        space: 1,
        type_id: 3,
    };

    pub fn describe(&self) -> String {
        match self {
            FieldType::Uint { max } => format!("unsigned integer <= {max}"),
            FieldType::Bool => "bool".to_string(),
            FieldType::String => "string".to_string(),
            FieldType::ObjectId { space, type_id } => format!("object id {space}.{type_id}.N"),
            FieldType::Asset => "asset {amount, asset_id}".to_string(),
            FieldType::Price => "price {base, quote}".to_string(),
            FieldType::PublicKey => "public key".to_string(),
            FieldType::TimePointSec => "time point (YYYY-MM-DDTHH:MM:SS or seconds)".to_string(),
            FieldType::HexBytes => "hex string".to_string(),
            FieldType::Symbol => "asset symbol".to_string(),
            FieldType::Object(_) => "object".to_string(),
            FieldType::Array(inner) => format!("array of {}", inner.describe()),
            FieldType::Set(inner) => format!("set of {}", inner.describe()),
            FieldType::Extensions => "empty extensions".to_string(),
            FieldType::Operation => "operation [id, payload]".to_string(),
        }
    }
}

/// Value filled in for a field absent from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),
    Uint(u64),
    EmptyArray,
    /// Current time plus the given number of seconds.
    SecondsFromNow(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    /// Left out of the encoded payload when absent.
    Optional,
    Default(DefaultValue),
    /// Required by the variant arms that list the field, rejected by the others.
    Variant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    pub presence: Presence,
}

impl FieldDef {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Required,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Optional,
        }
    }

    pub const fn defaulted(name: &'static str, ty: FieldType, default: DefaultValue) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Default(default),
        }
    }

    pub const fn variant(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Variant,
        }
    }

    pub const fn extensions() -> Self {
        Self::defaulted("extensions", FieldType::Extensions, DefaultValue::EmptyArray)
    }
}

/// One constructor of a polymorphic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantArm {
    pub name: &'static str,
    pub tag_value: bool,
    /// Variant fields this arm requires.
    pub fields: &'static [&'static str],
}

/// A payload whose field set is selected by a bool tag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSchema {
    pub tag: &'static str,
    pub arms: [VariantArm; 2],
}

impl VariantSchema {
    pub fn arm(&self, tag_value: bool) -> &VariantArm {
        if self.arms[0].tag_value == tag_value {
            &self.arms[0]
        } else {
            &self.arms[1]
        }
    }
}

/// How the base fee of an operation is chosen from its fee parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeRule {
    /// The `fee` parameter.
    Flat,
    /// `fee` plus `price_per_kbyte` for the packed size of the `memo` field.
    FlatWithMemo,
    /// `membership_lifetime_fee` when the bool field `flag` is set, else `membership_annual_fee`.
    Membership { flag: &'static str },
    /// `fee` plus `price_per_kbyte` for the packed size of the whole operation.
    FlatWithData,
    /// `symbol3`, `symbol4` or `long_symbol` by the length of the `symbol` field, plus
    /// `price_per_kbyte` for the packed size of the whole operation.
    SymbolLengthWithData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSchema {
    pub id: OperationId,
    pub name: &'static str,
    /// Payload fields in wire order, after the implicit leading `fee`.
    pub fields: &'static [FieldDef],
    pub variant: Option<VariantSchema>,
    pub fee_rule: FeeRule,
}

impl OperationSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}
