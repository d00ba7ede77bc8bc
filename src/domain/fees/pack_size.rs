//! Binary packed size of encoded operations.
//!
//! Nodes charge some operations a data fee on the size of the whole operation as it goes
//! on the wire. Sizes follow the graphene raw encoding: integers at their fixed width,
//! lengths and object id instances as LEB128 varints, optional values behind a one byte
//! presence flag.

use crate::{
    constants::PUBLIC_KEY_LENGTH,
    domain::registry::{FieldDef, FieldType, OperationRegistry, Presence},
    models::{AssetAmount, FieldValue, Operation},
};

/// Bytes an unsigned value takes as an LEB128 varint.
pub fn varint_size(mut value: u64) -> usize {
    let mut size = 1;
    while value >= 0x80 {
        value >>= 7;
        size += 1;
    }
    size
}

fn uint_size(max: u64) -> usize {
    if max <= u64::from(u8::MAX) {
        1
    } else if max <= u64::from(u16::MAX) {
        2
    } else if max <= u64::from(u32::MAX) {
        4
    } else {
        8
    }
}

fn bytes_size(len: usize) -> usize {
    varint_size(len as u64) + len
}

fn asset_size(asset: &AssetAmount) -> usize {
    8 + varint_size(asset.asset_id.instance)
}

/// Packed size of `operation` on its own, without the variant tag it carries when
/// embedded in another operation.
///
/// Returns `None` for operations that are not registered.
pub fn operation_pack_size(operation: &Operation) -> Option<usize> {
    let schema = OperationRegistry::global()
        .lookup_id(operation.id())
        .ok()?;
    let payload = operation.payload();
    let fields = fields_size(schema.fields, |name| payload.get(name))?;
    Some(asset_size(payload.fee()) + fields)
}

fn fields_size<'a>(
    defs: &[FieldDef],
    get: impl Fn(&str) -> Option<&'a FieldValue>,
) -> Option<usize> {
    defs.iter().try_fold(0, |size, def| {
        let field = match (def.presence, get(def.name)) {
            (Presence::Optional | Presence::Variant, None) => 1,
            (Presence::Optional | Presence::Variant, Some(value)) => {
                1 + value_size(&def.ty, value)?
            }
            (_, Some(value)) => value_size(&def.ty, value)?,
            (_, None) => return None,
        };
        Some(size + field)
    })
}

fn value_size(ty: &FieldType, value: &FieldValue) -> Option<usize> {
    Some(match (ty, value) {
        (FieldType::Uint { max }, FieldValue::Uint(_)) => uint_size(*max),
        (FieldType::Bool, FieldValue::Bool(_)) => 1,
        (FieldType::String | FieldType::Symbol, FieldValue::String(text)) => {
            bytes_size(text.len())
        }
        (FieldType::HexBytes, FieldValue::String(hex)) => bytes_size(hex.len() / 2),
        (FieldType::PublicKey, FieldValue::String(_)) => PUBLIC_KEY_LENGTH,
        (FieldType::ObjectId { .. }, FieldValue::ObjectId(id)) => varint_size(id.instance),
        (FieldType::Asset, FieldValue::Asset(asset)) => asset_size(asset),
        (FieldType::TimePointSec, FieldValue::TimePointSec(_)) => 4,
        (FieldType::Price, FieldValue::Object(fields)) => fields
            .iter()
            .map(|(_, value)| value.as_asset().map(asset_size))
            .sum::<Option<usize>>()?,
        (FieldType::Object(defs), FieldValue::Object(_)) => {
            fields_size(defs, |name| value.field(name))?
        }
        (FieldType::Array(inner) | FieldType::Set(inner), FieldValue::Array(items)) => items
            .iter()
            .map(|item| value_size(inner, item))
            .sum::<Option<usize>>()?
            + varint_size(items.len() as u64),
        (FieldType::Extensions, FieldValue::Array(items)) if items.is_empty() => 1,
        (FieldType::Operation, FieldValue::Operation(op)) => {
            varint_size(u64::from(op.id().0)) + operation_pack_size(op)?
        }
        _ => return None,
    })
}
