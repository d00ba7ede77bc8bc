//! Core-asset fee of a single operation, from the fee schedule.

use super::pack_size::{operation_pack_size, varint_size};
use crate::{
    constants::{GRAPHENE_100_PERCENT, PUBLIC_KEY_LENGTH},
    domain::registry::{FeeRule, OperationRegistry},
    models::{FeeResolutionError, FeeSchedule, FieldValue, Operation},
};

/// Packed size of the memo nonce.
const MEMO_NONCE_SIZE: usize = 8;
/// Presence byte of the optional memo.
const OPTIONAL_FLAG_SIZE: usize = 1;

/// Packed size of an optional memo: presence flag, two keys, nonce and the
/// length-prefixed message.
pub fn memo_pack_size(memo: &FieldValue) -> usize {
    let message_len = memo
        .field("message")
        .and_then(FieldValue::as_str)
        .map(|hex| hex.len() / 2)
        .unwrap_or_default();
    OPTIONAL_FLAG_SIZE
        + 2 * PUBLIC_KEY_LENGTH
        + MEMO_NONCE_SIZE
        + varint_size(message_len as u64)
        + message_len
}

/// Fee for storing `bytes` bytes at `price_per_kbyte`, rounded down.
pub fn data_fee(bytes: usize, price_per_kbyte: u64) -> Option<u64> {
    let fee = (bytes as u128).checked_mul(u128::from(price_per_kbyte))? / 1024;
    u64::try_from(fee).ok()
}

/// Scales a base fee by the schedule scale, in units of [`GRAPHENE_100_PERCENT`].
pub fn scale_fee(base: u64, scale: u64) -> Option<u64> {
    let scaled =
        u128::from(base).checked_mul(u128::from(scale))? / u128::from(GRAPHENE_100_PERCENT);
    u64::try_from(scaled).ok()
}

/// Computes the fee of `operation` in the core asset.
///
/// The base fee is chosen by the operation's fee rule. Memo-bearing operations add a
/// data fee on the memo, the `WithData` rules on the packed size of the whole operation
/// (embedded operations included). Embedded operations are also priced on their own.
pub fn core_fee(operation: &Operation, schedule: &FeeSchedule) -> Result<u64, FeeResolutionError> {
    let missing = || FeeResolutionError::MissingFeeParameters {
        operation: operation.id,
        name: operation.name,
    };
    let rule = OperationRegistry::global()
        .lookup_id(operation.id)
        .map_err(|_| missing())?
        .fee_rule;
    let params = schedule.parameters_for(operation.id).ok_or_else(missing)?;
    let param = |name: &str| params.get(name).ok_or_else(missing);
    let overflow = || FeeResolutionError::Overflow {
        name: operation.name,
    };

    let with_data = |fee: u64| -> Result<u64, FeeResolutionError> {
        let price_per_kbyte = param("price_per_kbyte")?;
        let size = operation_pack_size(operation).ok_or_else(missing)?;
        let data = data_fee(size, price_per_kbyte).ok_or_else(overflow)?;
        fee.checked_add(data).ok_or_else(overflow)
    };

    let base = match rule {
        FeeRule::Flat => param("fee")?,
        FeeRule::FlatWithData => with_data(param("fee")?)?,
        FeeRule::FlatWithMemo => {
            let fee = param("fee")?;
            match operation.payload.get("memo") {
                Some(memo) => {
                    let data = data_fee(memo_pack_size(memo), param("price_per_kbyte")?)
                        .ok_or_else(overflow)?;
                    fee.checked_add(data).ok_or_else(overflow)?
                }
                None => fee,
            }
        }
        FeeRule::Membership { flag } => {
            let lifetime = operation
                .payload
                .get(flag)
                .and_then(FieldValue::as_bool)
                .unwrap_or(false);
            if lifetime {
                param("membership_lifetime_fee")?
            } else {
                param("membership_annual_fee")?
            }
        }
        FeeRule::SymbolLengthWithData => {
            let symbol_len = operation
                .payload
                .get("symbol")
                .and_then(FieldValue::as_str)
                .map(str::len)
                .unwrap_or_default();
            let fee = match symbol_len {
                3 => param("symbol3")?,
                4 => param("symbol4")?,
                _ => param("long_symbol")?,
            };
            with_data(fee)?
        }
    };

    scale_fee(base, schedule.scale).ok_or_else(overflow)
}
