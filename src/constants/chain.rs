//! Protocol constants of graphene-style chains.

/// Fixed-point representation of 100% used by fee scales and market fee percents.
pub const GRAPHENE_100_PERCENT: u64 = 10_000;

/// Largest valid `share_type` amount; amounts are signed 64-bit on chain.
pub const MAX_SHARE_AMOUNT: u64 = i64::MAX as u64;

/// Maximum precision an asset may declare.
pub const GRAPHENE_MAX_ASSET_PRECISION: u64 = 12;

pub const GRAPHENE_MIN_ASSET_SYMBOL_LENGTH: usize = 3;
pub const GRAPHENE_MAX_ASSET_SYMBOL_LENGTH: usize = 16;

/// Length of a compressed secp256k1 public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 33;
/// Length of the ripemd160 checksum appended to encoded public keys.
pub const PUBLIC_KEY_CHECKSUM_LENGTH: usize = 4;

/// Format of `time_point_sec` values in JSON.
pub const TIME_POINT_SEC_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
