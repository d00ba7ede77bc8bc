//! Defaults for transaction assembly.

/// Default number of seconds a transaction stays valid after the head block time.
pub const DEFAULT_TX_EXPIRATION_SECONDS: u32 = 120;

/// Default lifetime of a proposal whose payload omits `expiration_time` (one day).
pub const DEFAULT_PROPOSAL_LIFETIME_SECONDS: i64 = 86_400;

/// Length of a block id in bytes (ripemd160).
pub const BLOCK_ID_LENGTH: usize = 20;
