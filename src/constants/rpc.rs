//! Defaults for the chain node JSON-RPC client.

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8090";
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_ADDRESS_PREFIX: &str = "EON";

/// API the node query methods live on.
pub const DATABASE_API: &str = "database";
