use std::env;

use crate::constants::{
    DEFAULT_ADDRESS_PREFIX, DEFAULT_RPC_TIMEOUT_MS, DEFAULT_RPC_URL,
    DEFAULT_TX_EXPIRATION_SECONDS,
};

/// Connection and transaction settings for a graphene node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub rpc_timeout_ms: u64,
    /// Prefix of public keys on this chain, e.g. `EON` or `BTS`.
    pub address_prefix: String,
    /// Seconds added to the head block time to form a transaction's expiration.
    pub tx_expiration_seconds: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
            address_prefix: DEFAULT_ADDRESS_PREFIX.to_string(),
            tx_expiration_seconds: DEFAULT_TX_EXPIRATION_SECONDS,
        }
    }
}

impl ChainConfig {
    pub fn from_env() -> Self {
        Self {
            rpc_url: env::var("GRAPHENE_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            rpc_timeout_ms: env::var("RPC_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_RPC_TIMEOUT_MS.to_string())
                .parse()
                .unwrap_or(DEFAULT_RPC_TIMEOUT_MS),
            address_prefix: env::var("ADDRESS_PREFIX")
                .unwrap_or_else(|_| DEFAULT_ADDRESS_PREFIX.to_string()),
            tx_expiration_seconds: env::var("TX_EXPIRATION_SECONDS")
                .unwrap_or_else(|_| DEFAULT_TX_EXPIRATION_SECONDS.to_string())
                .parse()
                .unwrap_or(DEFAULT_TX_EXPIRATION_SECONDS),
        }
    }
}
