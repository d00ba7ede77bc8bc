//! Chain query providers.
//!
//! [`ChainQueryTrait`] is the read-only view of chain state the fee resolver and the
//! transaction builder depend on. [`GrapheneRpcProvider`] implements it over a node's
//! HTTP JSON-RPC endpoint and [`InMemoryChainQuery`] over a fixed snapshot.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::models::{
    AssetDynamicData, AssetObject, DynamicGlobalProperties, FeeSchedule, ObjectId,
};

mod graphene;
pub use graphene::*;

mod in_memory;
pub use in_memory::*;

#[derive(Error, Debug, Serialize)]
pub enum ProviderError {
    #[error("Network configuration error: {0}")]
    NetworkConfiguration(String),
    #[error("Request timeout")]
    Timeout,
    #[error("Rate limited (HTTP 429)")]
    RateLimited,
    #[error("Bad gateway (HTTP 502)")]
    BadGateway,
    #[error("Request error (HTTP {status_code}): {error}")]
    RequestError { error: String, status_code: u16 },
    #[error("JSON-RPC error (code {code}): {message}")]
    RpcErrorCode { code: i64, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Other provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Determines if this error is transient (can retry) or permanent (should fail).
    pub fn is_transient(&self) -> bool {
        is_retriable_error(self)
    }
}

/// Categorizes a reqwest error into an appropriate `ProviderError` variant.
///
/// - Timeout errors become `ProviderError::Timeout`
/// - HTTP 429 responses become `ProviderError::RateLimited`
/// - HTTP 502 responses become `ProviderError::BadGateway`
/// - Other HTTP statuses become `ProviderError::RequestError`
/// - All other errors become `ProviderError::Other` with the error message
fn categorize_reqwest_error(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::Timeout;
    }

    if let Some(status) = err.status() {
        match status.as_u16() {
            429 => return ProviderError::RateLimited,
            502 => return ProviderError::BadGateway,
            _ => {
                return ProviderError::RequestError {
                    error: err.to_string(),
                    status_code: status.as_u16(),
                }
            }
        }
    }

    ProviderError::Other(err.to_string())
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        categorize_reqwest_error(&err)
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::InvalidResponse(err.to_string())
    }
}

// Errors that are retriable
pub fn is_retriable_error(error: &ProviderError) -> bool {
    match error {
        ProviderError::Timeout | ProviderError::RateLimited | ProviderError::BadGateway => true,

        ProviderError::RequestError { status_code, .. } => match *status_code {
            // Non-retriable 5xx: persistent server-side issues
            501 | 505 => false,
            // Retriable 5xx: temporary server-side issues
            500 | 502..=504 | 506..=599 => true,
            // Retriable 4xx: timeout or rate-limit related
            408 | 425 | 429 => true,
            _ => false,
        },

        // Graphene nodes report fc exceptions (asserts, unknown objects) with positive
        // codes; only the JSON-RPC internal error may go away on retry.
        ProviderError::RpcErrorCode { code, .. } => *code == -32603,

        ProviderError::NetworkConfiguration(_) | ProviderError::InvalidResponse(_) => false,

        ProviderError::Other(msg) => {
            let msg_lower = msg.to_lowercase();
            msg_lower.contains("timeout")
                || msg_lower.contains("connection")
                || msg_lower.contains("reset")
        }
    }
}

/// Read-only chain queries needed to price and finalize transactions.
///
/// Batched methods return one entry per requested id, in request order; `None` marks
/// an id the chain does not know.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait ChainQueryTrait: Send + Sync {
    async fn get_fee_schedule(&self) -> Result<FeeSchedule, ProviderError>;
    async fn get_assets(
        &self,
        asset_ids: &[ObjectId],
    ) -> Result<Vec<Option<AssetObject>>, ProviderError>;
    async fn get_asset_dynamic_data(
        &self,
        data_ids: &[ObjectId],
    ) -> Result<Vec<Option<AssetDynamicData>>, ProviderError>;
    async fn get_dynamic_global_properties(
        &self,
    ) -> Result<DynamicGlobalProperties, ProviderError>;
}
