//! HTTP JSON-RPC provider for graphene nodes.
//!
//! Queries go through the node's `call` method against the `database` API:
//! `{"method": "call", "params": ["database", "<method>", [<args>]]}`.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as ReqwestClient, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ChainQueryTrait, ProviderError};
use crate::{
    config::ChainConfig,
    constants::DATABASE_API,
    models::{AssetDynamicData, AssetObject, DynamicGlobalProperties, FeeSchedule, ObjectId},
};

/// Generates a unique JSON-RPC request ID.
fn generate_unique_rpc_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (&'a str, &'a str, Value),
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ChainParameters {
    current_fees: FeeSchedule,
}

#[derive(Debug, Deserialize)]
struct GlobalProperties {
    parameters: ChainParameters,
}

#[derive(Clone, Debug)]
pub struct GrapheneRpcProvider {
    client: ReqwestClient,
    url: Url,
    timeout: Duration,
}

impl GrapheneRpcProvider {
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self, ProviderError> {
        let url = Url::parse(url).map_err(|e| {
            ProviderError::NetworkConfiguration(format!("Invalid RPC URL '{url}': {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProviderError::NetworkConfiguration(format!(
                "Unsupported RPC URL scheme '{}', expected http or https",
                url.scheme()
            )));
        }
        let timeout = Duration::from_millis(timeout_ms);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::NetworkConfiguration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    pub fn from_config(config: &ChainConfig) -> Result<Self, ProviderError> {
        Self::new(&config.rpc_url, config.rpc_timeout_ms)
    }

    /// Calls `method` on the database API and decodes its result.
    async fn call<T: DeserializeOwned>(&self, method: &str, args: Value) -> Result<T, ProviderError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: generate_unique_rpc_id(),
            method: "call",
            params: (DATABASE_API, method, args),
        };

        debug!(
            "Calling {}.{} on {} (timeout {}ms)",
            DATABASE_API,
            method,
            self.url.host_str().unwrap_or_default(),
            self.timeout.as_millis()
        );

        let body = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: JsonRpcResponse = serde_json::from_str(&body)?;
        if let Some(error) = response.error {
            return Err(ProviderError::RpcErrorCode {
                code: error.code,
                message: error.message,
            });
        }
        let result = response.result.ok_or_else(|| {
            ProviderError::InvalidResponse(format!("Missing result for {method}"))
        })?;
        Ok(serde_json::from_value(result)?)
    }

    /// Fetches objects by id with `get_objects`, checking the answer is positional.
    async fn get_objects<T: DeserializeOwned>(
        &self,
        ids: &[ObjectId],
    ) -> Result<Vec<Option<T>>, ProviderError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let objects: Vec<Option<T>> = self.call("get_objects", json!([ids])).await?;
        if objects.len() != ids.len() {
            return Err(ProviderError::InvalidResponse(format!(
                "get_objects returned {} entries for {} ids",
                objects.len(),
                ids.len()
            )));
        }
        Ok(objects)
    }
}

#[async_trait]
impl ChainQueryTrait for GrapheneRpcProvider {
    async fn get_fee_schedule(&self) -> Result<FeeSchedule, ProviderError> {
        let properties: GlobalProperties = self.call("get_global_properties", json!([])).await?;
        Ok(properties.parameters.current_fees)
    }

    async fn get_assets(
        &self,
        asset_ids: &[ObjectId],
    ) -> Result<Vec<Option<AssetObject>>, ProviderError> {
        self.get_objects(asset_ids).await
    }

    async fn get_asset_dynamic_data(
        &self,
        data_ids: &[ObjectId],
    ) -> Result<Vec<Option<AssetDynamicData>>, ProviderError> {
        self.get_objects(data_ids).await
    }

    async fn get_dynamic_global_properties(
        &self,
    ) -> Result<DynamicGlobalProperties, ProviderError> {
        self.call("get_dynamic_global_properties", json!([])).await
    }
}
