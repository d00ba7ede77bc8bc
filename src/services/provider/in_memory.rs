//! This module provides an in-memory implementation of [`ChainQueryTrait`].
//!
//! `InMemoryChainQuery` serves a fixed snapshot of chain state. It prices transactions
//! offline and stands in for a node in tests.
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ChainQueryTrait, ProviderError};
use crate::models::{
    AssetDynamicData, AssetObject, DynamicGlobalProperties, FeeSchedule, ObjectId,
};

#[derive(Debug, Default)]
struct ChainSnapshot {
    fee_schedule: Option<FeeSchedule>,
    assets: HashMap<ObjectId, AssetObject>,
    dynamic_data: HashMap<ObjectId, AssetDynamicData>,
    global_properties: Option<DynamicGlobalProperties>,
}

#[derive(Debug, Default)]
pub struct InMemoryChainQuery {
    snapshot: RwLock<ChainSnapshot>,
}

impl InMemoryChainQuery {
    pub fn new(fee_schedule: FeeSchedule) -> Self {
        Self {
            snapshot: RwLock::new(ChainSnapshot {
                fee_schedule: Some(fee_schedule),
                ..ChainSnapshot::default()
            }),
        }
    }

    pub async fn set_fee_schedule(&self, fee_schedule: FeeSchedule) {
        self.snapshot.write().await.fee_schedule = Some(fee_schedule);
    }

    /// Stores an asset together with its dynamic data.
    pub async fn insert_asset(&self, asset: AssetObject, dynamic_data: AssetDynamicData) {
        let mut snapshot = self.snapshot.write().await;
        snapshot
            .dynamic_data
            .insert(asset.dynamic_asset_data_id, dynamic_data);
        snapshot.assets.insert(asset.id, asset);
    }

    /// Replaces the fee pool balance of an asset already stored.
    pub async fn set_fee_pool(&self, asset_id: ObjectId, fee_pool: u64) -> Result<(), ProviderError> {
        let mut snapshot = self.snapshot.write().await;
        let data_id = snapshot
            .assets
            .get(&asset_id)
            .map(|asset| asset.dynamic_asset_data_id)
            .ok_or_else(|| ProviderError::Other(format!("Unknown asset {asset_id}")))?;
        let data = snapshot
            .dynamic_data
            .get_mut(&data_id)
            .ok_or_else(|| ProviderError::Other(format!("Unknown dynamic data {data_id}")))?;
        data.fee_pool = fee_pool;
        Ok(())
    }

    pub async fn set_dynamic_global_properties(&self, properties: DynamicGlobalProperties) {
        self.snapshot.write().await.global_properties = Some(properties);
    }
}

#[async_trait]
impl ChainQueryTrait for InMemoryChainQuery {
    async fn get_fee_schedule(&self) -> Result<FeeSchedule, ProviderError> {
        self.snapshot
            .read()
            .await
            .fee_schedule
            .clone()
            .ok_or_else(|| ProviderError::Other("No fee schedule stored".to_string()))
    }

    async fn get_assets(
        &self,
        asset_ids: &[ObjectId],
    ) -> Result<Vec<Option<AssetObject>>, ProviderError> {
        let snapshot = self.snapshot.read().await;
        Ok(asset_ids
            .iter()
            .map(|id| snapshot.assets.get(id).cloned())
            .collect())
    }

    async fn get_asset_dynamic_data(
        &self,
        data_ids: &[ObjectId],
    ) -> Result<Vec<Option<AssetDynamicData>>, ProviderError> {
        let snapshot = self.snapshot.read().await;
        Ok(data_ids
            .iter()
            .map(|id| snapshot.dynamic_data.get(id).cloned())
            .collect())
    }

    async fn get_dynamic_global_properties(
        &self,
    ) -> Result<DynamicGlobalProperties, ProviderError> {
        self.snapshot
            .read()
            .await
            .global_properties
            .clone()
            .ok_or_else(|| ProviderError::Other("No global properties stored".to_string()))
    }
}
