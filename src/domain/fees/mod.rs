//! Fee resolution.
//!
//! Prices every operation of a draft, embedded operations included, and writes the
//! resolved `{amount, asset_id}` into each fee field. A fee requested in a non-core asset
//! is converted through the asset's core exchange rate and paid from its fee pool; when
//! the pool cannot cover the fee, or the rate is unusable, the fee falls back to the
//! core asset.

use std::collections::{BTreeSet, HashMap};

use futures::try_join;
use log::{debug, info};

use crate::{
    models::{
        AssetAmount, AssetDynamicData, AssetObject, FeeResolutionError, FeeSchedule, ObjectId,
        Operation, Price,
    },
    services::provider::{ChainQueryTrait, ProviderError},
};

mod calculator;
pub use calculator::*;

mod pack_size;
pub use pack_size::*;

/// What pricing a fee in a non-core asset needs to know about that asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetFeeContext {
    pub core_exchange_rate: Price,
    /// Fee pool balance, in the core asset.
    pub fee_pool: u64,
}

impl AssetFeeContext {
    pub fn new(asset: &AssetObject, dynamic_data: &AssetDynamicData) -> Self {
        Self {
            core_exchange_rate: asset.options.core_exchange_rate,
            fee_pool: dynamic_data.fee_pool,
        }
    }

    /// Converts a core fee into `asset_id`, or `None` when the fee pool cannot cover it
    /// or the exchange rate does not price `asset_id` against core.
    pub fn convert(&self, core_fee: u64, asset_id: ObjectId) -> Option<AssetAmount> {
        if self.fee_pool < core_fee {
            return None;
        }
        self.core_exchange_rate
            .convert_round_up(AssetAmount::core(core_fee))
            .filter(|converted| converted.asset_id == asset_id)
    }
}

/// Chain data one resolution pass prices against.
#[derive(Debug)]
struct FeeContext {
    schedule: FeeSchedule,
    assets: HashMap<ObjectId, AssetFeeContext>,
}

impl FeeContext {
    fn fee_for(&self, operation: &Operation) -> Result<AssetAmount, FeeResolutionError> {
        let core_fee = core_fee(operation, &self.schedule)?;
        let requested = operation.fee().asset_id;
        if requested.is_core_asset() {
            return Ok(AssetAmount::core(core_fee));
        }

        let converted = self
            .assets
            .get(&requested)
            .and_then(|context| context.convert(core_fee, requested));
        match converted {
            Some(fee) => Ok(fee),
            None => {
                debug!(
                    "Fee of {} cannot be paid in {}, falling back to {}",
                    operation.name,
                    requested,
                    ObjectId::core_asset()
                );
                Ok(AssetAmount::core(core_fee))
            }
        }
    }
}

/// Distinct non-core fee assets requested anywhere in `operations`.
fn requested_fee_assets(operations: &[Operation]) -> Vec<ObjectId> {
    let mut assets = BTreeSet::new();
    for operation in operations {
        operation.visit(&mut |op: &Operation| {
            let asset_id = op.fee().asset_id;
            if !asset_id.is_core_asset() {
                assets.insert(asset_id);
            }
        });
    }
    assets.into_iter().collect()
}

/// Fetches the fee schedule and the fee context of every asset in `asset_ids`.
///
/// The schedule and the asset objects are fetched concurrently, then the dynamic data
/// of all assets in one batch.
async fn fetch_fee_context<C>(
    chain: &C,
    asset_ids: &[ObjectId],
) -> Result<FeeContext, FeeResolutionError>
where
    C: ChainQueryTrait + ?Sized,
{
    if asset_ids.is_empty() {
        return Ok(FeeContext {
            schedule: chain.get_fee_schedule().await?,
            assets: HashMap::new(),
        });
    }

    debug!("Fetching fee data for assets {:?}", asset_ids);
    let (schedule, assets) = try_join!(chain.get_fee_schedule(), chain.get_assets(asset_ids))?;
    let assets = asset_ids
        .iter()
        .zip(assets)
        .map(|(id, asset)| asset.ok_or(FeeResolutionError::UnknownAsset(*id)))
        .collect::<Result<Vec<_>, _>>()?;

    let data_ids: Vec<ObjectId> = assets.iter().map(|a| a.dynamic_asset_data_id).collect();
    let dynamic_data = chain.get_asset_dynamic_data(&data_ids).await?;

    let mut contexts = HashMap::with_capacity(assets.len());
    for (asset, data) in assets.iter().zip(dynamic_data) {
        let data = data.ok_or_else(|| {
            ProviderError::InvalidResponse(format!(
                "Missing dynamic data {} of asset {}",
                asset.dynamic_asset_data_id, asset.id
            ))
        })?;
        contexts.insert(asset.id, AssetFeeContext::new(asset, &data));
    }

    Ok(FeeContext {
        schedule,
        assets: contexts,
    })
}

/// Resolves the fee of every operation in `operations`, recursing into embedded
/// operations.
///
/// All chain data is fetched and every fee computed before any fee is written, so on
/// error the operations are left untouched. Resolving twice against unchanged chain
/// state yields identical fees.
pub async fn resolve_fees<C>(
    operations: &mut [Operation],
    chain: &C,
) -> Result<(), FeeResolutionError>
where
    C: ChainQueryTrait + ?Sized,
{
    let asset_ids = requested_fee_assets(operations);
    let context = fetch_fee_context(chain, &asset_ids).await?;

    let mut fees = Vec::new();
    for operation in operations.iter() {
        let mut result = Ok(());
        operation.visit(&mut |op: &Operation| {
            if result.is_ok() {
                match context.fee_for(op) {
                    Ok(fee) => fees.push(fee),
                    Err(e) => result = Err(e),
                }
            }
        });
        result?;
    }

    let mut resolved = fees.into_iter();
    for operation in operations.iter_mut() {
        operation.visit_mut(&mut |op: &mut Operation| {
            if let Some(fee) = resolved.next() {
                op.payload.set_fee(fee);
            }
        });
    }

    info!(
        "Resolved fees for {} operations ({} non-core fee assets)",
        operations.len(),
        asset_ids.len()
    );
    Ok(())
}
