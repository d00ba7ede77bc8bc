//! Chain queries against a live node.

use crate::integration::common::context::ChainTestContext;
use graphene_tx_builder::{models::ObjectId, services::ChainQueryTrait};

#[tokio::test]
async fn test_fee_schedule_prices_transfers() {
    let ctx = ChainTestContext::new().expect("Failed to setup test");
    let schedule = ctx
        .provider
        .get_fee_schedule()
        .await
        .expect("Failed to fetch fee schedule");

    assert!(schedule.scale > 0);
    let transfer = schedule
        .parameters_for(graphene_tx_builder::models::OperationId(0))
        .expect("No transfer fee parameters");
    assert!(transfer.get("fee").is_some());
}

#[tokio::test]
async fn test_core_asset_and_dynamic_data() {
    let ctx = ChainTestContext::new().expect("Failed to setup test");
    let assets = ctx
        .provider
        .get_assets(&[ObjectId::core_asset()])
        .await
        .expect("Failed to fetch core asset");
    let core = assets
        .into_iter()
        .next()
        .flatten()
        .expect("Core asset missing");
    assert_eq!(core.id, ObjectId::core_asset());

    let data = ctx
        .provider
        .get_asset_dynamic_data(&[core.dynamic_asset_data_id])
        .await
        .expect("Failed to fetch dynamic data");
    assert_eq!(data.len(), 1);
    assert!(data[0].is_some());
}

#[tokio::test]
async fn test_unknown_asset_is_none() {
    let ctx = ChainTestContext::new().expect("Failed to setup test");
    let assets = ctx
        .provider
        .get_assets(&[ObjectId::asset(u32::MAX as u64)])
        .await
        .expect("Failed to query assets");
    assert_eq!(assets, vec![None]);
}

#[tokio::test]
async fn test_dynamic_global_properties() {
    let ctx = ChainTestContext::new().expect("Failed to setup test");
    let properties = ctx
        .provider
        .get_dynamic_global_properties()
        .await
        .expect("Failed to fetch global properties");
    assert!(properties.head_block_number > 0);
    assert_eq!(properties.head_block_id.len(), 40);
}
