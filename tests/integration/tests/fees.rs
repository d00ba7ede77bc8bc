//! Fee resolution and finalization against a live node.

use crate::integration::common::context::ChainTestContext;
use graphene_tx_builder::models::ObjectId;
use serde_json::{json, Value};

fn transfer() -> Value {
    json!({
        "fee": {"amount": 0, "asset_id": "1.3.0"},
        "from": "1.2.1",
        "to": "1.2.2",
        "amount": {"amount": 1, "asset_id": "1.3.0"}
    })
}

#[tokio::test]
async fn test_sets_core_required_fees() {
    let ctx = ChainTestContext::new().expect("Failed to setup test");
    let mut builder = ctx.builder();
    builder.add("transfer", &transfer()).unwrap();
    builder
        .resolve_fees(&ctx.provider)
        .await
        .expect("Failed to resolve fees");

    let fee = builder.operations()[0].fee();
    assert_eq!(fee.asset_id, ObjectId::core_asset());
    assert!(fee.amount > 0);
}

#[tokio::test]
async fn test_proposal_nested_fee() {
    let ctx = ChainTestContext::new().expect("Failed to setup test");
    let mut builder = ctx.builder();
    let op = builder.get("transfer", &transfer()).unwrap();
    builder
        .add(
            "proposal_create",
            &json!({
                "fee_paying_account": "1.2.1",
                "proposed_ops": [{"op": op}]
            }),
        )
        .unwrap();
    builder
        .resolve_fees(&ctx.provider)
        .await
        .expect("Failed to resolve fees");

    let value = serde_json::to_value(&builder.operations()[0]).unwrap();
    let nested = value[1]["proposed_ops"][0]["op"][1]["fee"]["amount"]
        .as_u64()
        .unwrap();
    assert!(nested > 0);
}

#[tokio::test]
async fn test_finalize() {
    let ctx = ChainTestContext::new().expect("Failed to setup test");
    let mut builder = ctx.builder();
    builder.add("transfer", &transfer()).unwrap();
    let tx = builder
        .finalize(&ctx.provider)
        .await
        .expect("Failed to finalize");

    assert!(tx.expiration > 0);
    assert_eq!(tx.operations.len(), 1);
    assert!(tx.operations[0].fee().amount > 0);
}
