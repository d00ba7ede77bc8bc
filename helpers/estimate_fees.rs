//! # Fee Estimation Example
//!
//! Encodes a single operation, resolves its fee against a node and prints the priced
//! operation (or, with `--finalize`, the unsigned transaction) as JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Price a core-asset transfer against the node in GRAPHENE_RPC_URL
//! cargo run --example estimate_fees
//!
//! # Price an arbitrary operation, paying the fee in another asset
//! cargo run --example estimate_fees -- \
//!   --rpc-url "http://127.0.0.1:8090" \
//!   --operation account_upgrade \
//!   --payload '{"fee": {"amount": 0, "asset_id": "1.3.1"}, "account_to_upgrade": "1.2.17"}'
//!
//! # Bind to the head block and print the transaction ready for signing
//! cargo run --example estimate_fees -- --finalize
//! ```
//!
//! Settings not given on the command line are read from the environment (and `.env`),
//! see `ChainConfig::from_env`.

use clap::Parser;
use eyre::{eyre, Result, WrapErr};
use graphene_tx_builder::{
    config::ChainConfig, domain::TransactionBuilder, logging::setup_logging,
    services::GrapheneRpcProvider,
};
use log::info;
use serde_json::Value;

const DEFAULT_PAYLOAD: &str = r#"{
    "fee": {"amount": 0, "asset_id": "1.3.0"},
    "from": "1.2.17",
    "to": "1.2.18",
    "amount": {"amount": 100000, "asset_id": "1.3.0"}
}"#;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Node HTTP endpoint. Overrides GRAPHENE_RPC_URL.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Operation name, e.g. "transfer" or "proposal_create".
    #[arg(long, default_value = "transfer")]
    operation: String,

    /// Operation payload as JSON. Defaults to a small core-asset transfer.
    #[arg(long, default_value = DEFAULT_PAYLOAD)]
    payload: String,

    /// Also set the reference block and expiration and print the whole transaction.
    #[arg(long)]
    finalize: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging()?;
    let args = Args::parse();

    let mut config = ChainConfig::from_env();
    if let Some(rpc_url) = args.rpc_url {
        config.rpc_url = rpc_url;
    }
    let provider = GrapheneRpcProvider::from_config(&config)
        .wrap_err_with(|| format!("Failed to create provider for {}", config.rpc_url))?;

    let payload: Value =
        serde_json::from_str(&args.payload).wrap_err("Payload is not valid JSON")?;
    let mut builder = TransactionBuilder::with_config(&config);
    builder
        .add(&args.operation, &payload)
        .map_err(|e| eyre!("Invalid {} operation: {}", args.operation, e))?;

    info!("Pricing {} against {}", args.operation, config.rpc_url);
    let output = if args.finalize {
        let transaction = builder
            .finalize(&provider)
            .await
            .wrap_err("Failed to finalize transaction")?;
        serde_json::to_string_pretty(&transaction)?
    } else {
        builder
            .resolve_fees(&provider)
            .await
            .wrap_err("Failed to resolve fees")?;
        serde_json::to_string_pretty(&builder.operations()[0])?
    };

    println!("{output}");
    Ok(())
}
