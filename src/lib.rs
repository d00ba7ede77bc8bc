//! # graphene-tx-builder
//!
//! Client-side assembly of graphene transactions: operation payloads are validated and
//! encoded against a static schema registry, priced against the chain's fee schedule and
//! asset fee pools, and assembled into unsigned transactions ready for signing.
//!
//! ```no_run
//! use graphene_tx_builder::{
//!     config::ChainConfig, domain::TransactionBuilder, services::GrapheneRpcProvider,
//! };
//! use serde_json::json;
//!
//! # async fn run() -> eyre::Result<()> {
//! let config = ChainConfig::from_env();
//! let chain = GrapheneRpcProvider::from_config(&config)?;
//! let mut builder = TransactionBuilder::with_config(&config);
//! builder.add(
//!     "transfer",
//!     &json!({
//!         "fee": {"amount": 0, "asset_id": "1.3.0"},
//!         "from": "1.2.1",
//!         "to": "1.2.2",
//!         "amount": {"amount": 50000, "asset_id": "1.3.0"}
//!     }),
//! )?;
//! let _transaction = builder.finalize(&chain).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
