//! Test context for tests that talk to a node.

use eyre::{Result, WrapErr};
use graphene_tx_builder::{
    config::ChainConfig, domain::TransactionBuilder, services::GrapheneRpcProvider,
};
use log::info;

use super::logging::init_test_logging;

/// Bundles the configuration read from the environment and a provider for it.
#[derive(Debug)]
pub struct ChainTestContext {
    pub config: ChainConfig,
    pub provider: GrapheneRpcProvider,
}

impl ChainTestContext {
    pub fn new() -> Result<Self> {
        init_test_logging();
        let config = ChainConfig::from_env();
        info!("Running against {}", config.rpc_url);
        let provider = GrapheneRpcProvider::from_config(&config)
            .wrap_err_with(|| format!("Failed to create provider for {}", config.rpc_url))?;
        Ok(Self { config, provider })
    }

    /// A builder that checks keys and sets expirations the way the configured chain does.
    pub fn builder(&self) -> TransactionBuilder {
        TransactionBuilder::with_config(&self.config)
    }
}
