//! Configuration read from the environment.

mod chain_config;
pub use chain_config::*;
