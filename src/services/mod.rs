//! # Services Module
//!
//! Access to graphene nodes: the chain query trait and its providers.

pub mod provider;
pub use provider::*;
