//! # Domain Module
//!
//! Core logic of the transaction builder:
//!
//! * Operation schema registry
//! * Operation encoding and validation
//! * Fee resolution against chain state
//! * Transaction assembly

pub mod registry;
pub use registry::{OperationRegistry, OperationSchema};

pub mod encoder;
pub use encoder::*;

pub mod fees;
pub use fees::{resolve_fees, AssetFeeContext};

pub mod transaction;
pub use transaction::*;
