//! Integration test modules

mod fees;
mod provider;
