mod builder;
pub use builder::*;

mod fee_resolution;
pub use fee_resolution::*;
