mod serde;
pub use serde::*;

mod time;
pub use time::*;
