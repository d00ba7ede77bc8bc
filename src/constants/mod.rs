mod chain;
pub use chain::*;

mod logging;
pub use logging::*;

mod rpc;
pub use rpc::*;

mod transaction;
pub use transaction::*;
