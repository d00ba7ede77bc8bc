mod object_id;
pub use object_id::*;

mod asset_amount;
pub use asset_amount::*;

mod chain;
pub use chain::*;

mod operation;
pub use operation::*;

mod transaction;
pub use transaction::*;

mod error;
pub use error::*;
