//! Unsigned transaction handed to signing.

use serde::Serialize;

use super::{FieldValue, Operation};

/// A finalized, not yet signed transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnsignedTransaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    /// Expiration as `time_point_sec` (seconds since the unix epoch).
    #[serde(serialize_with = "serialize_time_point_sec")]
    pub expiration: u32,
    pub operations: Vec<Operation>,
    pub extensions: Vec<()>,
}

fn serialize_time_point_sec<S>(seconds: &u32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    FieldValue::TimePointSec(*seconds).serialize(serializer)
}
