use serde::Serialize;
use thiserror::Error;

use crate::{
    models::{ObjectId, OperationId},
    services::provider::ProviderError,
};

/// Failure to price the operations of a draft.
#[derive(Error, Debug, Serialize)]
pub enum FeeResolutionError {
    #[error("Failed to fetch chain data: {0}")]
    Provider(#[from] ProviderError),

    #[error("Fee schedule has no usable parameters for operation {operation} ({name})")]
    MissingFeeParameters {
        operation: OperationId,
        name: &'static str,
    },

    #[error("Asset {0} does not exist")]
    UnknownAsset(ObjectId),

    #[error("Fee for operation {name} overflows")]
    Overflow { name: &'static str },
}

impl FeeResolutionError {
    /// Determines if retrying the resolution may succeed.
    ///
    /// Only provider failures are delegated; missing schedule entries and unknown
    /// assets will not change by retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            FeeResolutionError::Provider(err) => err.is_transient(),
            FeeResolutionError::MissingFeeParameters { .. } => false,
            FeeResolutionError::UnknownAsset(_) => false,
            FeeResolutionError::Overflow { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient() {
        assert!(FeeResolutionError::Provider(ProviderError::Timeout).is_transient());
        assert!(
            !FeeResolutionError::Provider(ProviderError::InvalidResponse("x".into()))
                .is_transient()
        );
        assert!(!FeeResolutionError::UnknownAsset(ObjectId::asset(9)).is_transient());
        assert!(!FeeResolutionError::MissingFeeParameters {
            operation: OperationId(0),
            name: "transfer"
        }
        .is_transient());
    }

    #[test]
    fn test_display() {
        let err = FeeResolutionError::MissingFeeParameters {
            operation: OperationId(8),
            name: "account_upgrade",
        };
        assert_eq!(
            err.to_string(),
            "Fee schedule has no usable parameters for operation 8 (account_upgrade)"
        );
    }
}
