use serde::Serialize;
use thiserror::Error;

use super::FeeResolutionError;

#[derive(Error, Debug, Serialize)]
pub enum BuilderError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid {operation} payload, field '{field}': {reason}")]
    SchemaViolation {
        operation: String,
        field: String,
        reason: String,
    },

    #[error("Fee resolution failed: {0}")]
    FeeResolution(#[from] FeeResolutionError),

    #[error("Invalid reference block: {0}")]
    InvalidReferenceBlock(String),

    #[error("Transaction has no operations")]
    EmptyTransaction,
}

impl BuilderError {
    pub fn schema_violation(
        operation: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BuilderError::SchemaViolation {
            operation: operation.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Determines if this error is transient (can retry) or permanent.
    ///
    /// Construction errors are permanent; fee resolution delegates to the underlying error.
    pub fn is_transient(&self) -> bool {
        match self {
            BuilderError::FeeResolution(err) => err.is_transient(),
            BuilderError::UnknownOperation(_) => false,
            BuilderError::SchemaViolation { .. } => false,
            BuilderError::InvalidReferenceBlock(_) => false,
            BuilderError::EmptyTransaction => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::provider::ProviderError;

    #[test]
    fn test_schema_violation_names_field() {
        let err = BuilderError::schema_violation("asset_create", "bitasset_opts", "is required");
        assert_eq!(
            err.to_string(),
            "Invalid asset_create payload, field 'bitasset_opts': is required"
        );
        assert!(!err.is_transient());
    }

    #[test]
    fn test_fee_resolution_transient_delegates() {
        let err: BuilderError = FeeResolutionError::from(ProviderError::RateLimited).into();
        assert!(err.is_transient());
    }
}
