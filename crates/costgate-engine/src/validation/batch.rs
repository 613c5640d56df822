//! Batch-size guard. Runs before any per-operation pass and ignores license state.

use costgate_core::errors::error_code;
use costgate_core::{GovernanceErrorCode, Limit};

use super::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("batch contains {count} operations, exceeding the limit of {limit}")]
    TooManyOperations { count: usize, limit: u64 },
}

impl GovernanceErrorCode for BatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TooManyOperations { .. } => error_code::BATCH_LIMIT_EXCEEDED,
        }
    }
}

impl BatchError {
    /// The rejection as it is reported to the caller.
    pub fn to_validation_error(&self) -> ValidationError {
        ValidationError::new(self.error_code(), self.to_string())
    }
}

/// Reject a batched request whose operation count is above `limit`.
pub fn check_batch_size(count: usize, limit: Limit) -> Result<(), BatchError> {
    match limit {
        Limit::Max(max) if !limit.allows(count as u64) => Err(BatchError::TooManyOperations { count, limit: max }),
        _ => Ok(()),
    }
}
