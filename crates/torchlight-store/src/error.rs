//! Mapping from driver errors to domain errors.

use torchlight_core::error::DomainError;
use tracing::error;

/// Every driver failure surfaces as a retryable `StoreUnavailable`.
pub(crate) fn store_error(err: sqlx::Error) -> DomainError {
    error!(error = %err, "database operation failed");
    DomainError::StoreUnavailable(err.to_string())
}
