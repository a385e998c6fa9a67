//! Error types for the client.

use signed_records_core::{CoreError, KeyError, ValidationError};
use signed_records_ledger::LedgerError;
use signed_records_trust::TrustError;
use thiserror::Error;

/// Errors that can occur during client operations.
///
/// A record whose signature does not check out is not an error; it comes
/// back as a [`Verdict`](crate::Verdict) with an invalid status.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A precondition on the caller's input failed. Nothing was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A key string failed format or checksum checks.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Any other failure inside the core primitives.
    #[error("core error: {0}")]
    Core(CoreError),

    /// The ledger call failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The signer's authorized keys could not be resolved.
    #[error("trust error: {0}")]
    Trust(#[from] TrustError),

    /// The ledger answered with a body of the wrong shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<CoreError> for ClientError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(v) => ClientError::Validation(v),
            CoreError::InvalidKey(k) => ClientError::InvalidKey(k),
            other => ClientError::Core(other),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
