//! Error types for ledger access.

use thiserror::Error;

/// Errors surfaced by a ledger access implementation.
///
/// The signing protocol never retries, wraps, or suppresses these.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The requested path does not exist on the ledger.
    #[error("not found: {0}")]
    NotFound(String),

    /// The ledger answered with a non-success status.
    #[error("ledger returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be delivered.
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),

    /// A response body could not be interpreted.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_) | LedgerError::Status { status: 404, .. })
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
