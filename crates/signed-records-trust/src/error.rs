//! Error types for trust resolution.

use signed_records_ledger::LedgerError;
use thiserror::Error;

/// Errors that prevent a trust decision from being made at all.
///
/// An identity that simply has no matching key is not an error; it resolves
/// to an empty key set.
#[derive(Debug, Error)]
pub enum TrustError {
    /// The identity lookup failed in transit.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The identity response could not be interpreted.
    #[error("malformed identity response: {0}")]
    MalformedResponse(String),
}

/// Result type for trust resolution.
pub type Result<T> = std::result::Result<T, TrustError>;
