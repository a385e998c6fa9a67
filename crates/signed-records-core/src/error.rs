//! Error types for the signed-records core.

use thiserror::Error;

/// Errors produced while parsing textual signing keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("key is not valid base58")]
    InvalidEncoding,

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown key prefix")]
    UnknownPrefix,

    #[error("expected a {expected} key")]
    WrongKeyType { expected: &'static str },

    #[error("key checksum mismatch")]
    ChecksumMismatch,

    #[error("key bytes do not form a valid ed25519 key")]
    InvalidKeyMaterial,
}

/// Precondition failures on inputs to the build and verify operations.
///
/// These are always raised before any cryptographic or network work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("content is required")]
    ContentRequired,

    #[error("at least 1 external_id is required")]
    ExternalIdsRequired,

    #[error("signer_private_key is required")]
    SignerPrivateKeyRequired,

    #[error("signer_chain_id is required")]
    SignerChainIdRequired,

    #[error("signer_private_key is invalid")]
    SignerPrivateKeyInvalid,

    #[error("signer_chain_id is required when passing a signer_private_key")]
    SignerChainIdRequiredWithKey,

    #[error("signer_private_key is required when passing a signer_chain_id")]
    SignerPrivateKeyRequiredWithChainId,

    #[error("chain_id is required")]
    ChainIdRequired,

    #[error("entry_hash is required")]
    EntryHashRequired,
}

/// Core errors that can occur while building or decoding signed records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

impl From<base64::DecodeError> for CoreError {
    fn from(e: base64::DecodeError) -> Self {
        CoreError::DecodingError(e.to_string())
    }
}
