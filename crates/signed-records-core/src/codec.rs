//! Canonical transport encoding for record metadata and content.
//!
//! Every external id (except the signature, which the signer already emits
//! in this form) and every record body goes over the wire as standard padded
//! base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// Encode bytes for transport.
pub fn encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data.as_ref())
}

/// Decode transport text back into bytes. Exact inverse of [`encode`].
pub fn decode(encoded: &str) -> Result<Vec<u8>, CoreError> {
    Ok(STANDARD.decode(encoded)?)
}

/// Decode transport text that must carry UTF-8.
pub fn decode_utf8(encoded: &str) -> Result<String, CoreError> {
    String::from_utf8(decode(encoded)?)
        .map_err(|e| CoreError::DecodingError(format!("invalid utf-8: {}", e)))
}
