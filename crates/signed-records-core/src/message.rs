//! The byte sequence covered by a record signature.

/// Build the signed message: `signer_chain_id || content || timestamp`.
///
/// The three parts are concatenated with no separators or length prefixes.
/// Construction and verification must both go through this function, and
/// callers must not rely on it to disambiguate parts whose boundaries shift
/// (`("ab", "c")` and `("a", "bc")` produce the same bytes).
pub fn signed_message(signer_chain_id: &str, content: &[u8], timestamp: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(signer_chain_id.len() + content.len() + timestamp.len());
    message.extend_from_slice(signer_chain_id.as_bytes());
    message.extend_from_slice(content);
    message.extend_from_slice(timestamp.as_bytes());
    message
}
