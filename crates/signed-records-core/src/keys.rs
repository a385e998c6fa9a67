//! Checksummed textual signing keys.
//!
//! Keys travel as base58 text of `prefix(5) || key(32) || checksum(4)`, where
//! the checksum is the first four bytes of a double SHA-256 over the prefix
//! and key. The prefixes are chosen so private keys render as `idsec...` and
//! public keys as `idpub...`.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{SigningKey, VerifyingKey};

use crate::error::KeyError;

/// Length of the key prefix in bytes.
pub const KEY_PREFIX_LEN: usize = 5;

/// Length of the raw key material in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the trailing checksum in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Prefix bytes of a private (`idsec`) key.
pub const PRIVATE_KEY_PREFIX: [u8; KEY_PREFIX_LEN] = [0x03, 0x45, 0xf3, 0xd0, 0xd6];

/// Prefix bytes of a public (`idpub`) key.
pub const PUBLIC_KEY_PREFIX: [u8; KEY_PREFIX_LEN] = [0x03, 0x45, 0xef, 0x9d, 0xe0];

/// Which half of a key pair a textual key encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Private,
    Public,
}

impl KeyType {
    fn prefix(self) -> [u8; KEY_PREFIX_LEN] {
        match self {
            KeyType::Private => PRIVATE_KEY_PREFIX,
            KeyType::Public => PUBLIC_KEY_PREFIX,
        }
    }

    fn name(self) -> &'static str {
        match self {
            KeyType::Private => "private",
            KeyType::Public => "public",
        }
    }
}

/// Decode a textual key into its type and raw key bytes.
pub fn decode_key(encoded: &str) -> Result<(KeyType, [u8; KEY_LEN]), KeyError> {
    let payload = bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|e| match e {
            bs58::decode::Error::InvalidChecksum { .. } => KeyError::ChecksumMismatch,
            _ => KeyError::InvalidEncoding,
        })?;

    if payload.len() != KEY_PREFIX_LEN + KEY_LEN {
        return Err(KeyError::InvalidLength {
            expected: KEY_PREFIX_LEN + KEY_LEN + CHECKSUM_LEN,
            actual: payload.len() + CHECKSUM_LEN,
        });
    }

    let (prefix, key) = payload.split_at(KEY_PREFIX_LEN);
    let key_type = if prefix == PRIVATE_KEY_PREFIX {
        KeyType::Private
    } else if prefix == PUBLIC_KEY_PREFIX {
        KeyType::Public
    } else {
        return Err(KeyError::UnknownPrefix);
    };

    let mut arr = [0u8; KEY_LEN];
    arr.copy_from_slice(key);
    Ok((key_type, arr))
}

/// Encode raw key bytes as checksummed text.
pub fn encode_key(key_type: KeyType, key: &[u8; KEY_LEN]) -> String {
    let mut payload = Vec::with_capacity(KEY_PREFIX_LEN + KEY_LEN);
    payload.extend_from_slice(&key_type.prefix());
    payload.extend_from_slice(key);
    bs58::encode(payload).with_check().into_string()
}

/// Check that a textual key decodes and carries a matching checksum.
///
/// Never fails: malformed input of any kind yields `false`.
pub fn validate_checksum(encoded: &str) -> bool {
    decode_key(encoded).is_ok()
}

/// Derive the public key for a textual private key.
pub fn derive_public_key(private_key: &str) -> Result<PublicKey, KeyError> {
    Ok(private_key.parse::<PrivateKey>()?.public_key())
}

fn decode_expecting(encoded: &str, expected: KeyType) -> Result<[u8; KEY_LEN], KeyError> {
    let (key_type, bytes) = decode_key(encoded)?;
    if key_type != expected {
        return Err(KeyError::WrongKeyType {
            expected: expected.name(),
        });
    }
    Ok(bytes)
}

/// An Ed25519 private signing key.
///
/// Owned by the caller and only held for the duration of a signing call.
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; KEY_LEN]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    /// Render as `idsec...` text.
    pub fn to_key_string(&self) -> String {
        encode_key(KeyType::Private, &self.signing_key.to_bytes())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl FromStr for PrivateKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let seed = decode_expecting(s, KeyType::Private)?;
        Ok(Self::from_seed(&seed))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.public_key())
    }
}

/// An Ed25519 public key, rendered as `idpub...` text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: &[u8; KEY_LEN]) -> Result<Self, KeyError> {
        VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| KeyError::InvalidKeyMaterial)
    }

    /// Get the raw bytes.
    pub fn to_bytes(&self) -> [u8; KEY_LEN] {
        self.0.to_bytes()
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_expecting(s, KeyType::Public)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_key(KeyType::Public, &self.0.to_bytes()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.as_bytes().cmp(other.0.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> PrivateKey {
        PrivateKey::from_seed(&[0x42; 32])
    }

    #[test]
    fn test_private_key_text_roundtrip() {
        let key = test_key();
        let text = key.to_key_string();
        assert!(text.starts_with("idsec"));

        let recovered: PrivateKey = text.parse().unwrap();
        assert_eq!(recovered.public_key(), key.public_key());
    }

    #[test]
    fn test_public_key_text_roundtrip() {
        let public = test_key().public_key();
        let text = public.to_string();
        assert!(text.starts_with("idpub"));
        assert_eq!(text.parse::<PublicKey>().unwrap(), public);
    }

    #[test]
    fn test_validate_checksum_accepts_both_key_types() {
        let key = test_key();
        assert!(validate_checksum(&key.to_key_string()));
        assert!(validate_checksum(&key.public_key().to_string()));
    }

    #[test]
    fn test_validate_checksum_rejects_garbage() {
        assert!(!validate_checksum(""));
        assert!(!validate_checksum("not a key"));
        assert!(!validate_checksum("idsec0OIl"));
        assert!(!validate_checksum(&bs58::encode([0u8; 41]).into_string()));
    }

    #[test]
    fn test_corrupted_key_fails_checksum() {
        let text = test_key().to_key_string();
        let mut chars: Vec<char> = text.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '2' { '3' } else { '2' };
        let corrupted: String = chars.into_iter().collect();

        assert!(!validate_checksum(&corrupted));
        assert!(corrupted.parse::<PrivateKey>().is_err());
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        let mut payload = vec![0x01, 0x02, 0x03, 0x04, 0x05];
        payload.extend_from_slice(&[0x42; 32]);
        let text = bs58::encode(payload).with_check().into_string();

        assert_eq!(decode_key(&text), Err(KeyError::UnknownPrefix));
        assert!(!validate_checksum(&text));
    }

    #[test]
    fn test_wrong_key_type_rejected() {
        let key = test_key();
        let public_text = key.public_key().to_string();
        assert!(matches!(
            public_text.parse::<PrivateKey>(),
            Err(KeyError::WrongKeyType { .. })
        ));
        assert!(matches!(
            key.to_key_string().parse::<PublicKey>(),
            Err(KeyError::WrongKeyType { .. })
        ));
    }

    #[test]
    fn test_derive_public_key_is_deterministic() {
        let text = test_key().to_key_string();
        let a = derive_public_key(&text).unwrap();
        let b = derive_public_key(&text).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, test_key().public_key());
    }

    #[test]
    fn test_derive_public_key_rejects_invalid() {
        assert!(derive_public_key("idsecgarbage").is_err());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let key = test_key();
        let debug = format!("{:?}", key);
        assert!(debug.starts_with("PrivateKey(idpub"));
        assert!(!debug.contains(&key.to_key_string()));
    }
}
