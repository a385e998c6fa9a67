//! Detached Ed25519 signatures over record messages.

use ed25519_dalek::{Signer as _, Verifier as _};
use std::fmt;

use crate::codec;
use crate::keys::{PrivateKey, PublicKey};

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, if it has exactly the signature length.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; SIGNATURE_LEN] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// The transport form placed directly in an external id list.
    pub fn to_base64(&self) -> String {
        codec::encode(self.0)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sign a message.
pub fn sign(private_key: &PrivateKey, message: &[u8]) -> Signature {
    Signature(private_key.signing_key().sign(message).to_bytes())
}

/// Check a signature over a message.
///
/// Any mismatch is reported as `false`; this never panics.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    public_key.verifying_key().verify(message, &sig).is_ok()
}

/// Check a signature given in its textual wire forms.
///
/// A public key that fails to parse or a signature of the wrong length is
/// reported the same way as a cryptographic mismatch.
pub fn verify_encoded(public_key: &str, message: &[u8], signature: &[u8]) -> bool {
    let Ok(public_key) = public_key.parse::<PublicKey>() else {
        return false;
    };
    let Some(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verify(&public_key, message, &signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{derive_public_key, validate_checksum};
    use proptest::prelude::*;

    fn test_key() -> PrivateKey {
        PrivateKey::from_seed(&[0x42; 32])
    }

    #[test]
    fn test_sign_verify() {
        let key = test_key();
        let message = b"hello world";
        let signature = sign(&key, message);

        // Valid signature should verify
        assert!(verify(&key.public_key(), message, &signature));

        // Tampered message should fail
        assert!(!verify(&key.public_key(), b"hello worlD", &signature));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let key = test_key();
        assert_eq!(sign(&key, b"msg"), sign(&key, b"msg"));
    }

    #[test]
    fn test_wrong_key_fails() {
        let signature = sign(&test_key(), b"msg");
        let other = PrivateKey::from_seed(&[0x43; 32]).public_key();
        assert!(!verify(&other, b"msg", &signature));
    }

    #[test]
    fn test_verify_encoded_rejects_malformed_inputs() {
        let key = test_key();
        let signature = sign(&key, b"msg");
        let public = key.public_key().to_string();

        assert!(verify_encoded(&public, b"msg", signature.as_ref()));
        assert!(!verify_encoded("idpubnope", b"msg", signature.as_ref()));
        assert!(!verify_encoded(&public, b"msg", &signature.as_bytes()[..63]));
        assert!(!verify_encoded(&public, b"msg", &[0xff; 64]));
        assert!(!verify_encoded(&public, b"msg", &[]));
    }

    #[test]
    fn test_base64_form_matches_codec() {
        let signature = sign(&test_key(), b"msg");
        assert_eq!(signature.to_base64(), codec::encode(signature.as_bytes()));
    }

    proptest! {
        #[test]
        fn signatures_verify_under_derived_key(
            seed in any::<[u8; 32]>(),
            message in prop::collection::vec(any::<u8>(), 0..256),
        ) {
            let key = PrivateKey::from_seed(&seed);
            let text = key.to_key_string();
            prop_assert!(validate_checksum(&text));

            let public = derive_public_key(&text).unwrap();
            prop_assert!(verify(&public, &message, &sign(&key, &message)));
        }
    }
}
