//! Outcomes of checking a fetched record's signature.
//!
//! A failed check is a normal result, not an error: callers branch on the
//! status.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::types::RecordKind;

/// Why a record's signature was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    /// The external ids do not carry a signing header for this record kind.
    NotSigned(RecordKind),
    /// A signing header with a version this crate does not understand.
    UnsupportedVersion(u8),
    /// Cryptographic mismatch, or an unparsable public key or signature.
    InvalidSignature,
    /// The key is not authorized for the signer identity at signing time.
    UnauthorizedKey,
}

/// The trust determination attached to a fetched record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    Valid,
    Invalid(InvalidReason),
    /// Verification was skipped at the caller's request.
    Unchecked,
}

impl VerificationStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationStatus::Valid)
    }

    /// The status string used on the wire and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Valid => "valid_signature",
            VerificationStatus::Unchecked => "unchecked",
            VerificationStatus::Invalid(reason) => match reason {
                InvalidReason::NotSigned(RecordKind::Chain) => "not_signed/invalid_chain_format",
                InvalidReason::NotSigned(RecordKind::Entry) => "not_signed/invalid_entry_format",
                InvalidReason::UnsupportedVersion(_) => "unsupported_version",
                InvalidReason::InvalidSignature => "invalid_signature",
                InvalidReason::UnauthorizedKey => "key_not_found",
            },
        }
    }
}

impl From<InvalidReason> for VerificationStatus {
    fn from(reason: InvalidReason) -> Self {
        VerificationStatus::Invalid(reason)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VerificationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(VerificationStatus::Valid.to_string(), "valid_signature");
        assert_eq!(
            VerificationStatus::from(InvalidReason::NotSigned(RecordKind::Chain)).as_str(),
            "not_signed/invalid_chain_format"
        );
        assert_eq!(
            VerificationStatus::from(InvalidReason::NotSigned(RecordKind::Entry)).as_str(),
            "not_signed/invalid_entry_format"
        );
        assert_eq!(
            VerificationStatus::from(InvalidReason::UnauthorizedKey).as_str(),
            "key_not_found"
        );
    }

    #[test]
    fn test_status_serializes_as_string() {
        let json = serde_json::to_string(&VerificationStatus::Invalid(
            InvalidReason::InvalidSignature,
        ))
        .unwrap();
        assert_eq!(json, "\"invalid_signature\"");
    }

    #[test]
    fn test_only_valid_is_valid() {
        assert!(VerificationStatus::Valid.is_valid());
        assert!(!VerificationStatus::Unchecked.is_valid());
        assert!(!VerificationStatus::Invalid(InvalidReason::UnauthorizedKey).is_valid());
    }
}
