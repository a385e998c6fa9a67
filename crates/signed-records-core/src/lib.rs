//! # Signed Records Core
//!
//! Pure primitives for signed ledger records: checksummed keys, the transport
//! encoding, the signed message, Ed25519 signatures, and the external id
//! layout that carries a record's signing header.
//!
//! This crate contains no I/O and no networking.
//!
//! ## Key Types
//!
//! - [`PrivateKey`] / [`PublicKey`] - `idsec...` / `idpub...` signing keys
//! - [`ExternalIds`] - Tagged union of unsigned and signed external id lists
//! - [`RecordRequest`] - Caller inputs for a new chain or entry
//! - [`RecordDraft`] - A built record ready to submit
//! - [`VerificationStatus`] - Outcome of checking a fetched record
//!
//! ## Building and checking
//!
//! ```rust
//! use signed_records_core::{protocol, PrivateKey, RecordKind, RecordRequest, SigningMode};
//!
//! let key = PrivateKey::generate();
//! let request = RecordRequest::new("hello").signer(key.to_key_string(), "abc123");
//! let draft = protocol::build(RecordKind::Entry, SigningMode::Automatic, &request).unwrap();
//!
//! let body = draft.to_json();
//! let ids: Vec<String> = serde_json::from_value(body["external_ids"].clone()).unwrap();
//! let claim = protocol::check_signature(RecordKind::Entry, &ids, body["content"].as_str()).unwrap();
//! assert_eq!(claim.public_key, key.public_key());
//! ```

pub mod codec;
pub mod crypto;
pub mod error;
pub mod external_ids;
pub mod keys;
pub mod message;
pub mod protocol;
pub mod status;
pub mod types;

pub use crypto::Signature;
pub use error::{CoreError, KeyError, ValidationError};
pub use external_ids::{ExternalIds, SignedHeader, SIGNATURE_VERSION};
pub use keys::{derive_public_key, validate_checksum, PrivateKey, PublicKey};
pub use message::signed_message;
pub use protocol::{RecordDraft, RecordRequest, SignedClaim, SigningMode};
pub use status::{InvalidReason, VerificationStatus};
pub use types::{RecordKind, SigningTimestamp};
