//! Building signed records and checking them when they are read back.
//!
//! Chains and entries share one implementation, parameterized by
//! [`RecordKind`], so the marker and version logic cannot drift between them.

use bytes::Bytes;
use serde_json::{json, Value};
use std::fmt;

use crate::codec;
use crate::crypto::{self, Signature};
use crate::error::{CoreError, ValidationError};
use crate::external_ids::{ExternalIds, SignedHeader, SIGNATURE_VERSION, SIGNED_HEADER_LEN};
use crate::keys::{self, PrivateKey, PublicKey};
use crate::message::signed_message;
use crate::status::InvalidReason;
use crate::types::{RecordKind, SigningTimestamp};

/// Whether records built in a session are signed automatically.
///
/// This is a property of the caller's session, not of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningMode {
    /// External ids are passed through as given. A signer key pair may still
    /// be declared, but nothing is signed.
    #[default]
    Unsigned,
    /// A signing header is prepended to the caller's external ids.
    Automatic,
}

impl From<bool> for SigningMode {
    fn from(automatic_signing: bool) -> Self {
        if automatic_signing {
            SigningMode::Automatic
        } else {
            SigningMode::Unsigned
        }
    }
}

/// The caller's inputs for a new chain or entry.
#[derive(Clone, Default)]
pub struct RecordRequest {
    content: Bytes,
    external_ids: Vec<Bytes>,
    signer_private_key: Option<String>,
    signer_chain_id: Option<String>,
}

impl RecordRequest {
    /// Start a request with the given content.
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Append a caller external id.
    pub fn external_id(mut self, id: impl Into<Bytes>) -> Self {
        self.external_ids.push(id.into());
        self
    }

    /// Append several caller external ids, in order.
    pub fn external_ids<I, B>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.external_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Set the signer's `idsec...` private key.
    pub fn signer_private_key(mut self, key: impl Into<String>) -> Self {
        self.signer_private_key = Some(key.into());
        self
    }

    /// Set the signer's identity chain id.
    pub fn signer_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.signer_chain_id = Some(chain_id.into());
        self
    }

    /// Set both halves of the signer declaration.
    pub fn signer(self, private_key: impl Into<String>, chain_id: impl Into<String>) -> Self {
        self.signer_private_key(private_key).signer_chain_id(chain_id)
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn caller_external_ids(&self) -> &[Bytes] {
        &self.external_ids
    }

    fn private_key(&self) -> Option<&str> {
        self.signer_private_key.as_deref().filter(|k| !k.is_empty())
    }

    fn chain_id(&self) -> Option<&str> {
        self.signer_chain_id.as_deref().filter(|c| !c.is_empty())
    }

    /// Check the request's preconditions for the given mode.
    pub fn validate(&self, mode: SigningMode) -> Result<(), ValidationError> {
        match mode {
            SigningMode::Automatic => {
                let key = self
                    .private_key()
                    .ok_or(ValidationError::SignerPrivateKeyRequired)?;
                if !keys::validate_checksum(key) {
                    return Err(ValidationError::SignerPrivateKeyInvalid);
                }
                if self.chain_id().is_none() {
                    return Err(ValidationError::SignerChainIdRequired);
                }
            }
            SigningMode::Unsigned => {
                if self.external_ids.is_empty() {
                    return Err(ValidationError::ExternalIdsRequired);
                }
                match (self.private_key(), self.chain_id()) {
                    (Some(_), None) => return Err(ValidationError::SignerChainIdRequiredWithKey),
                    (None, Some(_)) => {
                        return Err(ValidationError::SignerPrivateKeyRequiredWithChainId)
                    }
                    (Some(key), Some(_)) if !keys::validate_checksum(key) => {
                        return Err(ValidationError::SignerPrivateKeyInvalid)
                    }
                    _ => {}
                }
            }
        }
        if self.content.is_empty() {
            return Err(ValidationError::ContentRequired);
        }
        Ok(())
    }
}

impl fmt::Debug for RecordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRequest")
            .field("content_len", &self.content.len())
            .field("external_ids", &self.external_ids.len())
            .field("signer_private_key", &self.signer_private_key.as_ref().map(|_| "<redacted>"))
            .field("signer_chain_id", &self.signer_chain_id)
            .finish()
    }
}

/// A record ready to submit to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub kind: RecordKind,
    pub external_ids: ExternalIds,
    pub content: Bytes,
}

impl RecordDraft {
    /// The request body: `{"external_ids": [...], "content": "..."}`.
    pub fn to_json(&self) -> Value {
        json!({
            "external_ids": self.external_ids.encode(),
            "content": codec::encode(&self.content),
        })
    }
}

/// Build a record, signing it with the current time in automatic mode.
pub fn build(
    kind: RecordKind,
    mode: SigningMode,
    request: &RecordRequest,
) -> Result<RecordDraft, CoreError> {
    build_at(kind, mode, request, SigningTimestamp::now())
}

/// Build a record using an explicit signing timestamp.
///
/// All preconditions are checked before any key material is used.
pub fn build_at(
    kind: RecordKind,
    mode: SigningMode,
    request: &RecordRequest,
    timestamp: SigningTimestamp,
) -> Result<RecordDraft, CoreError> {
    request.validate(mode)?;

    let caller_ids = request.external_ids.clone();
    let external_ids = match mode {
        SigningMode::Unsigned => ExternalIds::Unsigned(caller_ids),
        SigningMode::Automatic => {
            let (Some(key), Some(signer_chain_id)) = (request.private_key(), request.chain_id())
            else {
                // validate() guarantees both are present in automatic mode
                return Err(ValidationError::SignerPrivateKeyRequired.into());
            };
            let private_key: PrivateKey = key.parse()?;

            let message = signed_message(signer_chain_id, &request.content, timestamp.as_str());
            let signature = crypto::sign(&private_key, &message);
            let public_key = private_key.public_key();

            ExternalIds::Signed {
                header: SignedHeader::new(
                    kind,
                    signer_chain_id,
                    public_key.to_string(),
                    &signature,
                    timestamp,
                ),
                extras: caller_ids,
            }
        }
    };

    Ok(RecordDraft {
        kind,
        external_ids,
        content: request.content.clone(),
    })
}

/// The signer claims of a record whose signature checked out.
///
/// Whether the key is authorized for the identity is a separate question,
/// answered by the identity chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedClaim {
    pub signer_chain_id: String,
    pub public_key: PublicKey,
    pub timestamp: SigningTimestamp,
}

/// Check the signing header of a fetched record.
///
/// `external_ids` and `content` are the record's wire fields. A record with
/// no content is checked against empty content.
pub fn check_signature(
    kind: RecordKind,
    external_ids: &[String],
    content: Option<&str>,
) -> Result<SignedClaim, InvalidReason> {
    // Caller ids after the header are opaque and never affect the verdict.
    let header_ids = external_ids
        .get(..SIGNED_HEADER_LEN)
        .ok_or(InvalidReason::NotSigned(kind))?;
    let ids = ExternalIds::decode(header_ids).map_err(|_| InvalidReason::NotSigned(kind))?;
    let header = ids.header().ok_or(InvalidReason::NotSigned(kind))?;
    if header.kind != kind {
        return Err(InvalidReason::NotSigned(kind));
    }
    if header.version != SIGNATURE_VERSION {
        return Err(InvalidReason::UnsupportedVersion(header.version));
    }

    let content = match content {
        Some(encoded) => codec::decode(encoded).map_err(|_| InvalidReason::InvalidSignature)?,
        None => Vec::new(),
    };
    let message = signed_message(&header.signer_chain_id, &content, header.timestamp.as_str());

    let public_key: PublicKey = header
        .public_key
        .parse()
        .map_err(|_| InvalidReason::InvalidSignature)?;
    let signature = Signature::from_slice(&header.signature).ok_or(InvalidReason::InvalidSignature)?;
    if !crypto::verify(&public_key, &message, &signature) {
        return Err(InvalidReason::InvalidSignature);
    }

    Ok(SignedClaim {
        signer_chain_id: header.signer_chain_id.clone(),
        public_key,
        timestamp: header.timestamp.clone(),
    })
}
