//! The external id list attached to every chain and entry.
//!
//! A signed record carries a fixed six-element header ahead of the caller's
//! own ids:
//!
//! | index | content                              |
//! |-------|--------------------------------------|
//! | 0     | marker (`SignedChain` / `SignedEntry`) |
//! | 1     | version byte (`0x01`)                |
//! | 2     | signer identity chain id             |
//! | 3     | signer public key (`idpub...`)       |
//! | 4     | signature (64 raw bytes)             |
//! | 5     | signing timestamp                    |
//! | 6..   | caller-supplied ids                  |
//!
//! Every element travels base64-encoded. Decoding is explicit: a list either
//! parses into [`ExternalIds::Signed`] or is kept as [`ExternalIds::Unsigned`].

use bytes::Bytes;

use crate::codec;
use crate::crypto::Signature;
use crate::error::CoreError;
use crate::types::{RecordKind, SigningTimestamp};

/// The only signing layout version this crate produces or accepts.
pub const SIGNATURE_VERSION: u8 = 0x01;

/// Number of positional elements in a signed header.
pub const SIGNED_HEADER_LEN: usize = 6;

/// The decoded signing header of a record.
///
/// Fields hold what was read off the wire. The public key and signature are
/// kept unparsed so a malformed value surfaces as a failed signature check
/// rather than a decoding error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeader {
    pub kind: RecordKind,
    pub version: u8,
    pub signer_chain_id: String,
    pub public_key: String,
    pub signature: Bytes,
    pub timestamp: SigningTimestamp,
}

impl SignedHeader {
    /// Construct the header for a freshly signed record.
    pub fn new(
        kind: RecordKind,
        signer_chain_id: impl Into<String>,
        public_key: impl Into<String>,
        signature: &Signature,
        timestamp: SigningTimestamp,
    ) -> Self {
        Self {
            kind,
            version: SIGNATURE_VERSION,
            signer_chain_id: signer_chain_id.into(),
            public_key: public_key.into(),
            signature: Bytes::copy_from_slice(signature.as_ref()),
            timestamp,
        }
    }
}

/// An external id list, either plain or carrying a signing header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalIds {
    Unsigned(Vec<Bytes>),
    Signed {
        header: SignedHeader,
        extras: Vec<Bytes>,
    },
}

impl ExternalIds {
    /// The caller-supplied ids (everything after a signing header).
    pub fn caller_ids(&self) -> &[Bytes] {
        match self {
            ExternalIds::Unsigned(ids) => ids,
            ExternalIds::Signed { extras, .. } => extras,
        }
    }

    /// The signing header, if any.
    pub fn header(&self) -> Option<&SignedHeader> {
        match self {
            ExternalIds::Unsigned(_) => None,
            ExternalIds::Signed { header, .. } => Some(header),
        }
    }

    /// Total number of ids on the wire.
    pub fn len(&self) -> usize {
        match self {
            ExternalIds::Unsigned(ids) => ids.len(),
            ExternalIds::Signed { extras, .. } => SIGNED_HEADER_LEN + extras.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode into the ordered wire list.
    pub fn encode(&self) -> Vec<String> {
        let mut wire = Vec::with_capacity(self.len());
        if let ExternalIds::Signed { header, .. } = self {
            wire.push(codec::encode(header.kind.marker()));
            wire.push(codec::encode([header.version]));
            wire.push(codec::encode(&header.signer_chain_id));
            wire.push(codec::encode(&header.public_key));
            // raw 64 bytes, base64 like every other element
            wire.push(codec::encode(&header.signature));
            wire.push(codec::encode(header.timestamp.as_str()));
        }
        wire.extend(self.caller_ids().iter().map(|id| codec::encode(id)));
        wire
    }

    /// Decode a wire list.
    ///
    /// Fails only when an element is not valid base64. A list whose first six
    /// elements do not have the shape of a signing header (recognised marker,
    /// single version byte, UTF-8 text fields) decodes as `Unsigned`.
    pub fn decode(wire: &[String]) -> Result<Self, CoreError> {
        let raw = wire
            .iter()
            .map(|id| codec::decode(id).map(Bytes::from))
            .collect::<Result<Vec<_>, _>>()?;

        match parse_header(&raw) {
            Some(header) => Ok(ExternalIds::Signed {
                header,
                extras: raw[SIGNED_HEADER_LEN..].to_vec(),
            }),
            None => Ok(ExternalIds::Unsigned(raw)),
        }
    }
}

fn parse_header(raw: &[Bytes]) -> Option<SignedHeader> {
    if raw.len() < SIGNED_HEADER_LEN {
        return None;
    }
    let kind = RecordKind::from_marker(&raw[0])?;
    let [version] = &raw[1][..] else {
        return None;
    };
    let text = |b: &Bytes| std::str::from_utf8(b).ok().map(str::to_owned);

    Some(SignedHeader {
        kind,
        version: *version,
        signer_chain_id: text(&raw[2])?,
        public_key: text(&raw[3])?,
        signature: raw[4].clone(),
        timestamp: SigningTimestamp::from_wire(text(&raw[5])?),
    })
}
