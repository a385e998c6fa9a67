//! Proptest generators for property-based testing.

use chrono::DateTime;
use proptest::prelude::*;
use serde_json::{json, Value};

use signed_records_core::protocol::{build_at, RecordDraft};
use signed_records_core::{codec, PrivateKey, PublicKey, RecordKind, RecordRequest, SigningMode, SigningTimestamp};

/// Generate a random private key.
pub fn private_key() -> impl Strategy<Value = PrivateKey> {
    any::<[u8; 32]>().prop_map(|seed| PrivateKey::from_seed(&seed))
}

/// Generate a random public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    private_key().prop_map(|k| k.public_key())
}

/// Generate a 64-character hex chain id.
pub fn chain_id() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}".prop_map(String::from)
}

/// Generate non-empty content bytes of at most `max_len`.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=max_len.max(1))
}

/// Generate caller external ids.
pub fn external_ids(max_count: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..=max_count)
}

/// Generate a signing timestamp between 2000 and 2100.
pub fn signing_timestamp() -> impl Strategy<Value = SigningTimestamp> {
    (946_684_800i64..4_102_444_800i64, 0u32..1_000_000u32).prop_filter_map(
        "out of range",
        |(secs, micros)| {
            DateTime::from_timestamp(secs, micros * 1_000).map(SigningTimestamp::from_datetime)
        },
    )
}

/// Generate a RecordKind.
pub fn record_kind() -> impl Strategy<Value = RecordKind> {
    prop_oneof![Just(RecordKind::Chain), Just(RecordKind::Entry)]
}

/// Parameters for generating a signed record.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub key: PrivateKey,
    pub signer_chain_id: String,
    pub kind: RecordKind,
    pub content: Vec<u8>,
    pub external_ids: Vec<Vec<u8>>,
    pub timestamp: SigningTimestamp,
}

impl RecordParams {
    pub fn request(&self) -> RecordRequest {
        RecordRequest::new(self.content.clone())
            .external_ids(self.external_ids.clone())
            .signer(self.key.to_key_string(), self.signer_chain_id.clone())
    }
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            private_key(),
            chain_id(),
            record_kind(),
            content(256),
            external_ids(4),
            signing_timestamp(),
        )
            .prop_map(|(key, signer_chain_id, kind, content, external_ids, timestamp)| RecordParams {
                key,
                signer_chain_id,
                kind,
                content,
                external_ids,
                timestamp,
            })
            .boxed()
    }
}

/// Build the signed record described by `params`.
pub fn signed_draft(params: &RecordParams) -> RecordDraft {
    build_at(
        params.kind,
        SigningMode::Automatic,
        &params.request(),
        params.timestamp.clone(),
    )
    .expect("generated parameters are always valid")
}

/// Wrap a draft the way the ledger returns it, `{"data": {...}}`.
pub fn fetched_record(draft: &RecordDraft) -> Value {
    json!({
        "data": {
            "external_ids": draft.external_ids.encode(),
            "content": codec::encode(&draft.content),
        }
    })
}
