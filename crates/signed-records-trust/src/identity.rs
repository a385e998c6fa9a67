//! Trust resolution backed by identity chains on the ledger.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Deserialize;
use signed_records_core::PublicKey;
use signed_records_ledger::{Envelope, IdentityKey, LedgerAccess, Routes};
use tracing::{debug, warn};

use crate::error::{Result, TrustError};
use crate::resolver::{AsOf, TrustResolver};

/// Reads an identity's registered keys from the ledger and keeps the ones
/// active at the record's anchoring height.
///
/// An identity the ledger does not know resolves to no keys. Registered keys
/// that do not parse as public keys are skipped.
///
/// Only the anchoring height is consulted; the signing timestamp in
/// [`AsOf`] is ignored. A record not yet anchored is judged against the
/// keys that are not retired now, so a key retired after the record was
/// signed no longer authorizes it.
pub struct IdentityKeyResolver<L> {
    ledger: L,
    routes: Routes,
}

impl<L: LedgerAccess> IdentityKeyResolver<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_routes(ledger, Routes::default())
    }

    pub fn with_routes(ledger: L, routes: Routes) -> Self {
        Self { ledger, routes }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    async fn registered_keys(&self, identity_chain_id: &str) -> Result<Vec<IdentityKey>> {
        let path = self.routes.identity_keys(identity_chain_id);
        let response = match self.ledger.get(&path).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                debug!(identity = identity_chain_id, "identity not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        Envelope::<Vec<IdentityKey>>::deserialize(&response)
            .map(|envelope| envelope.data)
            .map_err(|e| TrustError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl<L: LedgerAccess> TrustResolver for IdentityKeyResolver<L> {
    async fn authorized_keys(
        &self,
        signer_chain_id: &str,
        as_of: &AsOf,
    ) -> Result<BTreeSet<PublicKey>> {
        let registered = self.registered_keys(signer_chain_id).await?;

        let keys: BTreeSet<PublicKey> = registered
            .iter()
            .filter(|k| k.is_active_at(as_of.height))
            .filter_map(|k| match k.key.parse::<PublicKey>() {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!(identity = signer_chain_id, key = %k.key, error = %e, "skipping unparsable identity key");
                    None
                }
            })
            .collect();

        debug!(
            identity = signer_chain_id,
            registered = registered.len(),
            active = keys.len(),
            height = ?as_of.height,
            "resolved identity keys"
        );
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signed_records_core::{PrivateKey, SigningTimestamp};
    use signed_records_ledger::{LedgerError, MemoryLedger, Query};
    use serde_json::{json, Value};

    fn as_of(height: Option<u64>) -> AsOf {
        AsOf::new(SigningTimestamp::from_wire("2024-01-01T00:00:00.000000"), height)
    }

    fn identity_key(key: &PublicKey, activated: u64) -> IdentityKey {
        IdentityKey {
            key: key.to_string(),
            activated_height: Some(activated),
            retired_height: None,
            priority: Some(0),
        }
    }

    #[tokio::test]
    async fn test_unknown_identity_has_no_keys() {
        let resolver = IdentityKeyResolver::new(MemoryLedger::new());
        let keys = resolver.authorized_keys("missing", &as_of(Some(1))).await.unwrap();
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn test_active_keys_only() {
        let ledger = MemoryLedger::new();
        let current = PrivateKey::from_seed(&[1u8; 32]).public_key();
        let retired = PrivateKey::from_seed(&[2u8; 32]).public_key();
        let future = PrivateKey::from_seed(&[3u8; 32]).public_key();

        ledger.register_identity_key("id1", identity_key(&current, 1)).await;
        ledger.register_identity_key("id1", identity_key(&retired, 1)).await;
        ledger.retire_identity_key("id1", &retired.to_string(), 5).await;
        ledger.register_identity_key("id1", identity_key(&future, 100)).await;

        let resolver = IdentityKeyResolver::new(ledger);

        let at_10 = resolver.authorized_keys("id1", &as_of(Some(10))).await.unwrap();
        assert_eq!(at_10, BTreeSet::from([current]));

        let at_3 = resolver.authorized_keys("id1", &as_of(Some(3))).await.unwrap();
        assert_eq!(at_3, BTreeSet::from([current, retired]));

        let pending = resolver.authorized_keys("id1", &as_of(None)).await.unwrap();
        assert_eq!(pending, BTreeSet::from([current, future]));
    }

    #[tokio::test]
    async fn test_signing_time_is_not_consulted() {
        let ledger = MemoryLedger::new();
        let key = PrivateKey::from_seed(&[5u8; 32]).public_key();
        ledger.register_identity_key("id1", identity_key(&key, 1)).await;
        ledger.retire_identity_key("id1", &key.to_string(), 5).await;

        let resolver = IdentityKeyResolver::new(ledger);
        let signed_early = AsOf::new(SigningTimestamp::from_wire("2000-01-01T00:00:00.000000"), None);
        assert!(!resolver.is_authorized("id1", &key, &signed_early).await.unwrap());
        assert!(resolver.is_authorized("id1", &key, &as_of(Some(3))).await.unwrap());
    }

    #[tokio::test]
    async fn test_unparsable_keys_are_skipped() {
        let ledger = MemoryLedger::new();
        let good = PrivateKey::from_seed(&[4u8; 32]).public_key();
        ledger.register_identity_key("id1", identity_key(&good, 0)).await;
        ledger
            .register_identity_key(
                "id1",
                IdentityKey {
                    key: "idpub-not-a-key".into(),
                    activated_height: Some(0),
                    retired_height: None,
                    priority: None,
                },
            )
            .await;

        let resolver = IdentityKeyResolver::new(ledger);
        assert!(resolver.is_authorized("id1", &good, &as_of(Some(1))).await.unwrap());
        let keys = resolver.authorized_keys("id1", &as_of(Some(1))).await.unwrap();
        assert_eq!(keys.len(), 1);
    }

    struct FailingLedger;

    #[async_trait]
    impl LedgerAccess for FailingLedger {
        async fn fetch(&self, _path: &str, _query: &Query) -> signed_records_ledger::Result<Value> {
            Err(LedgerError::Status {
                status: 503,
                body: "unavailable".into(),
            })
        }

        async fn submit(&self, _path: &str, _body: Value) -> signed_records_ledger::Result<Value> {
            Ok(json!({}))
        }
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let resolver = IdentityKeyResolver::new(FailingLedger);
        let err = resolver.authorized_keys("id1", &as_of(Some(1))).await.unwrap_err();
        assert!(matches!(err, TrustError::Ledger(LedgerError::Status { status: 503, .. })));
    }
}
