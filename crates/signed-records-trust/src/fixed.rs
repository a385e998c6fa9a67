//! A trust table held in memory.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signed_records_core::PublicKey;

use crate::error::Result;
use crate::resolver::{AsOf, TrustResolver};

#[derive(Debug, Clone)]
struct Grant {
    key: PublicKey,
    not_before: Option<DateTime<Utc>>,
    not_after: Option<DateTime<Utc>>,
}

impl Grant {
    fn covers(&self, as_of: &AsOf) -> bool {
        if self.not_before.is_none() && self.not_after.is_none() {
            return true;
        }
        // A bounded grant needs a readable timestamp to be checked against.
        let Some(at) = as_of.timestamp.to_datetime() else {
            return false;
        };
        self.not_before.map_or(true, |start| start <= at)
            && self.not_after.map_or(true, |end| at <= end)
    }
}

/// Keys granted to identities up front, optionally bounded by signing time.
///
/// Useful for closed deployments where the set of signers is configuration
/// rather than ledger state.
#[derive(Debug, Clone, Default)]
pub struct StaticTrustResolver {
    grants: HashMap<String, Vec<Grant>>,
}

impl StaticTrustResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorize `key` for `signer_chain_id` with no time bounds.
    pub fn authorize(self, signer_chain_id: impl Into<String>, key: PublicKey) -> Self {
        self.authorize_between(signer_chain_id, key, None, None)
    }

    /// Authorize `key` for records signed within `[not_before, not_after]`.
    pub fn authorize_between(
        mut self,
        signer_chain_id: impl Into<String>,
        key: PublicKey,
        not_before: Option<DateTime<Utc>>,
        not_after: Option<DateTime<Utc>>,
    ) -> Self {
        self.grants.entry(signer_chain_id.into()).or_default().push(Grant {
            key,
            not_before,
            not_after,
        });
        self
    }
}

#[async_trait]
impl TrustResolver for StaticTrustResolver {
    async fn authorized_keys(
        &self,
        signer_chain_id: &str,
        as_of: &AsOf,
    ) -> Result<BTreeSet<PublicKey>> {
        Ok(self
            .grants
            .get(signer_chain_id)
            .into_iter()
            .flatten()
            .filter(|g| g.covers(as_of))
            .map(|g| g.key)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use signed_records_core::{PrivateKey, SigningTimestamp};

    fn at(year: i32) -> AsOf {
        let when = Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap();
        AsOf::new(SigningTimestamp::from_datetime(when), None)
    }

    fn year(y: i32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_unbounded_grant() {
        let key = PrivateKey::from_seed(&[1u8; 32]).public_key();
        let resolver = StaticTrustResolver::new().authorize("id1", key);

        assert!(resolver.is_authorized("id1", &key, &at(2020)).await.unwrap());
        assert!(!resolver.is_authorized("id2", &key, &at(2020)).await.unwrap());
    }

    #[tokio::test]
    async fn test_bounded_grant() {
        let key = PrivateKey::from_seed(&[2u8; 32]).public_key();
        let resolver = StaticTrustResolver::new().authorize_between("id1", key, year(2021), year(2023));

        assert!(!resolver.is_authorized("id1", &key, &at(2020)).await.unwrap());
        assert!(resolver.is_authorized("id1", &key, &at(2022)).await.unwrap());
        assert!(!resolver.is_authorized("id1", &key, &at(2023)).await.unwrap());
    }

    #[tokio::test]
    async fn test_bounded_grant_needs_readable_timestamp() {
        let key = PrivateKey::from_seed(&[3u8; 32]).public_key();
        let resolver = StaticTrustResolver::new().authorize_between("id1", key, year(2021), None);
        let garbled = AsOf::new(SigningTimestamp::from_wire("yesterday"), None);

        assert!(!resolver.is_authorized("id1", &key, &garbled).await.unwrap());
    }
}
