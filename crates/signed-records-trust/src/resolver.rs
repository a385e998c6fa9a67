//! TrustResolver trait: which keys may sign for an identity.

use std::collections::BTreeSet;

use async_trait::async_trait;
use signed_records_core::{PublicKey, SigningTimestamp};

use crate::error::Result;

/// The point in time an authorization question is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsOf {
    /// The signing timestamp claimed by the record.
    pub timestamp: SigningTimestamp,
    /// The directory-block height the record was anchored at, once known.
    pub height: Option<u64>,
}

impl AsOf {
    pub fn new(timestamp: SigningTimestamp, height: Option<u64>) -> Self {
        Self { timestamp, height }
    }
}

/// Maps a signer identity to the keys authorized for it.
///
/// Implementations that cache must answer "authorized as of `as_of`"
/// consistently with the identity chain, not with whatever key set happens
/// to be current.
#[async_trait]
pub trait TrustResolver: Send + Sync {
    /// The keys authorized for `signer_chain_id` at `as_of`.
    async fn authorized_keys(
        &self,
        signer_chain_id: &str,
        as_of: &AsOf,
    ) -> Result<BTreeSet<PublicKey>>;

    /// Whether `key` is among the authorized keys.
    async fn is_authorized(
        &self,
        signer_chain_id: &str,
        key: &PublicKey,
        as_of: &AsOf,
    ) -> Result<bool> {
        Ok(self.authorized_keys(signer_chain_id, as_of).await?.contains(key))
    }
}

#[async_trait]
impl<T: TrustResolver + ?Sized> TrustResolver for std::sync::Arc<T> {
    async fn authorized_keys(
        &self,
        signer_chain_id: &str,
        as_of: &AsOf,
    ) -> Result<BTreeSet<PublicKey>> {
        (**self).authorized_keys(signer_chain_id, as_of).await
    }
}
