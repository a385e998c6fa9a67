//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use signed_records::{ClientConfig, LedgerClient};
use signed_records_core::{PrivateKey, PublicKey, RecordRequest};
use signed_records_ledger::{IdentityKey, MemoryLedger};
use signed_records_trust::IdentityKeyResolver;

/// A client wired to a memory ledger, resolving keys from that same ledger.
pub type MemoryClient = LedgerClient<Arc<MemoryLedger>, IdentityKeyResolver<Arc<MemoryLedger>>>;

/// A signer: a private key and the identity chain it signs for.
#[derive(Debug, Clone)]
pub struct TestSigner {
    pub key: PrivateKey,
    pub identity_chain_id: String,
}

impl TestSigner {
    /// Create a signer with a random key.
    pub fn new(identity_chain_id: impl Into<String>) -> Self {
        Self {
            key: PrivateKey::generate(),
            identity_chain_id: identity_chain_id.into(),
        }
    }

    /// Create with a deterministic key from seed.
    pub fn with_seed(seed: [u8; 32], identity_chain_id: impl Into<String>) -> Self {
        Self {
            key: PrivateKey::from_seed(&seed),
            identity_chain_id: identity_chain_id.into(),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    /// A request for `content` with this signer declared.
    pub fn request(&self, content: impl Into<String>) -> RecordRequest {
        RecordRequest::new(content.into())
            .signer(self.key.to_key_string(), self.identity_chain_id.clone())
    }

    /// The identity-chain registration for this signer's key.
    pub fn registration(&self, activated_height: u64) -> IdentityKey {
        IdentityKey {
            key: self.public_key().to_string(),
            activated_height: Some(activated_height),
            retired_height: None,
            priority: Some(0),
        }
    }
}

/// A memory ledger with one signer registered on its identity chain.
pub struct TestFixture {
    pub ledger: Arc<MemoryLedger>,
    pub signer: TestSigner,
}

impl TestFixture {
    /// Create a fixture whose signer is active from height 0.
    pub async fn new() -> Self {
        Self::with_signer(TestSigner::new("test-identity")).await
    }

    pub async fn with_signer(signer: TestSigner) -> Self {
        let ledger = Arc::new(MemoryLedger::new());
        ledger
            .register_identity_key(&signer.identity_chain_id, signer.registration(0))
            .await;
        Self { ledger, signer }
    }

    /// A client that signs every record it creates.
    pub fn signing_client(&self) -> MemoryClient {
        self.client(ClientConfig {
            automatic_signing: true,
            ..ClientConfig::default()
        })
    }

    /// A client that passes external ids through unsigned.
    pub fn unsigned_client(&self) -> MemoryClient {
        self.client(ClientConfig::default())
    }

    pub fn client(&self, config: ClientConfig) -> MemoryClient {
        LedgerClient::new(Arc::clone(&self.ledger), config)
    }
}

/// Create several signers with distinct keys and identities.
pub fn multi_party_signers(count: usize) -> Vec<TestSigner> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestSigner::with_seed(seed, format!("identity-{}", i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use signed_records::VerificationMode;

    #[tokio::test]
    async fn test_fixture_signed_chain() {
        let fixture = TestFixture::new().await;
        let client = fixture.signing_client();

        let created = client
            .create_chain(&fixture.signer.request("hello").external_id("tag"))
            .await
            .unwrap();
        let chain_id = created["chain_id"].as_str().unwrap();
        let verdict = client
            .get_chain_info(chain_id, &VerificationMode::Default)
            .await
            .unwrap();

        assert!(verdict.is_valid());
    }

    #[tokio::test]
    async fn test_unsigned_client_ignores_signer() {
        let fixture = TestFixture::new().await;
        let client = fixture.unsigned_client();

        let created = client
            .create_chain(&fixture.signer.request("hello").external_id("tag"))
            .await
            .unwrap();
        let chain_id = created["chain_id"].as_str().unwrap();
        let verdict = client
            .get_chain_info(chain_id, &VerificationMode::Default)
            .await
            .unwrap();

        assert_eq!(verdict.status.as_str(), "not_signed/invalid_chain_format");
    }

    #[tokio::test]
    async fn test_multi_party() {
        let parties = multi_party_signers(3);

        let pks: Vec<_> = parties.iter().map(|p| p.public_key()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);
        assert_ne!(parties[0].identity_chain_id, parties[1].identity_chain_id);
    }

    #[tokio::test]
    async fn test_other_party_is_not_authorized() {
        let parties = multi_party_signers(2);
        let fixture = TestFixture::with_signer(parties[0].clone()).await;
        let client = fixture.signing_client();

        // signs for party 0's identity with party 1's key
        let forged = RecordRequest::new("hello")
            .signer(parties[1].key.to_key_string(), parties[0].identity_chain_id.clone());
        let created = client.create_chain(&forged).await.unwrap();
        let verdict = client
            .get_chain_info(created["chain_id"].as_str().unwrap(), &VerificationMode::Default)
            .await
            .unwrap();

        assert_eq!(verdict.status.as_str(), "key_not_found");
    }
}
