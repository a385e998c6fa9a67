//! The LedgerClient: creating and reading signed chains and entries.

use serde_json::{json, Value};
use signed_records_core::protocol::{build, RecordRequest};
use signed_records_core::{codec, RecordKind, SigningMode, ValidationError};
use signed_records_ledger::{LedgerAccess, Page, Query, Routes};
use signed_records_trust::{IdentityKeyResolver, TrustResolver};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::verify::{verify_record, VerificationMode, Verdict};

/// Client for a ledger of signed records.
///
/// Provides:
/// - Creating chains and entries, signed when the session asks for it
/// - Reading chains and entries back with a verification verdict
/// - Listing and searching
///
/// All input validation happens before the ledger is contacted.
pub struct LedgerClient<L, T> {
    ledger: L,
    trust: T,
    config: ClientConfig,
}

impl<L> LedgerClient<L, IdentityKeyResolver<L>>
where
    L: LedgerAccess + Clone,
{
    /// Create a client that resolves signer keys from identity chains on
    /// the same ledger.
    pub fn new(ledger: L, config: ClientConfig) -> Self {
        let trust = IdentityKeyResolver::with_routes(ledger.clone(), config.routes.clone());
        Self::with_trust(ledger, trust, config)
    }
}

impl<L, T> LedgerClient<L, T>
where
    L: LedgerAccess,
    T: TrustResolver,
{
    /// Create a client with an explicit trust resolver.
    pub fn with_trust(ledger: L, trust: T, config: ClientConfig) -> Self {
        Self {
            ledger,
            trust,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn trust(&self) -> &T {
        &self.trust
    }

    pub fn signing_mode(&self) -> SigningMode {
        self.config.signing_mode()
    }

    fn routes(&self) -> &Routes {
        &self.config.routes
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Create Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new chain whose first entry is `request`.
    pub async fn create_chain(&self, request: &RecordRequest) -> Result<Value> {
        let draft = build(RecordKind::Chain, self.signing_mode(), request)?;
        info!(
            signed = draft.external_ids.header().is_some(),
            external_ids = draft.external_ids.len(),
            "creating chain"
        );
        Ok(self.ledger.submit(&self.routes().chains(), draft.to_json()).await?)
    }

    /// Append an entry to an existing chain.
    pub async fn create_entry(&self, chain_id: &str, request: &RecordRequest) -> Result<Value> {
        require_chain_id(chain_id)?;
        let draft = build(RecordKind::Entry, self.signing_mode(), request)?;
        info!(
            chain_id,
            signed = draft.external_ids.header().is_some(),
            external_ids = draft.external_ids.len(),
            "creating entry"
        );
        Ok(self
            .ledger
            .submit(&self.routes().entries(chain_id), draft.to_json())
            .await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verified Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch a chain and determine whether its first entry is validly signed.
    pub async fn get_chain_info(&self, chain_id: &str, mode: &VerificationMode) -> Result<Verdict> {
        require_chain_id(chain_id)?;
        let record = self.ledger.get(&self.routes().chain(chain_id)).await?;
        self.verdict(RecordKind::Chain, record, mode).await
    }

    /// Fetch an entry and determine whether it is validly signed.
    pub async fn get_entry_info(
        &self,
        chain_id: &str,
        entry_hash: &str,
        mode: &VerificationMode,
    ) -> Result<Verdict> {
        require_chain_id(chain_id)?;
        if entry_hash.is_empty() {
            return Err(ValidationError::EntryHashRequired.into());
        }
        let record = self
            .ledger
            .get(&self.routes().entry(chain_id, entry_hash))
            .await?;
        self.verdict(RecordKind::Entry, record, mode).await
    }

    async fn verdict(&self, kind: RecordKind, record: Value, mode: &VerificationMode) -> Result<Verdict> {
        let status = verify_record(kind, &record, mode, &self.trust).await?;
        debug!(kind = %kind, status = %status, "verified record");
        Ok(Verdict { record, status })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Plain Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Version and link information from the ledger API root.
    pub async fn get_api_info(&self) -> Result<Value> {
        Ok(self.ledger.get(&self.routes().api_info()).await?)
    }

    /// List the entries of a chain.
    ///
    /// `stages` filters by replication stage; empty means no filter.
    pub async fn get_entries(&self, chain_id: &str, page: Page, stages: &[&str]) -> Result<Value> {
        require_chain_id(chain_id)?;
        let query = list_query(page, stages);
        Ok(self.ledger.fetch(&self.routes().entries(chain_id), &query).await?)
    }

    /// List all chains.
    pub async fn get_all_chains(&self, page: Page, stages: &[&str]) -> Result<Value> {
        let query = list_query(page, stages);
        Ok(self.ledger.fetch(&self.routes().chains(), &query).await?)
    }

    pub async fn get_first_entry(&self, chain_id: &str) -> Result<Value> {
        require_chain_id(chain_id)?;
        Ok(self.ledger.get(&self.routes().first_entry(chain_id)).await?)
    }

    pub async fn get_last_entry(&self, chain_id: &str) -> Result<Value> {
        require_chain_id(chain_id)?;
        Ok(self.ledger.get(&self.routes().last_entry(chain_id)).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Find chains whose first entry carries all of `external_ids`.
    pub async fn search_chains<B>(&self, external_ids: &[B], page: Page) -> Result<Value>
    where
        B: AsRef<[u8]>,
    {
        let body = search_body(external_ids)?;
        let path = page.append_to(&self.routes().search_chains());
        Ok(self.ledger.submit(&path, body).await?)
    }

    /// Find entries of a chain that carry all of `external_ids`.
    pub async fn search_entries<B>(&self, chain_id: &str, external_ids: &[B], page: Page) -> Result<Value>
    where
        B: AsRef<[u8]>,
    {
        require_chain_id(chain_id)?;
        let body = search_body(external_ids)?;
        let path = page.append_to(&self.routes().search_entries(chain_id));
        Ok(self.ledger.submit(&path, body).await?)
    }
}

fn require_chain_id(chain_id: &str) -> Result<()> {
    if chain_id.is_empty() {
        return Err(ValidationError::ChainIdRequired.into());
    }
    Ok(())
}

fn list_query(page: Page, stages: &[&str]) -> Query {
    let mut query = Query::new();
    page.apply(&mut query);
    if !stages.is_empty() {
        query.insert("stages".into(), stages.join(","));
    }
    query
}

fn search_body<B: AsRef<[u8]>>(external_ids: &[B]) -> Result<Value> {
    if external_ids.is_empty() {
        return Err(ValidationError::ExternalIdsRequired.into());
    }
    let encoded: Vec<String> = external_ids.iter().map(|id| codec::encode(id)).collect();
    Ok(json!({ "external_ids": encoded }))
}
