//! In-memory implementation of the LedgerAccess trait.
//!
//! This is primarily for testing. It answers the same paths as the hosted
//! ledger API and keeps everything in memory with no persistence.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use signed_records_core::codec;

use crate::error::{LedgerError, Result};
use crate::routes::Routes;
use crate::traits::{LedgerAccess, Page, Query};
use crate::wire::{ChainRef, DirectoryBlock, Envelope, IdentityKey, RecordData};

/// Stage reported for every record held by the memory ledger.
pub const MEMORY_STAGE: &str = "replicated";

/// Version reported at the API root.
pub const MEMORY_API_VERSION: &str = "1.0.0";

/// In-memory ledger.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock.
pub struct MemoryLedger {
    routes: Routes,
    inner: RwLock<MemoryLedgerInner>,
}

struct MemoryLedgerInner {
    /// Height reported for newly stored records.
    height: u64,

    /// Chains in creation order.
    chains: Vec<StoredChain>,

    /// Chain id -> index into `chains`.
    chain_index: HashMap<String, usize>,

    /// Identity chain id -> registered keys.
    identity_keys: HashMap<String, Vec<IdentityKey>>,
}

struct StoredChain {
    chain_id: String,
    /// The chain's entries; the first is the chain's own first entry.
    entries: Vec<StoredEntry>,
}

struct StoredEntry {
    entry_hash: String,
    external_ids: Vec<String>,
    content: String,
    height: u64,
}

enum Route<'a> {
    ApiInfo,
    Chains,
    SearchChains,
    Chain(&'a str),
    Entries(&'a str),
    SearchEntries(&'a str),
    FirstEntry(&'a str),
    LastEntry(&'a str),
    Entry(&'a str, &'a str),
    IdentityKeys(&'a str),
}

impl MemoryLedger {
    /// Create an empty ledger at block height 1.
    pub fn new() -> Self {
        Self::with_routes(Routes::default())
    }

    /// Create an empty ledger answering a custom route table.
    pub fn with_routes(routes: Routes) -> Self {
        Self {
            routes,
            inner: RwLock::new(MemoryLedgerInner {
                height: 1,
                chains: Vec::new(),
                chain_index: HashMap::new(),
                identity_keys: HashMap::new(),
            }),
        }
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// The height newly stored records are anchored at.
    pub async fn height(&self) -> u64 {
        self.inner.read().await.height
    }

    /// Move the ledger to a new block height.
    pub async fn set_height(&self, height: u64) {
        self.inner.write().await.height = height;
    }

    /// Register (or replace) a key on an identity chain.
    pub async fn register_identity_key(&self, identity_chain_id: &str, key: IdentityKey) {
        let mut inner = self.inner.write().await;
        let keys = inner
            .identity_keys
            .entry(identity_chain_id.to_string())
            .or_default();
        keys.retain(|k| k.key != key.key);
        keys.push(key);
    }

    /// Retire a registered key at the given height.
    pub async fn retire_identity_key(&self, identity_chain_id: &str, key: &str, height: u64) {
        let mut inner = self.inner.write().await;
        if let Some(k) = inner
            .identity_keys
            .get_mut(identity_chain_id)
            .and_then(|keys| keys.iter_mut().find(|k| k.key == key))
        {
            k.retired_height = Some(height);
        }
    }

    fn route<'a>(&self, path: &'a str) -> Option<Route<'a>> {
        let r = &self.routes;
        if path.is_empty() {
            return Some(Route::ApiInfo);
        }
        if let Some(rest) = path.strip_prefix(r.identities_segment()) {
            let parts: Vec<&str> = rest.strip_prefix('/')?.split('/').collect();
            return match parts[..] {
                [id, keys] if keys == r.keys_segment() => Some(Route::IdentityKeys(id)),
                _ => None,
            };
        }

        let rest = path.strip_prefix(r.chains_segment())?;
        if rest.is_empty() {
            return Some(Route::Chains);
        }
        let parts: Vec<&str> = rest.strip_prefix('/')?.split('/').collect();
        let entries = r.entries_segment();
        match parts[..] {
            [s] if s == r.search_segment() => Some(Route::SearchChains),
            [id] => Some(Route::Chain(id)),
            [id, e] if e == entries => Some(Route::Entries(id)),
            [id, e, s] if e == entries && s == r.search_segment() => Some(Route::SearchEntries(id)),
            [id, e, f] if e == entries && f == r.first_segment() => Some(Route::FirstEntry(id)),
            [id, e, l] if e == entries && l == r.last_segment() => Some(Route::LastEntry(id)),
            [id, e, hash] if e == entries => Some(Route::Entry(id, hash)),
            _ => None,
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedgerInner {
    fn chain(&self, chain_id: &str) -> Result<&StoredChain> {
        self.chain_index
            .get(chain_id)
            .map(|&i| &self.chains[i])
            .ok_or_else(|| LedgerError::NotFound(format!("chain {}", chain_id)))
    }

    fn create_chain(&mut self, body: &Value) -> Result<Value> {
        let (external_ids, content) = parse_record_body(body)?;
        let chain_id = derive_chain_id(&external_ids)?;
        if self.chain_index.contains_key(&chain_id) {
            return Err(LedgerError::Status {
                status: 409,
                body: format!("chain {} already exists", chain_id),
            });
        }

        let entry = StoredEntry::new(&chain_id, external_ids, content, self.height)?;
        let entry_hash = entry.entry_hash.clone();
        self.chain_index.insert(chain_id.clone(), self.chains.len());
        self.chains.push(StoredChain {
            chain_id: chain_id.clone(),
            entries: vec![entry],
        });

        debug!(chain_id = %chain_id, "memory ledger stored chain");
        Ok(json!({
            "chain_id": chain_id,
            "entry_hash": entry_hash,
            "stage": MEMORY_STAGE,
        }))
    }

    fn create_entry(&mut self, chain_id: &str, body: &Value) -> Result<Value> {
        let (external_ids, content) = parse_record_body(body)?;
        let index = *self
            .chain_index
            .get(chain_id)
            .ok_or_else(|| LedgerError::NotFound(format!("chain {}", chain_id)))?;

        let entry = StoredEntry::new(chain_id, external_ids, content, self.height)?;
        let entry_hash = entry.entry_hash.clone();
        self.chains[index].entries.push(entry);

        debug!(chain_id = %chain_id, entry_hash = %entry_hash, "memory ledger stored entry");
        Ok(json!({
            "entry_hash": entry_hash,
            "stage": MEMORY_STAGE,
        }))
    }
}

impl StoredEntry {
    fn new(chain_id: &str, external_ids: Vec<String>, content: String, height: u64) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(chain_id.as_bytes());
        for id in &external_ids {
            hasher.update(decode_field(id)?);
        }
        hasher.update(decode_field(&content)?);

        Ok(Self {
            entry_hash: hex::encode(hasher.finalize()),
            external_ids,
            content,
            height,
        })
    }

    fn to_record(&self, chain_id: &str, as_chain: bool) -> RecordData {
        RecordData {
            chain_id: as_chain.then(|| chain_id.to_string()),
            entry_hash: (!as_chain).then(|| self.entry_hash.clone()),
            chain: (!as_chain).then(|| ChainRef {
                chain_id: chain_id.to_string(),
            }),
            external_ids: self.external_ids.clone(),
            content: Some(self.content.clone()),
            stage: Some(MEMORY_STAGE.to_string()),
            dblock: Some(DirectoryBlock {
                height: self.height,
                keymr: None,
            }),
        }
    }
}

/// Chain ids are the SHA-256 over the concatenated SHA-256 of each decoded
/// external id of the chain's first entry.
fn derive_chain_id(external_ids: &[String]) -> Result<String> {
    let mut outer = Sha256::new();
    for id in external_ids {
        outer.update(Sha256::digest(decode_field(id)?));
    }
    Ok(hex::encode(outer.finalize()))
}

fn decode_field(encoded: &str) -> Result<Vec<u8>> {
    codec::decode(encoded).map_err(|e| bad_request(e.to_string()))
}

fn bad_request(body: impl Into<String>) -> LedgerError {
    LedgerError::Status {
        status: 400,
        body: body.into(),
    }
}

fn parse_record_body(body: &Value) -> Result<(Vec<String>, String)> {
    let external_ids = parse_external_ids(body)?;
    let content = body
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| bad_request("content is required"))?
        .to_string();
    Ok((external_ids, content))
}

fn parse_external_ids(body: &Value) -> Result<Vec<String>> {
    let ids = body
        .get("external_ids")
        .ok_or_else(|| bad_request("external_ids is required"))?;
    Ok(serde_json::from_value(ids.clone())?)
}

fn split_query(path: &str) -> (&str, Query) {
    match path.split_once('?') {
        None => (path, Query::new()),
        Some((base, query)) => {
            let pairs = query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (base, pairs)
        }
    }
}

fn page_slice<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let offset = page.offset.unwrap_or(0) as usize;
    let limit = page.limit.map_or(usize::MAX, |l| l as usize);
    items.into_iter().skip(offset).take(limit).collect()
}

fn list_response(items: Vec<Value>, page: Page) -> Value {
    let count = items.len();
    json!({
        "data": page_slice(items, page),
        "offset": page.offset.unwrap_or(0),
        "limit": page.limit,
        "count": count,
    })
}

fn stage_filter(query: &Query) -> Option<Vec<String>> {
    query
        .get("stages")
        .map(|s| s.split(',').map(str::to_string).collect())
}

fn matches_stages(stages: &Option<Vec<String>>) -> bool {
    stages
        .as_ref()
        .map_or(true, |s| s.iter().any(|stage| stage == MEMORY_STAGE))
}

fn contains_all(haystack: &[String], needles: &[String]) -> bool {
    needles.iter().all(|n| haystack.contains(n))
}

fn envelope(record: RecordData) -> Result<Value> {
    Ok(serde_json::to_value(Envelope { data: record })?)
}

#[async_trait]
impl LedgerAccess for MemoryLedger {
    async fn fetch(&self, path: &str, query: &Query) -> Result<Value> {
        let route = self
            .route(path)
            .ok_or_else(|| LedgerError::NotFound(path.to_string()))?;
        let inner = self.inner.read().await;
        let page = Page::from_query(query);
        let stages = stage_filter(query);

        match route {
            Route::ApiInfo => Ok(json!({
                "version": MEMORY_API_VERSION,
                "links": {
                    "chains": self.routes.chains(),
                },
            })),
            Route::Chains => {
                let items = inner
                    .chains
                    .iter()
                    .filter(|_| matches_stages(&stages))
                    .map(|c| json!({"chain_id": c.chain_id, "stage": MEMORY_STAGE}))
                    .collect();
                Ok(list_response(items, page))
            }
            Route::Chain(chain_id) => {
                let chain = inner.chain(chain_id)?;
                envelope(chain.entries[0].to_record(&chain.chain_id, true))
            }
            Route::Entries(chain_id) => {
                let items = inner
                    .chain(chain_id)?
                    .entries
                    .iter()
                    .filter(|_| matches_stages(&stages))
                    .map(|e| json!({"entry_hash": e.entry_hash, "stage": MEMORY_STAGE}))
                    .collect();
                Ok(list_response(items, page))
            }
            Route::FirstEntry(chain_id) => {
                let chain = inner.chain(chain_id)?;
                envelope(chain.entries[0].to_record(chain_id, false))
            }
            Route::LastEntry(chain_id) => {
                let chain = inner.chain(chain_id)?;
                let last = chain
                    .entries
                    .last()
                    .ok_or_else(|| LedgerError::NotFound(path.to_string()))?;
                envelope(last.to_record(chain_id, false))
            }
            Route::Entry(chain_id, entry_hash) => {
                let entry = inner
                    .chain(chain_id)?
                    .entries
                    .iter()
                    .find(|e| e.entry_hash == entry_hash)
                    .ok_or_else(|| LedgerError::NotFound(format!("entry {}", entry_hash)))?;
                envelope(entry.to_record(chain_id, false))
            }
            Route::IdentityKeys(identity_chain_id) => {
                let keys = inner
                    .identity_keys
                    .get(identity_chain_id)
                    .ok_or_else(|| LedgerError::NotFound(format!("identity {}", identity_chain_id)))?;
                Ok(serde_json::to_value(Envelope { data: keys })?)
            }
            Route::SearchChains | Route::SearchEntries(_) => Err(LedgerError::Status {
                status: 405,
                body: format!("{} only accepts submissions", path),
            }),
        }
    }

    async fn submit(&self, path: &str, body: Value) -> Result<Value> {
        let (base, query) = split_query(path);
        let route = self
            .route(base)
            .ok_or_else(|| LedgerError::NotFound(path.to_string()))?;
        let page = Page::from_query(&query);

        match route {
            Route::Chains => self.inner.write().await.create_chain(&body),
            Route::Entries(chain_id) => self.inner.write().await.create_entry(chain_id, &body),
            Route::SearchChains => {
                let wanted = parse_external_ids(&body)?;
                let inner = self.inner.read().await;
                let items = inner
                    .chains
                    .iter()
                    .filter(|c| contains_all(&c.entries[0].external_ids, &wanted))
                    .map(|c| {
                        json!({
                            "chain_id": c.chain_id,
                            "external_ids": c.entries[0].external_ids,
                            "stage": MEMORY_STAGE,
                        })
                    })
                    .collect();
                Ok(list_response(items, page))
            }
            Route::SearchEntries(chain_id) => {
                let wanted = parse_external_ids(&body)?;
                let inner = self.inner.read().await;
                let items = inner
                    .chain(chain_id)?
                    .entries
                    .iter()
                    .filter(|e| contains_all(&e.external_ids, &wanted))
                    .map(|e| {
                        json!({
                            "entry_hash": e.entry_hash,
                            "external_ids": e.external_ids,
                            "stage": MEMORY_STAGE,
                        })
                    })
                    .collect();
                Ok(list_response(items, page))
            }
            _ => Err(LedgerError::Status {
                status: 405,
                body: format!("{} does not accept submissions", base),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(ids: &[&str], content: &str) -> Value {
        json!({
            "external_ids": ids.iter().map(|id| codec::encode(id)).collect::<Vec<_>>(),
            "content": codec::encode(content),
        })
    }

    #[tokio::test]
    async fn test_api_info() {
        let ledger = MemoryLedger::new();
        let info = ledger.get("").await.unwrap();
        assert_eq!(info["version"], MEMORY_API_VERSION);
        assert_eq!(info["links"]["chains"], "chains");

        let err = ledger.submit("", json!({})).await.unwrap_err();
        assert!(matches!(err, LedgerError::Status { status: 405, .. }));
    }

    #[tokio::test]
    async fn test_create_and_fetch_chain() {
        let ledger = MemoryLedger::new();
        let created = ledger.submit("chains", body(&["a"], "hello")).await.unwrap();
        let chain_id = created["chain_id"].as_str().unwrap();

        let fetched = ledger.get(&format!("chains/{}", chain_id)).await.unwrap();
        let record = RecordData::from_response(&fetched).unwrap();
        assert_eq!(record.chain_id.as_deref(), Some(chain_id));
        assert_eq!(record.content, Some(codec::encode("hello")));
        assert_eq!(record.height(), Some(1));
    }

    #[tokio::test]
    async fn test_chain_id_depends_on_external_ids() {
        let ledger = MemoryLedger::new();
        let a = ledger.submit("chains", body(&["a"], "x")).await.unwrap();
        let b = ledger.submit("chains", body(&["b"], "x")).await.unwrap();
        assert_ne!(a["chain_id"], b["chain_id"]);
    }

    #[tokio::test]
    async fn test_duplicate_chain_rejected() {
        let ledger = MemoryLedger::new();
        ledger.submit("chains", body(&["a"], "x")).await.unwrap();
        let err = ledger.submit("chains", body(&["a"], "y")).await.unwrap_err();
        assert!(matches!(err, LedgerError::Status { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_entries_first_last_and_lookup() {
        let ledger = MemoryLedger::new();
        let created = ledger.submit("chains", body(&["a"], "first")).await.unwrap();
        let chain_id = created["chain_id"].as_str().unwrap().to_string();

        ledger.set_height(7).await;
        let entry = ledger
            .submit(&format!("chains/{}/entries", chain_id), body(&["b"], "second"))
            .await
            .unwrap();
        let entry_hash = entry["entry_hash"].as_str().unwrap();

        let first = ledger.get(&format!("chains/{}/entries/first", chain_id)).await.unwrap();
        assert_eq!(first["data"]["content"], codec::encode("first"));

        let last = ledger.get(&format!("chains/{}/entries/last", chain_id)).await.unwrap();
        assert_eq!(last["data"]["entry_hash"], entry_hash);
        assert_eq!(last["data"]["dblock"]["height"], 7);

        let by_hash = ledger
            .get(&format!("chains/{}/entries/{}", chain_id, entry_hash))
            .await
            .unwrap();
        assert_eq!(by_hash["data"]["chain"]["chain_id"], chain_id);

        let list = ledger.get(&format!("chains/{}/entries", chain_id)).await.unwrap();
        assert_eq!(list["count"], 2);
    }

    #[tokio::test]
    async fn test_entry_on_missing_chain() {
        let ledger = MemoryLedger::new();
        let err = ledger
            .submit("chains/nope/entries", body(&["a"], "x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_search_chains_with_page() {
        let ledger = MemoryLedger::new();
        ledger.submit("chains", body(&["tag", "1"], "x")).await.unwrap();
        ledger.submit("chains", body(&["tag", "2"], "x")).await.unwrap();
        ledger.submit("chains", body(&["other"], "x")).await.unwrap();

        let search = json!({"external_ids": [codec::encode("tag")]});
        let all = ledger.submit("chains/search", search.clone()).await.unwrap();
        assert_eq!(all["count"], 2);

        let paged = ledger.submit("chains/search?limit=1&offset=1", search).await.unwrap();
        assert_eq!(paged["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_identity_keys() {
        let ledger = MemoryLedger::new();
        assert!(ledger.get("identities/id1/keys").await.unwrap_err().is_not_found());

        let key = IdentityKey {
            key: "idpub1".into(),
            activated_height: Some(1),
            retired_height: None,
            priority: Some(0),
        };
        ledger.register_identity_key("id1", key).await;
        ledger.retire_identity_key("id1", "idpub1", 5).await;

        let keys = ledger.get("identities/id1/keys").await.unwrap();
        assert_eq!(keys["data"][0]["key"], "idpub1");
        assert_eq!(keys["data"][0]["retired_height"], 5);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let ledger = MemoryLedger::new();
        assert!(ledger.get("blocks/1").await.unwrap_err().is_not_found());
    }
}
