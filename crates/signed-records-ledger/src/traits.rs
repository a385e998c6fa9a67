//! LedgerAccess trait: the two primitives the signing layer consumes.
//!
//! Transport, authentication, retry and deadlines all live behind this trait.
//! Implementations include HTTP clients (outside this workspace) and
//! [`MemoryLedger`](crate::MemoryLedger) for tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Query parameters for a fetch, ordered for stable request strings.
pub type Query = BTreeMap<String, String>;

/// Async access to the ledger's HTTP-shaped API.
///
/// Paths are relative (`chains/{id}/entries`), without a leading slash.
#[async_trait]
pub trait LedgerAccess: Send + Sync {
    /// Read a resource.
    async fn fetch(&self, path: &str, query: &Query) -> Result<Value>;

    /// Post a JSON body to a resource.
    async fn submit(&self, path: &str, body: Value) -> Result<Value>;

    /// Read a resource with no query parameters.
    async fn get(&self, path: &str) -> Result<Value> {
        self.fetch(path, &Query::new()).await
    }
}

#[async_trait]
impl<L: LedgerAccess + ?Sized> LedgerAccess for std::sync::Arc<L> {
    async fn fetch(&self, path: &str, query: &Query) -> Result<Value> {
        (**self).fetch(path, query).await
    }

    async fn submit(&self, path: &str, body: Value) -> Result<Value> {
        (**self).submit(path, body).await
    }
}

/// Optional limit/offset window forwarded to list and search endpoints.
///
/// The ledger owns the paging semantics; this only carries the numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Add `limit` / `offset` to a query map.
    pub fn apply(&self, query: &mut Query) {
        if let Some(limit) = self.limit {
            query.insert("limit".into(), limit.to_string());
        }
        if let Some(offset) = self.offset {
            query.insert("offset".into(), offset.to_string());
        }
    }

    /// Append `?limit=..&offset=..` to a path, for endpoints taking a body.
    pub fn append_to(&self, path: &str) -> String {
        let mut query = Query::new();
        self.apply(&mut query);
        if query.is_empty() {
            return path.to_string();
        }
        let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{}?{}", path, pairs.join("&"))
    }

    /// Read `limit` / `offset` back out of query pairs.
    pub fn from_query(query: &Query) -> Self {
        Self {
            limit: query.get("limit").and_then(|v| v.parse().ok()),
            offset: query.get("offset").and_then(|v| v.parse().ok()),
        }
    }
}
