//! The ledger's path segments, as an immutable configuration value.

use serde::{Deserialize, Serialize};

/// Path segments of the ledger API and the paths built from them.
///
/// A `Routes` is read-only once constructed; deployments with different
/// segment names deserialize their own table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routes {
    chains: String,
    entries: String,
    search: String,
    first: String,
    last: String,
    identities: String,
    keys: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            chains: "chains".into(),
            entries: "entries".into(),
            search: "search".into(),
            first: "first".into(),
            last: "last".into(),
            identities: "identities".into(),
            keys: "keys".into(),
        }
    }
}

impl Routes {
    pub fn chains_segment(&self) -> &str {
        &self.chains
    }

    pub fn entries_segment(&self) -> &str {
        &self.entries
    }

    pub fn search_segment(&self) -> &str {
        &self.search
    }

    pub fn first_segment(&self) -> &str {
        &self.first
    }

    pub fn last_segment(&self) -> &str {
        &self.last
    }

    pub fn identities_segment(&self) -> &str {
        &self.identities
    }

    pub fn keys_segment(&self) -> &str {
        &self.keys
    }

    /// The API root, an empty path.
    pub fn api_info(&self) -> String {
        String::new()
    }

    /// `chains`
    pub fn chains(&self) -> String {
        self.chains.clone()
    }

    /// `chains/{chain_id}`
    pub fn chain(&self, chain_id: &str) -> String {
        [self.chains.as_str(), chain_id].join("/")
    }

    /// `chains/search`
    pub fn search_chains(&self) -> String {
        [self.chains.as_str(), self.search.as_str()].join("/")
    }

    /// `chains/{chain_id}/entries`
    pub fn entries(&self, chain_id: &str) -> String {
        [self.chains.as_str(), chain_id, self.entries.as_str()].join("/")
    }

    /// `chains/{chain_id}/entries/{entry_hash}`
    pub fn entry(&self, chain_id: &str, entry_hash: &str) -> String {
        [self.chains.as_str(), chain_id, self.entries.as_str(), entry_hash].join("/")
    }

    /// `chains/{chain_id}/entries/first`
    pub fn first_entry(&self, chain_id: &str) -> String {
        self.entry(chain_id, &self.first)
    }

    /// `chains/{chain_id}/entries/last`
    pub fn last_entry(&self, chain_id: &str) -> String {
        self.entry(chain_id, &self.last)
    }

    /// `chains/{chain_id}/entries/search`
    pub fn search_entries(&self, chain_id: &str) -> String {
        self.entry(chain_id, &self.search)
    }

    /// `identities/{identity_chain_id}/keys`
    pub fn identity_keys(&self, identity_chain_id: &str) -> String {
        [self.identities.as_str(), identity_chain_id, self.keys.as_str()].join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let routes = Routes::default();
        assert_eq!(routes.api_info(), "");
        assert_eq!(routes.chains(), "chains");
        assert_eq!(routes.chain("abc"), "chains/abc");
        assert_eq!(routes.search_chains(), "chains/search");
        assert_eq!(routes.entries("abc"), "chains/abc/entries");
        assert_eq!(routes.entry("abc", "def"), "chains/abc/entries/def");
        assert_eq!(routes.first_entry("abc"), "chains/abc/entries/first");
        assert_eq!(routes.last_entry("abc"), "chains/abc/entries/last");
        assert_eq!(routes.search_entries("abc"), "chains/abc/entries/search");
        assert_eq!(routes.identity_keys("id1"), "identities/id1/keys");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let routes: Routes = serde_json::from_str(r#"{"chains": "v2/chains"}"#).unwrap();
        assert_eq!(routes.chain("abc"), "v2/chains/abc");
        assert_eq!(routes.entries("abc"), "v2/chains/abc/entries");
    }
}
