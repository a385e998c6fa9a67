//! JSON shapes returned by the ledger API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{"data": ...}` wrapper around single-resource responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Reference from an entry to the chain it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRef {
    pub chain_id: String,
}

/// The directory block a record was anchored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryBlock {
    pub height: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keymr: Option<String>,
}

/// A chain or entry as read back from the ledger.
///
/// Chains report `chain_id`; entries report `entry_hash` and `chain`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<ChainRef>,
    #[serde(default)]
    pub external_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dblock: Option<DirectoryBlock>,
}

impl RecordData {
    /// Parse an enveloped record response.
    pub fn from_response(response: &Value) -> Result<Self, serde_json::Error> {
        Envelope::<RecordData>::deserialize(response).map(|e| e.data)
    }

    /// The directory-block height, if the record has been anchored.
    pub fn height(&self) -> Option<u64> {
        self.dblock.as_ref().map(|d| d.height)
    }
}

/// One key registered on an identity chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityKey {
    pub key: String,
    #[serde(default)]
    pub activated_height: Option<u64>,
    #[serde(default)]
    pub retired_height: Option<u64>,
    #[serde(default)]
    pub priority: Option<u32>,
}

impl IdentityKey {
    /// Whether the key could sign at the given block height.
    ///
    /// With no height (a record not yet anchored), any key that has not been
    /// retired counts.
    pub fn is_active_at(&self, height: Option<u64>) -> bool {
        match height {
            None => self.retired_height.is_none(),
            Some(h) => {
                let activated = self.activated_height.is_some_and(|a| a <= h);
                let not_retired = self.retired_height.map_or(true, |r| h <= r);
                activated && not_retired
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(activated: Option<u64>, retired: Option<u64>) -> IdentityKey {
        IdentityKey {
            key: "idpub".into(),
            activated_height: activated,
            retired_height: retired,
            priority: Some(1),
        }
    }

    #[test]
    fn test_parse_entry_response() {
        let response = json!({
            "data": {
                "entry_hash": "e1",
                "chain": {"chain_id": "c1"},
                "external_ids": ["YQ=="],
                "content": "aGk=",
                "stage": "factom",
                "dblock": {"height": 42, "keymr": "k"}
            }
        });
        let record = RecordData::from_response(&response).unwrap();
        assert_eq!(record.entry_hash.as_deref(), Some("e1"));
        assert_eq!(record.chain.as_ref().unwrap().chain_id, "c1");
        assert_eq!(record.height(), Some(42));
    }

    #[test]
    fn test_parse_minimal_chain_response() {
        let record = RecordData::from_response(&json!({"data": {"chain_id": "c1"}})).unwrap();
        assert!(record.external_ids.is_empty());
        assert_eq!(record.height(), None);
    }

    #[test]
    fn test_missing_envelope_is_an_error() {
        assert!(RecordData::from_response(&json!({"chain_id": "c1"})).is_err());
    }

    #[test]
    fn test_key_activity_window() {
        assert!(key(Some(10), None).is_active_at(Some(10)));
        assert!(key(Some(10), None).is_active_at(Some(500)));
        assert!(!key(Some(10), None).is_active_at(Some(9)));
        assert!(key(Some(10), Some(20)).is_active_at(Some(20)));
        assert!(!key(Some(10), Some(20)).is_active_at(Some(21)));
        assert!(!key(None, None).is_active_at(Some(5)));
    }

    #[test]
    fn test_key_activity_without_height() {
        assert!(key(None, None).is_active_at(None));
        assert!(!key(Some(1), Some(2)).is_active_at(None));
    }
}
