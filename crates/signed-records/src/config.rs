//! Client configuration.

use serde::{Deserialize, Serialize};
use signed_records_core::SigningMode;
use signed_records_ledger::Routes;

/// Configuration for a [`LedgerClient`](crate::LedgerClient).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prepend a signing header to every chain and entry this client builds.
    pub automatic_signing: bool,
    /// Path segments of the ledger API.
    pub routes: Routes,
}

impl ClientConfig {
    /// Load from a JSON document. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn signing_mode(&self) -> SigningMode {
        SigningMode::from(self.automatic_signing)
    }
}
