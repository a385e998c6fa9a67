//! Record kinds and signing timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format of a signing timestamp: ISO-8601 UTC with microseconds and no
/// zone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// The two kinds of record the ledger holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A new chain, together with its first entry.
    Chain,
    /// An entry appended to an existing chain.
    Entry,
}

impl RecordKind {
    /// The marker placed in the first external id of a signed record.
    pub const fn marker(self) -> &'static str {
        match self {
            RecordKind::Chain => "SignedChain",
            RecordKind::Entry => "SignedEntry",
        }
    }

    /// Parse a marker back into its record kind.
    pub fn from_marker(marker: &[u8]) -> Option<Self> {
        match marker {
            b"SignedChain" => Some(RecordKind::Chain),
            b"SignedEntry" => Some(RecordKind::Entry),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Chain => f.write_str("chain"),
            RecordKind::Entry => f.write_str("entry"),
        }
    }
}

/// The instant a record was signed, kept in its exact wire text.
///
/// The text is part of the signed message, so it is never re-rendered after
/// capture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SigningTimestamp(String);

impl SigningTimestamp {
    /// Capture the current UTC instant.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Render a specific instant in wire form.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Wrap timestamp text read back from a record, without reformatting.
    pub fn from_wire(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The exact wire text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the text as a UTC instant.
    ///
    /// Accepts the zone-less wire form as well as RFC 3339 text with an
    /// offset. Returns `None` for anything else.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.0, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl fmt::Display for SigningTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
