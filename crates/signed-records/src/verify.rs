//! Verifying fetched records.
//!
//! The signature check itself is synchronous and lives in the core crate.
//! This module adds the caller's choice of verification mode and the key
//! authorization lookup, and packages the outcome as a [`Verdict`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use signed_records_core::protocol::check_signature;
use signed_records_core::{InvalidReason, RecordKind, VerificationStatus};
use signed_records_ledger::RecordData;
use signed_records_trust::{AsOf, TrustResolver};
use tracing::debug;

use crate::error::{ClientError, Result};

/// A caller-supplied check that maps a raw record to a status.
pub type StatusPredicate = dyn Fn(&Value) -> VerificationStatus + Send + Sync;

/// How a fetched record is checked.
#[derive(Clone, Default)]
pub enum VerificationMode {
    /// Return the record without checking it.
    Skip,
    /// Check the signing header and the key's authorization.
    #[default]
    Default,
    /// Use the caller's predicate. Its status is returned as-is.
    Custom(Arc<StatusPredicate>),
}

impl VerificationMode {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> VerificationStatus + Send + Sync + 'static,
    {
        VerificationMode::Custom(Arc::new(predicate))
    }
}

impl fmt::Debug for VerificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationMode::Skip => f.write_str("Skip"),
            VerificationMode::Default => f.write_str("Default"),
            VerificationMode::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A fetched record together with its trust determination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub record: Value,
    pub status: VerificationStatus,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }
}

/// Determine the status of a fetched record under `mode`.
///
/// `record` is the ledger's response, `{"data": {...}}`. Only a response of
/// the wrong shape or a failed key lookup is an error.
pub async fn verify_record<T>(
    kind: RecordKind,
    record: &Value,
    mode: &VerificationMode,
    trust: &T,
) -> Result<VerificationStatus>
where
    T: TrustResolver + ?Sized,
{
    match mode {
        VerificationMode::Skip => Ok(VerificationStatus::Unchecked),
        VerificationMode::Custom(predicate) => Ok(predicate(record)),
        VerificationMode::Default => default_status(kind, record, trust).await,
    }
}

async fn default_status<T>(kind: RecordKind, record: &Value, trust: &T) -> Result<VerificationStatus>
where
    T: TrustResolver + ?Sized,
{
    let data = RecordData::from_response(record)
        .map_err(|e| ClientError::UnexpectedResponse(e.to_string()))?;

    let claim = match check_signature(kind, &data.external_ids, data.content.as_deref()) {
        Ok(claim) => claim,
        Err(reason) => return Ok(reason.into()),
    };

    let as_of = AsOf::new(claim.timestamp, data.height());
    let authorized = trust
        .authorized_keys(&claim.signer_chain_id, &as_of)
        .await?
        .contains(&claim.public_key);

    debug!(
        signer = %claim.signer_chain_id,
        key = %claim.public_key,
        authorized,
        "checked record signature"
    );

    if authorized {
        Ok(VerificationStatus::Valid)
    } else {
        Ok(InvalidReason::UnauthorizedKey.into())
    }
}
