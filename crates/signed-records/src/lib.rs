//! # Signed Records
//!
//! Signed chains and entries on an append-only ledger.
//!
//! ## Overview
//!
//! A record's external ids can carry a signing header that binds the record's
//! content to a signer identity (itself a chain on the ledger) and a moment in
//! time. This crate:
//!
//! - **Builds** chains and entries, prepending the header when the session
//!   signs automatically
//! - **Submits** them through a [`LedgerAccess`] implementation
//! - **Verifies** fetched records, checking both the Ed25519 signature and
//!   whether the key was authorized for the identity at signing time
//!
//! ## Key Concepts
//!
//! - **Signing header**: six external ids in front of the caller's own:
//!   marker, version, signer chain id, public key, signature, timestamp.
//! - **Verdict**: a fetched record paired with its verification status.
//!   A bad signature is a status, not an error.
//! - **Trust resolver**: maps a signer identity to its authorized keys.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use signed_records::core::PrivateKey;
//! use signed_records::ledger::MemoryLedger;
//! use signed_records::{ClientConfig, LedgerClient, RecordRequest, VerificationMode};
//!
//! async fn example() -> signed_records::Result<()> {
//!     let config = ClientConfig {
//!         automatic_signing: true,
//!         ..ClientConfig::default()
//!     };
//!     let client = LedgerClient::new(Arc::new(MemoryLedger::new()), config);
//!
//!     let key = PrivateKey::generate();
//!     let request = RecordRequest::new("hello")
//!         .external_id("greeting")
//!         .signer(key.to_key_string(), "abc123");
//!     let created = client.create_chain(&request).await?;
//!
//!     let chain_id = created["chain_id"].as_str().unwrap_or_default();
//!     let verdict = client
//!         .get_chain_info(chain_id, &VerificationMode::Default)
//!         .await?;
//!     println!("{}", verdict.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `signed_records::core` - Keys, encoding, signing, the record protocol
//! - `signed_records::ledger` - Ledger access trait, routes, in-memory ledger
//! - `signed_records::trust` - Trust resolvers

pub mod client;
pub mod config;
pub mod error;
pub mod verify;

// Re-export component crates
pub use signed_records_core as core;
pub use signed_records_ledger as ledger;
pub use signed_records_trust as trust;

// Re-export main types for convenience
pub use client::LedgerClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use verify::{verify_record, StatusPredicate, VerificationMode, Verdict};

// Re-export commonly used component types
pub use signed_records_core::{
    InvalidReason, KeyError, PrivateKey, PublicKey, RecordKind, RecordRequest, SigningMode,
    ValidationError, VerificationStatus,
};
pub use signed_records_ledger::{LedgerAccess, LedgerError, Page, Routes};
pub use signed_records_trust::{AsOf, IdentityKeyResolver, StaticTrustResolver, TrustResolver};
