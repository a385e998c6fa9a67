//! # Signed Records Testkit
//!
//! Testing utilities for signed records.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A memory ledger with a registered signer, and clients wired to it
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use signed_records_testkit::generators::{signed_draft, RecordParams};
//!
//! proptest! {
//!     #[test]
//!     fn signing_is_deterministic(params: RecordParams) {
//!         prop_assert_eq!(signed_draft(&params), signed_draft(&params));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust,no_run
//! use signed_records_testkit::fixtures::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::new().await;
//!     let client = fixture.signing_client();
//!     let request = fixture.signer.request("hello").external_id("tag");
//!     client.create_chain(&request).await.unwrap();
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{multi_party_signers, MemoryClient, TestFixture, TestSigner};
pub use generators::{fetched_record, signed_draft, RecordParams};
