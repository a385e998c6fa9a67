//! # Signed Records Ledger
//!
//! Access to the append-only ledger that signed records are anchored to.
//!
//! ## Overview
//!
//! The signing layer only needs two primitives from the ledger: `fetch` a
//! resource and `submit` a JSON body. They are abstracted behind the
//! [`LedgerAccess`] trait so HTTP, authentication and retry policy stay out
//! of the protocol. [`MemoryLedger`] answers the same paths in memory.
//!
//! ## Key Types
//!
//! - [`LedgerAccess`] - The async trait for ledger reads and writes
//! - [`Routes`] - Immutable table of API path segments
//! - [`MemoryLedger`] - In-memory ledger for tests
//! - [`RecordData`] / [`IdentityKey`] - Response shapes
//!
//! ## Usage
//!
//! ```rust
//! use signed_records_ledger::{LedgerAccess, MemoryLedger};
//!
//! async fn example() {
//!     let ledger = MemoryLedger::new();
//!     let chains = ledger.get(&ledger.routes().chains()).await.unwrap();
//!     assert_eq!(chains["count"], 0);
//! }
//! ```

pub mod error;
pub mod memory;
pub mod routes;
pub mod traits;
pub mod wire;

pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use routes::Routes;
pub use traits::{LedgerAccess, Page, Query};
pub use wire::{ChainRef, DirectoryBlock, Envelope, IdentityKey, RecordData};
