//! # Signed Records Trust
//!
//! Deciding whether a public key may sign on behalf of an identity.
//!
//! A valid signature only proves the holder of some key signed the record.
//! A [`TrustResolver`] answers the second question: was that key authorized
//! for the claimed signer identity at the time the record was signed.
//!
//! ## Resolvers
//!
//! - [`IdentityKeyResolver`] - Reads key registrations from identity chains
//! - [`StaticTrustResolver`] - A fixed table, optionally bounded by time

pub mod error;
pub mod fixed;
pub mod identity;
pub mod resolver;

pub use error::{Result, TrustError};
pub use fixed::StaticTrustResolver;
pub use identity::IdentityKeyResolver;
pub use resolver::{AsOf, TrustResolver};
