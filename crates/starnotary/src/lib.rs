//! # Star Notary
//!
//! A hash-linked ledger of star registrations. Each registration is gated by
//! proof that the registering wallet controls its Bitcoin address.
//!
//! ## Overview
//!
//! - **Blocks**: SHA-256 linked entries persisted under their height
//! - **Chain**: append, lookup and tamper detection over any
//!   [`KeyValueStore`](store::KeyValueStore)
//! - **Mempool**: time-limited ownership challenges answered with Bitcoin
//!   message signatures
//! - **Notary**: the end-to-end flow, challenge to registered star
//!
//! ## Key Concepts
//!
//! - **Genesis**: the height-0 block, created once when a chain is opened
//! - **Validation window**: how long a wallet has to sign its challenge
//! - **Single use**: a validation allows exactly one registration
//! - **Report, never repair**: validation lists bad heights and leaves the
//!   stored data alone
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starnotary::{Notary, NotaryConfig};
//! use starnotary::core::StarRequest;
//! use starnotary::store::SqliteStore;
//!
//! async fn example(address: &str, sign: impl Fn(&str) -> String) {
//!     let store = SqliteStore::open("chaindata.db").unwrap();
//!     let notary = Notary::open(store, NotaryConfig::default()).await.unwrap();
//!
//!     // Issue a challenge and answer it with the wallet.
//!     let request = notary.request_validation(address).await.unwrap();
//!     let signature = sign(&request.message);
//!     notary.validate_signature(address, &signature).await.unwrap();
//!
//!     // Register one star.
//!     let star = StarRequest {
//!         ra: "16h 29m 1.0s".into(),
//!         dec: "-26° 29' 24.9".into(),
//!         mag: None,
//!         cen: None,
//!         story: "Found star using https://www.google.com/sky/".into(),
//!     };
//!     let block = notary.submit_star(address, star).await.unwrap();
//!     assert!(notary.validate_block(block.height).await.unwrap());
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `starnotary::core` - Blocks, encoding, signatures
//! - `starnotary::store` - Storage contract, SQLite and memory stores
//! - `starnotary::mempool` - Validation requests

pub mod chain;
pub mod error;
pub mod notary;

// Re-export component crates
pub use starnotary_core as core;
pub use starnotary_mempool as mempool;
pub use starnotary_store as store;

// Re-export main types for convenience
pub use chain::Chain;
pub use error::{ChainError, NotaryError, NotaryResult, Result};
pub use notary::{Notary, NotaryConfig};

// Re-export commonly used component types
pub use starnotary_core::{Block, BlockBody, Star, StarRecord, StarRequest};
pub use starnotary_mempool::{MempoolConfig, ValidationConfirmation, ValidationRequest};
