//! # Star Notary Testkit
//!
//! Testing utilities for Star Notary.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Block hashes and message signatures that pin the
//!   encoding and signature scheme
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Wallets that answer validation challenges, sample stars,
//!   and preloaded stores
//!
//! ## Golden Vectors
//!
//! ```rust
//! use starnotary_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches) in verify_all_vectors() {
//!     assert!(matches, "{} drifted", name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use starnotary_testkit::generators::star_request;
//!
//! proptest! {
//!     #[test]
//!     fn requests_become_stars(request in star_request()) {
//!         prop_assert!(request.into_star().is_ok());
//!     }
//! }
//! ```
//!
//! ## Wallets
//!
//! ```rust
//! use starnotary_testkit::fixtures::Wallet;
//!
//! let wallet = Wallet::from_seed(7);
//! let signature = wallet.sign("1Addr:1532330740:starRegistry");
//! assert!(!signature.is_empty());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{linked_blocks, star, star_request, store_with, Wallet};
pub use vectors::{block_vectors, signature_vectors, verify_all_vectors, BlockVector, SignatureVector};
