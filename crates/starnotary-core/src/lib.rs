//! # Star Notary Core
//!
//! Pure primitives for Star Notary: blocks, canonical encoding, star payloads
//! and message-signature verification.
//!
//! This crate contains no I/O, no storage, no timers. It is pure computation
//! over the data that ends up in the ledger.
//!
//! ## Key Types
//!
//! - [`Block`] - A hash-linked ledger entry
//! - [`BlockBody`] - The payload of a block (a note or a star record)
//! - [`StarRequest`] - A star submission as received at the boundary
//! - [`Star`] - A validated star with its story hex-encoded
//! - [`MessageVerifier`] - The seam for address-ownership proofs
//!
//! ## Canonicalization
//!
//! Blocks are persisted and hashed as JSON with a fixed key order. See the
//! [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod star;
pub mod validation;

pub use block::{Block, BlockBody, GENESIS_NOTE};
pub use canonical::{decode_block, encode_block, hashing_bytes};
pub use crypto::{sha256_hex, verify_message, BitcoinMessageVerifier, MessageVerifier};
pub use error::{CoreError, Result, ValidationError};
pub use star::{Star, StarRecord, StarRequest, MAX_STORY_BYTES};
pub use validation::{verify_block_hash, verify_link};
