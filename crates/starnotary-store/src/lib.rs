//! # Star Notary Store
//!
//! The ordered key-value persistence contract the ledger is built on, with
//! SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The chain only needs three things from storage: point reads, point writes
//! and an ordered full scan, all keyed by block height. That contract is the
//! [`KeyValueStore`] trait. The primary implementation is [`SqliteStore`],
//! with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`KeyValueStore`] - The async trait for all storage operations
//! - [`StoreExt`] - Typed block helpers on top of the byte contract
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use starnotary_store::{KeyValueStore, SqliteStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("chaindata.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     store.put(0, b"{}").await.unwrap();
//!     assert_eq!(store.get(0).await.unwrap(), Some(b"{}".to_vec()));
//!     assert_eq!(store.get(1).await.unwrap(), None);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Absent is not an error**: `get` returns `Ok(None)` for a missing key;
//!   `Err` always means the store itself failed.
//! - **Atomic per key**: a reader sees either the old or the new value.
//! - **Ordered scans**: `scan_all` yields keys in ascending order.
//! - **No multi-key transactions**: callers own any read-modify-write races.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, StoreExt};
