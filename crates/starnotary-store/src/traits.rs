//! KeyValueStore trait: the abstract interface for block persistence.
//!
//! This trait allows the chain to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use starnotary_core::{decode_block, encode_block, Block};

use crate::error::{Result, StoreError};

/// The KeyValueStore trait: ordered, durable `height -> bytes` mapping.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Contract
///
/// - `get` distinguishes "absent" (`Ok(None)`) from failure (`Err`).
/// - `put` is an upsert and is atomic per key.
/// - `scan_all` returns every entry in ascending key order.
/// - There are no multi-key transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: u64) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: u64, value: &[u8]) -> Result<()>;

    /// Read every entry, ordered by key.
    async fn scan_all(&self) -> Result<Vec<(u64, Vec<u8>)>>;

    /// Number of stored entries.
    ///
    /// The default implementation counts a full scan.
    async fn count(&self) -> Result<u64> {
        Ok(self.scan_all().await?.len() as u64)
    }
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: u64) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: u64, value: &[u8]) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn scan_all(&self) -> Result<Vec<(u64, Vec<u8>)>> {
        (**self).scan_all().await
    }

    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }
}

/// Extension trait for reading and writing whole blocks.
pub trait StoreExt: KeyValueStore {
    /// Get and decode the block stored at `height`.
    fn get_block(
        &self,
        height: u64,
    ) -> impl std::future::Future<Output = Result<Option<Block>>> + Send;

    /// Encode `block` and store it under its own height.
    fn put_block(&self, block: &Block) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {
    async fn get_block(&self, height: u64) -> Result<Option<Block>> {
        match self.get(height).await? {
            Some(bytes) => decode_block(&bytes)
                .map(Some)
                .map_err(|e| StoreError::InvalidData(format!("block {}: {}", height, e))),
            None => Ok(None),
        }
    }

    async fn put_block(&self, block: &Block) -> Result<()> {
        let bytes = encode_block(block)
            .map_err(|e| StoreError::InvalidData(format!("block {}: {}", block.height, e)))?;
        self.put(block.height, &bytes).await
    }
}
