//! In-memory implementation of the KeyValueStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::KeyValueStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<u64, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<u64, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<u64, Vec<u8>>>> {
        self.entries
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: u64) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.get(&key).cloned())
    }

    async fn put(&self, key: u64, value: &[u8]) -> Result<()> {
        self.write()?.insert(key, value.to_vec());
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<(u64, Vec<u8>)>> {
        Ok(self
            .read()?
            .iter()
            .map(|(key, value)| (*key, value.clone()))
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.read()?.len() as u64)
    }
}
