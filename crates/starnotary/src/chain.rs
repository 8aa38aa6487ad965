//! The Chain: an append-only, hash-linked sequence of blocks.
//!
//! Blocks live in a [`KeyValueStore`] keyed by height. The chain never
//! repairs anything: tampering is detected and reported, and the stored data
//! is left as found.

use std::time::{SystemTime, UNIX_EPOCH};

use starnotary_core::{decode_block, verify_block_hash, verify_link, Block, BlockBody};
use starnotary_store::{KeyValueStore, StoreExt};
use tracing::{info, warn};

use crate::error::{ChainError, Result};

/// The ledger over a key-value store.
pub struct Chain<S> {
    store: S,
}

impl<S: KeyValueStore> Chain<S> {
    /// Open the chain, creating the genesis block if the store is empty.
    pub async fn open(store: S) -> Result<Self> {
        let chain = Self { store };
        chain.create_genesis().await?;
        Ok(chain)
    }

    /// Get the store reference.
    ///
    /// Writing through the store bypasses every chain invariant; it exists
    /// for diagnostics and tamper tests.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the genesis block unless height 0 is already occupied.
    ///
    /// Returns the new block, or `None` when nothing was written.
    pub async fn create_genesis(&self) -> Result<Option<Block>> {
        if self.store.get(0).await?.is_some() {
            return Ok(None);
        }

        let genesis = Block::genesis(now_secs())?;
        self.store.put_block(&genesis).await?;
        info!(height = 0, hash = %genesis.hash, "created genesis block");
        Ok(Some(genesis))
    }

    /// Highest block height, or `None` for an empty store.
    pub async fn height(&self) -> Result<Option<u64>> {
        let count = self.store.count().await?;
        Ok(count.checked_sub(1))
    }

    /// Append a block carrying `body` and return it as stored.
    ///
    /// The chain takes no lock: two concurrent calls can read the same latest
    /// block and write competing blocks at the same height. Callers must keep
    /// at most one append in flight; [`crate::Notary`] does this for you.
    pub async fn add_block(&self, body: BlockBody) -> Result<Block> {
        let height = self
            .height()
            .await?
            .ok_or_else(|| ChainError::NotFound("chain has no genesis block".into()))?;
        let latest = self
            .store
            .get_block(height)
            .await?
            .ok_or_else(|| ChainError::NotFound(format!("latest block {}", height)))?;

        let block = Block::successor(&latest, body, now_secs())?;
        self.store.put_block(&block).await?;
        info!(height = block.height, hash = %block.hash, "appended block");
        Ok(block)
    }

    /// Get the block at `height`.
    pub async fn get_block(&self, height: u64) -> Result<Option<Block>> {
        Ok(self.store.get_block(height).await?)
    }

    /// Find the first block whose stored hash is `hash`.
    pub async fn get_block_by_hash(&self, hash: &str) -> Result<Option<Block>> {
        Ok(self
            .decoded_blocks()
            .await?
            .into_iter()
            .find(|block| block.hash == hash))
    }

    /// All star blocks registered by `address`, in height order.
    pub async fn get_blocks_by_address(&self, address: &str) -> Result<Vec<Block>> {
        Ok(self
            .decoded_blocks()
            .await?
            .into_iter()
            .filter(|block| block.address() == Some(address))
            .collect())
    }

    /// Check that the block at `height` still matches its stored hash.
    ///
    /// An undecodable block is reported as invalid.
    pub async fn validate_block(&self, height: u64) -> Result<bool> {
        let bytes = self
            .store
            .get(height)
            .await?
            .ok_or_else(|| ChainError::NotFound(format!("block {}", height)))?;

        let valid = match decode_block(&bytes) {
            Ok(block) => match verify_block_hash(&block) {
                Ok(()) => true,
                Err(e) => {
                    warn!(height, error = %e, "block failed validation");
                    false
                }
            },
            Err(e) => {
                warn!(height, error = %e, "block is undecodable");
                false
            }
        };
        Ok(valid)
    }

    /// Validate every block and every link, returning the bad heights.
    ///
    /// A height is bad when its block is missing, undecodable, sits under the
    /// wrong key, fails its own hash check, or does not point at the hash of
    /// the block below it. The scan does not stop at the first failure. A
    /// block whose predecessor could not be read has no link to check.
    pub async fn validate_chain(&self) -> Result<Vec<u64>> {
        let Some(height) = self.height().await? else {
            info!("chain is empty");
            return Ok(Vec::new());
        };

        let mut errors = Vec::new();
        let mut previous: Option<Block> = None;

        for h in 0..=height {
            let current = match self.store.get(h).await? {
                Some(bytes) => decode_block(&bytes).ok(),
                None => None,
            };

            let Some(block) = current else {
                warn!(height = h, "block missing or undecodable");
                errors.push(h);
                previous = None;
                continue;
            };

            let mut problems = Vec::new();
            if block.height != h {
                problems.push(format!("stored under {} but claims {}", h, block.height));
            }
            if let Err(e) = verify_block_hash(&block) {
                problems.push(e.to_string());
            }
            if let Some(prev) = &previous {
                if let Err(e) = verify_link(prev, &block) {
                    problems.push(e.to_string());
                }
            }

            if !problems.is_empty() {
                warn!(height = h, problems = ?problems, "block failed validation");
                errors.push(h);
            }
            previous = Some(block);
        }

        if errors.is_empty() {
            info!(blocks = height + 1, "chain is valid");
        } else {
            warn!(blocks = height + 1, bad = ?errors, "chain has invalid blocks");
        }
        Ok(errors)
    }

    async fn decoded_blocks(&self) -> Result<Vec<Block>> {
        let entries = self.store.scan_all().await?;
        let mut blocks = Vec::with_capacity(entries.len());
        for (height, bytes) in entries {
            match decode_block(&bytes) {
                Ok(block) => blocks.push(block),
                Err(e) => warn!(height, error = %e, "skipping undecodable block"),
            }
        }
        Ok(blocks)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
