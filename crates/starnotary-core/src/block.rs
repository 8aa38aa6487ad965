//! Block: the unit of the notarization ledger.
//!
//! A block carries 5 fields, serialized in this order:
//! - `hash`: SHA-256 of the block with `hash` blanked (lowercase hex)
//! - `height`: zero-based position in the chain, also its storage key
//! - `body`: a note (genesis) or a star record
//! - `time`: creation time in Unix seconds
//! - `previousBlockHash`: hash of the block at `height - 1`, empty for genesis

use serde::{Deserialize, Serialize};

use crate::canonical::hashing_bytes;
use crate::crypto::sha256_hex;
use crate::error::Result;
use crate::star::{Star, StarRecord};

/// Body text of the genesis block.
pub const GENESIS_NOTE: &str = "First block in the chain - Genesis block";

/// The payload of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockBody {
    /// A notarized star owned by a wallet address.
    Star(StarRecord),
    /// Free-form text. Only the genesis block uses this.
    Note(String),
}

impl BlockBody {
    /// Build a star body for `address`.
    pub fn star(address: impl Into<String>, star: Star) -> Self {
        BlockBody::Star(StarRecord {
            address: address.into(),
            star,
        })
    }

    /// The wallet address that owns this body, if it is a star record.
    pub fn address(&self) -> Option<&str> {
        match self {
            BlockBody::Star(record) => Some(&record.address),
            BlockBody::Note(_) => None,
        }
    }
}

/// A ledger block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub hash: String,
    pub height: u64,
    pub body: BlockBody,
    pub time: u64,
    pub previous_block_hash: String,
}

impl Block {
    /// Create an unsealed block (empty `hash`).
    pub fn new(height: u64, body: BlockBody, time: u64, previous_block_hash: String) -> Self {
        Self {
            hash: String::new(),
            height,
            body,
            time,
            previous_block_hash,
        }
    }

    /// Create the sealed genesis block.
    pub fn genesis(time: u64) -> Result<Self> {
        Block::new(0, BlockBody::Note(GENESIS_NOTE.to_string()), time, String::new()).seal()
    }

    /// Create the sealed block that follows `previous`.
    pub fn successor(previous: &Block, body: BlockBody, time: u64) -> Result<Self> {
        Block::new(previous.height + 1, body, time, previous.hash.clone()).seal()
    }

    /// Compute the hash this block should carry.
    ///
    /// The stored `hash` field is ignored: hashing always runs over a copy
    /// with `hash` set to the empty string.
    pub fn compute_hash(&self) -> Result<String> {
        Ok(sha256_hex(&hashing_bytes(self)?))
    }

    /// Fill in `hash`.
    pub fn seal(mut self) -> Result<Self> {
        self.hash = self.compute_hash()?;
        Ok(self)
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// The owning wallet address, for star blocks.
    pub fn address(&self) -> Option<&str> {
        self.body.address()
    }

    /// The star, for star blocks.
    pub fn star(&self) -> Option<&Star> {
        match &self.body {
            BlockBody::Star(record) => Some(&record.star),
            BlockBody::Note(_) => None,
        }
    }
}
