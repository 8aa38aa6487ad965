//! Canonical JSON encoding for blocks.
//!
//! A block is encoded as a JSON object with keys in declaration order:
//! `hash`, `height`, `body`, `time`, `previousBlockHash`. Absent optional star
//! fields are omitted rather than written as `null`.
//!
//! **CRITICAL**: This encoding is FROZEN. Changing field order or naming
//! changes every block hash and breaks validation of existing chains.

use crate::block::Block;
use crate::error::Result;

/// Encode a block exactly as it is persisted.
pub fn encode_block(block: &Block) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(block)?)
}

/// Decode a persisted block.
pub fn decode_block(bytes: &[u8]) -> Result<Block> {
    Ok(serde_json::from_slice(bytes)?)
}

/// The bytes a block hash is computed over: the canonical encoding with the
/// `hash` field set to the empty string.
pub fn hashing_bytes(block: &Block) -> Result<Vec<u8>> {
    let mut unsealed = block.clone();
    unsealed.hash.clear();
    encode_block(&unsealed)
}
