//! Block validation: hash integrity and chain linkage.
//!
//! Both checks are pure. They never modify the block they look at; the
//! caller decides what to do with a failure (the chain only reports it).

use crate::block::Block;
use crate::error::ValidationError;

/// Check that a block's stored hash matches its contents.
pub fn verify_block_hash(block: &Block) -> Result<(), ValidationError> {
    let computed = block
        .compute_hash()
        .map_err(|source| ValidationError::Encoding {
            height: block.height,
            source,
        })?;

    if computed != block.hash {
        return Err(ValidationError::HashMismatch {
            height: block.height,
            stored: block.hash.clone(),
            computed,
        });
    }
    Ok(())
}

/// Check that `block` points at `previous`.
pub fn verify_link(previous: &Block, block: &Block) -> Result<(), ValidationError> {
    if block.previous_block_hash != previous.hash {
        return Err(ValidationError::BrokenLink {
            height: block.height,
            expected: previous.hash.clone(),
            got: block.previous_block_hash.clone(),
        });
    }
    Ok(())
}
