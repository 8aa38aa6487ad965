//! Error types for Star Notary Core.

use thiserror::Error;

/// Core errors that can occur while encoding blocks, parsing requests or
/// checking signatures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Integrity errors detected when re-checking stored blocks.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("block {height} hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch {
        height: u64,
        stored: String,
        computed: String,
    },

    #[error("block {height} previous hash mismatch: expected {expected}, got {got}")]
    BrokenLink {
        height: u64,
        expected: String,
        got: String,
    },

    #[error("block {height} cannot be re-encoded: {source}")]
    Encoding {
        height: u64,
        #[source]
        source: CoreError,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
