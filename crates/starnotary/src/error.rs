//! Error types for the ledger and the notary.

use starnotary_core::CoreError;
use starnotary_store::StoreError;
use thiserror::Error;

/// Errors that can occur during chain operations.
///
/// Lookups report absence as `Ok(None)`; `NotFound` is reserved for
/// operations that need the block to exist.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Encoding or hashing error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A required block is missing.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors that can occur during notary operations.
#[derive(Debug, Error)]
pub enum NotaryError {
    /// Chain error.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// The request was rejected before touching the chain.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The address has no unconsumed validation.
    #[error("not authorized: {0}")]
    NotAuthorized(String),
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Result type for notary operations.
pub type NotaryResult<T> = std::result::Result<T, NotaryError>;
