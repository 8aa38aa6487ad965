//! # Star Notary Mempool
//!
//! Address-ownership gating for star submissions.
//!
//! ## Overview
//!
//! Before a wallet may register a star it has to prove it controls its
//! address:
//!
//! 1. [`Mempool::add_validation_request`] issues a challenge message
//!    `"{address}:{timestamp}:starRegistry"` that expires after the configured
//!    validation window.
//! 2. The wallet signs the message and [`Mempool::validate`] checks the
//!    signature with a [`MessageVerifier`](starnotary_core::MessageVerifier).
//!    On success the address becomes validated.
//! 3. A successful submission consumes the validation with
//!    [`Mempool::remove_from_pool`].
//!
//! ## Timekeeping
//!
//! `requestTimeStamp` is wall-clock Unix seconds. Elapsed time and expiry use
//! the tokio clock, so tests can drive the window with a paused runtime.

pub mod pool;
pub mod request;

pub use pool::{Mempool, MempoolConfig, DEFAULT_VALIDATION_WINDOW};
pub use request::{
    validation_message, ValidationConfirmation, ValidationRequest, ValidationStatus,
};
