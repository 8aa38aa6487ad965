//! The Notary: unified API for star registration.
//!
//! The Notary brings together the chain and the mempool. A wallet asks for a
//! challenge, answers it with a signature, and may then register exactly one
//! star.

use starnotary_core::{BitcoinMessageVerifier, Block, BlockBody, MessageVerifier, StarRequest};
use starnotary_mempool::{Mempool, MempoolConfig, ValidationConfirmation, ValidationRequest};
use starnotary_store::KeyValueStore;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::chain::Chain;
use crate::error::{NotaryError, NotaryResult, Result};

/// Configuration for the Notary.
#[derive(Debug, Clone, Default)]
pub struct NotaryConfig {
    /// Mempool configuration.
    pub mempool: MempoolConfig,
}

/// The main Notary struct.
///
/// Provides a unified API for:
/// - Issuing and answering ownership challenges
/// - Registering stars
/// - Querying and validating the chain
pub struct Notary<S, V = BitcoinMessageVerifier> {
    chain: Chain<S>,
    mempool: Mempool<V>,
    /// Serializes appends so two submissions never race for one height.
    append_lock: Mutex<()>,
}

impl<S: KeyValueStore> Notary<S> {
    /// Open a notary that checks Bitcoin message signatures.
    pub async fn open(store: S, config: NotaryConfig) -> Result<Self> {
        Self::with_verifier(store, config, BitcoinMessageVerifier).await
    }
}

impl<S: KeyValueStore, V: MessageVerifier> Notary<S, V> {
    /// Open a notary with a custom signature verifier.
    pub async fn with_verifier(store: S, config: NotaryConfig, verifier: V) -> Result<Self> {
        let chain = Chain::open(store).await?;
        Ok(Self {
            chain,
            mempool: Mempool::with_verifier(config.mempool, verifier),
            append_lock: Mutex::new(()),
        })
    }

    /// Get the chain reference.
    pub fn chain(&self) -> &Chain<S> {
        &self.chain
    }

    /// Get the mempool reference.
    pub fn mempool(&self) -> &Mempool<V> {
        &self.mempool
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue (or re-issue) the ownership challenge for `address`.
    pub async fn request_validation(&self, address: &str) -> NotaryResult<ValidationRequest> {
        let address = required_address(address)?;
        Ok(self.mempool.add_validation_request(address).await)
    }

    /// Answer the challenge for `address` with `signature`.
    pub async fn validate_signature(
        &self,
        address: &str,
        signature: &str,
    ) -> Option<ValidationConfirmation> {
        self.mempool.validate(address.trim(), signature).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a star for a validated address and return the stored block.
    ///
    /// The request is checked before anything else. The validation is
    /// consumed only after the block is durably stored.
    pub async fn submit_star(&self, address: &str, request: StarRequest) -> NotaryResult<Block> {
        let address = required_address(address)?;
        let star = request
            .into_star()
            .map_err(|e| NotaryError::InvalidRequest(e.to_string()))?;

        let _guard = self.append_lock.lock().await;

        if !self.mempool.is_address_validated(address).await {
            warn!(address, "star submitted without validation");
            return Err(NotaryError::NotAuthorized(format!(
                "address {} has not been validated",
                address
            )));
        }

        let block = self.chain.add_block(BlockBody::star(address, star)).await?;
        self.mempool.remove_from_pool(address).await;
        info!(address, height = block.height, "star registered");
        Ok(block)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the block at `height`.
    pub async fn block(&self, height: u64) -> Result<Option<Block>> {
        self.chain.get_block(height).await
    }

    /// Get a block by its hash.
    pub async fn block_by_hash(&self, hash: &str) -> Result<Option<Block>> {
        self.chain.get_block_by_hash(hash).await
    }

    /// All stars registered by `address`.
    pub async fn blocks_by_address(&self, address: &str) -> Result<Vec<Block>> {
        self.chain.get_blocks_by_address(address).await
    }

    pub async fn validate_block(&self, height: u64) -> Result<bool> {
        self.chain.validate_block(height).await
    }

    pub async fn validate_chain(&self) -> Result<Vec<u64>> {
        self.chain.validate_chain().await
    }

    pub async fn height(&self) -> Result<Option<u64>> {
        self.chain.height().await
    }
}

fn required_address(address: &str) -> NotaryResult<&str> {
    let address = address.trim();
    if address.is_empty() {
        return Err(NotaryError::InvalidRequest("address is required".into()));
    }
    Ok(address)
}
