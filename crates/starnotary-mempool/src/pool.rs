//! The validation pool.
//!
//! Every wallet address moves through
//! `NoRequest -> Pending -> {Validated | Expired}`. A pending request carries
//! its own expiry task; a validated address stays until it is consumed by a
//! successful submission.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use starnotary_core::{BitcoinMessageVerifier, MessageVerifier};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::request::{validation_message, ValidationConfirmation, ValidationRequest};

/// Default time a wallet has to answer its challenge.
pub const DEFAULT_VALIDATION_WINDOW: Duration = Duration::from_secs(300);

/// Configuration for the mempool.
#[derive(Debug, Clone)]
pub struct MempoolConfig {
    /// How long a pending request stays valid.
    pub validation_window: Duration,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            validation_window: DEFAULT_VALIDATION_WINDOW,
        }
    }
}

struct PendingEntry {
    request_time_stamp: u64,
    message: String,
    created: Instant,
    deadline: Instant,
    generation: u64,
    expiry: JoinHandle<()>,
}

impl PendingEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

#[derive(Default)]
struct PoolState {
    pending: HashMap<String, PendingEntry>,
    validated: HashMap<String, ValidationConfirmation>,
    next_generation: u64,
}

/// Pending requests and validated addresses, keyed by wallet address.
///
/// All state sits behind one async mutex. Signature checks, expiry-task
/// cancellation and the state transition all happen while it is held, so a
/// validation and an expiry can never both apply to the same request.
/// A request past its deadline is treated as gone even if its expiry task
/// has not run yet.
///
/// Dropping the pool aborts every outstanding expiry task.
pub struct Mempool<V = BitcoinMessageVerifier> {
    state: Arc<Mutex<PoolState>>,
    verifier: V,
    window: Duration,
}

impl Mempool {
    /// Create a pool that checks Bitcoin message signatures.
    pub fn new(config: MempoolConfig) -> Self {
        Self::with_verifier(config, BitcoinMessageVerifier)
    }
}

impl Default for Mempool {
    fn default() -> Self {
        Self::new(MempoolConfig::default())
    }
}

impl<V: MessageVerifier> Mempool<V> {
    /// Create a pool with a custom signature verifier.
    pub fn with_verifier(config: MempoolConfig, verifier: V) -> Self {
        Self {
            state: Arc::new(Mutex::new(PoolState::default())),
            verifier,
            window: config.validation_window,
        }
    }

    /// The configured validation window.
    pub fn validation_window(&self) -> Duration {
        self.window
    }

    /// Open a challenge for `address`, or return the live one.
    ///
    /// A repeated call before expiry returns the same timestamp and message
    /// with the window recomputed; it does not restart the timer.
    pub async fn add_validation_request(&self, address: &str) -> ValidationRequest {
        let mut state = self.state.lock().await;

        if let Some(entry) = state.pending.get(address) {
            if !entry.is_expired() {
                let request = self.view(address, entry);
                debug!(
                    address,
                    window = request.validation_window,
                    "returning existing validation request"
                );
                return request;
            }
            expire(&mut state, address);
        }

        let generation = state.next_generation;
        state.next_generation += 1;

        let request_time_stamp = now_secs();
        let created = Instant::now();
        let deadline = created + self.window;
        let expiry = spawn_expiry(
            Arc::downgrade(&self.state),
            address.to_string(),
            generation,
            deadline,
        );
        let entry = PendingEntry {
            request_time_stamp,
            message: validation_message(address, request_time_stamp),
            created,
            deadline,
            generation,
            expiry,
        };

        let request = self.view(address, &entry);
        state.pending.insert(address.to_string(), entry);
        debug!(
            address,
            window = request.validation_window,
            "created validation request"
        );
        request
    }

    /// Check `signature` against the pending request for `address`.
    ///
    /// Returns `None` when there is no live request or the signature does not
    /// verify. A rejected signature leaves the request pending and expiring.
    pub async fn validate(&self, address: &str, signature: &str) -> Option<ValidationConfirmation> {
        let mut state = self.state.lock().await;

        let Some(entry) = state.pending.get(address) else {
            debug!(address, "no pending validation request");
            return None;
        };
        if entry.is_expired() {
            expire(&mut state, address);
            return None;
        }

        if !self.verifier.verify(&entry.message, address, signature) {
            warn!(address, "message signature rejected");
            return None;
        }

        let request = self.view(address, entry);
        if let Some(entry) = state.pending.remove(address) {
            entry.expiry.abort();
        }

        let confirmation = ValidationConfirmation::accepted(&request);
        state
            .validated
            .insert(address.to_string(), confirmation.clone());
        debug!(
            address,
            window = request.validation_window,
            "address validated"
        );
        Some(confirmation)
    }

    /// Whether `address` holds an unconsumed validation.
    pub async fn is_address_validated(&self, address: &str) -> bool {
        self.state.lock().await.validated.contains_key(address)
    }

    /// Consume the validation for `address`.
    ///
    /// Returns whether there was one to consume.
    pub async fn remove_from_pool(&self, address: &str) -> bool {
        let removed = self.state.lock().await.validated.remove(address).is_some();
        if removed {
            debug!(address, "validation consumed");
        }
        removed
    }

    /// The live request for `address`, if any, with a fresh window.
    pub async fn pending_request(&self, address: &str) -> Option<ValidationRequest> {
        let state = self.state.lock().await;
        state
            .pending
            .get(address)
            .filter(|entry| !entry.is_expired())
            .map(|entry| self.view(address, entry))
    }

    fn view(&self, address: &str, entry: &PendingEntry) -> ValidationRequest {
        let elapsed = entry.created.elapsed().as_secs() as i64;
        ValidationRequest {
            wallet_address: address.to_string(),
            request_time_stamp: entry.request_time_stamp,
            message: entry.message.clone(),
            validation_window: self.window.as_secs() as i64 - elapsed,
        }
    }
}

impl<V> Drop for Mempool<V> {
    fn drop(&mut self) {
        // If an expiry task holds the lock, the others are left to run out:
        // each wakes at its deadline and stops when the `Weak` upgrade fails.
        if let Ok(state) = self.state.try_lock() {
            for entry in state.pending.values() {
                entry.expiry.abort();
            }
        }
    }
}

fn spawn_expiry(
    state: Weak<Mutex<PoolState>>,
    address: String,
    generation: u64,
    deadline: Instant,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;

        let Some(state) = state.upgrade() else {
            return;
        };
        let mut state = state.lock().await;
        let live = state
            .pending
            .get(&address)
            .is_some_and(|entry| entry.generation == generation);
        if live {
            expire(&mut state, &address);
        }
    })
}

fn expire(state: &mut PoolState, address: &str) {
    if let Some(entry) = state.pending.remove(address) {
        entry.expiry.abort();
        debug!(address, "validation request expired");
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
