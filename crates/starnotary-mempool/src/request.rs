//! Wire shapes for validation requests and confirmations.

use serde::{Deserialize, Serialize};

/// Suffix of every message a wallet is asked to sign.
pub const MESSAGE_SUFFIX: &str = "starRegistry";

/// Build the message a wallet must sign to prove it owns `address`.
pub fn validation_message(address: &str, request_time_stamp: u64) -> String {
    format!("{}:{}:{}", address, request_time_stamp, MESSAGE_SUFFIX)
}

/// A pending ownership challenge for one wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub wallet_address: String,
    /// Unix seconds at which the request was created.
    pub request_time_stamp: u64,
    pub message: String,
    /// Seconds left before the request expires. Recomputed on every read and
    /// never clamped, so a request observed after its deadline reports a
    /// negative value.
    pub validation_window: i64,
}

/// The request as observed at the moment its signature was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStatus {
    pub address: String,
    pub request_time_stamp: u64,
    pub message: String,
    pub validation_window: i64,
    pub message_signature: bool,
}

/// Proof that an address may register one star.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfirmation {
    pub register_star: bool,
    pub status: ValidationStatus,
}

impl ValidationConfirmation {
    pub(crate) fn accepted(request: &ValidationRequest) -> Self {
        Self {
            register_star: true,
            status: ValidationStatus {
                address: request.wallet_address.clone(),
                request_time_stamp: request.request_time_stamp,
                message: request.message.clone(),
                validation_window: request.validation_window,
                message_signature: true,
            },
        }
    }
}
