//! Cryptographic primitives: SHA-256 block hashing and Bitcoin message
//! signatures.
//!
//! Address ownership is proven the way Bitcoin wallets sign messages: the
//! wallet signs `SHA256d(magic || message)` with a recoverable secp256k1
//! signature, the verifier recovers the public key and checks that its
//! HASH160 is the hash committed to by the P2PKH address.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ripemd::Ripemd160;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, Result};

/// Prefix mixed into every signed message.
pub const MESSAGE_MAGIC: &str = "Bitcoin Signed Message:\n";

/// P2PKH version byte on mainnet.
pub const P2PKH_MAINNET: u8 = 0x00;

/// P2PKH version byte on testnet.
pub const P2PKH_TESTNET: u8 = 0x6f;

/// Length of an encoded message signature: header byte plus compact (r, s).
pub const SIGNATURE_LEN: usize = 65;

const HEADER_BASE: u8 = 27;
const HEADER_COMPRESSED: u8 = 4;

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 of `data` as lowercase hex. This is the block hash format.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// SHA-256 applied twice.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160 of SHA-256 of `data`.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(data)).into()
}

/// Bitcoin CompactSize length prefix.
fn write_compact_size(buf: &mut Vec<u8>, n: usize) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&(n as u64).to_le_bytes());
        }
    }
}

/// The digest a wallet signs for `message`.
pub fn signed_message_hash(message: &str) -> [u8; 32] {
    let mut buf = Vec::with_capacity(MESSAGE_MAGIC.len() + message.len() + 10);
    write_compact_size(&mut buf, MESSAGE_MAGIC.len());
    buf.extend_from_slice(MESSAGE_MAGIC.as_bytes());
    write_compact_size(&mut buf, message.len());
    buf.extend_from_slice(message.as_bytes());
    double_sha256(&buf)
}

/// Encode a P2PKH address for a serialized public key.
pub fn p2pkh_address(public_key: &[u8], version: u8) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(version);
    payload.extend_from_slice(&hash160(public_key));
    bs58::encode(payload).with_check().into_string()
}

/// Decode a P2PKH address into its version byte and key hash.
pub fn decode_p2pkh_address(address: &str) -> Result<(u8, [u8; 20])> {
    let payload = bs58::decode(address.trim())
        .with_check(None)
        .into_vec()
        .map_err(|e| CoreError::InvalidAddress(e.to_string()))?;

    if payload.len() != 21 {
        return Err(CoreError::InvalidAddress(format!(
            "expected 21 payload bytes, got {}",
            payload.len()
        )));
    }

    let version = payload[0];
    if version != P2PKH_MAINNET && version != P2PKH_TESTNET {
        return Err(CoreError::InvalidAddress(format!(
            "unsupported address version {:#04x}",
            version
        )));
    }

    let mut key_hash = [0u8; 20];
    key_hash.copy_from_slice(&payload[1..]);
    Ok((version, key_hash))
}

/// Sign `message` the way a Bitcoin wallet does, returning base64.
///
/// The signature commits to the compressed public key.
pub fn sign_message(secret_key: &SecretKey, message: &str) -> String {
    let secp = Secp256k1::signing_only();
    let digest = Message::from_digest(signed_message_hash(message));
    let signature = secp.sign_ecdsa_recoverable(&digest, secret_key);
    let (recovery_id, compact) = signature.serialize_compact();

    let mut raw = [0u8; SIGNATURE_LEN];
    raw[0] = HEADER_BASE + recovery_id.to_i32() as u8 + HEADER_COMPRESSED;
    raw[1..].copy_from_slice(&compact);
    BASE64.encode(raw)
}

/// Recover the public key behind a base64 message signature.
///
/// Returns the key and whether the signer used its compressed encoding.
pub fn recover_signer(message: &str, signature: &str) -> Result<(PublicKey, bool)> {
    let raw = BASE64
        .decode(signature.trim())
        .map_err(|e| CoreError::InvalidSignature(format!("not base64: {}", e)))?;

    if raw.len() != SIGNATURE_LEN {
        return Err(CoreError::InvalidSignature(format!(
            "expected {} bytes, got {}",
            SIGNATURE_LEN,
            raw.len()
        )));
    }

    // Headers 35..=42 mark segwit signatures, which P2PKH addresses never use.
    let header = raw[0];
    if !(HEADER_BASE..HEADER_BASE + 8).contains(&header) {
        return Err(CoreError::InvalidSignature(format!(
            "unsupported header byte {}",
            header
        )));
    }
    let flags = header - HEADER_BASE;
    let compressed = flags & HEADER_COMPRESSED != 0;

    let recovery_id = RecoveryId::from_i32(i32::from(flags & 3))
        .map_err(|e| CoreError::InvalidSignature(e.to_string()))?;
    let signature = RecoverableSignature::from_compact(&raw[1..], recovery_id)
        .map_err(|e| CoreError::InvalidSignature(e.to_string()))?;

    let digest = Message::from_digest(signed_message_hash(message));
    let public_key = Secp256k1::verification_only()
        .recover_ecdsa(&digest, &signature)
        .map_err(|e| CoreError::InvalidSignature(e.to_string()))?;

    Ok((public_key, compressed))
}

/// Verify that `signature` over `message` was produced by the key behind
/// `address`.
pub fn verify_message(message: &str, address: &str, signature: &str) -> Result<()> {
    let (_, expected) = decode_p2pkh_address(address)?;
    let (public_key, compressed) = recover_signer(message, signature)?;

    let actual = if compressed {
        hash160(&public_key.serialize())
    } else {
        hash160(&public_key.serialize_uncompressed())
    };

    if actual != expected {
        return Err(CoreError::InvalidSignature(
            "signature was not produced by the address key".into(),
        ));
    }
    Ok(())
}

/// Checks that a wallet address signed a message.
///
/// Verification failures are ordinary outcomes, so this returns `bool`.
pub trait MessageVerifier: Send + Sync {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool;
}

/// Bitcoin message-signing verifier for P2PKH addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitcoinMessageVerifier;

impl MessageVerifier for BitcoinMessageVerifier {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        verify_message(message, address, signature).is_ok()
    }
}

impl<F> MessageVerifier for F
where
    F: Fn(&str, &str, &str) -> bool + Send + Sync,
{
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        self(message, address, signature)
    }
}
