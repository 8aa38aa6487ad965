//! Test fixtures and helpers.
//!
//! Common setup code for unit and integration tests.

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use starnotary_core::crypto::{p2pkh_address, sha256, sign_message, P2PKH_MAINNET, P2PKH_TESTNET};
use starnotary_core::{Block, BlockBody, Star, StarRequest};
use starnotary_store::{MemoryStore, StoreExt};

/// A Bitcoin wallet that can answer validation challenges.
///
/// Addresses are P2PKH over the compressed public key, and signatures are
/// standard base64 message signatures.
#[derive(Debug, Clone)]
pub struct Wallet {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Wallet {
    /// A wallet with a random key.
    pub fn random() -> Self {
        Self::from_secret_key(SecretKey::new(&mut rand::thread_rng()))
    }

    /// A deterministic wallet. The same seed always yields the same address.
    pub fn from_seed(seed: u64) -> Self {
        let mut digest = sha256(&seed.to_be_bytes());
        loop {
            if let Ok(secret_key) = SecretKey::from_slice(&digest) {
                return Self::from_secret_key(secret_key);
            }
            digest = sha256(&digest);
        }
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Mainnet P2PKH address.
    pub fn address(&self) -> String {
        p2pkh_address(&self.public_key.serialize(), P2PKH_MAINNET)
    }

    /// Testnet P2PKH address for the same key.
    pub fn testnet_address(&self) -> String {
        p2pkh_address(&self.public_key.serialize(), P2PKH_TESTNET)
    }

    /// Sign `message`, returning the base64 signature.
    pub fn sign(&self, message: &str) -> String {
        sign_message(&self.secret_key, message)
    }

    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }
}

/// A well-formed star request with the given story.
pub fn star_request(story: &str) -> StarRequest {
    StarRequest {
        ra: "16h 29m 1.0s".into(),
        dec: "-26° 29' 24.9".into(),
        mag: Some("4.2".into()),
        cen: Some("Scorpius".into()),
        story: story.into(),
    }
}

/// A validated star with the given story.
pub fn star(story: &str) -> Star {
    match star_request(story).into_star() {
        Ok(star) => star,
        Err(e) => panic!("fixture story {:?} is not a valid star: {}", story, e),
    }
}

/// Build a correctly linked chain: genesis followed by one star block per
/// story, all owned by `address`.
pub fn linked_blocks(address: &str, stories: &[&str]) -> Vec<Block> {
    let mut time = 1_540_000_000;
    let mut previous = sealed(Block::genesis(time));
    let mut blocks = vec![previous.clone()];
    for story in stories {
        time += 10;
        let body = BlockBody::star(address, star(story));
        previous = sealed(Block::successor(&previous, body, time));
        blocks.push(previous.clone());
    }
    blocks
}

/// A memory store preloaded with `blocks`, each under its own height.
pub async fn store_with(blocks: &[Block]) -> MemoryStore {
    let store = MemoryStore::new();
    for block in blocks {
        if let Err(e) = store.put_block(block).await {
            panic!("failed to preload block {}: {}", block.height, e);
        }
    }
    store
}

fn sealed(block: starnotary_core::Result<Block>) -> Block {
    match block {
        Ok(block) => block,
        Err(e) => panic!("fixture block failed to seal: {}", e),
    }
}
