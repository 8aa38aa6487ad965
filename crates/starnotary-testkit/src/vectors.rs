//! Golden test vectors for deterministic verification.
//!
//! Block vectors pin the canonical encoding: any change to field order,
//! naming or the hash input changes these hashes. Signature vectors were
//! produced by an independent secp256k1 implementation.

use starnotary_core::{sha256_hex, verify_message, Block, BlockBody, StarRequest};

/// A golden block: how to build it, and what it must hash to.
#[derive(Debug, Clone)]
pub struct BlockVector {
    pub name: &'static str,
    /// Exact bytes the hash is computed over.
    pub hashing_json: &'static str,
    pub expected_hash: &'static str,
}

/// A golden Bitcoin message signature.
#[derive(Debug, Clone)]
pub struct SignatureVector {
    pub name: &'static str,
    pub address: &'static str,
    pub message: &'static str,
    pub signature: &'static str,
}

/// Genesis block time used by the block vectors.
pub const GENESIS_TIME: u64 = 1_540_000_000;

/// Hash of the genesis block created at [`GENESIS_TIME`].
pub const GENESIS_HASH: &str = "84652d26fe2e0e9af903902a049dea1237f346bc0115038004ace53eb5414d90";

/// Hash of the star block produced by [`star_block_vector`].
pub const STAR_BLOCK_HASH: &str =
    "cc9260daa4c183b6c4dad468f68c00216ce03254fdcb9ee3ff85eda2f6861027";

/// Address of the key `1E99423A...A526AEDD` (compressed).
pub const VECTOR_ADDRESS: &str = "1J7mdg5rbQyUHENYdx39WVWK7fsLpEoXZy";

pub fn block_vectors() -> Vec<BlockVector> {
    vec![
        BlockVector {
            name: "genesis",
            hashing_json: r#"{"hash":"","height":0,"body":"First block in the chain - Genesis block","time":1540000000,"previousBlockHash":""}"#,
            expected_hash: GENESIS_HASH,
        },
        BlockVector {
            name: "first star",
            hashing_json: concat!(
                r#"{"hash":"","height":1,"body":{"address":"1J7mdg5rbQyUHENYdx39WVWK7fsLpEoXZy","#,
                r#""star":{"ra":"1h","dec":"2d","mag":"3","story":"68656c6c6f"}},"time":1540000010,"#,
                r#""previousBlockHash":"84652d26fe2e0e9af903902a049dea1237f346bc0115038004ace53eb5414d90"}"#
            ),
            expected_hash: STAR_BLOCK_HASH,
        },
    ]
}

pub fn signature_vectors() -> Vec<SignatureVector> {
    vec![
        SignatureVector {
            name: "compressed key, mainnet",
            address: VECTOR_ADDRESS,
            message: "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2:1532330740:starRegistry",
            signature: "H8E21y71J8a/nthf3dZvLrVN0V/5Fa5MXWEckZbKSsbdWXD835+UduHkjdkrYFTTKpQSneswmFvui4mcLhNOGxg=",
        },
        SignatureVector {
            name: "uncompressed key, mainnet",
            address: "1424C2F4bC9JidNjjTUZCbUxv6Sa1Mt62x",
            message: "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2:1532330740:starRegistry",
            signature: "G8E21y71J8a/nthf3dZvLrVN0V/5Fa5MXWEckZbKSsbdWXD835+UduHkjdkrYFTTKpQSneswmFvui4mcLhNOGxg=",
        },
        SignatureVector {
            name: "compressed key, testnet",
            address: "mxdivjAqQSQj4LrAMX1XLQidyfU3pCWeS7",
            message: "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2:1532330740:starRegistry",
            signature: "H8E21y71J8a/nthf3dZvLrVN0V/5Fa5MXWEckZbKSsbdWXD835+UduHkjdkrYFTTKpQSneswmFvui4mcLhNOGxg=",
        },
    ]
}

/// The genesis block of the block vectors.
pub fn genesis_block() -> starnotary_core::Result<Block> {
    Block::genesis(GENESIS_TIME)
}

/// The star block of the block vectors, built through the normal API.
pub fn star_block_vector() -> starnotary_core::Result<Block> {
    let genesis = genesis_block()?;
    let star = StarRequest {
        ra: "1h".into(),
        dec: "2d".into(),
        mag: Some("3".into()),
        cen: None,
        story: "hello".into(),
    }
    .into_star()?;
    Block::successor(
        &genesis,
        BlockBody::star(VECTOR_ADDRESS, star),
        GENESIS_TIME + 10,
    )
}

/// Check every vector against this build.
///
/// Returns `(name, matches)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    let built = [genesis_block(), star_block_vector()];
    let blocks = block_vectors().into_iter().zip(built).map(|(vector, block)| {
        let matches = sha256_hex(vector.hashing_json.as_bytes()) == vector.expected_hash
            && block.map_or(false, |b| b.hash == vector.expected_hash);
        (vector.name.to_string(), matches)
    });

    let signatures = signature_vectors().into_iter().map(|vector| {
        let matches = verify_message(vector.message, vector.address, vector.signature).is_ok();
        (vector.name.to_string(), matches)
    });

    blocks.chain(signatures).collect()
}
