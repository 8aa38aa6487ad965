//! Proptest generators for property-based testing.

use proptest::prelude::*;

use starnotary_core::{Block, BlockBody, StarRequest, MAX_STORY_BYTES};

use crate::fixtures::Wallet;

/// A deterministic wallet.
pub fn wallet() -> impl Strategy<Value = Wallet> {
    any::<u64>().prop_map(Wallet::from_seed)
}

/// A story that passes boundary validation: printable ASCII, non-empty,
/// at most the size limit.
pub fn story() -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[ -~]{{1,{}}}", MAX_STORY_BYTES))
        .unwrap_or_else(|e| panic!("invalid story regex: {}", e))
}

/// A story that is too long by at least one byte.
pub fn oversized_story() -> impl Strategy<Value = String> {
    (MAX_STORY_BYTES + 1..MAX_STORY_BYTES * 2).prop_map(|len| "x".repeat(len))
}

/// Right ascension text.
pub fn ra() -> impl Strategy<Value = String> {
    (0u8..24, 0u8..60, 0u8..60).prop_map(|(h, m, s)| format!("{}h {}m {}s", h, m, s))
}

/// Declination text.
pub fn dec() -> impl Strategy<Value = String> {
    (-89i8..90, 0u8..60, 0u8..60).prop_map(|(d, m, s)| format!("{}° {}' {}\"", d, m, s))
}

/// A well-formed star request.
pub fn star_request() -> impl Strategy<Value = StarRequest> {
    (
        ra(),
        dec(),
        proptest::option::of("[0-9]{1,2}\\.[0-9]{1,2}"),
        proptest::option::of("[A-Z][a-z]{2,12}"),
        story(),
    )
        .prop_map(|(ra, dec, mag, cen, story)| StarRequest {
            ra,
            dec,
            mag,
            cen,
            story,
        })
}

/// A reasonable block time in Unix seconds.
pub fn block_time() -> impl Strategy<Value = u64> {
    1_500_000_000u64..2_500_000_000
}

/// A sealed star block following a genesis block at a random time.
pub fn star_block() -> impl Strategy<Value = (Block, Block)> {
    (block_time(), wallet(), star_request()).prop_filter_map(
        "star request must be valid",
        |(time, wallet, request)| {
            let star = request.into_star().ok()?;
            let genesis = Block::genesis(time).ok()?;
            let block =
                Block::successor(&genesis, BlockBody::star(wallet.address(), star), time + 1)
                    .ok()?;
            Some((genesis, block))
        },
    )
}
