//! RNG seed derivation utilities for deterministic game behavior.
//!
//! Every random choice in a session (dealing, bot bids, bot plays) draws from
//! its own sub-seed derived from the session's root seed, the round number
//! and a purpose tag. Replaying a session from its root seed therefore
//! reproduces every shuffle and every bot decision.

use super::state::PlayerId;

/// Purpose tag for dealing a round.
pub const DEAL_PURPOSE: &str = "deal";

fn fnv1a(tag: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in tag.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive a 32-bit seed for `(root, round_no, purpose)`.
///
/// Same inputs always give the same seed; changing any input changes it.
pub fn derive_seed(root: u64, round_no: u8, purpose: &str) -> u32 {
    let round_mix = splitmix64(u64::from(round_no) ^ fnv1a(purpose));
    let mixed = splitmix64(root ^ round_mix);
    (mixed ^ (mixed >> 32)) as u32
}

/// Derive the seed used to shuffle and deal a round.
pub fn derive_dealing_seed(root: u64, round_no: u8) -> u32 {
    derive_seed(root, round_no, DEAL_PURPOSE)
}

/// Derive the seed for a bot's bid in a round.
pub fn derive_bot_bid_seed(root: u64, round_no: u8, player: &PlayerId) -> u32 {
    derive_seed(root, round_no, &format!("bot-bid:{player}"))
}

/// Derive the seed for a bot's card choice on a given trick of a round.
///
/// `trick_index` is the 0-based number of tricks already completed.
pub fn derive_bot_play_seed(root: u64, round_no: u8, player: &PlayerId, trick_index: u8) -> u32 {
    derive_seed(root, round_no, &format!("bot-play:{player}:{trick_index}"))
}
