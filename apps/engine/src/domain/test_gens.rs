// Proptest generators for domain types.

use proptest::prelude::*;
use proptest::sample::{select, subsequence};

use crate::domain::dealing::full_deck;
use crate::domain::{Card, Suit};

pub fn suit() -> impl Strategy<Value = Suit> {
    select(Suit::ALL.to_vec())
}

/// `count` distinct cards from one deck, in random order.
pub fn unique_cards(count: usize) -> impl Strategy<Value = Vec<Card>> {
    subsequence(full_deck(), count.min(52)).prop_shuffle()
}

/// A non-empty hand with no card of `excluded`.
pub fn hand_without_suit(excluded: Suit) -> impl Strategy<Value = Vec<Card>> {
    let pool: Vec<Card> = full_deck()
        .into_iter()
        .filter(|c| c.suit != excluded)
        .collect();
    subsequence(pool, 1..=13)
}

/// Session parameters: (seed, player count, starting dealer index).
pub fn session_params() -> impl Strategy<Value = (u64, usize, usize)> {
    (any::<u64>(), 2usize..=10).prop_flat_map(|(seed, n)| (Just(seed), Just(n), 0..n))
}

pub fn round_no() -> impl Strategy<Value = u8> {
    1u8..=10
}
