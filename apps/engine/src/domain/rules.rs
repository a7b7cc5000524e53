use std::ops::RangeInclusive;

use super::cards_types::Suit;

pub const ROUNDS: u8 = 10;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;
pub const DECK_SIZE: usize = 52;

// Countdown schedule: round 1 deals 10 tricks, round 10 deals 1.
pub fn tricks_for_round(round_no: u8) -> Option<u8> {
    if round_no == 0 || round_no > ROUNDS {
        return None;
    }
    Some(ROUNDS + 1 - round_no)
}

pub fn valid_bid_range(tricks: u8) -> RangeInclusive<u8> {
    0..=tricks
}

/// More than five players cannot be dealt ten cards each from one deck.
pub fn use_two_decks(players: usize) -> bool {
    players > 5
}

pub fn valid_player_count(players: usize) -> bool {
    (MIN_PLAYERS..=MAX_PLAYERS).contains(&players)
}

/// Trump suit used when dealing exhausts the deck and no indicator card is left.
pub fn fallback_trump(round_no: u8) -> Suit {
    let idx = usize::from(round_no.saturating_sub(1)) % Suit::ALL.len();
    Suit::ALL[idx]
}
