//! Deterministic card dealing logic.

use std::collections::BTreeMap;

use super::cards_types::{Card, Rank, Suit};
use super::rng::Mulberry32;
use super::rules::{fallback_trump, DECK_SIZE, MIN_PLAYERS};
use super::state::{order_after_dealer, PlayerId};
use crate::errors::domain::{DomainError, ValidationKind};

/// Generate a full 52-card deck in standard order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// One or two fresh decks, concatenated.
pub fn full_decks(two: bool) -> Vec<Card> {
    let mut deck = full_deck();
    if two {
        deck.extend(full_deck());
    }
    deck
}

/// Fisher-Yates shuffle driven by the mulberry32 stream.
pub fn shuffle(deck: &mut [Card], seed: u32) {
    let mut rng = Mulberry32::new(seed);
    for i in (1..deck.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64) as usize;
        deck.swap(i, j.min(i));
    }
}

#[derive(Debug, Clone)]
pub struct StartRoundParams<'a> {
    pub round: u8,
    /// Seats in table order.
    pub players: &'a [PlayerId],
    pub dealer: &'a PlayerId,
    pub tricks: u8,
    pub use_two_decks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    /// Round seating, starting left of the dealer.
    pub order: Vec<PlayerId>,
    pub trump: Suit,
    /// `None` when dealing used every card.
    pub trump_card: Option<Card>,
    pub hands: BTreeMap<PlayerId, Vec<Card>>,
    pub first_to_act: PlayerId,
    /// Cards left in the stock after the indicator was turned.
    pub undealt: Vec<Card>,
}

/// Shuffle and deal a round.
///
/// Cards go one at a time to each seat in turn, starting left of the dealer.
/// The next card after the deal is turned as the trump indicator. Hands are
/// sorted for convenience.
pub fn start_round(params: &StartRoundParams<'_>, seed: u32) -> Result<Deal, DomainError> {
    let n = params.players.len();
    if n < MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("need at least {MIN_PLAYERS} players, got {n}"),
        ));
    }

    let order = order_after_dealer(params.players, params.dealer).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::UnknownPlayer,
            format!("dealer {} is not seated", params.dealer),
        )
    })?;

    let mut deck = full_decks(params.use_two_decks);
    let to_deal = n * usize::from(params.tricks);
    if to_deal > deck.len() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!(
                "{n} players x {} tricks exceeds {} cards",
                params.tricks,
                deck.len()
            ),
        ));
    }

    shuffle(&mut deck, seed);

    let mut hands: BTreeMap<PlayerId, Vec<Card>> = order
        .iter()
        .map(|p| (p.clone(), Vec::with_capacity(usize::from(params.tricks))))
        .collect();
    for (k, card) in deck.iter().take(to_deal).enumerate() {
        if let Some(hand) = hands.get_mut(&order[k % n]) {
            hand.push(*card);
        }
    }
    for hand in hands.values_mut() {
        hand.sort();
    }

    let mut rest = deck.split_off(to_deal).into_iter();
    let trump_card = rest.next();
    let trump = trump_card
        .map(|c| c.suit)
        .unwrap_or_else(|| fallback_trump(params.round));

    let first_to_act = order[0].clone();
    Ok(Deal {
        order,
        trump,
        trump_card,
        hands,
        first_to_act,
        undealt: rest.collect(),
    })
}
