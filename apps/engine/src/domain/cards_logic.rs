//! Suit checks on hands and card comparison within a trick.

use super::cards_types::{Card, Rank, Suit};

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

pub fn hand_is_only_suit(hand: &[Card], suit: Suit) -> bool {
    !hand.is_empty() && hand.iter().all(|c| c.suit == suit)
}

/// Strength of a card within one trick; `None` for an off-suit discard.
fn trick_strength(card: Card, lead: Suit, trump: Suit) -> Option<(bool, Rank)> {
    if card.suit == trump {
        Some((true, card.rank))
    } else if card.suit == lead {
        Some((false, card.rank))
    } else {
        None
    }
}

/// True when `a` strictly beats `b` in a trick led with `lead`.
///
/// Identical cards (possible with two decks) never beat each other, so the
/// card played first keeps the trick.
pub fn card_beats(a: Card, b: Card, lead: Suit, trump: Suit) -> bool {
    match (trick_strength(a, lead, trump), trick_strength(b, lead, trump)) {
        (Some(sa), Some(sb)) => sa > sb,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
