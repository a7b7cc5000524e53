//! Two-character card tokens ("AS", "TD", "3H") used by tools and tests.

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

const RANK_TOKENS: [(Rank, char); 13] = [
    (Rank::Two, '2'),
    (Rank::Three, '3'),
    (Rank::Four, '4'),
    (Rank::Five, '5'),
    (Rank::Six, '6'),
    (Rank::Seven, '7'),
    (Rank::Eight, '8'),
    (Rank::Nine, '9'),
    (Rank::Ten, 'T'),
    (Rank::Jack, 'J'),
    (Rank::Queen, 'Q'),
    (Rank::King, 'K'),
    (Rank::Ace, 'A'),
];

const SUIT_TOKENS: [(Suit, char); 4] = [
    (Suit::Clubs, 'C'),
    (Suit::Diamonds, 'D'),
    (Suit::Hearts, 'H'),
    (Suit::Spades, 'S'),
];

fn token_of<T: PartialEq + Copy>(table: &[(T, char)], value: T) -> char {
    table
        .iter()
        .find(|(v, _)| *v == value)
        .map_or('?', |(_, ch)| *ch)
}

fn value_of<T: Copy>(table: &[(T, char)], ch: char) -> Option<T> {
    table.iter().find(|(_, c)| *c == ch).map(|(v, _)| *v)
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            token_of(&RANK_TOKENS, self.rank),
            token_of(&SUIT_TOKENS, self.suit)
        )
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => {
                value_of(&RANK_TOKENS, r).zip(value_of(&SUIT_TOKENS, su))
            }
            _ => None,
        };
        parsed
            .map(|(rank, suit)| Card::new(suit, rank))
            .ok_or_else(|| {
                DomainError::validation(ValidationKind::ParseCard, format!("bad card token '{s}'"))
            })
    }
}

/// Parse a list of tokens, e.g. `["AS", "TD"]`.
pub fn parse_cards(tokens: &[&str]) -> Result<Vec<Card>, DomainError> {
    tokens.iter().map(|t| t.parse()).collect()
}
