//! Trick legality and resolution.

use super::cards_logic::{card_beats, hand_has_suit, hand_is_only_suit};
use super::cards_types::{Card, Suit};
use super::state::{expected_player, require_phase, Phase, PlayerId, SessionState, TrickPlay};
use crate::errors::domain::{DomainError, ValidationKind};

/// Check whether `player` may play `card` now.
///
/// Checks run in order: turn, card held, trump lead, follow suit.
pub fn can_play_card(state: &SessionState, player: &PlayerId, card: Card) -> Result<(), DomainError> {
    require_phase(state, Phase::Playing)?;
    if state.reveal.is_some() || state.trick_complete() {
        return Err(DomainError::validation(
            ValidationKind::TrickFull,
            "trick is complete and waiting to be cleared",
        ));
    }

    match expected_player(state) {
        Some(ref p) if p == player => {}
        Some(p) => {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                format!("waiting on {p}, not {player}"),
            ))
        }
        None => {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                "no player is expected to act",
            ))
        }
    }

    let hand = state.hand(player);
    if !hand.contains(&card) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            format!("{player} does not hold {card}"),
        ));
    }

    let trump = trump_of(state)?;
    match state.lead_suit() {
        None => {
            if card.suit == trump && !state.trump_broken && !hand_is_only_suit(hand, trump) {
                return Err(DomainError::validation(
                    ValidationKind::TrumpNotBroken,
                    "cannot lead trump before it is broken",
                ));
            }
        }
        Some(lead) => {
            if card.suit != lead && hand_has_suit(hand, lead) {
                return Err(DomainError::validation(
                    ValidationKind::MustFollowSuit,
                    format!("must follow {lead:?}"),
                ));
            }
        }
    }
    Ok(())
}

/// Every card `player` could legally play right now, sorted and deduplicated.
///
/// Empty when it is not the player's turn.
pub fn legal_cards(state: &SessionState, player: &PlayerId) -> Vec<Card> {
    if expected_player(state).as_ref() != Some(player) {
        return Vec::new();
    }
    let Some(trump) = state.trump else {
        return Vec::new();
    };
    let hand = state.hand(player);

    let mut legal: Vec<Card> = match state.lead_suit() {
        None if !state.trump_broken && !hand_is_only_suit(hand, trump) => {
            hand.iter().copied().filter(|c| c.suit != trump).collect()
        }
        None => hand.to_vec(),
        Some(lead) if hand_has_suit(hand, lead) => {
            hand.iter().copied().filter(|c| c.suit == lead).collect()
        }
        Some(_) => hand.to_vec(),
    };
    legal.sort();
    legal.dedup();
    legal
}

/// Winner of a (complete or partial) trick; `None` for an empty trick.
///
/// Highest trump wins if any trump was played, else highest card of the led
/// suit. Identical cards keep the earlier play in front.
pub fn winner_of_trick(plays: &[TrickPlay], trump: Suit) -> Option<PlayerId> {
    let first = plays.first()?;
    let lead = first.card.suit;
    let mut best = first;
    for play in &plays[1..] {
        if card_beats(play.card, best.card, lead, trump) {
            best = play;
        }
    }
    Some(best.player_id.clone())
}

/// Whether playing `card` onto a trick led with `lead` breaks trump.
pub fn breaks_trump(lead: Option<Suit>, card: Card, trump: Suit) -> bool {
    matches!(lead, Some(l) if l != trump && card.suit == trump)
}

fn trump_of(state: &SessionState) -> Result<Suit, DomainError> {
    state.trump.ok_or_else(|| {
        DomainError::validation(ValidationKind::InvalidRoundState, "round has no trump yet")
    })
}
