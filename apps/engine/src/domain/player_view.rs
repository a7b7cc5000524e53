//! Player view of the session: what a seat can see at its decision point.
//!
//! `CurrentRoundInfo` is the only thing bot policies receive. It carries the
//! seat's own hand but never another player's, and it exposes the legal
//! bids and plays so policies never re-implement the rules.

use std::collections::BTreeMap;

use super::cards_types::{Card, Suit};
use super::rules::valid_bid_range;
use super::scoring::cumulative_scores;
use super::state::{require_seated, Phase, PlayerId, SessionState, TrickPlay};
use super::tricks::legal_cards;
use crate::errors::domain::{DomainError, ValidationKind};

/// Information visible to one player for the current round.
#[derive(Debug, Clone)]
pub struct CurrentRoundInfo {
    pub player_id: PlayerId,
    pub phase: Phase,
    pub round_no: u8,
    /// Tricks (and cards per hand) this round.
    pub tricks: u8,
    /// Round seating, starting left of the dealer.
    pub order: Vec<PlayerId>,
    pub dealer_id: Option<PlayerId>,
    pub hand: Vec<Card>,
    /// Bids placed so far this round.
    pub bids: BTreeMap<PlayerId, u8>,
    pub trump: Option<Suit>,
    pub trump_card: Option<Card>,
    pub trump_broken: bool,
    /// 0-based index of the trick in progress.
    pub trick_index: u8,
    pub current_trick_plays: Vec<TrickPlay>,
    pub trick_counts: BTreeMap<PlayerId, u8>,
    /// Cumulative scores from scored rounds.
    pub scores: BTreeMap<PlayerId, i32>,
    pub trick_leader: Option<PlayerId>,
    legal_plays: Vec<Card>,
}

impl CurrentRoundInfo {
    pub fn for_player(state: &SessionState, player: &PlayerId) -> Result<Self, DomainError> {
        require_seated(state, player)?;
        let round = state.current_round().ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidRoundState,
                "no round has been dealt",
            )
        })?;

        Ok(Self {
            player_id: player.clone(),
            phase: state.phase,
            round_no: state.round_no,
            tricks: round.tricks,
            order: state.order.clone(),
            dealer_id: state.dealer_id.clone(),
            hand: state.hand(player).to_vec(),
            bids: round.bids.clone(),
            trump: state.trump,
            trump_card: state.trump_card,
            trump_broken: state.trump_broken,
            trick_index: state.trick_index(),
            current_trick_plays: state.trick_plays.clone(),
            trick_counts: state.trick_counts.clone(),
            scores: cumulative_scores(state),
            trick_leader: state.leader_id.clone(),
            legal_plays: legal_cards(state, player),
        })
    }

    /// Valid bids: any value from zero to the round's trick count.
    pub fn legal_bids(&self) -> Vec<u8> {
        if self.phase != Phase::Bidding || self.bids.contains_key(&self.player_id) {
            return Vec::new();
        }
        valid_bid_range(self.tricks).collect()
    }

    /// Cards this player may play right now. Empty when not their turn.
    pub fn legal_plays(&self) -> Vec<Card> {
        self.legal_plays.clone()
    }

    pub fn my_bid(&self) -> Option<u8> {
        self.bids.get(&self.player_id).copied()
    }

    pub fn my_tricks(&self) -> u8 {
        self.trick_counts.get(&self.player_id).copied().unwrap_or(0)
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.current_trick_plays.first().map(|p| p.card.suit)
    }

    /// Seats still to play after this one in the current trick.
    pub fn players_after_me(&self) -> usize {
        self.order
            .len()
            .saturating_sub(self.current_trick_plays.len() + 1)
    }
}
