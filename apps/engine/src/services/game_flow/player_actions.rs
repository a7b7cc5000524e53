use std::sync::Arc;

use tracing::debug;

use super::GameFlow;
use crate::domain::player_view::CurrentRoundInfo;
use crate::domain::state::{expected_bidder, require_phase};
use crate::domain::tricks::{can_play_card, legal_cards};
use crate::domain::{
    cumulative_scores, valid_bid_range, Card, EventKind, Phase, PlayerId, SessionState,
};
use crate::error::EngineError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

impl GameFlow {
    /// Cards `player` may play right now; empty when it is not their turn.
    pub fn legal_cards(&self, player: &PlayerId) -> Vec<Card> {
        legal_cards(&self.snapshot(), player)
    }

    /// What `player` can see of the current round.
    pub fn round_info(&self, player: &PlayerId) -> Result<CurrentRoundInfo, EngineError> {
        Ok(CurrentRoundInfo::for_player(&self.snapshot(), player)?)
    }

    pub fn scores(&self) -> std::collections::BTreeMap<PlayerId, i32> {
        cumulative_scores(&self.snapshot())
    }

    /// Record the human's bid.
    pub fn submit_bid(&self, player: &PlayerId, bid: u8) -> Result<Arc<SessionState>, EngineError> {
        debug!(session_id = %self.session_id, player_id = %player, bid, "Submitting bid");
        let guard = self.store.begin_batch()?;
        let state = guard.snapshot();
        require_human(&state, player)?;
        require_phase(&state, Phase::Bidding)?;

        let round = state.current_round().ok_or_else(|| {
            DomainError::validation(ValidationKind::InvalidRoundState, "no round in progress")
        })?;
        if !valid_bid_range(round.tricks).contains(&bid) {
            return Err(DomainError::validation(
                ValidationKind::InvalidBid,
                format!("bid {bid} outside 0..={}", round.tricks),
            )
            .into());
        }
        if round.bids.contains_key(player) {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyBid,
                format!("{player} already bid in round {}", state.round_no),
            )
            .into());
        }
        if expected_bidder(&state).as_ref() != Some(player) {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                format!("{player} bid out of turn"),
            )
            .into());
        }

        let kinds = vec![EventKind::bid_set(state.round_no, player.clone(), bid)];
        Ok(guard.append(kinds, self.now_ms())?)
    }

    /// Play a card for the human.
    pub fn submit_play(
        &self,
        player: &PlayerId,
        card: Card,
    ) -> Result<Arc<SessionState>, EngineError> {
        debug!(session_id = %self.session_id, player_id = %player, card = %card, "Submitting play");
        let guard = self.store.begin_batch()?;
        let state = guard.snapshot();
        require_human(&state, player)?;
        can_play_card(&state, player, card)?;

        let kinds = vec![EventKind::trick_played(player.clone(), card)];
        Ok(guard.append(kinds, self.now_ms())?)
    }
}

fn require_human(state: &SessionState, player: &PlayerId) -> Result<(), DomainError> {
    match state.seat(player) {
        None => Err(DomainError::validation(
            ValidationKind::UnknownPlayer,
            format!("{player} is not seated"),
        )),
        Some(seat) if seat.is_bot() => Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("{player} is a bot and moves through the planner"),
        )),
        Some(_) => Ok(()),
    }
}
