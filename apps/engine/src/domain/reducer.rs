//! Pure state transition over session events.
//!
//! `reduce` validates an event against the current state and applies it in
//! place. On error the state may be partially written, so callers that need
//! atomicity work on a copy (see [`apply`] and the store's batch append).

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::cards_types::{Card, Suit};
use super::events::{Event, EventKind};
use super::rules::{valid_bid_range, valid_player_count, ROUNDS};
use super::scoring::score_round;
use super::state::{
    expected_bidder, require_phase, require_round, LastTrick, Phase, PlayerId, Reveal,
    RoundState, SeatInfo, SessionState, TrickPlay,
};
use super::tricks::{breaks_trump, can_play_card, winner_of_trick};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Apply one event to a copy of `state`.
pub fn apply(state: &SessionState, event: &Event) -> Result<SessionState, DomainError> {
    let mut next = state.clone();
    reduce(&mut next, event)?;
    Ok(next)
}

/// Rebuild a session from its full log.
pub fn replay<'a>(events: impl IntoIterator<Item = &'a Event>) -> Result<SessionState, DomainError> {
    let mut state = SessionState::empty();
    for event in events {
        reduce(&mut state, event)?;
    }
    Ok(state)
}

/// Validate and apply one event in place.
pub fn reduce(state: &mut SessionState, event: &Event) -> Result<(), DomainError> {
    trace!(event_type = event.kind.type_name(), "reduce");
    match &event.kind {
        EventKind::SessionReset {
            session_seed,
            seats,
            starting_dealer,
        } => on_session_reset(state, *session_seed, seats, *starting_dealer),
        EventKind::Deal {
            round_no,
            dealer_id,
            order,
            trump,
            trump_card,
            hands,
        } => on_deal(state, *round_no, dealer_id, order, *trump, *trump_card, hands),
        EventKind::BidSet {
            round,
            player_id,
            bid,
        } => on_bid_set(state, *round, player_id, *bid),
        EventKind::RoundStateSet {
            round,
            state: to,
            correction,
        } => on_round_state_set(state, *round, *to, *correction),
        EventKind::TrickPlayed { player_id, card } => {
            on_trick_played(state, player_id, *card, event.timestamp)
        }
        EventKind::TrickCleared { winner_id } => on_trick_cleared(state, winner_id),
        EventKind::LeaderSet { leader_id } => on_leader_set(state, leader_id),
        EventKind::TrumpBrokenSet { broken } => {
            require_phase(state, Phase::Playing)?;
            state.trump_broken = *broken;
            Ok(())
        }
        EventKind::PhaseSet { phase } => on_phase_set(state, *phase, event.timestamp),
        EventKind::RoundFinalize { round } => on_round_finalize(state, *round),
    }
}

fn on_session_reset(
    state: &mut SessionState,
    session_seed: u64,
    seats: &[SeatInfo],
    starting_dealer: usize,
) -> Result<(), DomainError> {
    if !valid_player_count(seats.len()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("{} seats is outside 2..=10", seats.len()),
        ));
    }
    let unique: BTreeSet<&PlayerId> = seats.iter().map(|s| &s.id).collect();
    if unique.len() != seats.len() {
        return Err(DomainError::validation_other("duplicate player ids in seats"));
    }
    if starting_dealer >= seats.len() {
        return Err(DomainError::validation_other(format!(
            "starting dealer {starting_dealer} is not a seat index"
        )));
    }
    *state = SessionState::new(session_seed, seats.to_vec(), starting_dealer);
    Ok(())
}

fn on_deal(
    state: &mut SessionState,
    round_no: u8,
    dealer_id: &PlayerId,
    order: &[PlayerId],
    trump: Suit,
    trump_card: Option<Card>,
    hands: &BTreeMap<PlayerId, Vec<Card>>,
) -> Result<(), DomainError> {
    let record = state.rounds.get(&round_no).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::RoundMismatch,
            format!("round {round_no} does not exist"),
        )
    })?;

    let redeal =
        round_no == state.round_no && matches!(state.phase, Phase::Bidding | Phase::Playing);
    let fresh = match state.phase {
        Phase::Setup => round_no == 1,
        Phase::Summary => round_no == state.round_no + 1,
        _ => false,
    };
    if !redeal && !fresh {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("cannot deal round {round_no} in {:?}", state.phase),
        ));
    }
    if fresh && record.state != RoundState::Locked {
        return Err(DomainError::validation(
            ValidationKind::InvalidRoundState,
            format!("round {round_no} is already {:?}", record.state),
        ));
    }

    let mut seated = state.seat_ids();
    seated.sort();
    let mut dealt_to = order.to_vec();
    dealt_to.sort();
    if seated != dealt_to || !order.contains(dealer_id) {
        return Err(DomainError::validation(
            ValidationKind::UnknownPlayer,
            "deal order does not match the seated players",
        ));
    }
    if hands.len() != order.len() {
        return Err(DomainError::validation(
            ValidationKind::UnknownPlayer,
            "hands do not match the seated players",
        ));
    }
    let tricks = usize::from(record.tricks);
    for pid in order {
        let size = hands.get(pid).map_or(0, Vec::len);
        if size != tricks {
            return Err(DomainError::validation_other(format!(
                "{pid} dealt {size} cards, round {round_no} needs {tricks}"
            )));
        }
    }
    if let Some(card) = trump_card {
        if card.suit != trump {
            return Err(DomainError::validation_other(
                "trump suit does not match the indicator card",
            ));
        }
    }

    let keep_leader = redeal && state.phase == Phase::Playing;
    state.round_no = round_no;
    state.dealer_id = Some(dealer_id.clone());
    state.order = order.to_vec();
    state.hands = hands.clone();
    state.trump = Some(trump);
    state.trump_card = trump_card;
    state.trump_broken = false;
    state.trick_plays.clear();
    state.trick_counts = order.iter().map(|p| (p.clone(), 0)).collect();
    state.reveal = None;
    state.last_trick_snapshot = None;
    state.summary_entered_at = None;
    if !keep_leader {
        state.leader_id = None;
    }
    Ok(())
}

fn on_bid_set(
    state: &mut SessionState,
    round: u8,
    player_id: &PlayerId,
    bid: u8,
) -> Result<(), DomainError> {
    require_phase(state, Phase::Bidding)?;
    let record = require_round(state, round)?;
    if record.state != RoundState::Bidding {
        return Err(DomainError::validation(
            ValidationKind::InvalidRoundState,
            format!("round {round} is {:?}, not bidding", record.state),
        ));
    }
    if !state.order.contains(player_id) {
        return Err(DomainError::validation(
            ValidationKind::UnknownPlayer,
            format!("{player_id} is not in this round"),
        ));
    }
    if !valid_bid_range(record.tricks).contains(&bid) {
        return Err(DomainError::validation(
            ValidationKind::InvalidBid,
            format!("bid {bid} outside 0..={}", record.tricks),
        ));
    }
    if record.bids.contains_key(player_id) {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyBid,
            format!("{player_id} already bid in round {round}"),
        ));
    }
    if expected_bidder(state).as_ref() != Some(player_id) {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("{player_id} bid out of turn"),
        ));
    }

    if let Some(record) = state.rounds.get_mut(&round) {
        record.bids.insert(player_id.clone(), bid);
    }
    Ok(())
}

fn on_round_state_set(
    state: &mut SessionState,
    round: u8,
    to: RoundState,
    correction: bool,
) -> Result<(), DomainError> {
    if correction {
        let record = state.rounds.get_mut(&round).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::RoundMismatch,
                format!("round {round} does not exist"),
            )
        })?;
        if to == RoundState::Scored && record.made.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidRoundState,
                "cannot mark an unscored round as scored",
            ));
        }
        if to < RoundState::Scored {
            record.made.clear();
            record.deltas.clear();
        }
        record.state = to;
        return Ok(());
    }

    let record = require_round(state, round)?;
    if record.state.next() != Some(to) {
        return Err(DomainError::validation(
            ValidationKind::InvalidRoundState,
            format!("round {round} cannot go from {:?} to {to:?}", record.state),
        ));
    }
    match to {
        RoundState::Bidding if state.dealer_id.is_none() || state.hands.is_empty() => {
            return Err(DomainError::validation(
                ValidationKind::InvalidRoundState,
                format!("round {round} has not been dealt"),
            ));
        }
        RoundState::Playing => {
            if let Some(missing) = state.order.iter().find(|p| !record.bids.contains_key(*p)) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidRoundState,
                    format!("{missing} has not bid"),
                ));
            }
        }
        RoundState::Complete => {
            if state.tricks_won_total() != record.tricks || !state.trick_plays.is_empty() {
                return Err(DomainError::validation(
                    ValidationKind::InvalidRoundState,
                    format!("round {round} still has tricks to play"),
                ));
            }
        }
        RoundState::Scored => {
            return Err(DomainError::validation(
                ValidationKind::InvalidRoundState,
                "rounds are scored by round/finalize",
            ));
        }
        _ => {}
    }

    if let Some(record) = state.rounds.get_mut(&round) {
        record.state = to;
    }
    Ok(())
}

fn on_trick_played(
    state: &mut SessionState,
    player_id: &PlayerId,
    card: Card,
    timestamp: u64,
) -> Result<(), DomainError> {
    can_play_card(state, player_id, card)?;
    let trump = state.trump.ok_or_else(|| {
        DomainError::validation(ValidationKind::InvalidRoundState, "round has no trump")
    })?;

    if breaks_trump(state.lead_suit(), card, trump) {
        state.trump_broken = true;
    }
    if let Some(hand) = state.hands.get_mut(player_id) {
        if let Some(pos) = hand.iter().position(|c| *c == card) {
            hand.remove(pos);
        }
    }
    state.trick_plays.push(TrickPlay {
        player_id: player_id.clone(),
        card,
    });

    if state.trick_complete() {
        if let Some(winner_id) = winner_of_trick(&state.trick_plays, trump) {
            state.reveal = Some(Reveal {
                winner_id,
                at: timestamp,
            });
        }
    }
    Ok(())
}

fn on_trick_cleared(state: &mut SessionState, winner_id: &PlayerId) -> Result<(), DomainError> {
    require_phase(state, Phase::Playing)?;
    let Some(reveal) = state.reveal.take() else {
        return Err(DomainError::validation(
            ValidationKind::TrickIncomplete,
            format!("{} of {} cards played", state.trick_plays.len(), state.order.len()),
        ));
    };
    if &reveal.winner_id != winner_id {
        return Err(DomainError::validation(
            ValidationKind::WinnerMismatch,
            format!("{winner_id} did not win; {} did", reveal.winner_id),
        ));
    }

    *state.trick_counts.entry(winner_id.clone()).or_insert(0) += 1;
    state.last_trick_snapshot = Some(LastTrick {
        winner_id: winner_id.clone(),
        plays: std::mem::take(&mut state.trick_plays),
    });
    state.leader_id = Some(winner_id.clone());
    Ok(())
}

fn on_leader_set(state: &mut SessionState, leader_id: &PlayerId) -> Result<(), DomainError> {
    if !matches!(state.phase, Phase::Bidding | Phase::Playing) {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("cannot set a leader in {:?}", state.phase),
        ));
    }
    if !state.order.contains(leader_id) {
        return Err(DomainError::validation(
            ValidationKind::UnknownPlayer,
            format!("{leader_id} is not in this round"),
        ));
    }
    if !state.trick_plays.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::TrickIncomplete,
            "cannot change leader mid-trick",
        ));
    }
    state.leader_id = Some(leader_id.clone());
    Ok(())
}

fn on_phase_set(state: &mut SessionState, to: Phase, timestamp: u64) -> Result<(), DomainError> {
    let from = state.phase;
    if !from.can_transition_to(to) {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("cannot move from {from:?} to {to:?}"),
        ));
    }

    let round_state = state.current_round().map(|r| r.state);
    let ready = match (from, to) {
        (Phase::Setup, Phase::Bidding) | (Phase::Summary, Phase::Bidding) => {
            round_state == Some(RoundState::Bidding)
        }
        (Phase::Bidding, Phase::Playing) => round_state == Some(RoundState::Playing),
        (Phase::Playing, Phase::Summary) => round_state == Some(RoundState::Scored),
        (Phase::Summary, Phase::GameSummary) => {
            state.round_no == ROUNDS && round_state == Some(RoundState::Scored)
        }
        _ => true,
    };
    if !ready {
        return Err(DomainError::validation(
            ValidationKind::InvalidRoundState,
            format!(
                "round {} is {round_state:?}, not ready for {to:?}",
                state.round_no
            ),
        ));
    }

    state.phase = to;
    state.summary_entered_at = (to == Phase::Summary).then_some(timestamp);
    Ok(())
}

fn on_round_finalize(state: &mut SessionState, round: u8) -> Result<(), DomainError> {
    let record = require_round(state, round)?;
    if record.state != RoundState::Complete {
        return Err(DomainError::validation(
            ValidationKind::InvalidRoundState,
            format!("round {round} is {:?}, not complete", record.state),
        ));
    }
    let counts = state.trick_counts.clone();
    if let Some(record) = state.rounds.get_mut(&round) {
        score_round(record, &counts);
        record.state = RoundState::Scored;
    }
    Ok(())
}
