//! Advance-batch planner.
//!
//! Given a session snapshot, decide the events needed to move the game
//! forward by one step: deal, a bot bid or play, start play, clear a trick,
//! score a round, leave the summary. Timer-driven and user-driven advances
//! both call [`compute_advance_batch`], so they always agree on what comes
//! next. The planner never mutates state and never reads a clock; `now` is
//! passed in.

use tracing::{debug, error};

use super::dealing::{start_round, StartRoundParams};
use super::events::EventKind;
use super::player_view::CurrentRoundInfo;
use super::rules::{tricks_for_round, use_two_decks, ROUNDS};
use super::seed_derivation::{derive_bot_bid_seed, derive_bot_play_seed, derive_dealing_seed};
use super::state::{
    dealer_index_for_round, expected_bidder, expected_player, Difficulty, Phase, PlayerId,
    RoundState, SeatKind, SessionState,
};
use crate::ai::create_ai;
use crate::config::Timing;
use crate::error::EngineError;
use crate::errors::domain::{DomainError, ValidationKind};

/// Who is asking for the advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceIntent {
    /// Timer-driven: honours the reveal hold and summary countdown.
    Auto,
    /// Explicit user "continue": skips waits.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOptions {
    pub intent: AdvanceIntent,
    pub timing: Timing,
}

impl AdvanceOptions {
    pub fn auto(timing: Timing) -> Self {
        Self {
            intent: AdvanceIntent::Auto,
            timing,
        }
    }

    pub fn user_continue(timing: Timing) -> Self {
        Self {
            intent: AdvanceIntent::Continue,
            timing,
        }
    }
}

/// What the session is waiting on, for driving timers and UI controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    /// Nothing will happen without input from this player.
    Human(PlayerId),
    /// A bot is due to act.
    Bot(PlayerId),
    /// A completed trick is on display until `until`.
    Reveal { until: u64 },
    /// Summary shown; auto-advance at `until`.
    Summary { until: u64 },
    /// Setup work (deal, start play, redeal) can run immediately.
    Immediate,
    /// Only an explicit continue moves on.
    AwaitContinue,
    Finished,
}

/// Describe what the session is waiting on.
pub fn pending(state: &SessionState, timing: &Timing) -> Pending {
    if state.seats.is_empty() {
        return Pending::Finished;
    }
    if needs_redeal(state) {
        return Pending::Immediate;
    }
    match state.phase {
        Phase::Setup => Pending::Immediate,
        Phase::Bidding => match expected_bidder(state) {
            Some(p) => actor(state, p),
            None => Pending::Immediate,
        },
        Phase::Playing => {
            if let Some(reveal) = &state.reveal {
                return Pending::Reveal {
                    until: reveal.at.saturating_add(timing.reveal_hold_ms),
                };
            }
            match expected_player(state) {
                Some(p) => actor(state, p),
                None => Pending::Immediate,
            }
        }
        Phase::Summary => Pending::Summary {
            until: state
                .summary_entered_at
                .unwrap_or(0)
                .saturating_add(timing.summary_auto_advance_ms),
        },
        Phase::GameSummary => Pending::AwaitContinue,
        Phase::Done => Pending::Finished,
    }
}

fn actor(state: &SessionState, player: PlayerId) -> Pending {
    match state.seat(&player).map(|s| s.kind) {
        Some(SeatKind::Bot { .. }) => Pending::Bot(player),
        _ => Pending::Human(player),
    }
}

/// True when a round should be in progress but every hand is empty.
///
/// The only legitimate empty-handed moment is the reveal of the round's last
/// trick. A re-deal resets the trick tally, so the round's play starts over.
pub fn needs_redeal(state: &SessionState) -> bool {
    if !matches!(state.phase, Phase::Bidding | Phase::Playing)
        || state.round_no == 0
        || !state.hands.values().all(Vec::is_empty)
    {
        return false;
    }
    match (&state.reveal, state.current_round()) {
        (Some(_), Some(round)) => state.tricks_won_total() + 1 < round.tricks,
        _ => true,
    }
}

/// Plan the next step. An empty batch means there is nothing to do yet.
///
/// Calling this twice on the same state with the same `now` gives the same
/// batch.
pub fn compute_advance_batch(
    state: &SessionState,
    now: u64,
    opts: AdvanceOptions,
) -> Result<Vec<EventKind>, EngineError> {
    if state.seats.is_empty() {
        return Ok(Vec::new());
    }
    if needs_redeal(state) {
        debug!(round_no = state.round_no, "Planning re-deal after desync");
        return Ok(vec![deal_event(state, state.round_no)?]);
    }

    let auto = opts.intent == AdvanceIntent::Auto;
    let batch = match state.phase {
        Phase::Setup => open_round(state, 1)?,
        Phase::Bidding => match expected_bidder(state) {
            Some(p) if is_bot(state, &p) => vec![bot_bid_event(state, &p)?],
            Some(_) => Vec::new(),
            None => start_play(state)?,
        },
        Phase::Playing => {
            if let Some(reveal) = &state.reveal {
                if auto && now < reveal.at.saturating_add(opts.timing.reveal_hold_ms) {
                    Vec::new()
                } else {
                    clear_trick(state, &reveal.winner_id)?
                }
            } else {
                match expected_player(state) {
                    Some(p) if is_bot(state, &p) => vec![bot_play_event(state, &p)?],
                    _ => Vec::new(),
                }
            }
        }
        Phase::Summary => {
            let entered = state.summary_entered_at.unwrap_or(0);
            if auto && now < entered.saturating_add(opts.timing.summary_auto_advance_ms) {
                Vec::new()
            } else if state.round_no < ROUNDS {
                open_round(state, state.round_no + 1)?
            } else {
                vec![EventKind::phase_set(Phase::GameSummary)]
            }
        }
        Phase::GameSummary if !auto => vec![EventKind::phase_set(Phase::Done)],
        Phase::GameSummary | Phase::Done => Vec::new(),
    };
    Ok(batch)
}

fn is_bot(state: &SessionState, player: &PlayerId) -> bool {
    state.seat(player).is_some_and(|s| s.is_bot())
}

fn open_round(state: &SessionState, round_no: u8) -> Result<Vec<EventKind>, EngineError> {
    Ok(vec![
        deal_event(state, round_no)?,
        EventKind::round_state_set(round_no, RoundState::Bidding),
        EventKind::phase_set(Phase::Bidding),
    ])
}

fn start_play(state: &SessionState) -> Result<Vec<EventKind>, EngineError> {
    let first = state.order.first().cloned().ok_or_else(|| {
        EngineError::internal(format!("round {} has no seating order", state.round_no))
    })?;
    Ok(vec![
        EventKind::round_state_set(state.round_no, RoundState::Playing),
        EventKind::LeaderSet { leader_id: first },
        EventKind::phase_set(Phase::Playing),
    ])
}

fn clear_trick(state: &SessionState, winner: &PlayerId) -> Result<Vec<EventKind>, EngineError> {
    let tricks = state
        .current_round()
        .map(|r| r.tricks)
        .ok_or_else(|| EngineError::internal("playing without a current round"))?;
    let mut batch = vec![EventKind::TrickCleared {
        winner_id: winner.clone(),
    }];
    if state.tricks_won_total() + 1 >= tricks {
        batch.push(EventKind::round_state_set(
            state.round_no,
            RoundState::Complete,
        ));
        batch.push(EventKind::RoundFinalize {
            round: state.round_no,
        });
        batch.push(EventKind::phase_set(Phase::Summary));
    }
    Ok(batch)
}

/// Deal `round_no` deterministically from the session seed.
pub fn deal_event(state: &SessionState, round_no: u8) -> Result<EventKind, DomainError> {
    let players = state.seat_ids();
    let tricks = tricks_for_round(round_no).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::RoundMismatch,
            format!("round {round_no} is outside 1..={ROUNDS}"),
        )
    })?;
    let dealer_idx = dealer_index_for_round(players.len(), state.starting_dealer, round_no);
    let dealer = players.get(dealer_idx).cloned().ok_or_else(|| {
        DomainError::validation(ValidationKind::InvalidPlayerCount, "no seats to deal to")
    })?;

    let params = StartRoundParams {
        round: round_no,
        players: &players,
        dealer: &dealer,
        tricks,
        use_two_decks: use_two_decks(players.len()),
    };
    let deal = start_round(&params, derive_dealing_seed(state.session_seed, round_no))?;
    Ok(EventKind::Deal {
        round_no,
        dealer_id: dealer,
        order: deal.order,
        trump: deal.trump,
        trump_card: deal.trump_card,
        hands: deal.hands,
    })
}

fn bot_difficulty(state: &SessionState, player: &PlayerId) -> Result<Difficulty, EngineError> {
    match state.seat(player).map(|s| s.kind) {
        Some(SeatKind::Bot { difficulty }) => Ok(difficulty),
        _ => Err(EngineError::internal(format!("{player} is not a bot seat"))),
    }
}

fn bot_bid_event(state: &SessionState, player: &PlayerId) -> Result<EventKind, EngineError> {
    let difficulty = bot_difficulty(state, player)?;
    let info = CurrentRoundInfo::for_player(state, player)?;
    let seed = derive_bot_bid_seed(state.session_seed, state.round_no, player);
    let bid = create_ai(difficulty, seed).choose_bid(&info)?;
    if !info.legal_bids().contains(&bid) {
        error!(player_id = %player, bid, round_no = state.round_no, "Bot chose an illegal bid");
        return Err(EngineError::bot(format!(
            "{player} bid {bid}, legal range is 0..={}",
            info.tricks
        )));
    }
    debug!(player_id = %player, bid, round_no = state.round_no, "Bot bid");
    Ok(EventKind::bid_set(state.round_no, player.clone(), bid))
}

fn bot_play_event(state: &SessionState, player: &PlayerId) -> Result<EventKind, EngineError> {
    let difficulty = bot_difficulty(state, player)?;
    let info = CurrentRoundInfo::for_player(state, player)?;
    let seed = derive_bot_play_seed(
        state.session_seed,
        state.round_no,
        player,
        state.trick_index(),
    );
    let card = create_ai(difficulty, seed).choose_play(&info)?;
    if !info.legal_plays().contains(&card) {
        error!(player_id = %player, card = %card, round_no = state.round_no, "Bot chose an illegal card");
        return Err(EngineError::bot(format!("{player} played illegal card {card}")));
    }
    debug!(player_id = %player, card = %card, trick = state.trick_index(), "Bot play");
    Ok(EventKind::trick_played(player.clone(), card))
}
