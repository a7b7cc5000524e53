use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Suit};
use super::rules::{tricks_for_round, ROUNDS};
use crate::errors::domain::{DomainError, ValidationKind};

/// Stable player identifier supplied by the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Bot strength knob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl std::str::FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::validation_other(format!(
                "unknown difficulty '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SeatKind {
    Human,
    Bot { difficulty: Difficulty },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInfo {
    pub id: PlayerId,
    pub name: String,
    pub kind: SeatKind,
}

impl SeatInfo {
    pub fn human(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: SeatKind::Human,
        }
    }

    pub fn bot(id: impl Into<PlayerId>, name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: SeatKind::Bot { difficulty },
        }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self.kind, SeatKind::Bot { .. })
    }
}

/// Overall session progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Seats known, nothing dealt yet.
    Setup,
    /// Players bid in seat order.
    Bidding,
    /// Tricks are being played.
    Playing,
    /// Round scored, waiting to move on.
    Summary,
    /// All ten rounds scored.
    GameSummary,
    /// Terminal.
    Done,
}

impl Phase {
    /// Whether `self -> to` is a legal forward step.
    pub fn can_transition_to(self, to: Phase) -> bool {
        matches!(
            (self, to),
            (Phase::Setup, Phase::Bidding)
                | (Phase::Bidding, Phase::Playing)
                | (Phase::Playing, Phase::Summary)
                | (Phase::Summary, Phase::Bidding)
                | (Phase::Summary, Phase::GameSummary)
                | (Phase::GameSummary, Phase::Done)
        )
    }
}

/// Per-round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundState {
    Locked,
    Bidding,
    Playing,
    Complete,
    Scored,
}

impl RoundState {
    pub fn next(self) -> Option<RoundState> {
        match self {
            RoundState::Locked => Some(RoundState::Bidding),
            RoundState::Bidding => Some(RoundState::Playing),
            RoundState::Playing => Some(RoundState::Complete),
            RoundState::Complete => Some(RoundState::Scored),
            RoundState::Scored => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub tricks: u8,
    pub bids: BTreeMap<PlayerId, u8>,
    /// Absent until the round is finalized.
    pub made: BTreeMap<PlayerId, bool>,
    pub state: RoundState,
    pub present: BTreeMap<PlayerId, bool>,
    /// Score change per player, filled by finalization.
    pub deltas: BTreeMap<PlayerId, i32>,
}

impl RoundRecord {
    pub fn new(tricks: u8, players: &[PlayerId]) -> Self {
        Self {
            tricks,
            bids: BTreeMap::new(),
            made: BTreeMap::new(),
            state: RoundState::Locked,
            present: players.iter().map(|p| (p.clone(), true)).collect(),
            deltas: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickPlay {
    pub player_id: PlayerId,
    pub card: Card,
}

/// A completed trick held on the table until it is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reveal {
    pub winner_id: PlayerId,
    /// Event timestamp (ms) of the completing play.
    pub at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastTrick {
    pub winner_id: PlayerId,
    pub plays: Vec<TrickPlay>,
}

/// Whole single-player session, rebuilt by folding the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: Phase,
    /// 0 before the first deal, then 1..=10.
    pub round_no: u8,
    pub seats: Vec<SeatInfo>,
    pub starting_dealer: usize,
    /// Seat order for the current round, starting left of the dealer.
    pub order: Vec<PlayerId>,
    pub dealer_id: Option<PlayerId>,
    pub leader_id: Option<PlayerId>,
    pub hands: BTreeMap<PlayerId, Vec<Card>>,
    pub trump: Option<Suit>,
    pub trump_card: Option<Card>,
    pub trump_broken: bool,
    pub trick_plays: Vec<TrickPlay>,
    pub trick_counts: BTreeMap<PlayerId, u8>,
    pub reveal: Option<Reveal>,
    pub last_trick_snapshot: Option<LastTrick>,
    pub session_seed: u64,
    pub summary_entered_at: Option<u64>,
    pub rounds: BTreeMap<u8, RoundRecord>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::empty()
    }
}

impl SessionState {
    /// State before any session has been set up.
    pub fn empty() -> Self {
        Self {
            phase: Phase::Setup,
            round_no: 0,
            seats: Vec::new(),
            starting_dealer: 0,
            order: Vec::new(),
            dealer_id: None,
            leader_id: None,
            hands: BTreeMap::new(),
            trump: None,
            trump_card: None,
            trump_broken: false,
            trick_plays: Vec::new(),
            trick_counts: BTreeMap::new(),
            reveal: None,
            last_trick_snapshot: None,
            session_seed: 0,
            summary_entered_at: None,
            rounds: BTreeMap::new(),
        }
    }

    /// Fresh session in `setup` with rounds 1..=10 locked.
    pub fn new(session_seed: u64, seats: Vec<SeatInfo>, starting_dealer: usize) -> Self {
        let ids: Vec<PlayerId> = seats.iter().map(|s| s.id.clone()).collect();
        let rounds = (1..=ROUNDS)
            .filter_map(|r| tricks_for_round(r).map(|t| (r, RoundRecord::new(t, &ids))))
            .collect();
        Self {
            seats,
            starting_dealer,
            session_seed,
            rounds,
            ..Self::empty()
        }
    }

    pub fn seat_ids(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.id.clone()).collect()
    }

    pub fn seat(&self, id: &PlayerId) -> Option<&SeatInfo> {
        self.seats.iter().find(|s| &s.id == id)
    }

    pub fn human_id(&self) -> Option<&PlayerId> {
        self.seats
            .iter()
            .find(|s| s.kind == SeatKind::Human)
            .map(|s| &s.id)
    }

    pub fn current_round(&self) -> Option<&RoundRecord> {
        self.rounds.get(&self.round_no)
    }

    pub fn hand(&self, id: &PlayerId) -> &[Card] {
        self.hands.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lead suit of the trick in progress.
    pub fn lead_suit(&self) -> Option<Suit> {
        self.trick_plays.first().map(|p| p.card.suit)
    }

    /// Tricks already won this round.
    pub fn tricks_won_total(&self) -> u8 {
        self.trick_counts.values().sum()
    }

    /// 0-based index of the trick in progress.
    pub fn trick_index(&self) -> u8 {
        self.tricks_won_total()
    }

    pub fn trick_complete(&self) -> bool {
        !self.order.is_empty() && self.trick_plays.len() == self.order.len()
    }
}

// Seat/turn math for variable-size tables.

/// Index into `seats` of the dealer for a 1-based round.
#[inline]
pub fn dealer_index_for_round(seat_count: usize, starting_dealer: usize, round_no: u8) -> usize {
    debug_assert!(round_no >= 1, "round_no is 1-based and must be >= 1");
    if seat_count == 0 {
        return 0;
    }
    (starting_dealer + usize::from(round_no.saturating_sub(1))) % seat_count
}

/// `players` rotated so the seat after `dealer` comes first.
pub fn order_after_dealer(players: &[PlayerId], dealer: &PlayerId) -> Option<Vec<PlayerId>> {
    let idx = players.iter().position(|p| p == dealer)?;
    let n = players.len();
    Some((1..=n).map(|k| players[(idx + k) % n].clone()).collect())
}

/// Seat `n` steps after `start` in `order`.
#[inline]
pub fn nth_from(order: &[PlayerId], start: &PlayerId, n: usize) -> Option<PlayerId> {
    let idx = order.iter().position(|p| p == start)?;
    order.get((idx + n) % order.len()).cloned()
}

/// Expected bidder: bids run through `order` in sequence.
pub fn expected_bidder(state: &SessionState) -> Option<PlayerId> {
    if state.phase != Phase::Bidding {
        return None;
    }
    let round = state.current_round()?;
    state
        .order
        .iter()
        .find(|p| !round.bids.contains_key(*p))
        .cloned()
}

/// Expected player for the next card of the current trick.
pub fn expected_player(state: &SessionState) -> Option<PlayerId> {
    if state.phase != Phase::Playing || state.reveal.is_some() || state.trick_complete() {
        return None;
    }
    let leader = state.leader_id.as_ref()?;
    nth_from(&state.order, leader, state.trick_plays.len())
}

/// Whoever the session is waiting on right now, if anyone.
pub fn expected_actor(state: &SessionState) -> Option<PlayerId> {
    match state.phase {
        Phase::Bidding => expected_bidder(state),
        Phase::Playing => expected_player(state),
        _ => None,
    }
}

// Require helpers mirror the reducer's precondition checks.

pub fn require_phase(state: &SessionState, expected: Phase) -> Result<(), DomainError> {
    if state.phase != expected {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("expected phase {:?}, session is in {:?}", expected, state.phase),
        ));
    }
    Ok(())
}

pub fn require_seated(state: &SessionState, id: &PlayerId) -> Result<(), DomainError> {
    if state.seat(id).is_none() {
        return Err(DomainError::validation(
            ValidationKind::UnknownPlayer,
            format!("player {id} is not seated"),
        ));
    }
    Ok(())
}

pub fn require_round(state: &SessionState, round_no: u8) -> Result<&RoundRecord, DomainError> {
    if round_no != state.round_no {
        return Err(DomainError::validation(
            ValidationKind::RoundMismatch,
            format!("event for round {round_no}, current round is {}", state.round_no),
        ));
    }
    state.rounds.get(&round_no).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::RoundMismatch,
            format!("round {round_no} does not exist"),
        )
    })
}
