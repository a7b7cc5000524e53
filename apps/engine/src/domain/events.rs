//! Session events.
//!
//! Every change to a session is one of these. Serialized form:
//! `{"type": "bid/set", "payload": {...}, "eventId": "...", "timestamp": 0}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::cards_types::{Card, Suit};
use super::state::{Phase, PlayerId, RoundState, SeatInfo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all_fields = "camelCase")]
pub enum EventKind {
    #[serde(rename = "sp/session-reset")]
    SessionReset {
        session_seed: u64,
        seats: Vec<SeatInfo>,
        starting_dealer: usize,
    },
    #[serde(rename = "sp/deal")]
    Deal {
        round_no: u8,
        dealer_id: PlayerId,
        order: Vec<PlayerId>,
        trump: Suit,
        trump_card: Option<Card>,
        hands: BTreeMap<PlayerId, Vec<Card>>,
    },
    #[serde(rename = "bid/set")]
    BidSet {
        round: u8,
        player_id: PlayerId,
        bid: u8,
    },
    #[serde(rename = "round/state-set")]
    RoundStateSet {
        round: u8,
        state: RoundState,
        /// Allows any transition, including backwards.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        correction: bool,
    },
    #[serde(rename = "sp/trick-played")]
    TrickPlayed { player_id: PlayerId, card: Card },
    #[serde(rename = "sp/trick-cleared")]
    TrickCleared { winner_id: PlayerId },
    #[serde(rename = "sp/leader-set")]
    LeaderSet { leader_id: PlayerId },
    #[serde(rename = "sp/trump-broken-set")]
    TrumpBrokenSet { broken: bool },
    #[serde(rename = "sp/phase-set")]
    PhaseSet { phase: Phase },
    #[serde(rename = "round/finalize")]
    RoundFinalize { round: u8 },
}

impl EventKind {
    /// Wire name of the event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::SessionReset { .. } => "sp/session-reset",
            EventKind::Deal { .. } => "sp/deal",
            EventKind::BidSet { .. } => "bid/set",
            EventKind::RoundStateSet { .. } => "round/state-set",
            EventKind::TrickPlayed { .. } => "sp/trick-played",
            EventKind::TrickCleared { .. } => "sp/trick-cleared",
            EventKind::LeaderSet { .. } => "sp/leader-set",
            EventKind::TrumpBrokenSet { .. } => "sp/trump-broken-set",
            EventKind::PhaseSet { .. } => "sp/phase-set",
            EventKind::RoundFinalize { .. } => "round/finalize",
        }
    }

    pub fn bid_set(round: u8, player_id: impl Into<PlayerId>, bid: u8) -> Self {
        EventKind::BidSet {
            round,
            player_id: player_id.into(),
            bid,
        }
    }

    pub fn trick_played(player_id: impl Into<PlayerId>, card: Card) -> Self {
        EventKind::TrickPlayed {
            player_id: player_id.into(),
            card,
        }
    }

    pub fn phase_set(phase: Phase) -> Self {
        EventKind::PhaseSet { phase }
    }

    pub fn round_state_set(round: u8, state: RoundState) -> Self {
        EventKind::RoundStateSet {
            round,
            state,
            correction: false,
        }
    }
}

/// A stamped event as stored in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    pub event_id: Ulid,
    /// Milliseconds on the session clock.
    pub timestamp: u64,
}

impl Event {
    /// Stamp `kind`; the id is derived from the timestamp and log position.
    pub fn stamped(kind: EventKind, timestamp: u64, seq: u64) -> Self {
        Self {
            kind,
            event_id: Ulid::from_parts(timestamp, u128::from(seq)),
            timestamp,
        }
    }
}
