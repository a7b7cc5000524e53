//! Game flow service: the public face of a single-player session.
//!
//! Human moves are checked against the rules before anything is appended.
//! Everything else (bot turns, trick clearing, scoring, dealing) goes through
//! the advance planner so timers and user "continue" share one decision.

mod player_actions;
mod round_lifecycle;

use std::sync::Arc;

use tracing::info;
use ulid::Ulid;

pub use round_lifecycle::AdvanceOutcome;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::domain::rules::valid_player_count;
use crate::domain::{Event, EventKind, SeatInfo, SeatKind, SessionState, SessionStore};
use crate::error::EngineError;
use crate::errors::domain::{DomainError, ValidationKind};

pub struct GameFlow {
    session_id: Ulid,
    store: SessionStore,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl GameFlow {
    /// Start a session in `setup` with the given table.
    ///
    /// Exactly one seat must be human.
    pub fn new_session(
        seed: u64,
        seats: Vec<SeatInfo>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EngineError> {
        validate_table(&seats, &config)?;
        let session_id = Ulid::from_parts(clock.now_ms(), u128::from(seed));
        let flow = Self {
            session_id,
            store: SessionStore::new(),
            config,
            clock,
        };
        flow.reset(seed, seats)?;
        Ok(flow)
    }

    /// Resume a session from a recorded log.
    pub fn from_log(
        log: Vec<Event>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EngineError> {
        let store = SessionStore::from_log(log)?;
        let seed = store.snapshot().session_seed;
        Ok(Self {
            session_id: Ulid::from_parts(clock.now_ms(), u128::from(seed)),
            store,
            config,
            clock,
        })
    }

    /// Resume from a saved snapshot, e.g. one restored without its log.
    /// Call [`GameFlow::recover`] afterwards if the hands may be missing.
    pub fn from_snapshot(state: SessionState, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let session_id = Ulid::from_parts(clock.now_ms(), u128::from(state.session_seed));
        Self {
            session_id,
            store: SessionStore::from_snapshot(state),
            config,
            clock,
        }
    }

    pub fn session_id(&self) -> Ulid {
        self.session_id
    }

    pub fn snapshot(&self) -> Arc<SessionState> {
        self.store.snapshot()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn events(&self) -> Vec<Event> {
        self.store.events()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Replace the session wholesale with a fresh game at the same table.
    pub fn play_again(&self, seed: u64) -> Result<Arc<SessionState>, EngineError> {
        let seats = self.snapshot().seats.clone();
        info!(session_id = %self.session_id, seed, "Starting new game at same table");
        self.reset(seed, seats)
    }

    fn reset(&self, seed: u64, seats: Vec<SeatInfo>) -> Result<Arc<SessionState>, EngineError> {
        let players = seats.len();
        let state = self.store.append_batch(
            vec![EventKind::SessionReset {
                session_seed: seed,
                seats,
                starting_dealer: self.config.starting_dealer,
            }],
            self.now_ms(),
        )?;
        info!(session_id = %self.session_id, seed, players, "Session reset");
        Ok(state)
    }
}

fn validate_table(seats: &[SeatInfo], config: &EngineConfig) -> Result<(), EngineError> {
    if !valid_player_count(seats.len()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("{} seats is outside 2..=10", seats.len()),
        )
        .into());
    }
    let humans = seats.iter().filter(|s| s.kind == SeatKind::Human).count();
    if humans != 1 {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("exactly one human seat is required, got {humans}"),
        )
        .into());
    }
    if config.starting_dealer >= seats.len() {
        return Err(EngineError::config(format!(
            "starting dealer {} is not a seat index for {} seats",
            config.starting_dealer,
            seats.len()
        )));
    }
    Ok(())
}
