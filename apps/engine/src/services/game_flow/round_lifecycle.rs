use std::sync::Arc;

use tracing::{error, info};

use super::GameFlow;
use crate::domain::advance::{compute_advance_batch, needs_redeal, pending, Pending};
use crate::domain::{AdvanceIntent, AdvanceOptions, EventKind, Phase, SessionState};
use crate::error::EngineError;

/// Result of one advance call.
#[derive(Debug, Clone)]
pub struct AdvanceOutcome {
    /// Events appended; zero when there was nothing to do yet.
    pub applied: usize,
    pub state: Arc<SessionState>,
}

impl AdvanceOutcome {
    pub fn progressed(&self) -> bool {
        self.applied > 0
    }
}

impl GameFlow {
    /// Plan and apply the next step.
    ///
    /// `Auto` waits out the reveal hold and summary countdown; `Continue`
    /// skips them. A bot that picks an illegal move is a fatal error.
    pub fn advance(&self, intent: AdvanceIntent) -> Result<AdvanceOutcome, EngineError> {
        let guard = self.store.begin_batch()?;
        let state = guard.snapshot();
        let version = guard.version();
        let now = self.now_ms();
        let opts = AdvanceOptions {
            intent,
            timing: self.config.timing,
        };

        let batch = compute_advance_batch(&state, now, opts).inspect_err(|e| {
            if e.is_fatal() {
                error!(session_id = %self.session_id, error = %e, "Advance planner failed");
            }
        })?;
        if batch.is_empty() {
            return Ok(AdvanceOutcome { applied: 0, state });
        }

        let applied = batch.len();
        log_milestones(self, &batch);
        let state = guard.append_at(version, batch, now)?;
        Ok(AdvanceOutcome { applied, state })
    }

    /// Keep advancing until nothing more happens without input, or `max_steps`.
    pub fn advance_until_idle(
        &self,
        intent: AdvanceIntent,
        max_steps: usize,
    ) -> Result<Arc<SessionState>, EngineError> {
        for _ in 0..max_steps {
            let outcome = self.advance(intent)?;
            if !outcome.progressed() {
                return Ok(outcome.state);
            }
        }
        Ok(self.snapshot())
    }

    /// What the session is waiting on right now.
    pub fn pending(&self) -> Pending {
        pending(&self.snapshot(), &self.config.timing)
    }

    /// Re-deal the current round if its hands went missing. Returns true
    /// when a re-deal was applied.
    pub fn recover(&self) -> Result<bool, EngineError> {
        if !needs_redeal(&self.snapshot()) {
            return Ok(false);
        }
        info!(session_id = %self.session_id, "Hands missing mid-round, re-dealing");
        let outcome = self.advance(AdvanceIntent::Continue)?;
        Ok(outcome.progressed())
    }
}

fn log_milestones(flow: &GameFlow, batch: &[EventKind]) {
    for kind in batch {
        match kind {
            EventKind::Deal {
                round_no, trump, ..
            } => {
                info!(session_id = %flow.session_id, round_no, trump = ?trump, "Round dealt");
            }
            EventKind::RoundFinalize { round } => {
                info!(session_id = %flow.session_id, round_no = round, "Round scored");
            }
            EventKind::PhaseSet {
                phase: Phase::GameSummary,
            } => {
                info!(session_id = %flow.session_id, "Game complete");
            }
            _ => {}
        }
    }
}
