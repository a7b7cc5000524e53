//! Cooperative session driver.
//!
//! Owns at most one scheduled advance: a bot "thinking" pause, the reveal
//! hold on a completed trick, or the summary countdown. Every user action
//! cancels the pending task before it runs, then a fresh task is scheduled
//! from the new state, so the last write wins. Subscribers receive each new
//! snapshot over a `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::game_flow::GameFlow;
use crate::domain::{AdvanceIntent, Card, Pending, PlayerId, SessionState};
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    BotThink,
    RevealHold,
    SummaryCountdown,
    Immediate,
}

/// Handle for the single pending advance.
#[derive(Debug)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    pub token: CancellationToken,
}

pub struct SessionDriver {
    flow: Arc<GameFlow>,
    pending: Mutex<Option<ScheduledTask>>,
    updates: watch::Sender<Arc<SessionState>>,
    shutdown: CancellationToken,
}

impl SessionDriver {
    pub fn new(flow: Arc<GameFlow>) -> Arc<Self> {
        let (updates, _) = watch::channel(flow.snapshot());
        Arc::new(Self {
            flow,
            pending: Mutex::new(None),
            updates,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn flow(&self) -> &Arc<GameFlow> {
        &self.flow
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.updates.subscribe()
    }

    /// Kind of the task currently waiting, if any.
    pub fn pending_kind(&self) -> Option<TaskKind> {
        self.pending.lock().as_ref().map(|t| t.kind)
    }

    /// Schedule whatever the current state calls for. Must run inside a
    /// tokio runtime.
    pub fn start(self: &Arc<Self>) {
        self.reschedule();
    }

    /// Cancel the pending task and stop scheduling new ones.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        self.cancel_pending();
    }

    pub fn submit_bid(
        self: &Arc<Self>,
        player: &PlayerId,
        bid: u8,
    ) -> Result<Arc<SessionState>, EngineError> {
        self.cancel_pending();
        let result = self.flow.submit_bid(player, bid);
        self.after_action(&result);
        result
    }

    pub fn submit_play(
        self: &Arc<Self>,
        player: &PlayerId,
        card: Card,
    ) -> Result<Arc<SessionState>, EngineError> {
        self.cancel_pending();
        let result = self.flow.submit_play(player, card);
        self.after_action(&result);
        result
    }

    /// Explicit user "continue": skip the reveal hold or summary countdown.
    pub fn user_continue(self: &Arc<Self>) -> Result<Arc<SessionState>, EngineError> {
        self.cancel_pending();
        let result = self
            .flow
            .advance(AdvanceIntent::Continue)
            .map(|outcome| outcome.state);
        self.after_action(&result);
        result
    }

    fn after_action(self: &Arc<Self>, result: &Result<Arc<SessionState>, EngineError>) {
        if let Ok(state) = result {
            self.updates.send_replace(Arc::clone(state));
        }
        self.reschedule();
    }

    fn cancel_pending(&self) {
        if let Some(task) = self.pending.lock().take() {
            debug!(kind = ?task.kind, "Cancelling scheduled advance");
            task.token.cancel();
        }
    }

    fn reschedule(self: &Arc<Self>) {
        self.cancel_pending();
        if self.shutdown.is_cancelled() {
            return;
        }

        let timing = self.flow.config().timing;
        let now = self.flow.now_ms();
        let (kind, delay_ms) = match self.flow.pending() {
            Pending::Bot(_) => (TaskKind::BotThink, timing.bot_think_ms),
            Pending::Reveal { until } => (TaskKind::RevealHold, until.saturating_sub(now)),
            Pending::Summary { until } => (TaskKind::SummaryCountdown, until.saturating_sub(now)),
            Pending::Immediate => (TaskKind::Immediate, 0),
            Pending::Human(_) | Pending::AwaitContinue | Pending::Finished => return,
        };

        let token = self.shutdown.child_token();
        let task_token = token.clone();
        let driver = Arc::downgrade(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {
                    // The task must not keep a dropped driver alive.
                    let Some(driver) = driver.upgrade() else {
                        return;
                    };
                    driver.fire(kind, &task_token);
                }
                _ = task_token.cancelled() => {}
            }
        });
        debug!(kind = ?kind, delay_ms, "Scheduled advance");
        *self.pending.lock() = Some(ScheduledTask { kind, token });
    }

    fn fire(self: &Arc<Self>, kind: TaskKind, token: &CancellationToken) {
        // A user action may have replaced this task after the timer fired.
        {
            let mut pending = self.pending.lock();
            match pending.as_ref() {
                Some(task) if task.token.is_cancelled() || token.is_cancelled() => return,
                Some(_) => {
                    pending.take();
                }
                None => return,
            }
        }

        match self.flow.advance(AdvanceIntent::Auto) {
            Ok(outcome) if outcome.progressed() => {
                self.updates.send_replace(outcome.state);
                self.reschedule();
            }
            Ok(_) if kind == TaskKind::Immediate => {
                warn!(kind = ?kind, "Scheduled advance found nothing to do");
            }
            Ok(_) => self.reschedule(),
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Session driver stopped");
                self.shutdown.cancel();
            }
            Err(e) => {
                debug!(error = %e, "Scheduled advance rejected, retrying");
                self.reschedule();
            }
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
