//! Append-only event store for one session.
//!
//! The store owns the log and the latest state snapshot. Batches are
//! atomic: every event is validated against a working copy and the batch
//! commits only when all of them apply. A `batch pending` flag acts as a
//! cooperative lock so a second writer is turned away instead of
//! interleaving with the first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::events::{Event, EventKind};
use super::reducer::{reduce, replay};
use super::state::SessionState;
use crate::errors::domain::{ConflictKind, DomainError};

struct StoreInner {
    log: Vec<Event>,
    state: Arc<SessionState>,
}

pub struct SessionStore {
    inner: Mutex<StoreInner>,
    batch_pending: AtomicBool,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("version", &self.version())
            .field("batch_pending", &self.is_batch_pending())
            .finish()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                log: Vec::new(),
                state: Arc::new(SessionState::empty()),
            }),
            batch_pending: AtomicBool::new(false),
        }
    }

    /// Rebuild a store from a previously recorded log.
    pub fn from_log(log: Vec<Event>) -> Result<Self, DomainError> {
        let state = replay(&log)?;
        Ok(Self {
            inner: Mutex::new(StoreInner {
                log,
                state: Arc::new(state),
            }),
            batch_pending: AtomicBool::new(false),
        })
    }

    /// Start from a saved state with an empty log. Later events are
    /// relative to that state, so `replay` of this log alone does not
    /// rebuild it.
    pub fn from_snapshot(state: SessionState) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                log: Vec::new(),
                state: Arc::new(state),
            }),
            batch_pending: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> Arc<SessionState> {
        Arc::clone(&self.inner.lock().state)
    }

    /// Number of events in the log.
    pub fn version(&self) -> u64 {
        self.inner.lock().log.len() as u64
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().log.clone()
    }

    pub fn is_batch_pending(&self) -> bool {
        self.batch_pending.load(Ordering::Acquire)
    }

    /// Take the batch-pending flag, or fail if another batch holds it.
    pub fn begin_batch(&self) -> Result<BatchGuard<'_>, DomainError> {
        self.batch_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                DomainError::conflict(ConflictKind::BatchPending, "another batch is in flight")
            })?;
        Ok(BatchGuard { store: self })
    }

    /// Append a batch atomically.
    pub fn append_batch(
        &self,
        kinds: Vec<EventKind>,
        now: u64,
    ) -> Result<Arc<SessionState>, DomainError> {
        self.begin_batch()?.append(kinds, now)
    }

    /// Append a batch planned against `expected_version`; stale plans are rejected.
    pub fn append_batch_at(
        &self,
        expected_version: u64,
        kinds: Vec<EventKind>,
        now: u64,
    ) -> Result<Arc<SessionState>, DomainError> {
        self.begin_batch()?.append_at(expected_version, kinds, now)
    }

    fn commit(
        &self,
        expected_version: Option<u64>,
        kinds: Vec<EventKind>,
        now: u64,
    ) -> Result<Arc<SessionState>, DomainError> {
        let mut inner = self.inner.lock();
        let version = inner.log.len() as u64;
        if let Some(expected) = expected_version {
            if expected != version {
                return Err(DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!("batch planned at version {expected}, store is at {version}"),
                ));
            }
        }
        if kinds.is_empty() {
            return Ok(Arc::clone(&inner.state));
        }

        let mut working = (*inner.state).clone();
        let mut stamped = Vec::with_capacity(kinds.len());
        for (i, kind) in kinds.into_iter().enumerate() {
            let event = Event::stamped(kind, now, version + i as u64);
            if let Err(err) = reduce(&mut working, &event) {
                warn!(
                    event_type = event.kind.type_name(),
                    index = i,
                    version,
                    error = %err,
                    "Rejected event batch"
                );
                return Err(err);
            }
            stamped.push(event);
        }

        debug!(
            version,
            events = stamped.len(),
            first = ?stamped.first().map(|e| e.kind.type_name()),
            "Appended event batch"
        );
        inner.log.extend(stamped);
        inner.state = Arc::new(working);
        Ok(Arc::clone(&inner.state))
    }
}

/// Holds the batch-pending flag until dropped.
pub struct BatchGuard<'a> {
    store: &'a SessionStore,
}

impl BatchGuard<'_> {
    pub fn snapshot(&self) -> Arc<SessionState> {
        self.store.snapshot()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn append(self, kinds: Vec<EventKind>, now: u64) -> Result<Arc<SessionState>, DomainError> {
        self.store.commit(None, kinds, now)
    }

    pub fn append_at(
        self,
        expected_version: u64,
        kinds: Vec<EventKind>,
        now: u64,
    ) -> Result<Arc<SessionState>, DomainError> {
        self.store.commit(Some(expected_version), kinds, now)
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.store.batch_pending.store(false, Ordering::Release);
    }
}
