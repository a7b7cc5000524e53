//! Domain-level error type used by the rules engine, reducer and store.
//!
//! This error type is UI-agnostic. Callers of the engine receive
//! `crate::error::EngineError`, which wraps `DomainError` through `From`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Specific validation failure kinds for rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InvalidBid,
    MustFollowSuit,
    CardNotInHand,
    OutOfTurn,
    PhaseMismatch,
    /// Leading trump before it has been broken while holding other suits.
    TrumpNotBroken,
    /// The current trick already holds one card per seat.
    TrickFull,
    /// The trick cannot be cleared before every seat has played.
    TrickIncomplete,
    RoundMismatch,
    UnknownPlayer,
    InvalidPlayerCount,
    InvalidRoundState,
    WinnerMismatch,
    ParseCard,
    Other(String),
}

/// Domain-level conflict kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Another batch is being appended right now.
    BatchPending,
    /// The batch was planned against an older log version.
    OptimisticLock,
    AlreadyBid,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input/user validation or game rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict with concurrent or repeated writes
    Conflict(ConflictKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    /// Validation kind, if this is a validation error.
    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            DomainError::Conflict(..) => None,
        }
    }
}
