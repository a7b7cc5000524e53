//! Error codes surfaced to engine consumers.
//!
//! All error codes are SCREAMING_SNAKE_CASE. Add new codes here; never pass
//! ad-hoc strings as error codes.

use core::fmt;

use super::domain::{ConflictKind, ValidationKind};

/// Centralized error codes for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Move validation
    InvalidBid,
    MustFollowSuit,
    CardNotInHand,
    OutOfTurn,
    PhaseMismatch,
    TrumpNotBroken,
    TrickFull,
    TrickIncomplete,
    RoundMismatch,
    UnknownPlayer,
    InvalidPlayerCount,
    InvalidRoundState,
    WinnerMismatch,
    ParseCard,
    ValidationError,

    // Write conflicts
    BatchPending,
    OptimisticLock,
    AlreadyBid,

    // Fatal / system
    BotContractViolation,
    ConfigError,
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidBid => "INVALID_BID",
            Self::MustFollowSuit => "MUST_FOLLOW_SUIT",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::TrumpNotBroken => "TRUMP_NOT_BROKEN",
            Self::TrickFull => "TRICK_FULL",
            Self::TrickIncomplete => "TRICK_INCOMPLETE",
            Self::RoundMismatch => "ROUND_MISMATCH",
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            Self::InvalidRoundState => "INVALID_ROUND_STATE",
            Self::WinnerMismatch => "WINNER_MISMATCH",
            Self::ParseCard => "PARSE_CARD",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::BatchPending => "BATCH_PENDING",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::AlreadyBid => "ALREADY_BID",

            Self::BotContractViolation => "BOT_CONTRACT_VIOLATION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&ValidationKind> for ErrorCode {
    fn from(kind: &ValidationKind) -> Self {
        match kind {
            ValidationKind::InvalidBid => Self::InvalidBid,
            ValidationKind::MustFollowSuit => Self::MustFollowSuit,
            ValidationKind::CardNotInHand => Self::CardNotInHand,
            ValidationKind::OutOfTurn => Self::OutOfTurn,
            ValidationKind::PhaseMismatch => Self::PhaseMismatch,
            ValidationKind::TrumpNotBroken => Self::TrumpNotBroken,
            ValidationKind::TrickFull => Self::TrickFull,
            ValidationKind::TrickIncomplete => Self::TrickIncomplete,
            ValidationKind::RoundMismatch => Self::RoundMismatch,
            ValidationKind::UnknownPlayer => Self::UnknownPlayer,
            ValidationKind::InvalidPlayerCount => Self::InvalidPlayerCount,
            ValidationKind::InvalidRoundState => Self::InvalidRoundState,
            ValidationKind::WinnerMismatch => Self::WinnerMismatch,
            ValidationKind::ParseCard => Self::ParseCard,
            ValidationKind::Other(_) => Self::ValidationError,
        }
    }
}

impl From<&ConflictKind> for ErrorCode {
    fn from(kind: &ConflictKind) -> Self {
        match kind {
            ConflictKind::BatchPending => Self::BatchPending,
            ConflictKind::OptimisticLock => Self::OptimisticLock,
            ConflictKind::AlreadyBid => Self::AlreadyBid,
        }
    }
}
