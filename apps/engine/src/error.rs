use thiserror::Error;

use crate::ai::AiError;
use crate::errors::{DomainError, ErrorCode};

/// Error surfaced by the engine's public operations.
///
/// `Domain` covers recoverable rejections (illegal moves, stale or
/// concurrent batches). `Bot` is the programming-error class: a bot policy
/// produced something outside the legality surface it was handed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("Bot contract violation: {detail}")]
    Bot { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl EngineError {
    /// Stable error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::Domain(DomainError::Validation(kind, _)) => ErrorCode::from(kind),
            EngineError::Domain(DomainError::Conflict(kind, _)) => ErrorCode::from(kind),
            EngineError::Bot { .. } => ErrorCode::BotContractViolation,
            EngineError::Config { .. } => ErrorCode::ConfigError,
            EngineError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// True for failures that must never happen in a correct build.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Bot { .. } | EngineError::Internal { .. })
    }

    pub fn bot(detail: impl Into<String>) -> Self {
        Self::Bot {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl From<AiError> for EngineError {
    fn from(err: AiError) -> Self {
        EngineError::bot(format!("AI error: {err}"))
    }
}
