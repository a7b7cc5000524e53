//! Error handling for the single-player engine.

pub mod domain;
pub mod error_code;

pub use domain::{ConflictKind, DomainError, ValidationKind};
pub use error_code::ErrorCode;
