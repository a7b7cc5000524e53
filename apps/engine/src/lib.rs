#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod services;
pub mod telemetry;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{EngineConfig, Timing};
pub use domain::{
    AdvanceIntent, Card, Difficulty, Event, EventKind, Pending, Phase, PlayerId, Rank, RoundState,
    SeatInfo, SeatKind, SessionState, Suit,
};
pub use error::EngineError;
pub use errors::domain::{ConflictKind, DomainError, ValidationKind};
pub use errors::ErrorCode;
pub use services::{AdvanceOutcome, GameFlow, SessionDriver};
pub use telemetry::{init_tracing, init_tracing_with};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
