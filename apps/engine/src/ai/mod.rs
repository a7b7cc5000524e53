//! Bot players.
//!
//! - [`AiPlayer`]: the decision trait bots implement
//! - [`Heuristic`]: the difficulty-tuned policy used for every bot seat
//! - [`AiConfig`]: optional JSON overrides

mod config;
mod heuristic;
mod trait_def;

pub use config::AiConfig;
pub use heuristic::Heuristic;
pub use trait_def::{AiError, AiPlayer};

use crate::domain::Difficulty;

/// Build the policy for one decision.
///
/// `seed` should be derived from the session seed and the decision point so
/// replays reproduce the same move.
pub fn create_ai(difficulty: Difficulty, seed: u32) -> Box<dyn AiPlayer> {
    Box::new(Heuristic::new(difficulty, seed))
}

/// Like [`create_ai`], with overrides from `config` applied.
pub fn create_ai_with_config(
    config: &AiConfig,
    seat_difficulty: Difficulty,
    seed: u32,
) -> Box<dyn AiPlayer> {
    create_ai(config.difficulty_or(seat_difficulty), config.mix_seed(seed))
}
