//! The decision interface every bot seat implements.

use thiserror::Error;

use crate::domain::player_view::CurrentRoundInfo;
use crate::domain::Card;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    #[error("bot failed: {0}")]
    Internal(String),
    /// The bot's own checks rejected its choice.
    #[error("bot produced an invalid move: {0}")]
    InvalidMove(String),
}

/// A bot policy.
///
/// Implementations see only what their seat can see and must pick from the
/// options `CurrentRoundInfo` lists as legal. The planner treats anything
/// else as a bug, not a game event.
pub trait AiPlayer: Send + Sync {
    /// A value from `state.legal_bids()`.
    fn choose_bid(&self, state: &CurrentRoundInfo) -> Result<u8, AiError>;

    /// A card from `state.legal_plays()`.
    fn choose_play(&self, state: &CurrentRoundInfo) -> Result<Card, AiError>;
}
