use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Delays the session driver waits before automatic advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    /// How long a completed trick stays on the table.
    pub reveal_hold_ms: u64,
    /// Pause before each bot move.
    pub bot_think_ms: u64,
    /// Idle time before the round summary moves on by itself.
    pub summary_auto_advance_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reveal_hold_ms: 1_200,
            bot_think_ms: 650,
            summary_auto_advance_ms: 10_000,
        }
    }
}

impl Timing {
    /// No waiting at all; used by headless runs.
    pub fn instant() -> Self {
        Self {
            reveal_hold_ms: 0,
            bot_think_ms: 0,
            summary_auto_advance_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub timing: Timing,
    /// Seat index of the round-1 dealer.
    pub starting_dealer: usize,
}

impl EngineConfig {
    /// Read overrides from the environment; unset variables keep defaults.
    pub fn from_env() -> Result<Self, EngineError> {
        let defaults = Timing::default();
        Ok(Self {
            timing: Timing {
                reveal_hold_ms: var_or("SP_REVEAL_HOLD_MS", defaults.reveal_hold_ms)?,
                bot_think_ms: var_or("SP_BOT_THINK_MS", defaults.bot_think_ms)?,
                summary_auto_advance_ms: var_or(
                    "SP_SUMMARY_AUTO_ADVANCE_MS",
                    defaults.summary_auto_advance_ms,
                )?,
            },
            starting_dealer: var_or("SP_STARTING_DEALER", 0)?,
        })
    }
}

fn var_or<T: FromStr>(name: &str, default: T) -> Result<T, EngineError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            EngineError::config(format!("{name} must be a non-negative integer, got '{raw}'"))
        }),
        Err(_) => Ok(default),
    }
}
