//! Optional JSON overrides for bot policies.
//!
//! ```json
//! {"seed": 12345, "difficulty": "hard", "aggression": 0.7}
//! ```
//!
//! `seed` and `difficulty` are understood here; other keys stay in `custom`
//! for a policy to read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use crate::domain::Difficulty;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Extra entropy mixed into every decision seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Replaces each seat's own difficulty when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,

    #[serde(flatten)]
    pub custom: Map<String, JsonValue>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            seed: None,
            difficulty: None,
            custom: Map::new(),
        }
    }
}

impl AiConfig {
    /// Parse overrides. Malformed input is logged and ignored.
    pub fn from_json(config: Option<&JsonValue>) -> Self {
        let Some(json) = config else {
            return Self::default();
        };
        serde_json::from_value(json.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring malformed AI config");
            Self::default()
        })
    }

    pub fn difficulty_or(&self, seat_default: Difficulty) -> Difficulty {
        self.difficulty.unwrap_or(seat_default)
    }

    /// Fold the configured entropy into a per-decision seed.
    pub fn mix_seed(&self, seed: u32) -> u32 {
        match self.seed {
            Some(extra) => seed ^ (extra as u32) ^ ((extra >> 32) as u32),
            None => seed,
        }
    }

    pub fn custom(&self, key: &str) -> Option<&JsonValue> {
        self.custom.get(key)
    }
}
