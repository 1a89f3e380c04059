//! Session-level game settings.

use serde::{Deserialize, Serialize};

/// Default per-turn time limit (60 seconds).
pub const DEFAULT_TURN_TIME_LIMIT_MS: u64 = 60_000;

/// Default pause before the AI commits its action.
pub const DEFAULT_AI_MOVE_DELAY_MS: u64 = 1_500;

/// Default number of completed games kept in history.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Settings consumed by the session orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Per-turn time limit in milliseconds (`None` = unlimited).
    /// Running out loses the game for the player on turn.
    pub turn_time_limit_ms: Option<u64>,

    /// Thinking delay before the AI acts, in milliseconds.
    pub ai_move_delay_ms: u64,

    /// Completed games retained in history (newest first).
    pub max_history: usize,

    /// Seed for the opponent's random fallback.
    pub seed: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            turn_time_limit_ms: Some(DEFAULT_TURN_TIME_LIMIT_MS),
            ai_move_delay_ms: DEFAULT_AI_MOVE_DELAY_MS,
            max_history: DEFAULT_MAX_HISTORY,
            seed: 42,
        }
    }
}

impl GameSettings {
    /// Set the per-turn time limit.
    #[must_use]
    pub fn with_turn_time_limit(mut self, limit_ms: Option<u64>) -> Self {
        self.turn_time_limit_ms = limit_ms;
        self
    }

    /// Set the AI thinking delay.
    #[must_use]
    pub fn with_ai_move_delay(mut self, delay_ms: u64) -> Self {
        self.ai_move_delay_ms = delay_ms;
        self
    }

    /// Set the history cap.
    #[must_use]
    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
