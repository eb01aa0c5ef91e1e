//! Runtime configuration.
//!
//! Rule constants live in [`GameConfig`]; everything here controls how the
//! runtime drives a match around them.

use serde::{Deserialize, Serialize};

use tactics_core::GameConfig;

use crate::error::{Result, RuntimeError};

/// How abilities turn a click into a command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputMode {
    /// A click on a valid target executes at once.
    #[default]
    Direct,
    /// The first click previews, a second click on the same target commits.
    ConfirmToCommit,
}

/// Runtime configuration shared by the controller, AI players and driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub input_mode: InputMode,

    /// Capacity of each topic channel on the event bus.
    pub event_buffer_size: usize,

    /// Honour realtime delay nodes in AI trees. Off for tests and servers.
    pub ai_pacing: bool,

    /// Seed for AI random draws.
    pub seed: u64,

    /// Upper bound of AI turns a single [`crate::Game::step`] plays.
    pub max_ai_turns_per_step: u32,

    /// Give every placed unit the move/attack/capture abilities its rules
    /// allow.
    pub default_abilities: bool,
}

impl RuntimeConfig {
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;
    pub const DEFAULT_MAX_AI_TURNS_PER_STEP: u32 = 64;

    pub fn new(game: GameConfig) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }

    pub fn with_input_mode(mut self, input_mode: InputMode) -> Self {
        self.input_mode = input_mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_default_abilities(mut self, enabled: bool) -> Self {
        self.default_abilities = enabled;
        self
    }

    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(RuntimeError::Config)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            input_mode: InputMode::Direct,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
            ai_pacing: false,
            seed: 0,
            max_ai_turns_per_step: Self::DEFAULT_MAX_AI_TURNS_PER_STEP,
            default_abilities: true,
        }
    }
}
