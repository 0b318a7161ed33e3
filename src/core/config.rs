//! Fight configuration with documented defaults
//!
//! Values can come from a TOML file (`data/fight.toml` ships the
//! defaults) and are then overridden by command line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{DuelError, Result};

/// Upper bound on the pacing multiplier: one minute per beat
pub const MAX_SPEED: f32 = 60.0;

/// Configuration for a single fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightConfig {
    /// Total number of fighters allowed on the card
    ///
    /// Opponents are picked by adjacency (the next position in the
    /// roster), so anything above two turns the fight into a ring of
    /// attackers rather than a free-for-all.
    pub max_fighters: usize,

    /// Maximum number of rounds; every fighter acts once per round
    pub max_rounds: u32,

    /// Pacing multiplier for renderers
    ///
    /// Purely presentational. The engine never reads it. 1.0 means
    /// one second per beat, 0.0 disables pauses entirely.
    pub speed: f32,

    /// Seed for the randomness source (None = fresh entropy)
    pub seed: Option<u64>,
}

impl Default for FightConfig {
    fn default() -> Self {
        Self {
            max_fighters: 2,
            max_rounds: 30,
            speed: 1.0,
            seed: None,
        }
    }
}

impl FightConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_max_fighters(mut self, max_fighters: usize) -> Self {
        self.max_fighters = max_fighters;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FightConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_fighters < 2 {
            return Err(DuelError::InvalidConfig(format!(
                "max_fighters ({}) must be at least 2",
                self.max_fighters
            )));
        }

        if self.max_rounds == 0 {
            return Err(DuelError::InvalidConfig(
                "max_rounds must be positive".into(),
            ));
        }

        if !self.speed.is_finite() || !(0.0..=MAX_SPEED).contains(&self.speed) {
            return Err(DuelError::InvalidConfig(format!(
                "speed ({}) must lie within 0..={}",
                self.speed, MAX_SPEED
            )));
        }

        Ok(())
    }
}
