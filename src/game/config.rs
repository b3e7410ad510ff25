use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::difficulty::Tier;
use crate::error::{ConfigError, ConfigViolation};

/// Tick intervals for the tiers above Easy, in milliseconds.
///
/// Easy always runs at [`GameConfig::initial_speed_ms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpeeds {
    pub medium_ms: u64,
    pub hard_ms: u64,
    pub expert_ms: u64,
}

impl Default for TierSpeeds {
    fn default() -> Self {
        Self {
            medium_ms: 120,
            hard_ms: 90,
            expert_ms: 60,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square board, in pixels
    pub board_size: u32,
    /// Side length of one cell, in pixels
    pub cell_size: u32,
    /// Tick interval at the start of a game (and for the Easy tier)
    pub initial_speed_ms: u64,
    /// Tick intervals for the faster tiers
    pub tier_speeds: TierSpeeds,
    /// Points awarded for each food eaten
    pub score_per_food: u32,
    /// When false the speed never changes during a game
    pub dynamic_difficulty: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 400,
            cell_size: 20,
            initial_speed_ms: 150,
            tier_speeds: TierSpeeds::default(),
            score_per_food: 10,
            dynamic_difficulty: true,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board and cell size
    pub fn new(board_size: u32, cell_size: u32) -> Self {
        Self {
            board_size,
            cell_size,
            ..Default::default()
        }
    }

    /// Number of cells along each side of the board.
    ///
    /// Zero when the cell size is zero; call [`validate`](Self::validate) first.
    pub fn grid_count(&self) -> u32 {
        self.board_size.checked_div(self.cell_size).unwrap_or(0)
    }

    /// Tick interval used at the start of every game
    pub fn initial_speed(&self) -> Duration {
        Duration::from_millis(self.initial_speed_ms)
    }

    /// Tick interval for a difficulty tier.
    ///
    /// A tier is never slower than the one below it, so a fast starting
    /// speed carries over into the higher tiers.
    pub fn speed_for(&self, tier: Tier) -> Duration {
        let easy = self.initial_speed_ms;
        let medium = self.tier_speeds.medium_ms.min(easy);
        let hard = self.tier_speeds.hard_ms.min(medium);
        let expert = self.tier_speeds.expert_ms.min(hard);

        let ms = match tier {
            Tier::Easy => easy,
            Tier::Medium => medium,
            Tier::Hard => hard,
            Tier::Expert => expert,
        };
        Duration::from_millis(ms)
    }

    /// Check every constraint and report all the ones that fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if self.board_size == 0 {
            violations.push(ConfigViolation::ZeroBoardSize);
        }
        if self.cell_size == 0 {
            violations.push(ConfigViolation::ZeroCellSize);
        }
        if self.board_size > 0 && self.cell_size > 0 {
            if self.board_size % self.cell_size != 0 {
                violations.push(ConfigViolation::BoardNotMultipleOfCell {
                    board_size: self.board_size,
                    cell_size: self.cell_size,
                });
            } else if self.grid_count() < 2 {
                violations.push(ConfigViolation::GridTooSmall {
                    grid_count: self.grid_count(),
                });
            }
        }
        if self.initial_speed_ms == 0 {
            violations.push(ConfigViolation::ZeroInitialSpeed);
        }
        for (tier, ms) in [
            ("medium", self.tier_speeds.medium_ms),
            ("hard", self.tier_speeds.hard_ms),
            ("expert", self.tier_speeds.expert_ms),
        ] {
            if ms == 0 {
                violations.push(ConfigViolation::ZeroTierSpeed { tier });
            }
        }
        if self.score_per_food == 0 {
            violations.push(ConfigViolation::ZeroScorePerFood);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }
}

/// Named presets, each a small set of overrides on the default configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum GameMode {
    /// Default settings
    Standard,
    /// The traditional pace
    Classic,
    /// Faster from the first tick
    Speed,
    /// Slow and steady, the speed never changes
    Zen,
}

impl GameMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Classic => "Classic",
            Self::Speed => "Speed",
            Self::Zen => "Zen",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "Default settings",
            Self::Classic => "The traditional snake game",
            Self::Speed => "A faster rhythm",
            Self::Zen => "A relaxed game at constant speed",
        }
    }

    /// Build the configuration for this preset
    pub fn config(&self) -> GameConfig {
        let base = GameConfig::default();
        match self {
            // Classic is the traditional pace, which is what the base already plays
            Self::Standard | Self::Classic => base,
            Self::Speed => GameConfig {
                initial_speed_ms: 100,
                ..base
            },
            Self::Zen => GameConfig {
                initial_speed_ms: 200,
                dynamic_difficulty: false,
                ..base
            },
        }
    }
}
