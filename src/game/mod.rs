//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Front ends drive it through [`GameEngine`] and read its state back after each tick.

pub mod action;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{GameConfig, GameMode, TierSpeeds};
pub use difficulty::Tier;
pub use engine::{GameEngine, GameOverSummary, TickOutcome};
pub use state::{GameOverCause, GameState, GameStatus, Position, Snake};
