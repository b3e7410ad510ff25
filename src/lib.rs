//! Snake in the terminal
//!
//! This library provides:
//! - Core game logic (game module): a headless engine advanced one tick at a time
//! - High score persistence and session scoring (score module)
//! - TUI rendering (render module) and key mapping (input module)
//! - The interactive driver loop (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod score;

pub use error::{ConfigError, ConfigViolation};
