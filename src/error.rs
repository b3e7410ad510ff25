//! Error types exposed by the library.

use thiserror::Error;

/// A single constraint a [`GameConfig`](crate::game::GameConfig) failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("board size must be greater than 0")]
    ZeroBoardSize,
    #[error("cell size must be greater than 0")]
    ZeroCellSize,
    #[error("board size {board_size} must be a multiple of cell size {cell_size}")]
    BoardNotMultipleOfCell { board_size: u32, cell_size: u32 },
    #[error("board must be at least 2 cells per side, got {grid_count}")]
    GridTooSmall { grid_count: u32 },
    #[error("initial speed must be greater than 0")]
    ZeroInitialSpeed,
    #[error("{tier} tier speed must be greater than 0")]
    ZeroTierSpeed { tier: &'static str },
    #[error("score per food must be greater than 0")]
    ZeroScorePerFood,
}

/// Errors emitted when building a game from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Every violated constraint, in the order they were checked.
    #[error("invalid configuration: {}", join_violations(.0))]
    Invalid(Vec<ConfigViolation>),

    /// A prepared state does not fit on the configured board.
    #[error("state does not fit the board: {0}")]
    StateMismatch(&'static str),
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_lists_every_violation() {
        let err = ConfigError::Invalid(vec![
            ConfigViolation::ZeroInitialSpeed,
            ConfigViolation::ZeroScorePerFood,
        ]);
        let message = err.to_string();

        assert!(message.starts_with("invalid configuration: "));
        assert!(message.contains("initial speed must be greater than 0"));
        assert!(message.contains("score per food must be greater than 0"));
    }

    #[test]
    fn test_board_multiple_message() {
        let violation = ConfigViolation::BoardNotMultipleOfCell {
            board_size: 410,
            cell_size: 20,
        };
        assert_eq!(
            violation.to_string(),
            "board size 410 must be a multiple of cell size 20"
        );
    }

    #[test]
    fn test_violation_is_a_std_error() {
        let violation: &dyn std::error::Error = &ConfigViolation::ZeroTierSpeed { tier: "hard" };
        assert_eq!(violation.to_string(), "hard tier speed must be greater than 0");
        assert!(violation.source().is_none());
    }
}
