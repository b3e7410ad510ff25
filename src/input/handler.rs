use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction, GameStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Game(Command),
    Quit,
    None,
}

/// Maps key presses to engine commands.
///
/// Which keys do anything depends on the game status: Space starts a
/// waiting game and pauses a running one, R restarts, arrows and WASD
/// steer only while a game is in progress.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, status: GameStatus) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
            return KeyAction::Quit;
        }

        match status {
            GameStatus::Waiting => match key.code {
                KeyCode::Char(' ') => KeyAction::Game(Command::Start),
                _ => KeyAction::None,
            },
            GameStatus::GameOver => match key.code {
                KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Game(Command::Restart),
                _ => KeyAction::None,
            },
            GameStatus::Playing | GameStatus::Paused => match key.code {
                KeyCode::Char(' ') => KeyAction::Game(Command::TogglePause),
                KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Game(Command::Restart),
                code => Self::direction_for(code)
                    .map(|dir| KeyAction::Game(Command::Turn(dir)))
                    .unwrap_or(KeyAction::None),
            },
        }
    }

    fn direction_for(code: KeyCode) -> Option<Direction> {
        match code {
            // Movement - Arrow keys
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),

            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
