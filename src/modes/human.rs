use anyhow::{Context, Result};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::{debug, info};

use crate::game::{Command, GameEngine, GameStatus, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;
use crate::score::Scoreboard;

/// Interactive play in the terminal
pub struct HumanMode {
    engine: GameEngine,
    scoreboard: Scoreboard,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(engine: GameEngine, scoreboard: Scoreboard) -> Self {
        Self {
            engine,
            scoreboard,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableFocusChange)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks at the engine's current speed
        let mut tick_speed = self.engine.speed();
        let mut tick_timer = tick_interval(tick_speed);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        let was_playing = self.engine.status() == GameStatus::Playing;
                        self.handle_event(event);

                        // The first tick after (re)starting or resuming waits a full interval
                        if !was_playing && self.engine.status() == GameStatus::Playing {
                            tick_speed = self.engine.speed();
                            tick_timer = tick_interval(tick_speed);
                        }
                    }
                }

                // Game logic tick
                _ = tick_timer.tick(), if self.engine.status() == GameStatus::Playing => {
                    self.update_game();

                    if self.engine.speed() != tick_speed {
                        tick_speed = self.engine.speed();
                        tick_timer = tick_interval(tick_speed);
                        debug!(speed_ms = tick_speed.as_millis() as u64, "tick interval changed");
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine, &self.scoreboard);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }

                match self.input_handler.handle_key_event(key, self.engine.status()) {
                    KeyAction::Game(command) => self.apply(command),
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::None => {}
                }
            }
            // Stop the clock while the player is looking elsewhere
            Event::FocusLost if self.engine.status() == GameStatus::Playing => {
                self.apply(Command::TogglePause);
            }
            _ => {}
        }
    }

    fn apply(&mut self, command: Command) {
        if self.engine.apply(command) {
            debug!(?command, status = ?self.engine.status(), "command applied");
        }
    }

    fn update_game(&mut self) {
        match self.engine.tick() {
            TickOutcome::Fed {
                score,
                new_record: true,
                ..
            } => {
                self.scoreboard.record(score);
            }
            TickOutcome::GameOver(summary) => {
                info!(
                    score = summary.final_score,
                    cause = ?summary.cause,
                    elapsed_secs = self.engine.elapsed_secs(),
                    "game finished"
                );
                self.scoreboard.on_game_over(summary);
            }
            TickOutcome::Idle | TickOutcome::Moved | TickOutcome::Fed { .. } => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Interval whose first tick fires one full period from now
fn tick_interval(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig};
    use crate::score::{HighScoreStore, MemoryStore};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode_with(store: MemoryStore) -> HumanMode {
        let scoreboard = Scoreboard::load(Box::new(store));
        let engine = GameEngine::new(GameConfig::default(), scoreboard.high_score).unwrap();
        HumanMode::new(engine, scoreboard)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode_with(MemoryStore::new(40));
        assert_eq!(mode.engine.status(), GameStatus::Waiting);
        assert_eq!(mode.engine.score(), 0);
        assert_eq!(mode.engine.high_score(), 40);
    }

    #[test]
    fn test_keys_drive_the_engine() {
        let mut mode = mode_with(MemoryStore::default());

        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.engine.status(), GameStatus::Playing);

        mode.handle_event(key(KeyCode::Up));
        assert_eq!(mode.engine.pending_direction(), Some(Direction::Up));

        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.engine.status(), GameStatus::Paused);

        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_focus_lost_pauses() {
        let mut mode = mode_with(MemoryStore::default());
        mode.handle_event(Event::FocusLost);
        assert_eq!(mode.engine.status(), GameStatus::Waiting);

        mode.handle_event(key(KeyCode::Char(' ')));
        mode.handle_event(Event::FocusLost);
        assert_eq!(mode.engine.status(), GameStatus::Paused);

        // Regaining focus leaves the game paused
        mode.handle_event(Event::FocusGained);
        assert_eq!(mode.engine.status(), GameStatus::Paused);
    }

    #[test]
    fn test_game_over_is_recorded() {
        let store = MemoryStore::default();
        let mut mode = mode_with(store.clone());
        mode.handle_event(key(KeyCode::Char(' ')));

        // Head starts at (10, 10) on a 20x20 board, the wall is at most 10 moves away
        while mode.engine.status() == GameStatus::Playing {
            mode.update_game();
        }

        assert_eq!(mode.engine.status(), GameStatus::GameOver);
        assert_eq!(mode.scoreboard.games_played, 1);
        assert_eq!(store.load().unwrap(), mode.scoreboard.high_score);

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.engine.status(), GameStatus::Waiting);
    }
}
