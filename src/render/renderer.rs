use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameEngine, GameStatus, Position};
use crate::score::{Scoreboard, format_time};

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, engine: &GameEngine, scoreboard: &Scoreboard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(engine, scoreboard);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let grid = self.render_grid(engine);
        frame.render_widget(grid, game_area);

        if let Some(overlay) = self.render_overlay(engine, scoreboard) {
            let popup = centered_rect(44, 9, game_area);
            frame.render_widget(Clear, popup);
            frame.render_widget(overlay, popup);
        }

        // Render footer with controls
        let controls = self.render_controls(engine.status());
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, engine: &GameEngine) -> Paragraph<'static> {
        let grid_count = engine.grid_count() as i32;
        let snake = engine.snake();
        let head = snake[0];
        let mut lines = Vec::new();

        for y in 0..grid_count {
            let mut spans = Vec::new();

            for x in 0..grid_count {
                let pos = Position::new(x, y);

                let cell = if pos == head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snake.contains(&pos) {
                    // Snake body
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == engine.food() {
                    // Food
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    // Empty cell
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, engine: &GameEngine, scoreboard: &Scoreboard) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);
        let high_score = scoreboard.high_score.max(engine.high_score());

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(engine.score().to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(format_time(engine.elapsed_secs()), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(engine.snake_len().to_string(), value),
            Span::raw("    "),
            Span::styled("Difficulty: ", label),
            Span::styled(engine.difficulty_label(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    /// Message box drawn over the board whenever the snake is not moving
    fn render_overlay(&self, engine: &GameEngine, scoreboard: &Scoreboard) -> Option<Paragraph<'static>> {
        let key = |k: &'static str| {
            Span::styled(
                k,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        };
        let hint = |t: &'static str| Span::styled(t, Style::default().fg(Color::Gray));

        let (title, color, mut text) = match engine.status() {
            GameStatus::Playing => return None,
            GameStatus::Waiting => (
                "START",
                Color::Cyan,
                vec![Line::from(vec![hint("Press "), key("Space"), hint(" to start")])],
            ),
            GameStatus::Paused => (
                "PAUSED",
                Color::Yellow,
                vec![Line::from(vec![hint("Press "), key("Space"), hint(" to resume")])],
            ),
            GameStatus::GameOver => {
                let summary = engine.last_game_over();
                let final_score = summary.map(|s| s.final_score).unwrap_or(engine.score());
                let mut lines = vec![Line::from(vec![
                    Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        final_score.to_string(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])];
                if summary.is_some_and(|s| s.new_record) {
                    lines.push(Line::from(Span::styled(
                        "New record!",
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                lines.push(Line::from(vec![
                    hint("Press "),
                    key("R"),
                    hint(" to restart or "),
                    Span::styled(
                        "Q",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    hint(" to quit"),
                ]));
                ("GAME OVER", Color::Red, lines)
            }
        };

        if scoreboard.games_played > 0 {
            text.push(Line::from(hint_owned(format!(
                "Games played: {}",
                scoreboard.games_played
            ))));
        }

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(text);

        Some(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        )
    }

    fn render_controls(&self, status: GameStatus) -> Paragraph<'static> {
        let pause_label = if status == GameStatus::Waiting {
            " to start | "
        } else {
            " to pause | "
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(pause_label),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn hint_owned(text: String) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

/// A `width` x `height` rectangle in the middle of `area`, clipped to it
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction as GameDirection, GameConfig, GameState, Snake, TickOutcome};
    use crate::score::MemoryStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(engine: &GameEngine) -> String {
        let renderer = Renderer::new();
        let scoreboard = Scoreboard::load(Box::new(MemoryStore::new(90)));
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();

        terminal
            .draw(|frame| renderer.render(frame, engine, &scoreboard))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_waiting_screen() {
        let engine = GameEngine::new(GameConfig::default(), 0).unwrap();
        let screen = draw(&engine);

        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("Best: 90"));
        assert!(screen.contains("Difficulty: Easy"));
        assert!(screen.contains("START"));
    }

    #[test]
    fn test_playing_screen_has_no_overlay() {
        let mut engine = GameEngine::new(GameConfig::default(), 0).unwrap();
        engine.start();
        let screen = draw(&engine);

        assert!(screen.contains("■"));
        assert!(!screen.contains("START"));
        assert!(!screen.contains("PAUSED"));
    }

    #[test]
    fn test_paused_screen() {
        let mut engine = GameEngine::new(GameConfig::default(), 0).unwrap();
        engine.start();
        engine.toggle_pause();

        assert!(draw(&engine).contains("PAUSED"));
    }

    #[test]
    fn test_game_over_screen_with_new_record() {
        let mut state = GameState::new(
            Snake::from_segments(vec![Position::new(18, 10)], GameDirection::Right),
            Position::new(19, 10),
            20,
        );
        state.status = GameStatus::Playing;
        let mut engine = GameEngine::from_state(GameConfig::default(), state, 0).unwrap();

        // Eat at the edge, then run into the wall
        engine.tick();
        let summary = match engine.tick() {
            TickOutcome::GameOver(summary) => summary,
            other => panic!("expected game over, got {other:?}"),
        };
        assert!(summary.new_record);

        let screen = draw(&engine);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Final Score: 10"));
        assert!(screen.contains("New record!"));
        assert!(screen.contains("Press R to restart or Q to quit"));
    }

    #[test]
    fn test_game_over_screen_without_record() {
        let mut state = GameState::new(
            Snake::from_segments(vec![Position::new(19, 10)], GameDirection::Right),
            Position::new(0, 0),
            20,
        );
        state.status = GameStatus::Playing;
        let mut engine = GameEngine::from_state(GameConfig::default(), state, 50).unwrap();
        engine.tick();

        let screen = draw(&engine);
        assert!(screen.contains("Final Score: 0"));
        assert!(!screen.contains("New record!"));
    }

    #[test]
    fn test_centered_rect_clips_to_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(44, 9, area);
        assert_eq!(rect, area);

        let area = Rect::new(10, 10, 100, 40);
        assert_eq!(centered_rect(40, 10, area), Rect::new(40, 25, 40, 10));
    }
}
