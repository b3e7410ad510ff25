use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    action::{Command, Direction},
    config::GameConfig,
    difficulty::Tier,
    state::{GameOverCause, GameState, GameStatus, Position, Snake},
};
use crate::error::ConfigError;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub cause: GameOverCause,
    pub final_score: u32,
    /// Final score beats the high score in force when the game started
    pub new_record: bool,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is not being played, nothing changed
    Idle,
    /// The snake moved one cell without eating
    Moved,
    /// The snake ate and grew by one cell
    Fed {
        score: u32,
        /// Score went past the best known score on this tick
        new_record: bool,
        tier_changed: bool,
    },
    /// The game ended on this tick
    GameOver(GameOverSummary),
}

/// The game engine: owns the state of one game and advances it tick by tick
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
    tier: Tier,
    speed: Duration,
    high_score: u32,
    high_score_at_start: u32,
    started_at: Option<Instant>,
    elapsed_secs: u64,
    last_game_over: Option<GameOverSummary>,
}

impl GameEngine {
    /// Create a new engine, seeding food placement from the OS.
    ///
    /// `high_score` is the best score known to the caller (usually loaded
    /// from a [`HighScoreStore`](crate::score::HighScoreStore)).
    pub fn new(config: GameConfig, high_score: u32) -> Result<Self, ConfigError> {
        Self::with_rng(config, high_score, StdRng::from_entropy())
    }

    /// Create a new engine with an explicit random source
    pub fn with_rng(config: GameConfig, high_score: u32, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = Self::fresh_state(&config, &mut rng);
        let speed = config.initial_speed();

        Ok(Self {
            config,
            state,
            rng,
            tier: Tier::Easy,
            speed,
            high_score,
            high_score_at_start: high_score,
            started_at: None,
            elapsed_secs: 0,
            last_game_over: None,
        })
    }

    /// Wrap a prepared state, e.g. to replay a known position.
    ///
    /// The state must match the configured board: every snake cell and the
    /// food inside it, food off the snake.
    pub fn from_state(config: GameConfig, state: GameState, high_score: u32) -> Result<Self, ConfigError> {
        config.validate()?;

        if state.grid_count != config.grid_count() {
            return Err(ConfigError::StateMismatch("grid size differs from configuration"));
        }
        if state.snake.is_empty() {
            return Err(ConfigError::StateMismatch("snake has no segments"));
        }
        if !state.snake.body.iter().all(|pos| state.is_in_bounds(*pos)) {
            return Err(ConfigError::StateMismatch("snake lies outside the board"));
        }
        let distinct: HashSet<Position> = state.snake.body.iter().copied().collect();
        if distinct.len() != state.snake.len() {
            return Err(ConfigError::StateMismatch("snake overlaps itself"));
        }
        if !state.is_in_bounds(state.food) || state.is_occupied_by_snake(state.food) {
            return Err(ConfigError::StateMismatch("food must be on a free cell"));
        }

        let tier = Tier::from_length(state.snake.len());
        let speed = if config.dynamic_difficulty {
            config.speed_for(tier)
        } else {
            config.initial_speed()
        };
        let started_at = matches!(state.status, GameStatus::Playing | GameStatus::Paused)
            .then(Instant::now);

        Ok(Self {
            config,
            state,
            rng: StdRng::from_entropy(),
            tier,
            speed,
            high_score,
            high_score_at_start: high_score,
            started_at,
            elapsed_secs: 0,
            last_game_over: None,
        })
    }

    fn fresh_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
        let grid_count = config.grid_count();
        let center = (grid_count / 2) as i32;
        let start = Position::new(center, center);
        let snake = Snake::new(start, Direction::Right, 1);

        // Validated boards have at least four cells, so a free one exists.
        let food = place_food(&snake, grid_count, rng).unwrap_or(Position::new(0, 0));

        GameState::new(snake, food, grid_count)
    }

    fn initialize(&mut self) {
        self.state = Self::fresh_state(&self.config, &mut self.rng);
        self.tier = Tier::Easy;
        self.speed = self.config.initial_speed();
        self.high_score_at_start = self.high_score;
        self.started_at = None;
        self.elapsed_secs = 0;
        self.last_game_over = None;
    }

    /// Begin playing. Only valid while waiting.
    pub fn start(&mut self) -> bool {
        if self.state.status != GameStatus::Waiting {
            return false;
        }

        self.state.status = GameStatus::Playing;
        self.started_at = Some(Instant::now());
        self.high_score_at_start = self.high_score;
        debug!(food = %self.state.food, "game started");
        true
    }

    /// Buffer a direction for the next tick.
    ///
    /// Ignored unless playing, and ignored when it would reverse the snake
    /// onto itself. A later request before the next tick replaces this one.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.state.status != GameStatus::Playing
            || self.state.snake.direction.is_opposite(direction)
        {
            return false;
        }

        self.state.pending_direction = Some(direction);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.state.status = match self.state.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            _ => return false,
        };
        debug!(status = ?self.state.status, "pause toggled");
        true
    }

    /// Throw the current game away and go back to waiting
    pub fn restart(&mut self) {
        self.initialize();
        debug!("game restarted");
    }

    /// Dispatch an input command. Returns whether it changed anything.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Turn(direction) => self.request_direction(direction),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.status != GameStatus::Playing {
            return TickOutcome::Idle;
        }

        if let Some(direction) = self.state.pending_direction.take() {
            self.state.snake.direction = direction;
        }

        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.snake.direction);

        if let Some(cause) = self.check_collision(new_head) {
            return self.finish(cause);
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance_to(new_head, ate_food);
        self.state.steps += 1;
        self.update_elapsed();

        if ate_food {
            self.feed()
        } else {
            TickOutcome::Moved
        }
    }

    /// Check if the new head position causes a collision.
    ///
    /// The tail still counts as body here even though it would move away
    /// on a tick without food.
    fn check_collision(&self, pos: Position) -> Option<GameOverCause> {
        if !self.state.is_in_bounds(pos) {
            return Some(GameOverCause::Wall);
        }

        if self.state.is_occupied_by_snake(pos) {
            return Some(GameOverCause::SelfCollision);
        }

        None
    }

    fn feed(&mut self) -> TickOutcome {
        self.state.score = self.state.score.saturating_add(self.config.score_per_food);

        let new_record = self.state.score > self.high_score;
        if new_record {
            self.high_score = self.state.score;
            info!(high_score = self.high_score, "new high score");
        }

        match place_food(&self.state.snake, self.state.grid_count, &mut self.rng) {
            Some(food) => self.state.food = food,
            None => return self.finish(GameOverCause::BoardFull),
        }

        let previous = self.tier;
        self.tier = Tier::from_length(self.state.snake.len());
        if self.config.dynamic_difficulty {
            self.speed = self.config.speed_for(self.tier);
        }
        let tier_changed = previous != self.tier;
        if tier_changed {
            debug!(tier = self.tier.label(), speed_ms = self.speed.as_millis() as u64, "difficulty changed");
        }

        TickOutcome::Fed {
            score: self.state.score,
            new_record,
            tier_changed,
        }
    }

    fn finish(&mut self, cause: GameOverCause) -> TickOutcome {
        self.state.status = GameStatus::GameOver;

        let summary = GameOverSummary {
            cause,
            final_score: self.state.score,
            new_record: self.state.score > self.high_score_at_start,
        };
        self.last_game_over = Some(summary);

        info!(
            ?cause,
            score = summary.final_score,
            length = self.state.snake.len(),
            new_record = summary.new_record,
            "game over"
        );

        TickOutcome::GameOver(summary)
    }

    fn update_elapsed(&mut self) {
        if let Some(started_at) = self.started_at {
            self.elapsed_secs = started_at.elapsed().as_secs();
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Snake segments, head first
    pub fn snake(&self) -> &[Position] {
        &self.state.snake.body
    }

    pub fn snake_len(&self) -> usize {
        self.state.snake.len()
    }

    pub fn food(&self) -> Position {
        self.state.food
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Best score seen so far, this game included
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    /// Direction applied on the most recent tick
    pub fn direction(&self) -> Direction {
        self.state.snake.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.state.pending_direction
    }

    /// Whole seconds between `start()` and the latest tick
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn difficulty_label(&self) -> &'static str {
        self.tier.label()
    }

    /// Interval the driver should wait before the next tick
    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn grid_count(&self) -> u32 {
        self.state.grid_count
    }

    pub fn last_game_over(&self) -> Option<GameOverSummary> {
        self.last_game_over
    }

    #[cfg(test)]
    pub(crate) fn put_food(&mut self, food: Position) {
        self.state.food = food;
    }
}

/// Pick a free cell uniformly at random, or `None` if the snake fills the board
fn place_food<R: Rng>(snake: &Snake, grid_count: u32, rng: &mut R) -> Option<Position> {
    let cells = (grid_count as usize) * (grid_count as usize);
    if snake.len() >= cells {
        return None;
    }

    // Rejection sampling needs on average at most two draws while the board
    // is no more than half full.
    if snake.len() * 2 <= cells {
        loop {
            let x = rng.gen_range(0..grid_count) as i32;
            let y = rng.gen_range(0..grid_count) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }

    let occupied: HashSet<Position> = snake.body.iter().copied().collect();
    let free: Vec<Position> = (0..grid_count as i32)
        .flat_map(|y| (0..grid_count as i32).map(move |x| Position::new(x, y)))
        .filter(|pos| !occupied.contains(pos))
        .collect();

    free.choose(rng).copied()
}
