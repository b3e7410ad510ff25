use tracing::warn;

use super::store::HighScoreStore;
use crate::game::GameOverSummary;

/// Session-wide score keeping: the persisted high score and a game count
pub struct Scoreboard {
    store: Box<dyn HighScoreStore>,
    pub high_score: u32,
    pub games_played: u32,
    pub last_game: Option<GameOverSummary>,
}

impl Scoreboard {
    /// Read the stored high score. A store that cannot be read counts as empty.
    pub fn load(store: Box<dyn HighScoreStore>) -> Self {
        let high_score = store.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not load high score, starting from 0");
            0
        });

        Self {
            store,
            high_score,
            games_played: 0,
            last_game: None,
        }
    }

    /// Persist `score` if it beats the high score. Returns true on a new record.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.high_score {
            return false;
        }

        self.high_score = score;
        if let Err(err) = self.store.save(score) {
            warn!(error = %err, score, "could not save high score");
        }
        true
    }

    pub fn on_game_over(&mut self, summary: GameOverSummary) {
        self.games_played += 1;
        self.record(summary.final_score);
        self.last_game = Some(summary);
    }
}

/// Format whole seconds as `MM:SS`
pub fn format_time(total_secs: u64) -> String {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameOverCause;
    use crate::score::MemoryStore;
    use anyhow::{bail, Result};

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&self) -> Result<u32> {
            bail!("disk on fire")
        }

        fn save(&mut self, _high_score: u32) -> Result<()> {
            bail!("disk on fire")
        }
    }

    fn summary(final_score: u32) -> GameOverSummary {
        GameOverSummary {
            cause: GameOverCause::Wall,
            final_score,
            new_record: false,
        }
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_time(125), "02:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(3661), "61:01");
    }

    #[test]
    fn test_loads_stored_high_score() {
        let scoreboard = Scoreboard::load(Box::new(MemoryStore::new(70)));
        assert_eq!(scoreboard.high_score, 70);
    }

    #[test]
    fn test_high_score_tracking() {
        let store = MemoryStore::new(0);
        let mut scoreboard = Scoreboard::load(Box::new(store.clone()));

        scoreboard.on_game_over(summary(10));
        assert_eq!(scoreboard.high_score, 10);
        assert_eq!(scoreboard.games_played, 1);

        scoreboard.on_game_over(summary(5));
        assert_eq!(scoreboard.high_score, 10); // Should not decrease
        assert_eq!(scoreboard.games_played, 2);

        scoreboard.on_game_over(summary(15));
        assert_eq!(scoreboard.high_score, 15); // Should update
        assert_eq!(scoreboard.games_played, 3);

        assert_eq!(store.load().unwrap(), 15);
    }

    #[test]
    fn test_record_only_persists_improvements() {
        let store = MemoryStore::new(50);
        let mut scoreboard = Scoreboard::load(Box::new(store.clone()));

        assert!(!scoreboard.record(50));
        assert!(!scoreboard.record(20));
        assert_eq!(store.load().unwrap(), 50);

        assert!(scoreboard.record(60));
        assert_eq!(store.load().unwrap(), 60);
    }

    #[test]
    fn test_broken_store_does_not_stop_play() {
        let mut scoreboard = Scoreboard::load(Box::new(BrokenStore));
        assert_eq!(scoreboard.high_score, 0);

        assert!(scoreboard.record(30));
        assert_eq!(scoreboard.high_score, 30);
    }
}
