pub mod scoreboard;
pub mod store;

pub use scoreboard::{format_time, Scoreboard};
pub use store::{HighScoreStore, JsonFileStore, MemoryStore};
