//! High score persistence
//!
//! The game only ever stores one number: the best score reached so far.
//! [`JsonFileStore`] keeps it in a small JSON file; [`MemoryStore`] keeps
//! it in memory for tests and for runs that should not touch the disk.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Somewhere to load and save the high score
pub trait HighScoreStore: Send {
    /// Load the stored high score, 0 if nothing has been stored yet
    fn load(&self) -> Result<u32>;

    /// Replace the stored high score
    fn save(&mut self, high_score: u32) -> Result<()>;
}

/// On-disk layout of the high score file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    snake_game_high_score: u32,
}

/// Stores the high score as JSON at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        let record: HighScoreRecord = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse high score in {:?}", self.path))?;

        Ok(record.snake_game_high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let record = HighScoreRecord {
            snake_game_high_score: high_score,
        };
        let json = serde_json::to_string_pretty(&record).context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

/// Keeps the high score in memory. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Arc<Mutex<u32>>,
}

impl MemoryStore {
    pub fn new(initial: u32) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial)),
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        self.value
            .lock()
            .map(|value| *value)
            .map_err(|_| anyhow!("high score lock poisoned"))
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        let mut value = self
            .value
            .lock()
            .map_err(|_| anyhow!("high score lock poisoned"))?;
        *value = high_score;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_zero() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("absent.json"));

        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("high_score.json");
        let mut store = JsonFileStore::new(&path);

        store.save(130).unwrap();

        assert!(path.exists());
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), 130);
    }

    #[test]
    fn test_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("high_score.json");
        let mut store = JsonFileStore::new(&path);
        store.save(40).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["snake_game_high_score"], 40);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("high_score.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse high score"));
    }

    #[test]
    fn test_memory_store_clones_share_value() {
        let store = MemoryStore::new(5);
        let mut writer = store.clone();

        writer.save(25).unwrap();

        assert_eq!(store.load().unwrap(), 25);
    }
}
