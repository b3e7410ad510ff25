use serde::{Deserialize, Serialize};

/// Named difficulty bracket, derived from the snake's length
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Tier {
    /// Thresholds from highest to lowest; the first one reached wins.
    const THRESHOLDS: [(usize, Tier); 3] =
        [(20, Tier::Expert), (15, Tier::Hard), (10, Tier::Medium)];

    pub fn from_length(length: usize) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(threshold, _)| length >= *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Easy)
    }

    /// Snake length at which this tier begins
    pub fn length_threshold(&self) -> usize {
        match self {
            Tier::Easy => 1,
            Tier::Medium => 10,
            Tier::Hard => 15,
            Tier::Expert => 20,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
            Tier::Expert => "Expert",
        }
    }
}
