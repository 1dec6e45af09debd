//! Survival-time leaderboard
//!
//! Persisted as a versioned JSON file, tracks the top 10 times. Lower time
//! ranks higher.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence;
use crate::sim::format_elapsed;

/// Maximum number of entries to keep
pub const MAX_LEADERBOARD_ENTRIES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Final run time in milliseconds
    pub elapsed_ms: u64,
}

impl LeaderboardEntry {
    pub fn formatted(&self) -> String {
        format_elapsed(Duration::from_millis(self.elapsed_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    /// Sorted ascending by time
    pub entries: Vec<LeaderboardEntry>,
    /// Most recently submitted entry, whether or not it made the cut
    #[serde(default)]
    pub recent: Option<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a time would make the board
    pub fn qualifies(&self, elapsed_ms: u64) -> bool {
        if self.entries.len() < MAX_LEADERBOARD_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| elapsed_ms < e.elapsed_ms).unwrap_or(true)
    }

    /// Rank a time would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, elapsed_ms: u64) -> Option<usize> {
        if !self.qualifies(elapsed_ms) {
            return None;
        }
        let rank = self.entries.iter().position(|e| elapsed_ms < e.elapsed_ms);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a run; returns the rank achieved or None if it didn't qualify
    pub fn add_score(&mut self, name: &str, elapsed: Duration) -> Option<usize> {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let entry = LeaderboardEntry {
            name: name.to_string(),
            elapsed_ms,
        };
        self.recent = Some(entry.clone());

        let rank = self.potential_rank(elapsed_ms)?;
        // Ties keep submission order
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        log::info!("{} placed #{} with {}", name, rank, format_elapsed(elapsed));
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    pub fn most_recent(&self) -> Option<&LeaderboardEntry> {
        self.recent.as_ref()
    }

    /// Load from disk; a missing file yields an empty board
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        match persistence::load_json::<Leaderboard>(path)? {
            Some(mut board) => {
                board.entries.sort_by_key(|e| e.elapsed_ms);
                board.entries.truncate(MAX_LEADERBOARD_ENTRIES);
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                Ok(board)
            }
            None => {
                log::info!("No leaderboard found, starting fresh");
                Ok(Self::new())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        persistence::save_json(path, self)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_sorted_ascending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score("b", ms(5_000)), Some(1));
        assert_eq!(board.add_score("a", ms(3_000)), Some(1));
        assert_eq!(board.add_score("c", ms(9_000)), Some(3));
        let names: Vec<_> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(board.best().map(|e| e.elapsed_ms), Some(3_000));
    }

    #[test]
    fn test_capped_at_max_entries() {
        let mut board = Leaderboard::new();
        for i in 0..MAX_LEADERBOARD_ENTRIES as u64 {
            board.add_score("p", ms(1_000 * (i + 1)));
        }
        assert!(!board.qualifies(10_000));
        assert_eq!(board.add_score("slow", ms(20_000)), None);
        assert_eq!(board.entries.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(board.most_recent().map(|e| e.name.as_str()), Some("slow"));

        assert_eq!(board.add_score("fast", ms(500)), Some(1));
        assert_eq!(board.entries.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(board.entries.last().map(|e| e.elapsed_ms), Some(9_000));
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut board = Leaderboard::new();
        board.add_score("first", ms(1_000));
        assert_eq!(board.add_score("second", ms(1_000)), Some(2));
    }

    #[test]
    fn test_entry_formatting() {
        let entry = LeaderboardEntry {
            name: "x".into(),
            elapsed_ms: 83_456,
        };
        assert_eq!(entry.formatted(), "01:23:456");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("cube-runner-board-{}", std::process::id()))
            .join("scores.json");
        let mut board = Leaderboard::new();
        board.add_score("ada", ms(12_345));
        board.add_score("bob", ms(6_000));
        board.save(&path).unwrap();

        let loaded = Leaderboard::load(&path).unwrap();
        assert_eq!(loaded, board);
    }
}
