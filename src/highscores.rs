//! High score leaderboard
//!
//! Kept in memory for the lifetime of the process; tracks the top 10 scores.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Simulation tick the game ended on
    pub tick: u64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, tick: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, level, tick };

        // Ties rank below the earlier score
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 1, 10), None);
        assert!(scores.entries.is_empty());
    }

    #[test]
    fn test_sorted_descending_with_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(50, 2, 100), Some(1));
        assert_eq!(scores.add_score(80, 3, 200), Some(1));
        assert_eq!(scores.add_score(50, 2, 300), Some(3));
        assert_eq!(scores.top_score(), Some(80));
        assert_eq!(scores.entries[1].tick, 100);
    }

    #[test]
    fn test_keeps_only_top_ten() {
        let mut scores = HighScores::new();
        for score in 1..=12u64 {
            scores.add_score(score * 10, 1, score);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
        assert!(!scores.qualifies(30));
        assert!(scores.qualifies(31));
    }
}
