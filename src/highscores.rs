//! Best-score board
//!
//! Keeps one entry per player holding their best session score, stored as a
//! JSON file.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScoreBoardError;

/// A player's best score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player: String,
    pub score: i64,
}

/// Per-player best scores
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn best(&self, player: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.player == player)
            .map(|e| e.score)
    }

    /// Record a session result. Returns false (and keeps the old entry) unless
    /// the score beats the player's stored best.
    pub fn submit(&mut self, player: &str, score: i64) -> bool {
        match self.entries.iter_mut().find(|e| e.player == player) {
            Some(entry) if entry.score >= score => {
                log::info!("{player}: {score} does not beat best {}", entry.score);
                false
            }
            Some(entry) => {
                entry.score = score;
                true
            }
            None => {
                self.entries.push(HighScoreEntry {
                    player: player.to_string(),
                    score,
                });
                true
            }
        }
    }

    /// Highest scores first; ties keep submission order
    pub fn top(&self, n: usize) -> Vec<&HighScoreEntry> {
        let mut ranked: Vec<&HighScoreEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(n);
        ranked
    }

    /// 1-indexed rank of a player
    pub fn rank(&self, player: &str) -> Option<usize> {
        let best = self.best(player)?;
        Some(self.entries.iter().filter(|e| e.score > best).count() + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a board file; a missing file is an empty board
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreBoardError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let board = Self::from_json(&json)?;
                log::info!("Loaded {} high scores from {}", board.len(), path.display());
                Ok(board)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScoreBoardError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_improvements_replace() {
        let mut board = HighScores::new();
        assert!(board.submit("ada", 40));
        assert!(!board.submit("ada", 40));
        assert!(!board.submit("ada", 10));
        assert_eq!(board.best("ada"), Some(40));
        assert!(board.submit("ada", 55));
        assert_eq!(board.best("ada"), Some(55));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_negative_scores_are_kept() {
        let mut board = HighScores::new();
        assert!(board.submit("bo", -30));
        assert!(board.submit("bo", -10));
        assert_eq!(board.best("bo"), Some(-10));
    }

    #[test]
    fn test_top_and_rank() {
        let mut board = HighScores::new();
        board.submit("a", 10);
        board.submit("b", 70);
        board.submit("c", 30);
        board.submit("d", 30);

        let top: Vec<_> = board.top(3).iter().map(|e| e.player.as_str()).collect();
        assert_eq!(top, vec!["b", "c", "d"]);
        assert_eq!(board.rank("b"), Some(1));
        assert_eq!(board.rank("d"), Some(2));
        assert_eq!(board.rank("a"), Some(4));
        assert_eq!(board.rank("nobody"), None);
    }

    #[test]
    fn test_json() {
        let mut board = HighScores::new();
        board.submit("ada", 20);
        let restored = HighScores::from_json(&board.to_json().unwrap()).unwrap();
        assert_eq!(restored.best("ada"), Some(20));
        assert!(HighScores::from_json("{}").is_err());
    }

    fn board_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("popcorn-catch-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_missing_file_is_empty_board() {
        let board = HighScores::load(board_path("missing")).unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_bests() {
        let path = board_path("persist");
        let mut board = HighScores::new();
        board.submit("ada", 30);
        board.submit("bo", 50);
        board.save(&path).unwrap();

        let mut restored = HighScores::load(&path).unwrap();
        assert_eq!(restored.rank("bo"), Some(1));
        assert!(!restored.submit("ada", 20));
        assert!(restored.submit("ada", 60));
        restored.save(&path).unwrap();
        assert_eq!(HighScores::load(&path).unwrap().best("ada"), Some(60));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(HighScores::load(&path), Err(ScoreBoardError::Parse(_))));
        std::fs::remove_file(&path).unwrap();
    }
}
