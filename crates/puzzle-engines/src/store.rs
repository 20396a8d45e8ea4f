//! Boundary to score persistence. The surrounding session calls
//! [`ScoreStore::record_result`] exactly once per completed game; what
//! "best" means per game id (highest for merge, fewest moves for sliding)
//! is the consumer's call, the store just keeps numbers.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store backend: {0}")]
    Backend(String),
}

/// Key-value score persistence keyed by game identifier.
pub trait ScoreStore {
    /// Record the final score of one completed game.
    fn record_result(&mut self, game_id: &str, score: u64) -> Result<(), StoreError>;

    /// Numerically highest recorded score for `game_id`, if any.
    fn best_score(&self, game_id: &str) -> Result<Option<u64>, StoreError>;
}

/// In-memory store for tests and headless runs. Keeps the full result
/// history per game id.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    results: HashMap<String, Vec<u64>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest recorded score (used for move-count games).
    pub fn fewest(&self, game_id: &str) -> Option<u64> {
        self.results.get(game_id)?.iter().copied().min()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn record_result(&mut self, game_id: &str, score: u64) -> Result<(), StoreError> {
        self.results.entry(game_id.to_string()).or_default().push(score);
        Ok(())
    }

    fn best_score(&self, game_id: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.results.get(game_id).and_then(|r| r.iter().copied().max()))
    }
}
