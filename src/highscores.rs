//! Best scores per mode
//!
//! The overall best is always the larger of the two mode bests.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, read_u64};
use crate::sim::GameMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub overall: u64,
    pub classic: u64,
    pub modern: u64,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_mode(&self, mode: GameMode) -> u64 {
        match mode {
            GameMode::Classic => self.classic,
            GameMode::Modern => self.modern,
        }
    }

    /// Record a finished run; returns true if it beat the mode best
    pub fn record(&mut self, mode: GameMode, score: u64) -> bool {
        let best = match mode {
            GameMode::Classic => &mut self.classic,
            GameMode::Modern => &mut self.modern,
        };
        if score <= *best {
            return false;
        }
        *best = score;
        self.overall = self.classic.max(self.modern);
        true
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        let classic = read_u64(store, keys::CLASSIC_HIGH_SCORE, 0);
        let modern = read_u64(store, keys::MODERN_HIGH_SCORE, 0);
        let scores = Self {
            overall: read_u64(store, keys::HIGH_SCORE, 0).max(classic).max(modern),
            classic,
            modern,
        };
        log::info!(
            "Loaded high scores: classic {}, modern {}",
            scores.classic,
            scores.modern
        );
        scores
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(keys::HIGH_SCORE, &self.overall.to_string());
        store.set(keys::CLASSIC_HIGH_SCORE, &self.classic.to_string());
        store.set(keys::MODERN_HIGH_SCORE, &self.modern.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_record_only_improvements() {
        let mut scores = HighScores::new();
        assert!(scores.record(GameMode::Classic, 120));
        assert!(!scores.record(GameMode::Classic, 120));
        assert!(!scores.record(GameMode::Classic, 80));
        assert_eq!(scores.classic, 120);
        assert_eq!(scores.overall, 120);
    }

    #[test]
    fn test_overall_is_max_of_modes() {
        let mut scores = HighScores::new();
        scores.record(GameMode::Modern, 300);
        scores.record(GameMode::Classic, 200);
        assert_eq!(scores.overall, 300);
        assert_eq!(scores.for_mode(GameMode::Classic), 200);
    }

    #[test]
    fn test_zero_is_never_a_record() {
        let mut scores = HighScores::new();
        assert!(!scores.record(GameMode::Modern, 0));
    }

    #[test]
    fn test_save_load() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.record(GameMode::Modern, 70);
        scores.save(&mut store);
        assert_eq!(HighScores::load(&store), scores);
    }
}
