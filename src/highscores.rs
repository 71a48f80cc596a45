//! Per-difficulty best scores
//!
//! Persisted to LocalStorage as a flat `{"EASY":n,"MEDIUM":n,"HARD":n}` map.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Best score for each difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    #[serde(rename = "EASY", default)]
    pub easy: u64,
    #[serde(rename = "MEDIUM", default)]
    pub medium: u64,
    #[serde(rename = "HARD", default)]
    pub hard: u64,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "snack_shield_highscores";

    /// All zeros
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score for a tier
    pub fn best(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn slot_mut(&mut self, difficulty: Difficulty) -> &mut u64 {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Whether a score would set a new record for the tier
    pub fn qualifies(&self, difficulty: Difficulty, score: u64) -> bool {
        score > self.best(difficulty)
    }

    /// Record a finished run. Returns true if it set a new record.
    pub fn record(&mut self, difficulty: Difficulty, score: u64) -> bool {
        if !self.qualifies(difficulty, score) {
            return false;
        }
        *self.slot_mut(difficulty) = score;
        true
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored blob; a missing key gives zeros, a corrupt one is logged and ignored
    pub fn from_stored(stored: Option<&str>) -> Self {
        match stored {
            Some(json) => match Self::from_json(json) {
                Ok(scores) => {
                    log::info!(
                        "Loaded high scores (easy {}, medium {}, hard {})",
                        scores.easy,
                        scores.medium,
                        scores.hard
                    );
                    scores
                }
                Err(e) => {
                    log::error!("Failed to load high scores: {}", e);
                    Self::new()
                }
            },
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok())
            .flatten();

        Self::from_stored(stored.as_deref())
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("LocalStorage rejected high scores");
                    } else {
                        log::info!("High scores saved");
                    }
                }
                Err(e) => log::error!("Failed to encode high scores: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_on_strictly_higher() {
        let mut scores = HighScores::new();
        assert!(!scores.record(Difficulty::Medium, 0));
        assert!(scores.record(Difficulty::Medium, 300));
        assert!(!scores.record(Difficulty::Medium, 300));
        assert!(!scores.record(Difficulty::Medium, 250));
        assert!(scores.record(Difficulty::Medium, 301));
        assert_eq!(scores.best(Difficulty::Medium), 301);
    }

    #[test]
    fn test_tiers_are_independent() {
        let mut scores = HighScores::new();
        scores.record(Difficulty::Hard, 1200);
        assert_eq!(scores.best(Difficulty::Hard), 1200);
        assert_eq!(scores.best(Difficulty::Easy), 0);
        assert!(scores.qualifies(Difficulty::Easy, 50));
        assert!(!scores.qualifies(Difficulty::Hard, 1000));
    }

    #[test]
    fn test_json_shape() {
        let scores = HighScores {
            easy: 100,
            medium: 250,
            hard: 50,
        };
        let json = scores.to_json().unwrap();
        assert_eq!(json, r#"{"EASY":100,"MEDIUM":250,"HARD":50}"#);
    }

    #[test]
    fn test_from_stored_fallbacks() {
        assert_eq!(HighScores::from_stored(None), HighScores::new());
        assert_eq!(HighScores::from_stored(Some("not json")), HighScores::new());

        // Missing tiers default to zero
        let partial = HighScores::from_stored(Some(r#"{"HARD":900}"#));
        assert_eq!(partial.hard, 900);
        assert_eq!(partial.easy, 0);
    }
}
