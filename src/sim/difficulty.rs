//! Difficulty tiers and their balance tables
//!
//! A run captures its tier when it starts. Within the run a continuous
//! `level` (starting at 1.0) ramps up over time and feeds every formula below.

use serde::{Deserialize, Serialize};

use crate::consts::{BOMB_CHANCE_MAX, SPAWN_RATE_MIN};

/// Selectable difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Balance numbers for one tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyTuning {
    /// Ticks between spawns at level 0
    pub spawn_rate_base: f32,
    /// Bomb probability at level 0
    pub bomb_chance_base: f32,
    /// Base multiplier on hazard speed
    pub speed_multiplier: f32,
    /// Level gained every ramp interval
    pub ramp_rate: f32,
}

const EASY: DifficultyTuning = DifficultyTuning {
    spawn_rate_base: 90.0,
    bomb_chance_base: 0.10,
    speed_multiplier: 0.7,
    ramp_rate: 0.1,
};

const MEDIUM: DifficultyTuning = DifficultyTuning {
    spawn_rate_base: 60.0,
    bomb_chance_base: 0.15,
    speed_multiplier: 1.0,
    ramp_rate: 0.25,
};

const HARD: DifficultyTuning = DifficultyTuning {
    spawn_rate_base: 40.0,
    bomb_chance_base: 0.25,
    speed_multiplier: 1.4,
    ramp_rate: 0.4,
};

impl Difficulty {
    /// Menu order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn tuning(&self) -> &'static DifficultyTuning {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Chill Snacking",
            Difficulty::Medium => "Balanced Diet",
            Difficulty::Hard => "Hunger Panic!",
        }
    }

    /// Next tier, saturating at Hard
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// Previous tier, saturating at Easy
    pub fn prev(&self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }

    /// Level after `ramp_steps` ramps. One multiply keeps whole levels exact.
    pub fn level_at(&self, ramp_steps: u32) -> f32 {
        1.0 + ramp_steps as f32 * self.tuning().ramp_rate
    }

    /// Whole ticks between spawns at the given level (never below the floor)
    pub fn spawn_interval(&self, level: f32) -> u64 {
        let rate = (self.tuning().spawn_rate_base - level * 4.0).max(SPAWN_RATE_MIN);
        rate.floor() as u64
    }

    /// Probability that a spawned hazard is a bomb
    pub fn bomb_chance(&self, level: f32) -> f32 {
        (self.tuning().bomb_chance_base + level * 0.05).min(BOMB_CHANCE_MAX)
    }

    /// Multiplier applied to the random base speed of a new hazard
    pub fn speed_factor(&self, level: f32) -> f32 {
        self.tuning().speed_multiplier + level * 0.1
    }
}
