//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per 60 Hz frame)
//! - Seeded RNG only
//! - Stable iteration order (hazards in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod state;
pub mod tick;

pub use collision::{ShieldContact, circles_overlap, constrain_shield, hits_shield, hits_sleeper};
pub use difficulty::{Difficulty, DifficultyTuning};
pub use state::{
    BOMB_GLYPH, FOOD_GLYPHS, FloatingText, GameEvent, GamePhase, GameState, Hazard, HazardKind,
    MAX_PARTICLES, Mood, Particle, Sleeper, Tint,
};
pub use tick::{TickInput, spawn_hazard, tick};
