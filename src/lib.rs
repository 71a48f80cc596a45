//! Snack Shield - wake the sleeper, then guard its snack time
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, game state)
//! - `renderer`: Canvas 2D drawing of a simulation snapshot
//! - `highscores`: Per-difficulty best scores in LocalStorage
//! - `settings`: Player preferences in LocalStorage
//! - `audio`: Procedural Web Audio sound effects (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Sleeper body radius
    pub const SLEEPER_RADIUS: f32 = 60.0;
    /// Sleeper hitbox is a bit smaller than the drawn body
    pub const SLEEPER_HITBOX_SCALE: f32 = 0.8;
    /// Shield (cursor) radius
    pub const SHIELD_RADIUS: f32 = 25.0;

    /// Hazard sizes
    pub const FOOD_RADIUS: f32 = 20.0;
    pub const BOMB_RADIUS: f32 = 25.0;

    /// Base hazard speed range (pixels/tick), scaled by difficulty
    pub const HAZARD_SPEED_MIN: f32 = 3.0;
    pub const HAZARD_SPEED_MAX: f32 = 6.0;
    /// Max |rotation speed| of a hazard glyph (radians/tick)
    pub const HAZARD_SPIN_MAX: f32 = 0.1;

    /// Hazards spawn this far beyond the viewport's half-diagonal
    pub const SPAWN_MARGIN: f32 = 80.0;
    /// Hazards are dropped this far beyond the viewport's half-diagonal
    pub const CULL_MARGIN: f32 = 200.0;

    /// Spawn interval floor (ticks)
    pub const SPAWN_RATE_MIN: f32 = 15.0;
    /// Bomb probability ceiling
    pub const BOMB_CHANCE_MAX: f32 = 0.70;
    /// Ticks between difficulty ramp steps
    pub const RAMP_INTERVAL_TICKS: u64 = 240;

    pub const MAX_HEALTH: u8 = 3;

    /// Scoring
    pub const FEED_POINTS: u64 = 100;
    pub const DEFLECT_POINTS: u64 = 50;

    /// Nudges needed to wake the sleeper
    pub const WAKE_HITS_REQUIRED: u32 = 5;
    /// Minimum ticks between two registered nudges
    pub const NUDGE_COOLDOWN_TICKS: u64 = 20;
    /// Shake duration after a nudge (ticks)
    pub const NUDGE_SHAKE_TICKS: u32 = 10;
    /// Max shake offset on each axis (pixels)
    pub const SHAKE_AMPLITUDE: f32 = 2.5;
    /// Ticks between "Zzz..." bubbles while asleep
    pub const SNORE_INTERVAL_TICKS: u64 = 60;

    /// Mood durations (ticks)
    pub const EAT_TICKS: u32 = 20;
    pub const HURT_TICKS: u32 = 30;

    /// Floating text lifetime (ticks) and rise speed (pixels/tick)
    pub const FLOATING_TEXT_LIFE: u32 = 60;
    pub const FLOATING_TEXT_RISE: f32 = -1.0;
    /// Floating text fades over its last ticks
    pub const FLOATING_TEXT_FADE: f32 = 20.0;

    /// Particle shrink factor per tick
    pub const PARTICLE_SHRINK: f32 = 0.95;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Half of the viewport diagonal
#[inline]
pub fn half_diagonal(width: f32, height: f32) -> f32 {
    (width / 2.0).hypot(height / 2.0)
}
