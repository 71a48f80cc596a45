//! Canvas 2D rendering module
//!
//! Draws a simulation snapshot; holds no game state of its own.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod figure;
#[cfg(target_arch = "wasm32")]
pub mod sleeper;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::sim::Tint;

/// Palette
pub mod colors {
    pub const SLEEPER_BODY: &str = "#ffb7d1";
    pub const SLEEPER_BLUSH: &str = "#f06292";
    pub const SLEEPER_FEET: &str = "#d50000";
    pub const SHIELD_FILL: &str = "rgba(59, 130, 246, 0.4)";
    pub const SHIELD_BORDER: &str = "#3b82f6";
    pub const SHIELD_GLINT: &str = "rgba(255, 255, 255, 0.4)";
}

/// CSS colour for a palette entry
pub fn tint_css(tint: Tint) -> &'static str {
    match tint {
        Tint::White => "#ffffff",
        Tint::Amber => "#fbbf24",
        Tint::Pink => "#ec4899",
        Tint::Smoke => "#555555",
        Tint::Dust => "#a8a29e",
        Tint::Gray => "#9ca3af",
        Tint::Red => "#ef4444",
    }
}
