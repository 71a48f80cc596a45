//! Circle-circle collision and the shield constraint
//!
//! Everything in the arena is a circle: the sleeper, the shield and every
//! hazard. The only non-trivial rule is that the shield may touch the sleeper
//! but never overlap it.

use glam::Vec2;

use super::state::{Hazard, Sleeper};
use crate::consts::{SHIELD_RADIUS, SLEEPER_HITBOX_SCALE};
use crate::polar_to_cartesian;

/// Result of constraining the shield against the sleeper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShieldContact {
    /// Where the shield actually sits
    pub pos: Vec2,
    /// Whether the pointer was pushing into the sleeper
    pub touching: bool,
}

/// Strict overlap test between two circles
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Keep the shield outside the sleeper's body.
///
/// A pointer inside the sleeper pushes the shield out to the surface along the
/// same direction. A pointer exactly on the centre has no direction and is left
/// where it is.
pub fn constrain_shield(sleeper_pos: Vec2, sleeper_radius: f32, pointer: Vec2) -> ShieldContact {
    let delta = pointer - sleeper_pos;
    let dist = delta.length();
    let min_dist = sleeper_radius + SHIELD_RADIUS;

    if dist < min_dist && dist > 0.0 {
        let angle = delta.y.atan2(delta.x);
        ShieldContact {
            pos: sleeper_pos + polar_to_cartesian(min_dist, angle),
            touching: true,
        }
    } else {
        ShieldContact {
            pos: pointer,
            touching: false,
        }
    }
}

/// Whether a hazard is touching the shield
#[inline]
pub fn hits_shield(hazard: &Hazard, shield: Vec2) -> bool {
    circles_overlap(hazard.pos, hazard.radius, shield, SHIELD_RADIUS)
}

/// Whether a hazard reached the sleeper (hitbox is smaller than the body)
#[inline]
pub fn hits_sleeper(hazard: &Hazard, sleeper: &Sleeper) -> bool {
    circles_overlap(
        hazard.pos,
        hazard.radius,
        sleeper.pos,
        sleeper.radius * SLEEPER_HITBOX_SCALE,
    )
}
