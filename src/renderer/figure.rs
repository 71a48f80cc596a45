//! Layout of the sleeper's body, independent of the drawing backend
//!
//! The body is painted twice: once with a faint outline, then again after
//! the feet and arms so the limbs tuck behind it. Only the part of the
//! outline the limbs don't cover survives.

use crate::sim::Mood;

/// Rotated ellipse in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub x: f64,
    pub y: f64,
    pub rx: f64,
    pub ry: f64,
    pub rotation: f64,
}

impl Ellipse {
    fn new(x: f64, y: f64, rx: f64, ry: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            rx,
            ry,
            rotation,
        }
    }
}

/// Palette entry for a limb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimbFill {
    Body,
    Feet,
}

/// One paint step of the body, back to front
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyLayer {
    /// Body disc
    Body { outlined: bool },
    Limb { shape: Ellipse, fill: LimbFill },
}

/// Paint steps for a sleeper centred at (x, y) with body radius r
pub fn body_layers(x: f64, y: f64, r: f64, mood: Mood) -> [BodyLayer; 6] {
    let foot = |dx: f64, rotation: f64| BodyLayer::Limb {
        shape: Ellipse::new(x + dx, y + r * 0.7, r * 0.4, r * 0.25, rotation),
        fill: LimbFill::Feet,
    };
    let arm = |dx: f64, dy: f64, ry: f64, rotation: f64| BodyLayer::Limb {
        shape: Ellipse::new(x + dx, y + dy, r * 0.2, ry, rotation),
        fill: LimbFill::Body,
    };

    let (left_arm, right_arm) = match mood {
        Mood::Idle | Mood::Sleep => (
            arm(-r * 0.9, 0.0, r * 0.25, -0.5),
            arm(r * 0.9, 0.0, r * 0.25, 0.5),
        ),
        // Raised
        Mood::Eat => (
            arm(-r * 0.8, -r * 0.4, r * 0.3, -2.5),
            arm(r * 0.8, -r * 0.4, r * 0.3, 2.5),
        ),
        // Flailing
        Mood::Hurt => (
            arm(-r * 0.9, r * 0.2, r * 0.3, 0.5),
            arm(r * 0.9, -r * 0.2, r * 0.3, -0.5),
        ),
    };

    [
        BodyLayer::Body { outlined: true },
        foot(-r * 0.6, -0.2),
        foot(r * 0.6, 0.2),
        left_arm,
        right_arm,
        BodyLayer::Body { outlined: false },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limbs(layers: &[BodyLayer]) -> Vec<(Ellipse, LimbFill)> {
        layers
            .iter()
            .filter_map(|l| match l {
                BodyLayer::Limb { shape, fill } => Some((*shape, *fill)),
                BodyLayer::Body { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_outline_is_painted_under_the_limbs() {
        let layers = body_layers(100.0, 100.0, 60.0, Mood::Idle);
        assert_eq!(layers[0], BodyLayer::Body { outlined: true });
        assert_eq!(layers[5], BodyLayer::Body { outlined: false });
        let outlined = layers
            .iter()
            .filter(|l| matches!(l, BodyLayer::Body { outlined: true }))
            .count();
        assert_eq!(outlined, 1);
        for layer in &layers[1..5] {
            assert!(matches!(layer, BodyLayer::Limb { .. }));
        }
    }

    #[test]
    fn test_feet_then_arms() {
        let parts = limbs(&body_layers(0.0, 0.0, 60.0, Mood::Sleep));
        let fills: Vec<LimbFill> = parts.iter().map(|(_, f)| *f).collect();
        assert_eq!(
            fills,
            vec![LimbFill::Feet, LimbFill::Feet, LimbFill::Body, LimbFill::Body]
        );
        let foot = parts[0].0;
        assert!((foot.x + 36.0).abs() < 1e-9);
        assert!((foot.y - 42.0).abs() < 1e-9);
        assert!((foot.rx - 24.0).abs() < 1e-9);
        assert!((foot.ry - 15.0).abs() < 1e-9);
        assert_eq!(foot.rotation, -0.2);
    }

    #[test]
    fn test_arms_follow_mood() {
        let eat = limbs(&body_layers(0.0, 0.0, 60.0, Mood::Eat));
        assert!(eat[2].0.y < 0.0 && eat[3].0.y < 0.0);

        let hurt = limbs(&body_layers(0.0, 0.0, 60.0, Mood::Hurt));
        assert!(hurt[2].0.y > 0.0);
        assert!(hurt[3].0.y < 0.0);

        let idle = limbs(&body_layers(0.0, 0.0, 60.0, Mood::Idle));
        assert_eq!(idle[2].0.y, 0.0);
        assert!((idle[2].0.x + 54.0).abs() < 1e-9);
    }
}
