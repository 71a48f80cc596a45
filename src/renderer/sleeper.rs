//! The sleeper character, drawn from circles and ellipses

use std::f64::consts::{PI, TAU};

use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use super::colors::{SLEEPER_BLUSH, SLEEPER_BODY, SLEEPER_FEET};
use super::figure::{BodyLayer, Ellipse, LimbFill, body_layers};
use crate::sim::Mood;

fn ellipse(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    rx: f64,
    ry: f64,
    rotation: f64,
) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.ellipse(x, y, rx, ry, rotation, 0.0, TAU)?;
    ctx.fill();
    Ok(())
}

fn fill_ellipse(ctx: &CanvasRenderingContext2d, e: &Ellipse) -> Result<(), JsValue> {
    ellipse(ctx, e.x, e.y, e.rx, e.ry, e.rotation)
}

fn disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU)?;
    ctx.fill();
    Ok(())
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}

/// Draw the sleeper centred at (x, y) with body radius r
pub fn draw_sleeper(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    r: f64,
    mood: Mood,
    time_ms: f64,
) -> Result<(), JsValue> {
    for layer in body_layers(x, y, r, mood) {
        match layer {
            BodyLayer::Body { outlined } => {
                ctx.set_fill_style_str(SLEEPER_BODY);
                disc(ctx, x, y, r)?;
                if outlined {
                    ctx.set_line_width(2.0);
                    ctx.set_stroke_style_str("rgba(0,0,0,0.1)");
                    ctx.stroke();
                }
            }
            BodyLayer::Limb { shape, fill } => {
                ctx.set_fill_style_str(match fill {
                    LimbFill::Body => SLEEPER_BODY,
                    LimbFill::Feet => SLEEPER_FEET,
                });
                fill_ellipse(ctx, &shape)?;
            }
        }
    }

    draw_eyes(ctx, x, y, mood, time_ms)?;

    ctx.set_fill_style_str(SLEEPER_BLUSH);
    ellipse(ctx, x - 35.0, y + 5.0, 12.0, 6.0, 0.0)?;
    ellipse(ctx, x + 35.0, y + 5.0, 12.0, 6.0, 0.0)?;

    draw_mouth(ctx, x, y, mood)
}

fn draw_eyes(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    mood: Mood,
    time_ms: f64,
) -> Result<(), JsValue> {
    match mood {
        Mood::Sleep => {
            ctx.set_line_width(3.0);
            ctx.set_stroke_style_str("black");
            ctx.set_line_cap("round");
            line(ctx, x - 25.0, y - 5.0, x - 5.0, y - 5.0);
            line(ctx, x + 5.0, y - 5.0, x + 25.0, y - 5.0);

            // Snot bubble
            let bubble = (time_ms / 500.0).sin() * 5.0 + 10.0;
            ctx.begin_path();
            ctx.arc(x + 10.0, y + 5.0, bubble, 0.0, TAU)?;
            ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
            ctx.fill();
            ctx.set_stroke_style_str("rgba(100, 200, 255, 0.5)");
            ctx.set_line_width(1.0);
            ctx.stroke();
        }
        Mood::Hurt => {
            // > <
            ctx.set_line_width(4.0);
            ctx.set_stroke_style_str("black");
            ctx.begin_path();
            ctx.move_to(x - 25.0, y - 10.0);
            ctx.line_to(x - 10.0, y + 5.0);
            ctx.move_to(x - 10.0, y - 10.0);
            ctx.line_to(x - 25.0, y + 5.0);
            ctx.stroke();
            ctx.begin_path();
            ctx.move_to(x + 10.0, y - 10.0);
            ctx.line_to(x + 25.0, y + 5.0);
            ctx.move_to(x + 25.0, y - 10.0);
            ctx.line_to(x + 10.0, y + 5.0);
            ctx.stroke();
        }
        Mood::Idle | Mood::Eat => {
            ctx.set_fill_style_str("black");
            ellipse(ctx, x - 15.0, y - 10.0, 6.0, 15.0, 0.0)?;
            ellipse(ctx, x + 15.0, y - 10.0, 6.0, 15.0, 0.0)?;
            ctx.set_fill_style_str("white");
            disc(ctx, x - 15.0, y - 18.0, 3.0)?;
            disc(ctx, x + 15.0, y - 18.0, 3.0)?;
        }
    }
    Ok(())
}

fn draw_mouth(ctx: &CanvasRenderingContext2d, x: f64, y: f64, mood: Mood) -> Result<(), JsValue> {
    match mood {
        Mood::Idle => {
            ctx.begin_path();
            ctx.arc(x, y + 10.0, 5.0, 0.0, PI)?;
            ctx.set_line_width(2.0);
            ctx.set_stroke_style_str("black");
            ctx.stroke();
        }
        Mood::Eat => {
            ctx.set_fill_style_str("#991b1b");
            disc(ctx, x, y + 10.0, 20.0)?;
            // Tongue
            ctx.begin_path();
            ctx.arc(x, y + 20.0, 10.0, 0.0, PI)?;
            ctx.set_fill_style_str("#ef4444");
            ctx.fill();
        }
        Mood::Hurt => {
            ctx.set_fill_style_str("black");
            disc(ctx, x, y + 20.0, 8.0)?;
        }
        Mood::Sleep => {
            ctx.set_fill_style_str("black");
            disc(ctx, x, y + 15.0, 3.0)?;
        }
    }
    Ok(())
}
