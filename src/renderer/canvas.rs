//! Frame rendering onto a 2D canvas context

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::sleeper::draw_sleeper;
use super::{colors, tint_css};
use crate::consts::SHIELD_RADIUS;
use crate::sim::GameState;

const EMOJI_FONTS: &str =
    "\"Apple Color Emoji\", \"Segoe UI Emoji\", \"Segoe UI Symbol\", \"Noto Color Emoji\", sans-serif";
const TEXT_FONT: &str = "bold 24px \"Fredoka One\", sans-serif";

/// Owns the canvas and its 2D context
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the backing store to the canvas' CSS box. Returns the new size.
    pub fn fit_to_client(&self) -> (f32, f32) {
        let w = self.canvas.client_width().max(1) as u32;
        let h = self.canvas.client_height().max(1) as u32;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        (w as f32, h as f32)
    }

    /// Draw one frame. `time_ms` only drives idle animation (the snot bubble).
    pub fn render(&self, state: &GameState, time_ms: f64, shake: bool) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );

        self.draw_hazards(state)?;

        let mut pos = state.sleeper.pos;
        if shake {
            pos += state.sleeper.shake;
        }
        draw_sleeper(
            ctx,
            pos.x as f64,
            pos.y as f64,
            state.sleeper.radius as f64,
            state.sleeper.mood,
            time_ms,
        )?;

        for p in &state.particles {
            ctx.begin_path();
            ctx.arc(p.pos.x as f64, p.pos.y as f64, p.size as f64, 0.0, TAU)?;
            ctx.set_fill_style_str(tint_css(p.tint));
            ctx.fill();
        }

        self.draw_texts(state)?;
        self.draw_shield(state)
    }

    fn draw_hazards(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for h in &state.hazards {
            ctx.save();
            ctx.translate(h.pos.x as f64, h.pos.y as f64)?;
            ctx.rotate(h.rotation as f64)?;
            // Explicit black so emoji fallbacks don't pick up a previous fill
            ctx.set_fill_style_str("#000000");
            ctx.set_font(&format!("{}px {}", h.radius * 2.0, EMOJI_FONTS));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_shadow_color("rgba(0,0,0,0.2)");
            ctx.set_shadow_blur(5.0);
            ctx.fill_text(h.glyph, 0.0, 0.0)?;
            ctx.restore();
        }
        Ok(())
    }

    fn draw_texts(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for t in &state.texts {
            ctx.save();
            ctx.set_global_alpha(t.alpha() as f64);
            ctx.set_font(TEXT_FONT);
            ctx.set_text_align("start");
            ctx.set_text_baseline("alphabetic");
            ctx.set_fill_style_str(tint_css(t.tint));
            ctx.set_stroke_style_str("#fff");
            ctx.set_line_width(3.0);
            ctx.stroke_text(t.text, t.pos.x as f64, t.pos.y as f64)?;
            ctx.fill_text(t.text, t.pos.x as f64, t.pos.y as f64)?;
            ctx.restore();
        }
        Ok(())
    }

    fn draw_shield(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y) = (state.shield.x as f64, state.shield.y as f64);

        ctx.begin_path();
        ctx.arc(x, y, SHIELD_RADIUS as f64, 0.0, TAU)?;
        ctx.set_fill_style_str(colors::SHIELD_FILL);
        ctx.fill();
        ctx.set_line_width(3.0);
        ctx.set_stroke_style_str(colors::SHIELD_BORDER);
        ctx.stroke();

        ctx.begin_path();
        ctx.arc(x - 5.0, y - 5.0, 4.0, 0.0, TAU)?;
        ctx.set_fill_style_str(colors::SHIELD_GLINT);
        ctx.fill();
        Ok(())
    }
}
