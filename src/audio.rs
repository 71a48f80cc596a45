//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Shield bumped the sleeper
    Nudge,
    /// Sleeper woke up, run begins
    Wake,
    /// Food eaten
    Eat,
    /// Bomb destroyed by the shield
    Deflect,
    /// Food knocked away by the shield
    Fizzle,
    /// Bomb reached the sleeper
    Hurt,
    /// Game over
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Sound for a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Nudged { .. } => SoundEffect::Nudge,
            GameEvent::Woke => SoundEffect::Wake,
            GameEvent::Fed => SoundEffect::Eat,
            GameEvent::Deflected => SoundEffect::Deflect,
            GameEvent::Fizzled => SoundEffect::Fizzle,
            GameEvent::Hurt { .. } => SoundEffect::Hurt,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Copy volume and mute state from settings
    pub fn configure(&mut self, settings: &crate::Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Nudge => self.play_nudge(ctx, vol),
            SoundEffect::Wake => {
                self.arpeggio(ctx, vol * 0.3, &[400.0, 500.0, 600.0, 800.0], 0.1, OscillatorType::Triangle)
            }
            SoundEffect::Eat => {
                self.arpeggio(ctx, vol * 0.25, &[600.0, 800.0, 1000.0], 0.08, OscillatorType::Sine)
            }
            SoundEffect::Deflect => self.play_deflect(ctx, vol),
            SoundEffect::Fizzle => self.play_fizzle(ctx, vol),
            SoundEffect::Hurt => self.play_hurt(ctx, vol),
            SoundEffect::GameOver => {
                self.arpeggio(ctx, vol * 0.3, &[400.0, 350.0, 300.0, 200.0], 0.2, OscillatorType::Sine)
            }
            SoundEffect::HighScore => self.arpeggio(
                ctx,
                vol * 0.25,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.08,
                OscillatorType::Triangle,
            ),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single tone sliding from `from` to `to` Hz over `duration` seconds
    fn sweep(
        &self,
        ctx: &AudioContext,
        peak: f32,
        from: f32,
        to: f32,
        duration: f64,
        osc_type: OscillatorType,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(peak, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.05).ok();
    }

    /// Notes played one after another
    fn arpeggio(
        &self,
        ctx: &AudioContext,
        peak: f32,
        notes: &[f32],
        step: f64,
        osc_type: OscillatorType,
    ) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * step;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(peak, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + step * 1.5)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + step * 2.0).ok();
            }
        }
    }

    /// Nudge - soft boing
    fn play_nudge(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, vol * 0.4, 180.0, 320.0, 0.12, OscillatorType::Sine);
    }

    /// Deflect - pop with a high crack
    fn play_deflect(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, vol * 0.5, 100.0, 30.0, 0.3, OscillatorType::Sawtooth);

        if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    /// Fizzle - food wasted, dull descending blip
    fn play_fizzle(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, vol * 0.25, 300.0, 120.0, 0.15, OscillatorType::Triangle);
    }

    /// Hurt - ominous low drop with a thump
    fn play_hurt(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, vol * 0.4, 300.0, 40.0, 0.5, OscillatorType::Sine);
        self.sweep(ctx, vol * 0.5, 80.0, 40.0, 0.2, OscillatorType::Sine);
    }
}
