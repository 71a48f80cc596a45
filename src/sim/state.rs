//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use crate::consts::*;
use crate::half_diagonal;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Sleeper is asleep; difficulty menu is up, nudges wake it
    Start,
    /// Active run
    Playing,
    /// Run ended, waiting for the player to go back to the menu
    GameOver,
}

/// What the sleeper's face and arms are doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Sleep,
    Idle,
    Eat,
    Hurt,
}

/// Palette entries used by particles and floating text.
/// The renderer owns the actual colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    White,
    Amber,
    Pink,
    Smoke,
    Dust,
    Gray,
    Red,
}

/// The character in the middle of the screen
#[derive(Debug, Clone)]
pub struct Sleeper {
    pub pos: Vec2,
    pub radius: f32,
    pub mood: Mood,
    /// Ticks left on the current mood (or on the nudge shake while asleep)
    pub mood_timer: u32,
    /// Registered nudges towards waking up
    pub wake_hits: u32,
    /// Tick of the last registered nudge
    pub last_nudge_tick: u64,
    /// Render-only jitter while shaking
    pub shake: Vec2,
}

impl Sleeper {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: SLEEPER_RADIUS,
            mood: Mood::Sleep,
            mood_timer: 0,
            wake_hits: 0,
            last_nudge_tick: 0,
            shake: Vec2::ZERO,
        }
    }

    /// Switch mood for a number of ticks
    pub fn set_mood(&mut self, mood: Mood, ticks: u32) {
        self.mood = mood;
        self.mood_timer = ticks;
    }

    /// Whether a nudge at `now` is past the cooldown
    pub fn can_nudge(&self, now: u64) -> bool {
        now.saturating_sub(self.last_nudge_tick) > NUDGE_COOLDOWN_TICKS
    }

    pub fn is_awake_enough(&self) -> bool {
        self.wake_hits >= WAKE_HITS_REQUIRED
    }
}

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    /// Feed it to the sleeper
    Food,
    /// Block it with the shield
    Bomb,
}

impl HazardKind {
    pub fn radius(&self) -> f32 {
        match self {
            HazardKind::Food => FOOD_RADIUS,
            HazardKind::Bomb => BOMB_RADIUS,
        }
    }
}

/// Glyphs used for food hazards
pub const FOOD_GLYPHS: [&str; 12] = [
    "🍎", "🍰", "🍭", "🍙", "🍦", "🍩", "🍪", "🍉", "🍓", "🍒", "🍔", "🍕",
];
pub const BOMB_GLYPH: &str = "💣";

/// Something flying towards the sleeper
#[derive(Debug, Clone)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub glyph: &'static str,
    pub rotation: f32,
    pub spin: f32,
}

impl Hazard {
    /// Advance one tick of linear motion and spin
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.rotation += self.spin;
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tint: Tint,
    /// Remaining ticks
    pub life: f32,
    pub size: f32,
}

/// A short message that drifts up and fades out
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: &'static str,
    pub tint: Tint,
    /// Remaining ticks
    pub life: u32,
    pub rise: f32,
}

impl FloatingText {
    /// Opacity for rendering, fades over the last ticks
    pub fn alpha(&self) -> f32 {
        (self.life as f32 / FLOATING_TEXT_FADE).min(1.0)
    }
}

/// One-shot notifications for the platform layer (audio, persistence, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A nudge registered while asleep
    Nudged { hits: u32 },
    /// Sleeper woke up and the run started
    Woke,
    /// Food reached the sleeper
    Fed,
    /// Shield destroyed a bomb
    Deflected,
    /// Shield knocked away food
    Fizzled,
    /// A bomb reached the sleeper
    Hurt { health: u8 },
    /// Health ran out
    GameOver { score: u64, difficulty: Difficulty },
}

/// Default particle cap when the platform doesn't set one
pub const MAX_PARTICLES: usize = 1000;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Tier picked on the menu; captured for the whole run
    pub difficulty: Difficulty,
    /// Ramp level within the run, derived from `ramp_steps`
    pub level: f32,
    /// Ramps applied so far this run
    pub ramp_steps: u32,
    pub score: u64,
    pub health: u8,
    /// Simulation tick counter (reset at run start)
    pub time_ticks: u64,
    /// Viewport size in pixels
    pub width: f32,
    pub height: f32,
    pub sleeper: Sleeper,
    /// Shield centre after constraining it against the sleeper
    pub shield: Vec2,
    /// Active hazards (spawn order)
    pub hazards: Vec<Hazard>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    /// Particle cap (from settings)
    pub max_particles: usize,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and viewport
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let center = Vec2::new(width / 2.0, height / 2.0);
        Self {
            phase: GamePhase::Start,
            difficulty: Difficulty::default(),
            level: 1.0,
            ramp_steps: 0,
            score: 0,
            health: MAX_HEALTH,
            time_ticks: 0,
            width,
            height,
            sleeper: Sleeper::new(center),
            shield: Vec2::ZERO,
            hazards: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Resize the viewport; the sleeper stays centred
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.sleeper.pos = Vec2::new(width / 2.0, height / 2.0);
    }

    /// Pick a tier. Only allowed on the start screen.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != GamePhase::Start {
            return false;
        }
        self.difficulty = difficulty;
        true
    }

    /// Begin a run with the selected tier
    pub fn start_run(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.health = MAX_HEALTH;
        self.hazards.clear();
        self.particles.clear();
        self.texts.clear();
        self.time_ticks = 0;
        self.level = 1.0;
        self.ramp_steps = 0;
        self.sleeper.mood = Mood::Idle;
        self.sleeper.shake = Vec2::ZERO;
        log::info!("Run started on {}", self.difficulty.label());
    }

    /// Back to the sleeping start screen
    pub fn reset_to_menu(&mut self) {
        self.phase = GamePhase::Start;
        self.sleeper.mood = Mood::Sleep;
        self.sleeper.mood_timer = 0;
        self.sleeper.wake_hits = 0;
        self.sleeper.last_nudge_tick = self.time_ticks;
        self.sleeper.shake = Vec2::ZERO;
        self.hazards.clear();
        self.particles.clear();
        self.texts.clear();
    }

    /// Radius of the circle (around the sleeper) hazards spawn on
    pub fn spawn_radius(&self) -> f32 {
        half_diagonal(self.width, self.height) + SPAWN_MARGIN
    }

    /// Hazards farther than this from the sleeper are dropped
    pub fn cull_radius(&self) -> f32 {
        half_diagonal(self.width, self.height) + CULL_MARGIN
    }

    /// Spray `count` particles from a point, evicting the oldest past the cap
    pub fn spawn_burst(&mut self, pos: Vec2, tint: Tint, count: usize) {
        if self.max_particles == 0 {
            return;
        }
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                self.particles.remove(0);
            }
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 10.0,
                (self.rng.random::<f32>() - 0.5) * 10.0,
            );
            let life = self.rng.random_range(20.0..40.0);
            let size = self.rng.random_range(3.0..8.0);
            self.particles.push(Particle {
                pos,
                vel,
                tint,
                life,
                size,
            });
        }
    }

    /// Pop up a message at a point
    pub fn add_floating_text(&mut self, pos: Vec2, text: &'static str, tint: Tint) {
        self.texts.push(FloatingText {
            pos,
            text,
            tint,
            life: FLOATING_TEXT_LIFE,
            rise: FLOATING_TEXT_RISE,
        });
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_asleep_and_centred() {
        let state = GameState::new(1, 800.0, 600.0);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.sleeper.mood, Mood::Sleep);
        assert_eq!(state.sleeper.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_resize_recentres_sleeper() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.resize(1024.0, 768.0);
        assert_eq!(state.sleeper.pos, Vec2::new(512.0, 384.0));
        assert!((state.spawn_radius() - (640.0 + SPAWN_MARGIN)).abs() < 1e-3);
        assert!((state.cull_radius() - (640.0 + CULL_MARGIN)).abs() < 1e-3);
    }

    #[test]
    fn test_difficulty_locked_outside_menu() {
        let mut state = GameState::new(1, 800.0, 600.0);
        assert!(state.select_difficulty(Difficulty::Hard));
        state.start_run();
        assert!(!state.select_difficulty(Difficulty::Easy));
        assert_eq!(state.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_start_run_resets_run_state() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.score = 900;
        state.health = 1;
        state.level = 4.0;
        state.ramp_steps = 7;
        state.time_ticks = 5000;
        state.spawn_burst(Vec2::ZERO, Tint::Red, 10);
        state.add_floating_text(Vec2::ZERO, "Yummy!", Tint::Pink);

        state.start_run();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.level, 1.0);
        assert_eq!(state.ramp_steps, 0);
        assert_eq!(state.time_ticks, 0);
        assert!(state.particles.is_empty());
        assert!(state.texts.is_empty());
        assert_eq!(state.sleeper.mood, Mood::Idle);
    }

    #[test]
    fn test_reset_to_menu_puts_sleeper_back_to_sleep() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.sleeper.wake_hits = 5;
        state.start_run();
        state.phase = GamePhase::GameOver;

        state.reset_to_menu();
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.sleeper.mood, Mood::Sleep);
        assert_eq!(state.sleeper.wake_hits, 0);
        assert!(state.hazards.is_empty());
    }

    #[test]
    fn test_burst_respects_particle_cap() {
        let mut state = GameState::new(7, 800.0, 600.0);
        state.max_particles = 12;
        state.spawn_burst(Vec2::new(10.0, 10.0), Tint::White, 30);
        assert_eq!(state.particles.len(), 12);

        state.max_particles = 0;
        state.particles.clear();
        state.spawn_burst(Vec2::ZERO, Tint::White, 5);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_burst_particle_ranges() {
        let mut state = GameState::new(42, 800.0, 600.0);
        state.spawn_burst(Vec2::new(100.0, 100.0), Tint::Smoke, 200);
        for p in &state.particles {
            assert!(p.vel.x >= -5.0 && p.vel.x < 5.0);
            assert!(p.vel.y >= -5.0 && p.vel.y < 5.0);
            assert!(p.life >= 20.0 && p.life < 40.0);
            assert!(p.size >= 3.0 && p.size < 8.0);
            assert_eq!(p.pos, Vec2::new(100.0, 100.0));
        }
    }

    #[test]
    fn test_floating_text_fades_at_end_of_life() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.add_floating_text(Vec2::ZERO, "+50", Tint::Amber);
        let text = &mut state.texts[0];
        assert_eq!(text.alpha(), 1.0);
        text.life = 10;
        assert!((text.alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_nudge_cooldown() {
        let mut sleeper = Sleeper::new(Vec2::ZERO);
        assert!(sleeper.can_nudge(21));
        assert!(!sleeper.can_nudge(20));
        sleeper.last_nudge_tick = 100;
        assert!(!sleeper.can_nudge(120));
        assert!(sleeper.can_nudge(121));
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.emit(GameEvent::Fed);
        state.emit(GameEvent::Deflected);
        assert_eq!(state.drain_events(), vec![GameEvent::Fed, GameEvent::Deflected]);
        assert!(state.drain_events().is_empty());
    }
}
