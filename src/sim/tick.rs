//! Fixed timestep simulation tick
//!
//! One tick is one 60 Hz frame. Every rate and duration in the simulation is
//! counted in ticks, so the platform layer feeds ticks at a fixed cadence no
//! matter how fast the display refreshes.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::collision::{constrain_shield, hits_shield, hits_sleeper};
use super::state::{
    BOMB_GLYPH, FOOD_GLYPHS, GameEvent, GamePhase, GameState, Hazard, HazardKind, Mood, Tint,
};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in canvas pixels
    pub pointer: Vec2,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    // Shield and wake-up nudges. Waking starts the run; the new phase takes
    // over from the next tick.
    let woke = update_shield(state, input.pointer);

    if !woke {
        match state.phase {
            GamePhase::Playing => update_playing(state),
            GamePhase::Start => update_asleep(state),
            GamePhase::GameOver => {}
        }
    }

    update_effects(state);
}

/// Constrain the shield and register nudges. Returns true if the sleeper woke up.
fn update_shield(state: &mut GameState, pointer: Vec2) -> bool {
    let contact = constrain_shield(state.sleeper.pos, state.sleeper.radius, pointer);
    state.shield = contact.pos;

    if !contact.touching || state.phase != GamePhase::Start {
        return false;
    }
    if !state.sleeper.can_nudge(state.time_ticks) {
        return false;
    }

    state.sleeper.last_nudge_tick = state.time_ticks;
    state.sleeper.wake_hits += 1;
    state.sleeper.mood_timer = NUDGE_SHAKE_TICKS;
    let hits = state.sleeper.wake_hits;
    state.emit(GameEvent::Nudged { hits });

    if state.sleeper.is_awake_enough() {
        state.start_run();
        let above = state.sleeper.pos - Vec2::new(0.0, 80.0);
        state.add_floating_text(above, "I'm Awake!", Tint::Pink);
        state.emit(GameEvent::Woke);
        log::info!("Sleeper woke up after {} nudges", hits);
        return true;
    }

    let shield = state.shield;
    state.spawn_burst(shield, Tint::White, 5);
    state.add_floating_text(shield, "Nudge!", Tint::Amber);
    false
}

fn update_playing(state: &mut GameState) {
    if state.time_ticks % RAMP_INTERVAL_TICKS == 0 {
        state.ramp_steps += 1;
        state.level = state.difficulty.level_at(state.ramp_steps);
        log::debug!("Difficulty level now {:.2}", state.level);
    }

    let interval = state.difficulty.spawn_interval(state.level);
    if state.time_ticks % interval == 0 {
        spawn_hazard(state);
    }

    update_hazards(state);

    if state.sleeper.mood_timer > 0 {
        state.sleeper.mood_timer -= 1;
    } else {
        state.sleeper.mood = Mood::Idle;
    }
}

/// Spawn one hazard on the spawn circle, aimed at the sleeper
pub fn spawn_hazard(state: &mut GameState) {
    let bomb_chance = state.difficulty.bomb_chance(state.level);
    let speed_factor = state.difficulty.speed_factor(state.level);
    let spawn_radius = state.spawn_radius();
    let target = state.sleeper.pos;

    let rng = state.rng();
    let kind = if rng.random::<f32>() < bomb_chance {
        HazardKind::Bomb
    } else {
        HazardKind::Food
    };
    let angle = rng.random::<f32>() * TAU;
    let speed = rng.random_range(HAZARD_SPEED_MIN..HAZARD_SPEED_MAX) * speed_factor;
    let glyph = match kind {
        HazardKind::Bomb => BOMB_GLYPH,
        HazardKind::Food => FOOD_GLYPHS[rng.random_range(0..FOOD_GLYPHS.len())],
    };
    let spin = rng.random_range(-HAZARD_SPIN_MAX..HAZARD_SPIN_MAX);

    let pos = target + polar_to_cartesian(spawn_radius, angle);
    let vel = (target - pos).normalize_or_zero() * speed;

    let id = state.next_entity_id();
    state.hazards.push(Hazard {
        id,
        kind,
        pos,
        vel,
        radius: kind.radius(),
        glyph,
        rotation: 0.0,
        spin,
    });
}

/// Outcome of one hazard this tick
enum Resolution {
    Keep,
    Remove,
    /// Remove, and the run is over
    Fatal,
}

fn update_hazards(state: &mut GameState) {
    let cull_radius = state.cull_radius();
    let mut pending = std::mem::take(&mut state.hazards).into_iter();
    let mut survivors = Vec::with_capacity(pending.len());

    for mut hazard in pending.by_ref() {
        hazard.advance();
        match resolve_hazard(state, &hazard, cull_radius) {
            Resolution::Keep => survivors.push(hazard),
            Resolution::Remove => {}
            Resolution::Fatal => break,
        }
    }
    // Anything left after a fatal hit stays frozen on screen
    survivors.extend(pending);
    state.hazards = survivors;
}

fn resolve_hazard(state: &mut GameState, hazard: &Hazard, cull_radius: f32) -> Resolution {
    if hits_shield(hazard, state.shield) {
        match hazard.kind {
            HazardKind::Bomb => {
                state.spawn_burst(hazard.pos, Tint::Smoke, 15);
                state.add_floating_text(hazard.pos, "+50", Tint::Amber);
                state.score += DEFLECT_POINTS;
                state.emit(GameEvent::Deflected);
            }
            HazardKind::Food => {
                state.spawn_burst(hazard.pos, Tint::Dust, 10);
                state.add_floating_text(hazard.pos, "Oops!", Tint::Gray);
                state.emit(GameEvent::Fizzled);
            }
        }
        return Resolution::Remove;
    }

    if hits_sleeper(hazard, &state.sleeper) {
        return match hazard.kind {
            HazardKind::Food => {
                state.spawn_burst(hazard.pos, Tint::Pink, 8);
                state.add_floating_text(hazard.pos, "Yummy!", Tint::Pink);
                state.score += FEED_POINTS;
                state.sleeper.set_mood(Mood::Eat, EAT_TICKS);
                state.emit(GameEvent::Fed);
                Resolution::Remove
            }
            HazardKind::Bomb => {
                state.spawn_burst(hazard.pos, Tint::Red, 30);
                state.health = state.health.saturating_sub(1);
                state.sleeper.set_mood(Mood::Hurt, HURT_TICKS);
                state.emit(GameEvent::Hurt {
                    health: state.health,
                });
                if state.health == 0 {
                    end_run(state);
                    Resolution::Fatal
                } else {
                    Resolution::Remove
                }
            }
        };
    }

    if hazard.pos.distance(state.sleeper.pos) > cull_radius {
        return Resolution::Remove;
    }
    Resolution::Keep
}

fn end_run(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.emit(GameEvent::GameOver {
        score: state.score,
        difficulty: state.difficulty,
    });
    log::info!(
        "Run over on {} with {} points",
        state.difficulty.label(),
        state.score
    );
}

fn update_asleep(state: &mut GameState) {
    if state.time_ticks % SNORE_INTERVAL_TICKS == 0 {
        let pos = state.sleeper.pos + Vec2::new(40.0, -40.0);
        state.add_floating_text(pos, "Zzz...", Tint::White);
    }

    if state.sleeper.mood_timer > 0 {
        state.sleeper.mood_timer -= 1;
        let rng = state.rng();
        let shake = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0 * SHAKE_AMPLITUDE,
            (rng.random::<f32>() - 0.5) * 2.0 * SHAKE_AMPLITUDE,
        );
        state.sleeper.shake = shake;
    } else {
        state.sleeper.shake = Vec2::ZERO;
    }
}

/// Particles and floating texts animate in every phase
fn update_effects(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= 1.0;
        particle.size *= PARTICLE_SHRINK;
    }
    state.particles.retain(|p| p.life > 0.0);

    for text in state.texts.iter_mut() {
        text.pos.y += text.rise;
        text.life = text.life.saturating_sub(1);
    }
    state.texts.retain(|t| t.life > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Difficulty;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn centre() -> Vec2 {
        Vec2::new(W / 2.0, H / 2.0)
    }

    /// Pointer far away in a corner so the shield never interferes
    fn away() -> TickInput {
        TickInput {
            pointer: Vec2::new(5.0, 5.0),
        }
    }

    /// Pointer resting inside the sleeper (above the centre)
    fn pressing() -> TickInput {
        TickInput {
            pointer: centre() - Vec2::new(0.0, 30.0),
        }
    }

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, W, H);
        state.start_run();
        state
    }

    fn hazard(state: &mut GameState, kind: HazardKind, pos: Vec2, vel: Vec2) {
        let id = state.next_entity_id();
        state.hazards.push(Hazard {
            id,
            kind,
            pos,
            vel,
            radius: kind.radius(),
            glyph: BOMB_GLYPH,
            rotation: 0.0,
            spin: 0.05,
        });
    }

    #[test]
    fn test_shield_tracks_pointer() {
        let mut state = GameState::new(1, W, H);
        tick(&mut state, &away());
        assert_eq!(state.shield, Vec2::new(5.0, 5.0));

        tick(&mut state, &pressing());
        let expected_y = H / 2.0 - SLEEPER_RADIUS - SHIELD_RADIUS;
        assert!((state.shield.y - expected_y).abs() < 1e-3);
    }

    #[test]
    fn test_nudges_are_debounced() {
        let mut state = GameState::new(1, W, H);
        // Keep pressing for 21 ticks: only one nudge registers (on tick 21)
        for _ in 0..21 {
            tick(&mut state, &pressing());
        }
        assert_eq!(state.sleeper.wake_hits, 1);
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::Nudged { hits: 1 }]);
        assert!(state.texts.iter().any(|t| t.text == "Nudge!"));

        // Another 20 ticks: still debounced
        for _ in 0..20 {
            tick(&mut state, &pressing());
        }
        assert_eq!(state.sleeper.wake_hits, 1);
        tick(&mut state, &pressing());
        assert_eq!(state.sleeper.wake_hits, 2);
    }

    #[test]
    fn test_nudge_shakes_sleeper() {
        let mut state = GameState::new(3, W, H);
        for _ in 0..21 {
            tick(&mut state, &pressing());
        }
        // Set on the nudge and counted down in the same tick
        assert_eq!(state.sleeper.mood_timer, NUDGE_SHAKE_TICKS - 1);
        tick(&mut state, &away());
        assert_eq!(state.sleeper.mood_timer, NUDGE_SHAKE_TICKS - 2);
        assert!(state.sleeper.shake.x.abs() <= SHAKE_AMPLITUDE);
        assert!(state.sleeper.shake.y.abs() <= SHAKE_AMPLITUDE);

        for _ in 0..NUDGE_SHAKE_TICKS {
            tick(&mut state, &away());
        }
        assert_eq!(state.sleeper.shake, Vec2::ZERO);
        assert_eq!(state.sleeper.mood, Mood::Sleep);
    }

    #[test]
    fn test_five_nudges_wake_and_start_run() {
        let mut state = GameState::new(1, W, H);
        state.select_difficulty(Difficulty::Hard);
        let mut ticks = 0;
        while state.phase == GamePhase::Start && ticks < 1000 {
            tick(&mut state, &pressing());
            ticks += 1;
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(ticks, 21 * WAKE_HITS_REQUIRED as usize);
        assert_eq!(state.difficulty, Difficulty::Hard);
        assert_eq!(state.sleeper.mood, Mood::Idle);
        assert_eq!(state.time_ticks, 0);

        let events = state.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::Woke));
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::Nudged { .. })).count(),
            WAKE_HITS_REQUIRED as usize
        );
        // The wake-up message survives the run reset, 80px above the sleeper
        // and already one tick into its rise
        let awake = state
            .texts
            .iter()
            .find(|t| t.text == "I'm Awake!")
            .expect("wake-up text");
        assert_eq!(awake.pos, centre() - Vec2::new(0.0, 80.0 - FLOATING_TEXT_RISE));
        assert_eq!(awake.life, FLOATING_TEXT_LIFE - 1);
    }

    #[test]
    fn test_pressing_while_playing_does_not_nudge() {
        let mut state = playing_state(1);
        for _ in 0..50 {
            tick(&mut state, &pressing());
        }
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Nudged { .. }))
        );
    }

    #[test]
    fn test_snores_while_asleep() {
        let mut state = GameState::new(1, W, H);
        for _ in 0..60 {
            tick(&mut state, &away());
        }
        let zzz: Vec<_> = state.texts.iter().filter(|t| t.text == "Zzz...").collect();
        assert_eq!(zzz.len(), 1);
        // Spawned at (+40, -40) this tick, then drifted up by one pixel
        let expected = centre() + Vec2::new(40.0, -41.0);
        assert!((zzz[0].pos - expected).length() < 1e-3);
    }

    #[test]
    fn test_spawn_cadence_follows_difficulty() {
        let mut state = playing_state(5);
        let interval = state.difficulty.spawn_interval(state.level);
        for _ in 0..interval - 1 {
            tick(&mut state, &away());
        }
        assert!(state.hazards.is_empty());
        tick(&mut state, &away());
        assert_eq!(state.hazards.len(), 1);
    }

    #[test]
    fn test_spawned_hazard_aims_at_sleeper() {
        let mut state = playing_state(11);
        for _ in 0..50 {
            spawn_hazard(&mut state);
        }
        let factor = state.difficulty.speed_factor(state.level);
        for h in &state.hazards {
            let dist = h.pos.distance(state.sleeper.pos);
            assert!((dist - state.spawn_radius()).abs() < 0.5);
            let to_centre = (state.sleeper.pos - h.pos).normalize();
            assert!(h.vel.normalize().dot(to_centre) > 0.999);
            let speed = h.vel.length();
            assert!(speed >= HAZARD_SPEED_MIN * factor - 1e-3);
            assert!(speed < HAZARD_SPEED_MAX * factor + 1e-3);
            assert!(h.spin.abs() <= HAZARD_SPIN_MAX);
            assert_eq!(h.radius, h.kind.radius());
            match h.kind {
                HazardKind::Bomb => assert_eq!(h.glyph, BOMB_GLYPH),
                HazardKind::Food => assert!(FOOD_GLYPHS.contains(&h.glyph)),
            }
        }
    }

    #[test]
    fn test_level_ramps_every_interval() {
        let mut state = GameState::new(2, W, H);
        state.select_difficulty(Difficulty::Easy);
        state.start_run();
        for _ in 0..RAMP_INTERVAL_TICKS {
            state.hazards.clear();
            tick(&mut state, &away());
        }
        let ramp = state.difficulty.tuning().ramp_rate;
        assert_eq!(state.ramp_steps, 1);
        assert!((state.level - (1.0 + ramp)).abs() < 1e-6);
    }

    #[test]
    fn test_hard_interval_after_ten_ramps() {
        let mut state = GameState::new(4, W, H);
        state.select_difficulty(Difficulty::Hard);
        state.start_run();
        for _ in 0..RAMP_INTERVAL_TICKS * 10 {
            state.hazards.clear();
            state.health = MAX_HEALTH;
            tick(&mut state, &away());
        }
        assert_eq!(state.ramp_steps, 10);
        assert_eq!(state.level, 5.0);
        // max(15, 40 - 5 * 4)
        assert_eq!(state.difficulty.spawn_interval(state.level), 20);
    }

    #[test]
    fn test_food_reaching_sleeper_scores() {
        let mut state = playing_state(1);
        let pos = centre() + Vec2::new(70.0, 0.0);
        hazard(&mut state, HazardKind::Food, pos, Vec2::new(-5.0, 0.0));
        tick(&mut state, &away());

        assert!(state.hazards.is_empty());
        assert_eq!(state.score, FEED_POINTS);
        assert_eq!(state.sleeper.mood, Mood::Eat);
        assert!(state.drain_events().contains(&GameEvent::Fed));
        assert!(state.texts.iter().any(|t| t.text == "Yummy!"));
    }

    #[test]
    fn test_bomb_on_shield_scores() {
        let mut state = playing_state(1);
        let shield_pos = Vec2::new(100.0, 100.0);
        hazard(&mut state, HazardKind::Bomb, Vec2::new(150.0, 100.0), Vec2::new(-5.0, 0.0));
        tick(&mut state, &TickInput { pointer: shield_pos });

        assert!(state.hazards.is_empty());
        assert_eq!(state.score, DEFLECT_POINTS);
        assert_eq!(state.health, MAX_HEALTH);
        assert!(state.drain_events().contains(&GameEvent::Deflected));
        assert_eq!(state.particles.len(), 15);
    }

    #[test]
    fn test_food_on_shield_is_lost() {
        let mut state = playing_state(1);
        hazard(&mut state, HazardKind::Food, Vec2::new(140.0, 100.0), Vec2::ZERO);
        tick(&mut state, &TickInput { pointer: Vec2::new(100.0, 100.0) });

        assert!(state.hazards.is_empty());
        assert_eq!(state.score, 0);
        assert!(state.drain_events().contains(&GameEvent::Fizzled));
        assert!(state.texts.iter().any(|t| t.text == "Oops!"));
    }

    #[test]
    fn test_shield_checked_before_sleeper() {
        let mut state = playing_state(1);
        // Bomb overlapping both the clamped shield and the sleeper hitbox
        let shield_pointer = centre() - Vec2::new(0.0, 10.0);
        let bomb_pos = centre() - Vec2::new(0.0, 70.0);
        hazard(&mut state, HazardKind::Bomb, bomb_pos, Vec2::ZERO);
        tick(&mut state, &TickInput { pointer: shield_pointer });

        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.score, DEFLECT_POINTS);
    }

    #[test]
    fn test_bomb_hurts_and_ends_run() {
        let mut state = playing_state(1);
        for expected in (0..MAX_HEALTH).rev() {
            hazard(&mut state, HazardKind::Bomb, centre() + Vec2::new(60.0, 0.0), Vec2::ZERO);
            tick(&mut state, &away());
            assert_eq!(state.health, expected);
            assert_eq!(state.sleeper.mood, Mood::Hurt);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 0,
            difficulty: Difficulty::Medium
        }));
    }

    #[test]
    fn test_fatal_hit_freezes_remaining_hazards() {
        let mut state = playing_state(1);
        state.health = 1;
        hazard(&mut state, HazardKind::Bomb, centre() + Vec2::new(60.0, 0.0), Vec2::ZERO);
        hazard(&mut state, HazardKind::Bomb, centre() - Vec2::new(60.0, 0.0), Vec2::ZERO);
        let far = Vec2::new(5000.0, 5000.0);
        hazard(&mut state, HazardKind::Food, far, Vec2::new(1.0, 0.0));

        tick(&mut state, &away());
        assert_eq!(state.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        // The second bomb and the far food were not processed
        assert_eq!(state.hazards.len(), 2);
        assert_eq!(state.hazards[1].pos, far);

        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);

        // Hazards stay frozen after game over
        tick(&mut state, &away());
        assert_eq!(state.hazards[1].pos, far);
    }

    #[test]
    fn test_far_hazards_are_culled() {
        let mut state = playing_state(1);
        let far = state.sleeper.pos + Vec2::new(state.cull_radius() + 10.0, 0.0);
        hazard(&mut state, HazardKind::Food, far, Vec2::new(1.0, 0.0));
        tick(&mut state, &away());
        assert!(state.hazards.is_empty());
        assert_eq!(state.score, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_mood_returns_to_idle() {
        let mut state = playing_state(1);
        state.sleeper.set_mood(Mood::Eat, 2);
        tick(&mut state, &away());
        tick(&mut state, &away());
        assert_eq!(state.sleeper.mood, Mood::Eat);
        tick(&mut state, &away());
        assert_eq!(state.sleeper.mood, Mood::Idle);
    }

    #[test]
    fn test_hurt_mood_lasts_its_duration() {
        let mut state = playing_state(1);
        hazard(&mut state, HazardKind::Bomb, centre() + Vec2::new(60.0, 0.0), Vec2::ZERO);
        tick(&mut state, &away());
        assert_eq!(state.sleeper.mood, Mood::Hurt);

        for _ in 1..HURT_TICKS {
            state.hazards.clear();
            tick(&mut state, &away());
        }
        assert_eq!(state.sleeper.mood, Mood::Hurt);

        state.hazards.clear();
        tick(&mut state, &away());
        assert_eq!(state.sleeper.mood, Mood::Idle);
    }

    #[test]
    fn test_hazards_spin_every_tick() {
        let mut state = playing_state(1);
        hazard(&mut state, HazardKind::Food, centre() + Vec2::new(300.0, 0.0), Vec2::ZERO);
        let spin = state.hazards[0].spin;
        for _ in 0..3 {
            tick(&mut state, &away());
        }
        let h = state.hazards.iter().find(|h| h.kind == HazardKind::Food && h.vel == Vec2::ZERO);
        let h = h.expect("stationary food");
        assert!((h.rotation - spin * 3.0).abs() < 1e-6);
        assert_eq!(h.pos, centre() + Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_effects_decay() {
        let mut state = GameState::new(9, W, H);
        state.spawn_burst(Vec2::new(10.0, 10.0), Tint::Red, 20);
        state.add_floating_text(Vec2::new(50.0, 50.0), "+50", Tint::Amber);
        let size_before = state.particles[0].size;

        tick(&mut state, &away());
        assert!((state.particles[0].size - size_before * PARTICLE_SHRINK).abs() < 1e-4);
        assert_eq!(state.texts[0].pos.y, 49.0);
        assert_eq!(state.texts[0].life, FLOATING_TEXT_LIFE - 1);

        for _ in 0..FLOATING_TEXT_LIFE {
            tick(&mut state, &away());
        }
        assert!(state.particles.is_empty());
        assert!(state.texts.iter().all(|t| t.text == "Zzz..."));
    }

    #[test]
    fn test_determinism() {
        let mut a = playing_state(99999);
        let mut b = playing_state(99999);
        for i in 0..600 {
            let input = TickInput {
                pointer: Vec2::new((i * 7 % 800) as f32, (i * 13 % 600) as f32),
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.health, b.health);
        assert_eq!(a.hazards.len(), b.hazards.len());
        for (x, y) in a.hazards.iter().zip(&b.hazards) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.kind, y.kind);
        }
    }
}
