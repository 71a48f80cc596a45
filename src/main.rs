//! Snack Shield entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use glam::Vec2;
    use snack_shield::audio::{AudioManager, SoundEffect};
    use snack_shield::consts::*;
    use snack_shield::renderer::CanvasRenderer;
    use snack_shield::sim::{Difficulty, GameEvent, GamePhase, GameState, TickInput, tick};
    use snack_shield::{HighScores, QualityPreset, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        high_scores: HighScores,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Last finished run beat the tier's record
        new_record: bool,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer) -> Self {
            let (w, h) = renderer.fit_to_client();
            let settings = Settings::load();
            let high_scores = HighScores::load();

            let mut state = GameState::new(seed, w, h);
            state.select_difficulty(settings.difficulty);
            state.max_particles = settings.max_particles();

            let mut audio = AudioManager::new();
            audio.configure(&settings);

            Self {
                state,
                renderer,
                audio,
                settings,
                high_scores,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput {
                    pointer: Vec2::new(w / 2.0, h),
                },
                new_record: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in self.state.drain_events() {
                    self.handle_event(event);
                }
            }
            // Drop time we couldn't catch up on
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            self.audio.play(SoundEffect::for_event(&event));

            if let GameEvent::GameOver { score, difficulty } = event {
                self.new_record = self.high_scores.record(difficulty, score);
                if self.new_record {
                    log::info!("New {} record: {}", difficulty.label(), score);
                    self.high_scores.save();
                    self.audio.play(SoundEffect::HighScore);
                }
            }
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            if let Err(e) = self
                .renderer
                .render(&self.state, time, self.settings.effective_shake())
            {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn resize(&mut self) {
            let (w, h) = self.renderer.fit_to_client();
            self.state.resize(w, h);
        }

        fn set_pointer(&mut self, client_x: f32, client_y: f32) {
            let rect = self.renderer.canvas().get_bounding_client_rect();
            self.input.pointer = Vec2::new(client_x - rect.left() as f32, client_y - rect.top() as f32);
        }

        fn select_difficulty(&mut self, difficulty: Difficulty) {
            if self.state.select_difficulty(difficulty) && self.settings.difficulty != difficulty {
                self.settings.difficulty = difficulty;
                self.settings.save();
                log::info!("Difficulty set to {}", difficulty.label());
            }
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.configure(&self.settings);
            self.settings.save();
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        }

        fn cycle_quality(&mut self) {
            let next = match self.settings.quality {
                QualityPreset::Low => QualityPreset::Medium,
                QualityPreset::Medium => QualityPreset::High,
                QualityPreset::High => QualityPreset::Low,
            };
            self.settings.apply_preset(next);
            self.state.max_particles = self.settings.max_particles();
            self.settings.save();
            log::info!("Quality set to {}", next.as_str());
        }

        fn back_to_menu(&mut self) {
            if self.state.phase == GamePhase::GameOver {
                self.state.reset_to_menu();
                self.new_record = false;
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.state.phase;
            let difficulty = self.state.difficulty;
            let best = self.high_scores.best(difficulty);

            show(&document, "hud", phase != GamePhase::Start);
            set_text(&document, "hud-score", &self.state.score.to_string());
            set_text(&document, "hud-difficulty", difficulty.as_str());
            for i in 0..MAX_HEALTH {
                if let Some(el) = document.get_element_by_id(&format!("heart-{}", i)) {
                    let class = if i < self.state.health { "heart full" } else { "heart empty" };
                    let _ = el.set_attribute("class", class);
                }
            }

            // Start screen
            show(&document, "start-screen", phase == GamePhase::Start);
            if phase == GamePhase::Start {
                set_text(&document, "start-highscore", &best.to_string());
                set_text(&document, "difficulty-description", difficulty.description());
                let hits = self.state.sleeper.wake_hits.min(WAKE_HITS_REQUIRED);
                let pct = hits as f32 / WAKE_HITS_REQUIRED as f32 * 100.0;
                if let Some(bar) = document.get_element_by_id("wake-progress-bar") {
                    let _ = bar.set_attribute("style", &format!("width: {:.0}%", pct));
                    let _ = bar.set_attribute("class", &format!("progress-fill {}", difficulty.as_str().to_lowercase()));
                }
                set_text(
                    &document,
                    "wake-progress-text",
                    &format!("{} / {} Nudges", hits, WAKE_HITS_REQUIRED),
                );
                for d in Difficulty::ALL {
                    if let Some(btn) = document.get_element_by_id(&format!("difficulty-{}", d.as_str().to_lowercase())) {
                        let class = if d == difficulty {
                            "difficulty-btn selected"
                        } else {
                            "difficulty-btn"
                        };
                        let _ = btn.set_attribute("class", class);
                    }
                }
            }

            // Game over
            show(&document, "game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                set_text(&document, "final-score", &self.state.score.to_string());
                set_text(&document, "best-score", &best.to_string());
                set_text(&document, "final-difficulty", difficulty.as_str());
                show(&document, "new-record", self.new_record);
            }
        }
    }

    /// Toggle the `hidden` class, keeping any other classes
    fn show(document: &Document, id: &str, visible: bool) {
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };
        let current = el.get_attribute("class").unwrap_or_default();
        let mut classes: Vec<&str> = current
            .split_whitespace()
            .filter(|c| *c != "hidden")
            .collect();
        if !visible {
            classes.push("hidden");
        }
        let class = classes.join(" ");
        if class != current {
            let _ = el.set_attribute("class", &class);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Snack Shield starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let renderer = CanvasRenderer::new(canvas.clone())?;
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("Snack Shield running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .set_pointer(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - audio needs a user gesture to start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow().audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move / start
        for name in ["touchmove", "touchstart"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.set_pointer(touch.client_x() as f32, touch.client_y() as f32);
                    if event.type_() == "touchstart" {
                        g.audio.resume();
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let current = g.state.difficulty;
                match event.key().as_str() {
                    "1" => g.select_difficulty(Difficulty::Easy),
                    "2" => g.select_difficulty(Difficulty::Medium),
                    "3" => g.select_difficulty(Difficulty::Hard),
                    "ArrowUp" | "ArrowLeft" => g.select_difficulty(current.prev()),
                    "ArrowDown" | "ArrowRight" => g.select_difficulty(current.next()),
                    "m" | "M" => g.toggle_mute(),
                    "q" | "Q" => g.cycle_quality(),
                    " " | "Enter" => g.back_to_menu(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Ok(buttons) = document.query_selector_all("[data-difficulty]") {
            for i in 0..buttons.length() {
                let Some(btn) = buttons.item(i) else { continue };
                let Some(difficulty) = btn
                    .dyn_ref::<web_sys::Element>()
                    .and_then(|el| el.get_attribute("data-difficulty"))
                    .and_then(|value| Difficulty::from_str(&value))
                else {
                    log::warn!("Ignoring tier button without a valid data-difficulty");
                    continue;
                };
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().select_difficulty(difficulty);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().back_to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().toggle_mute();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Snack Shield failed to start: {:?}", e);
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snack Shield (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless::run(0x5eed, 600 * 60);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted off-browser run to smoke-test the simulation
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use snack_shield::consts::SLEEPER_RADIUS;
    use snack_shield::sim::{GameEvent, GamePhase, GameState, HazardKind, TickInput, tick};

    /// Press into the sleeper while asleep, then chase the closest bomb
    fn scripted_pointer(state: &GameState) -> Vec2 {
        let center = state.sleeper.pos;
        match state.phase {
            GamePhase::Start => center - Vec2::new(0.0, SLEEPER_RADIUS * 0.5),
            _ => state
                .hazards
                .iter()
                .filter(|h| h.kind == HazardKind::Bomb)
                .min_by(|a, b| {
                    a.pos
                        .distance(center)
                        .partial_cmp(&b.pos.distance(center))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|bomb| bomb.pos)
                .unwrap_or(center + Vec2::new(200.0, 0.0)),
        }
    }

    pub fn run(seed: u64, max_ticks: u64) {
        let mut state = GameState::new(seed, 800.0, 600.0);
        let mut fed = 0;
        let mut deflected = 0;

        for _ in 0..max_ticks {
            let input = TickInput {
                pointer: scripted_pointer(&state),
            };
            tick(&mut state, &input);

            for event in state.drain_events() {
                match event {
                    GameEvent::Woke => log::info!("Sleeper is awake"),
                    GameEvent::Fed => fed += 1,
                    GameEvent::Deflected => deflected += 1,
                    GameEvent::Hurt { health } => log::info!("Ouch! health {}", health),
                    GameEvent::GameOver { score, difficulty } => {
                        log::info!("Game over on {} with {} points", difficulty.label(), score);
                    }
                    _ => {}
                }
            }
            if state.phase == GamePhase::GameOver {
                break;
            }
        }

        log::info!(
            "Headless run finished: score {}, health {}, fed {}, deflected {}",
            state.score,
            state.health,
            fed,
            deflected
        );
    }
}
