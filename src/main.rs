//! Crypt Flight entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use crypt_flight::audio::{AudioManager, SoundEffect};
    use crypt_flight::consts::*;
    use crypt_flight::highscore::{LocalStore, ScoreStore};
    use crypt_flight::renderer::{RenderState, Vertex, build_scene};
    use crypt_flight::settings::Settings;
    use crypt_flight::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// Duration of the restart wipe transition
    const WIPE_SECS: f32 = 0.4;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        store: LocalStore,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Restart transition; counts down from 1 as the wipe slides off
        wipe: f32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let store = LocalStore::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(seed, store.get()),
                render_state: None,
                audio,
                store,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                wipe: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks and react to what happened
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Tap is one-shot: exactly one tick sees it
                self.input.tap = false;
            }

            if self.settings.reduced_motion {
                self.state.particles.clear();
            }
            if self.wipe > 0.0 {
                self.wipe = (self.wipe - dt / WIPE_SECS).max(0.0);
            }

            for event in self.state.drain_events() {
                self.handle_event(event);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::GameStarted => {
                    // Audio context needs the user gesture that started us
                    self.audio.resume();
                    self.audio.start_music();
                }
                GameEvent::Jumped | GameEvent::ObstaclesSpawned => {}
                GameEvent::GateScored => self.audio.play(SoundEffect::Score),
                GameEvent::PlayerDied { score } => {
                    self.audio.play(SoundEffect::Explosion);
                    self.audio.stop_music();
                    self.store.set_if_higher(score);
                }
                GameEvent::NewHighScore { score } => {
                    log::info!("New high score: {score}");
                }
                GameEvent::Restarted => {
                    log::info!("Run restarted (seed {})", self.state.seed);
                    self.wipe = 1.0;
                    // The restart tap is a user gesture, so audio may resume
                    self.audio.resume();
                    self.audio.start_music();
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let mut vertices = build_scene(&self.state);
            if self.wipe > 0.0 {
                push_wipe(&mut vertices, self.wipe);
            }
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&format!("SCORE: {}", self.state.score)));
            }

            if let Some(el) = document.get_element_by_id("hud-best") {
                if self.state.high_score_visible {
                    el.set_text_content(Some(&format!("HIGHSCORE: {}", self.state.high_score)));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::Dead {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Crypt Flight starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_mute_on_blur(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Crypt Flight running!");
    }

    /// Dark quad covering the field at `wipe = 1`, sliding out to the left
    /// as it counts down
    fn push_wipe(verts: &mut Vec<Vertex>, wipe: f32) {
        let offset = (1.0 - wipe) * FIELD_WIDTH;
        let (l, r) = (-offset, FIELD_WIDTH - offset);
        let color = [0.02, 0.02, 0.04, 1.0];
        verts.extend_from_slice(&[
            Vertex::new(l, 0.0, color),
            Vertex::new(r, 0.0, color),
            Vertex::new(r, FIELD_HEIGHT, color),
            Vertex::new(l, 0.0, color),
            Vertex::new(r, FIELD_HEIGHT, color),
            Vertex::new(l, FIELD_HEIGHT, color),
        ]);
    }

    /// Attach a leaked event listener. Every handler lives for the page
    /// lifetime, so `forget` is the intended ownership model here.
    fn listen<E>(target: &web_sys::EventTarget, kind: &str, handler: impl FnMut(E) + 'static)
    where
        dyn FnMut(E): wasm_bindgen::closure::WasmClosure,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let tap = {
            let game = game.clone();
            move || game.borrow_mut().input.tap = true
        };

        {
            let tap = tap.clone();
            listen(canvas, "mousedown", move |_: MouseEvent| tap());
        }
        {
            let tap = tap.clone();
            listen(canvas, "touchstart", move |event: TouchEvent| {
                event.prevent_default();
                tap();
            });
        }

        // Keyboard - the whole input surface is one binary tap
        let window = web_sys::window().unwrap();
        listen(&window, "keydown", move |event: web_sys::KeyboardEvent| {
            if matches!(event.key().as_str(), " " | "Enter" | "ArrowUp") {
                tap();
            }
        });
    }

    fn setup_mute_on_blur(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Tab switch or minimize
        {
            let game = game.clone();
            let document_clone = document.clone();
            listen(&document, "visibilitychange", move |_: web_sys::Event| {
                let hidden =
                    document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(hidden);
                }
            });
        }

        {
            let game = game.clone();
            listen(&window, "blur", move |_: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
        }
        listen(&window, "focus", move |_: web_sys::FocusEvent| {
            game.borrow_mut().audio.set_muted(false);
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
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

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use crypt_flight::consts::SIM_DT;
    use crypt_flight::highscore::{MemoryStore, ScoreStore};
    use crypt_flight::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Crypt Flight (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Smoke-run a short scripted session so the binary does something useful
    let mut store = MemoryStore::new();
    let mut state = GameState::new(0xC4F7, store.get());
    tick(&mut state, &TickInput { tap: true }, SIM_DT);
    for i in 0..2400u32 {
        let input = TickInput { tap: i % 45 == 0 };
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            if let GameEvent::PlayerDied { score } = event {
                store.set_if_higher(score);
            }
            log::debug!("{event:?}");
        }
    }

    println!(
        "Simulated 20s: phase {:?}, score {}, best {}, rows spawned {}",
        state.phase,
        state.score,
        store.get(),
        state.rows_spawned
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
