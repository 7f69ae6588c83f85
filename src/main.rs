//! Grid Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Event, HtmlCanvasElement, KeyboardEvent};

    use glam::Vec2;
    use grid_snake::consts::*;
    use grid_snake::highscores::LocalStorageScoreLog;
    use grid_snake::platform::{EventQueue, FixedStep, InputEvent, InputSource, Key, tick_input};
    use grid_snake::renderer::vertex::Vertex;
    use grid_snake::renderer::{Canvas, Palette, RenderState, Renderer, Rgb, shapes};
    use grid_snake::sim::{GameState, ScreenRect};
    use grid_snake::{ExitReason, Flow, Session, Settings};

    /// Maximum ticks run per animation frame
    const MAX_SUBSTEPS: u32 = 4;

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    /// Quads go to the GPU, text goes to DOM overlays
    struct WebCanvas {
        render_state: RenderState,
        vertices: Vec<Vertex>,
        clear_color: [f32; 4],
        hud: String,
        message: String,
    }

    impl Canvas for WebCanvas {
        type Error = wgpu::SurfaceError;

        fn clear(&mut self, color: Rgb) -> Result<(), Self::Error> {
            self.vertices.clear();
            self.clear_color = color.to_linear_rgba();
            Ok(())
        }

        fn draw_rect(&mut self, rect: ScreenRect, color: Rgb) -> Result<(), Self::Error> {
            self.vertices
                .extend_from_slice(&shapes::quad(rect, color.to_linear_rgba()));
            Ok(())
        }

        fn draw_text(&mut self, message: &str, _color: Rgb, center: Vec2) -> Result<(), Self::Error> {
            if center.y >= SCREEN_HEIGHT as f32 {
                self.hud = message.to_string();
            } else {
                self.message = message.to_string();
            }
            Ok(())
        }

        fn present_frame(&mut self) -> Result<(), Self::Error> {
            set_text("hud", &std::mem::take(&mut self.hud));
            set_text("message", &std::mem::take(&mut self.message));
            self.render_state.render(&self.vertices, self.clear_color)
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorageScoreLog>,
        renderer: Renderer,
        canvas: WebCanvas,
        step: FixedStep,
        last_time: f64,
        queue: EventQueue,
        running: bool,
    }

    impl Game {
        /// Run due simulation ticks
        fn update(&mut self, dt: f32) {
            for _ in 0..self.step.advance(dt) {
                let Ok(events) = self.queue.poll_events();
                match self.session.step(&tick_input(&events)) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit(reason)) => {
                        log::info!("Game over: {:?}", reason);
                        self.running = false;
                        break;
                    }
                    Err(e) => {
                        log::error!("Score log error: {e}");
                        self.running = false;
                        break;
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            match self.renderer.render(&self.session.view(), &mut self.canvas) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.canvas.render_state.size;
                    self.canvas.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
            if self.session.exit_reason() == Some(ExitReason::Quit) {
                set_text("message", "Result saved. Reload to play again.");
            }
        }

        /// Quit immediately, saving the current length. Used when the page
        /// is going away and no further frame will run.
        fn quit_now(&mut self) {
            if !self.running {
                return;
            }
            self.running = false;
            match self.session.quit() {
                Ok(_) => log::info!("Page closed, length {} saved", self.session.length()),
                Err(e) => log::error!("Score log error: {e}"),
            }
        }

        /// Back from a hidden tab: no catch-up ticks, repaint from scratch
        fn resume(&mut self) {
            self.step.reset();
            self.last_time = 0.0;
            self.renderer.invalidate();
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Grid Snake starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let session = Session::new(GameState::new(seed), LocalStorageScoreLog, settings.nickname.clone())
            .map_err(js_err)?;
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let view = Vec2::new(SCREEN_WIDTH as f32, (SCREEN_HEIGHT + STATUS_BAR_HEIGHT) as f32);
        let render_state = RenderState::new(surface, &adapter, width, height, view)
            .await
            .map_err(js_err)?;

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer: Renderer::new(Palette::for_settings(&settings), settings.cell_borders),
            canvas: WebCanvas {
                render_state,
                vertices: Vec::new(),
                clear_color: [0.0, 0.0, 0.0, 1.0],
                hud: String::new(),
                message: String::new(),
            },
            step: FixedStep::new(1.0 / TICKS_PER_SECOND as f32, MAX_SUBSTEPS),
            last_time: 0.0,
            queue: EventQueue::default(),
            running: true,
        }));

        setup_input_handlers(game.clone())?;
        request_animation_frame(game);

        log::info!("Grid Snake running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let g = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = Key::from_web(&event.key());
            if key.direction().is_some() {
                // Keep arrow keys from scrolling the page
                event.prevent_default();
            }
            g.borrow_mut().queue.push(InputEvent::KeyDown(key));
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();

        // Closing or reloading the tab counts as quitting
        let g = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_: Event| {
            if let Ok(mut game) = g.try_borrow_mut() {
                game.quit_now();
            }
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();

        let closure = Closure::<dyn FnMut(_)>::new(move |_: Event| {
            let hidden = web_sys::window()
                .and_then(|w| w.document())
                .is_some_and(|d| d.hidden());
            if !hidden {
                if let Ok(mut game) = game.try_borrow_mut() {
                    game.resume();
                }
            }
        });
        document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
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
        let running = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.running
        };

        if running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use grid_snake::renderer::{Palette, Renderer};
    use grid_snake::sim::GameState;
    use grid_snake::{ExitReason, FileScoreLog, Session, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    log::info!("Grid Snake (native) starting...");

    let settings = Settings::load().context("loading settings")?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Game initialized with seed: {}", seed);

    let score_log = FileScoreLog::new(&settings.score_file);
    let mut session = Session::new(GameState::new(seed), score_log, settings.nickname.clone())
        .with_context(|| format!("reading score log {}", settings.score_file.display()))?;
    let mut renderer = Renderer::new(Palette::for_settings(&settings), settings.cell_borders);

    let reason = grid_snake::platform::play(&mut session, &mut renderer)?;

    match reason {
        ExitReason::Won => println!("Congratulations, you won! Length {}", session.length()),
        ExitReason::Quit => println!("Length {}, best {}", session.length(), session.best()),
    }
    Ok(())
}
