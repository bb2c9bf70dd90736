//! Lane Duel entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, PointerEvent};

    use glam::Vec2;
    use lane_duel::consts::*;
    use lane_duel::sim::{self, GameState, PointerPhase, tick};
    use lane_duel::{FrameSnapshot, Settings};

    // Drawing lives on the page; it receives one JSON snapshot per frame
    #[wasm_bindgen(inline_js = "
        export function draw_frame(json) {
            if (typeof window.laneDuelDraw === 'function') {
                window.laneDuelDraw(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn draw_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        canvas: HtmlCanvasElement,
        accumulator: f64,
        last_time: f64,
    }

    impl Game {
        fn new(settings: Settings, canvas: HtmlCanvasElement) -> Self {
            Self {
                state: GameState::new(settings),
                canvas,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Viewport position to canvas-local coordinates
        fn local_pos(&self, event: &PointerEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            )
        }

        /// Forward a DOM pointer event to the gesture interpreter
        fn pointer(&mut self, event: &PointerEvent, phase: PointerPhase) {
            let pos = self.local_pos(event);
            let input = sim::PointerEvent::new(event.pointer_id(), phase, pos);
            let outcome = sim::handle_pointer(&mut self.state, &input);
            if !matches!(outcome, sim::GestureOutcome::Ignored | sim::GestureOutcome::Moved) {
                log::debug!("{:?}", outcome);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f64) {
            let dt_ms = dt_ms.min(100.0);
            self.accumulator += dt_ms;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        /// Hand the current frame to the page
        fn render(&self) {
            match FrameSnapshot::capture(&self.state).to_json() {
                Ok(json) => draw_frame(&json),
                Err(e) => log::warn!("Snapshot failed: {}", e),
            }
        }

        fn restart(&mut self) {
            self.state.reset();
            self.accumulator = 0.0;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Lane Duel starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings, canvas.clone())));

        setup_pointer_handlers(&canvas, game.clone());
        setup_reset_button(game.clone());

        request_animation_frame(game);

        log::info!("Lane Duel running!");
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down - capture so move/up keep arriving outside the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                game.borrow_mut().pointer(&event, PointerPhase::Down);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut().pointer(&event, PointerPhase::Move);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up / cancel - capture may already be gone, that's fine
        let releases = [
            ("pointerup", PointerPhase::Up),
            ("pointercancel", PointerPhase::Cancel),
        ];
        for (name, phase) in releases {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let _ = canvas_clone.release_pointer_capture(event.pointer_id());
                game.borrow_mut().pointer(&event, phase);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
                time - g.last_time
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_reset_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
                log::info!("Game reset");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Duel (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    run_scripted_duel();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one placement and one attack with synthetic pointer input
#[cfg(not(target_arch = "wasm32"))]
fn run_scripted_duel() {
    use glam::Vec2;
    use lane_duel::consts::SIM_DT_MS;
    use lane_duel::sim::{GameState, Owner, PointerEvent, PointerPhase, handle_pointer, tick};
    use lane_duel::{FrameSnapshot, Settings};

    let mut state = GameState::new(Settings::load());

    let settle = |state: &mut GameState| {
        for _ in 0..240 {
            tick(state, SIM_DT_MS);
        }
    };
    let gesture = |state: &mut GameState, from: Vec2, to: Vec2| {
        handle_pointer(state, &PointerEvent::new(1, PointerPhase::Down, from));
        handle_pointer(state, &PointerEvent::new(1, PointerPhase::Move, to));
        handle_pointer(state, &PointerEvent::new(1, PointerPhase::Up, to))
    };

    let Some(card) = state.hand(Owner::Player).first().map(|c| (c.id, c.pos)) else {
        log::warn!("Initial setup has no hand cards");
        return;
    };
    let Some(slot) = state.board.slot(0).map(|s| s.center) else {
        log::warn!("Board has no slots");
        return;
    };

    let placed = gesture(&mut state, card.1, slot);
    log::info!("Drag card {}: {:?}", card.0, placed);
    settle(&mut state);

    let reach = Vec2::new(state.settings.swipe_threshold * 2.0, 0.0);
    let swiped = gesture(&mut state, slot, slot + reach);
    log::info!("Swipe right: {:?}", swiped);
    settle(&mut state);

    for event in state.drain_events() {
        log::info!("Event: {:?}", event);
    }

    let snapshot = FrameSnapshot::capture(&state);
    log::info!(
        "Final board: {} cards, {} occupied slots",
        snapshot.cards.len(),
        snapshot.slots.iter().filter(|s| s.occupied).count()
    );
}
