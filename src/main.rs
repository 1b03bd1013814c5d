//! Crypto Snake entry point
//!
//! Handles platform-specific initialization and owns the scheduling driver:
//! the variable-rate tick loop, the fixed one-second measurement window,
//! and the DOM glue around them.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlInputElement};

    use crypto_snake::config::GameConfig;
    use crypto_snake::feed::{self, FeedHandle, FeedStatus};
    use crypto_snake::highscores::HighScores;
    use crypto_snake::input::{SwipeTracker, direction_from_key};
    use crypto_snake::render;
    use crypto_snake::sim::{
        GameOverCause, GameState, SignalAggregator, SpeedController, StepResult, set_direction,
        step,
    };

    /// Game instance holding all state
    struct Game {
        config: GameConfig,
        state: GameState,
        speed: SpeedController,
        aggregator: Rc<RefCell<SignalAggregator>>,
        scores: HighScores,
        swipe: SwipeTracker,
        ctx: CanvasRenderingContext2d,
        /// Pending tick timer, cancelled on restart/game over
        tick_timeout: Option<i32>,
        feed: Option<FeedHandle>,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Crypto Snake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let config = GameConfig::load();
        let seed = js_sys::Date::now() as u64;
        let state = match GameState::new(&config, seed) {
            Ok(state) => state,
            Err(err) => {
                log::error!("Invalid configuration: {err}");
                return;
            }
        };
        let speed = match SpeedController::new(&config) {
            Ok(speed) => speed,
            Err(err) => {
                log::error!("Invalid configuration: {err}");
                return;
            }
        };

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-board")
            .expect("no game board canvas")
            .dyn_into()
            .expect("not a canvas");
        let board_px = config.board_tiles as u32 * config.tile_size;
        canvas.set_width(board_px);
        canvas.set_height(board_px);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let swipe_threshold = crypto_snake::consts::SWIPE_THRESHOLD;
        let game = Rc::new(RefCell::new(Game {
            config,
            state,
            speed,
            aggregator: Rc::new(RefCell::new(SignalAggregator::new())),
            scores: HighScores::load(),
            swipe: SwipeTracker::new(swipe_threshold),
            ctx,
            tick_timeout: None,
            feed: None,
        }));

        log::info!("Game initialized with seed: {seed}");

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_score_submission(game.clone());
        setup_leaderboard(game.clone());

        start_feed(&game);
        start_window_interval(game.clone());

        {
            let g = game.borrow();
            render::draw(&g.ctx, &g.state, g.config.tile_size);
            update_score_hud(&g.state);
        }
        schedule_tick(game);

        log::info!("Crypto Snake running!");
    }

    /// Schedule the next tick using the controller's current interval.
    /// Re-reads the interval every time, so a fresh rate sample takes
    /// effect on the very next tick.
    fn schedule_tick(game: Rc<RefCell<Game>>) {
        let interval_ms = game.borrow().speed.tick_interval_ms();
        let game_for_tick = game.clone();
        let callback = Closure::once_into_js(move || run_tick(game_for_tick));

        if let Some(window) = web_sys::window() {
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                interval_ms as i32,
            ) {
                Ok(handle) => game.borrow_mut().tick_timeout = Some(handle),
                Err(err) => log::error!("Failed to schedule tick: {err:?}"),
            }
        }
    }

    fn run_tick(game: Rc<RefCell<Game>>) {
        let result = {
            let mut g = game.borrow_mut();
            g.tick_timeout = None;
            // A timer that outlived a reset is harmless: step() rejects
            // ticks after game over on its own.
            let result = step(&mut g.state);
            render::draw(&g.ctx, &g.state, g.config.tile_size);
            update_score_hud(&g.state);
            result
        };

        match result {
            StepResult::GameOver(cause) => on_game_over(&game, cause),
            StepResult::Moved { .. } => schedule_tick(game),
        }
    }

    fn on_game_over(game: &Rc<RefCell<Game>>, cause: GameOverCause) {
        let score = {
            let mut g = game.borrow_mut();
            cancel_pending_tick(&mut g);
            if let Some(feed) = g.feed.take() {
                feed.shutdown();
            }
            g.state.score
        };

        log::info!("Game over ({cause:?}), final score {score}");

        set_text("final-score", &format!("Score: {score}"));
        show_element("game-over-modal", "flex");
        if let Some(input) = input_element("player-name") {
            let _ = input.focus();
        }
    }

    fn restart(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            cancel_pending_tick(&mut g);
            g.state.reset();
            render::draw(&g.ctx, &g.state, g.config.tile_size);
            update_score_hud(&g.state);
        }
        hide_element("game-over-modal");
        hide_element("leaderboard-modal");

        start_feed(game);
        schedule_tick(game.clone());
        log::info!("Game restarted");
    }

    fn cancel_pending_tick(g: &mut Game) {
        if let Some(handle) = g.tick_timeout.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    /// Connect (or reconnect) the blockchain feed, wiring its status into
    /// the HUD indicator.
    fn start_feed(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        if let Some(old) = g.feed.take() {
            old.shutdown();
        }

        let on_status = Rc::new(|status: FeedStatus| {
            let (class, text) = match status {
                FeedStatus::Connected => ("status-connected", "Live on Blockchain"),
                FeedStatus::Disconnected => ("status-disconnected", "Disconnected. Retrying..."),
                FeedStatus::Error => ("status-disconnected", "Connection Error"),
            };
            if let Some(el) = element("connection-status") {
                el.set_class_name(class);
            }
            set_text("status-text", text);
        });

        g.feed = Some(feed::connect(g.aggregator.clone(), on_status));
    }

    /// Fixed-cadence measurement window, independent of the tick loop.
    fn start_window_interval(game: Rc<RefCell<Game>>) {
        let window_ms = game.borrow().config.window_ms as i32;
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            let sample = g
                .aggregator
                .borrow_mut()
                .close_window(js_sys::Date::now());
            g.speed.on_rate_sample(&sample);

            set_text("tps", &sample.window_event_count.to_string());
            set_text(
                "speed-multiplier",
                &format!("x{:.2}", g.speed.multiplier()),
            );
        });

        if let Some(window) = web_sys::window() {
            let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                window_ms,
            );
        }
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if let Some(direction) = direction_from_key(&event.key()) {
                event.prevent_default();
                let mut g = game.borrow_mut();
                set_direction(&mut g.state, direction);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .swipe
                        .begin(touch.screen_x() as f32, touch.screen_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut g = game.borrow_mut();
                    if let Some(direction) = g
                        .swipe
                        .end(touch.screen_x() as f32, touch.screen_y() as f32)
                    {
                        set_direction(&mut g.state, direction);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_score_submission(game: Rc<RefCell<Game>>) {
        let Some(btn) = element("submit-score-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let name = input_element("player-name")
                .map(|input| {
                    let value = input.value();
                    input.set_value("");
                    value
                })
                .unwrap_or_default();

            {
                let mut g = game.borrow_mut();
                let score = g.state.score;
                if let Some(rank) = g.scores.add_score(&name, score, js_sys::Date::now()) {
                    log::info!("Score {score} entered leaderboard at rank {rank}");
                }
                g.scores.save();
            }
            restart(&game);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_leaderboard(game: Rc<RefCell<Game>>) {
        if let Some(btn) = element("leaderboard-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                populate_leaderboard(&game.borrow().scores);
                show_element("leaderboard-modal", "flex");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = element("close-leaderboard-modal") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                hide_element("leaderboard-modal");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn populate_leaderboard(scores: &HighScores) {
        let Some(list) = element("leaderboard-list") else {
            return;
        };
        if scores.is_empty() {
            list.set_inner_html("<li>No scores yet. Be the first!</li>");
            return;
        }

        let mut html = String::new();
        for entry in &scores.entries {
            let date = js_sys::Date::new(&JsValue::from_f64(entry.timestamp));
            let date_str: String = date
                .to_locale_date_string("en-US", &JsValue::UNDEFINED)
                .into();
            html.push_str(&format!(
                "<li><div><span class=\"score-name\">{}</span>\
                 <span class=\"score-date\">{}</span></div>\
                 <span class=\"score-points\">{} pts</span></li>",
                entry.name, date_str, entry.score
            ));
        }
        list.set_inner_html(&html);
    }

    fn update_score_hud(state: &GameState) {
        set_text("score", &state.score.to_string());
    }

    // --- small DOM helpers ---

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    fn input_element(id: &str) -> Option<HtmlInputElement> {
        element(id)?.dyn_into().ok()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show_element(id: &str, display: &str) {
        if let Some(el) = element(id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
            let _ = el.style().set_property("display", display);
        }
    }

    fn hide_element(id: &str) {
        if let Some(el) = element(id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
            let _ = el.style().set_property("display", "none");
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
    log::info!("Crypto Snake (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    println!("\nRunning engine smoke test...");
    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use crypto_snake::config::GameConfig;
    use crypto_snake::sim::{
        Direction, GameState, RateSample, SpeedController, StepResult, set_direction, step,
    };

    let config = GameConfig::default();
    let mut state = GameState::new(&config, 1).expect("default config is valid");
    let mut speed = SpeedController::new(&config).expect("default config is valid");

    assert!(set_direction(&mut state, Direction::Right));
    for _ in 0..5 {
        assert!(matches!(step(&mut state), StepResult::Moved { .. }));
    }

    speed.on_rate_sample(&RateSample {
        window_event_count: 12,
        observed_at: 0.0,
    });
    assert!(speed.tick_interval_ms() < 1000.0 / 1.3);

    println!("✓ Engine smoke test passed!");
}
