//! Kurdish Snake entry point
//!
//! Web: wires DOM input, timers, the canvas renderer and audio to a session.
//! Native: plays a seeded headless demo game and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use kurdish_snake::audio::{AudioManager, SoundEffect};
    use kurdish_snake::economy::{DEFAULT_SKINS, DEFAULT_THEMES, VIP_SKINS, VIP_THEMES};
    use kurdish_snake::format_time;
    use kurdish_snake::persistence::LocalStore;
    use kurdish_snake::platform::BrowserScheduler;
    use kurdish_snake::platform::web::Dispatch;
    use kurdish_snake::renderer::{CanvasRenderer, Palette};
    use kurdish_snake::sim::{Direction, GameMode, Intent};
    use kurdish_snake::{Difficulty, GameEvent, ItemKind, Phase, Session};

    /// Shop prices; default and VIP items are never sold
    const THEME_PRICES: [(&str, u64); 8] = [
        ("ocean", 1000),
        ("sunset", 1200),
        ("forest", 1500),
        ("neon", 2000),
        ("snow", 3000),
        ("phoenix", 5000),
        ("void", 5000),
        ("celestial", 5000),
    ];
    const SKIN_PRICES: [(&str, u64); 5] = [
        ("rainbow", 800),
        ("fire", 1200),
        ("ice", 1200),
        ("electric", 1500),
        ("galaxy", 2000),
    ];

    /// Title taps within the window that unlock VIP
    const VIP_TAPS: u32 = 7;
    const VIP_TAP_WINDOW_MS: f64 = 2000.0;
    /// Drag distance before the joystick commits to a direction
    const JOYSTICK_THRESHOLD: f32 = 30.0;

    fn price_of(kind: ItemKind, id: &str) -> Option<u64> {
        let prices: &[(&str, u64)] = match kind {
            ItemKind::Theme => &THEME_PRICES,
            ItemKind::Skin => &SKIN_PRICES,
        };
        prices.iter().find(|(item, _)| *item == id).map(|&(_, cost)| cost)
    }

    /// Game instance holding all state
    struct Game {
        session: Session<BrowserScheduler, LocalStore>,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        document: Document,
        /// Turn keys held down (modern steering)
        held_left: bool,
        held_right: bool,
        /// Joystick drag start and the direction last sent
        drag_origin: Option<(f32, f32)>,
        drag_direction: Option<Direction>,
        title_taps: u32,
        last_tap_ms: f64,
    }

    type GameSlot = Rc<RefCell<Option<Game>>>;

    impl Game {
        /// Flush session output to audio, canvas and HUD
        fn after_update(&mut self) {
            for event in self.session.drain_events() {
                self.audio.on_event(&event);
                if let GameEvent::GameOver { summary } = &event {
                    self.show_game_over(summary);
                }
            }
            if self.session.take_redraw() {
                match &self.renderer {
                    Some(renderer) => renderer.draw(
                        self.session.simulation(),
                        &Palette::for_theme(&self.session.settings().theme),
                    ),
                    None => log::warn!("No canvas to draw on"),
                }
            }
            self.update_hud();
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
            }
        }

        fn update_hud(&self) {
            let session = &self.session;
            self.set_text("score", &session.score().to_string());
            self.set_text(
                "highScore",
                &session.high_scores().for_mode(session.mode()).to_string(),
            );
            self.set_text("coins", &session.economy().coins.to_string());
            self.set_text("time", &format_time(session.elapsed_secs()));
            self.set_text("length", &session.simulation().snake_len().to_string());
            self.set_hidden("pauseOverlay", session.phase() != Phase::Paused);
        }

        fn show_game_over(&self, summary: &kurdish_snake::GameSummary) {
            self.set_text("finalScore", &summary.score.to_string());
            self.set_text("finalLength", &summary.length.to_string());
            self.set_text("finalLevel", &summary.level.to_string());
            self.set_text("finalTime", &summary.time);
            self.set_text("coinsEarned", &format!("+{}", summary.coins_earned));
            self.set_hidden("newHighScore", !summary.new_high_score);
            self.set_hidden("gameOverModal", false);
        }

        fn on_key_down(&mut self, event: &KeyboardEvent) {
            let direction = match event.key().as_str() {
                "ArrowUp" | "w" | "W" => Some(Direction::Up),
                "ArrowDown" | "s" | "S" => Some(Direction::Down),
                "ArrowLeft" | "a" | "A" => Some(Direction::Left),
                "ArrowRight" | "d" | "D" => Some(Direction::Right),
                _ => None,
            };

            if let Some(direction) = direction {
                event.prevent_default();
                if !event.repeat() {
                    self.session.input(Intent::Key(direction));
                }
                self.set_held(direction, true);
            } else if event.key() == " " {
                event.prevent_default();
                if self.session.phase() == Phase::Idle {
                    self.session.start();
                } else {
                    self.session.toggle_pause();
                }
            }
        }

        fn on_key_up(&mut self, event: &KeyboardEvent) {
            match event.key().as_str() {
                "ArrowLeft" | "a" | "A" => self.set_held(Direction::Left, false),
                "ArrowRight" | "d" | "D" => self.set_held(Direction::Right, false),
                _ => {}
            }
        }

        /// Buy the item if needed, then switch to it
        fn shop_click(&mut self, kind: ItemKind, id: &str) {
            if !self.session.economy().owns(kind, id) {
                let Some(cost) = price_of(kind, id) else {
                    log::warn!("{} '{}' is not for sale", kind.as_str(), id);
                    return;
                };
                if let Err(e) = self.session.buy(kind, id, cost) {
                    log::warn!("{}", e);
                    return;
                }
                self.audio.play(SoundEffect::Purchase);
            }
            match self.session.select(kind, id) {
                Ok(()) => self.audio.play(SoundEffect::Select),
                Err(e) => log::warn!("{}", e),
            }
        }

        fn choose_difficulty(&mut self, difficulty: Difficulty) {
            match self.session.set_difficulty(difficulty) {
                Ok(()) => {
                    self.audio.play(SoundEffect::Select);
                    self.set_text("currentDifficulty", difficulty.name());
                    self.set_hidden("difficultyModal", true);
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        fn on_title_tap(&mut self) {
            let now = js_sys::Date::now();
            if now - self.last_tap_ms > VIP_TAP_WINDOW_MS {
                self.title_taps = 0;
            }
            self.last_tap_ms = now;
            self.title_taps += 1;
            if self.title_taps >= VIP_TAPS {
                self.title_taps = 0;
                self.session.unlock_vip();
                self.audio.play(SoundEffect::Purchase);
                self.set_hidden("vipBanner", false);
            }
        }

        fn reset_data(&mut self) {
            self.session.reset_all_data();
            self.audio.set_enabled(self.session.settings().sound_enabled);
            self.set_hidden("resetModal", true);
            self.set_hidden("vipBanner", true);
        }

        fn drag_start(&mut self, x: f32, y: f32) {
            self.drag_origin = Some((x, y));
            self.drag_direction = None;
        }

        fn drag_move(&mut self, x: f32, y: f32) {
            let Some((x0, y0)) = self.drag_origin else {
                return;
            };
            let Some(direction) = Direction::from_drag(x - x0, y - y0, JOYSTICK_THRESHOLD) else {
                return;
            };
            if self.drag_direction != Some(direction) {
                self.drag_direction = Some(direction);
                self.session.input(Intent::Joystick(direction));
            }
        }

        fn drag_end(&mut self) {
            self.drag_origin = None;
            self.drag_direction = None;
        }

        fn set_held(&mut self, direction: Direction, down: bool) {
            if self.session.mode() != GameMode::Modern {
                return;
            }
            match direction {
                Direction::Left => self.held_left = down,
                Direction::Right => self.held_right = down,
                _ => return,
            }
            self.session.input(Intent::Hold {
                left: self.held_left,
                right: self.held_right,
            });
        }
    }

    /// Borrow the game for one handler and flush its output
    fn with_game(slot: &GameSlot, f: impl FnOnce(&mut Game)) {
        if let Some(game) = slot.borrow_mut().as_mut() {
            f(game);
            game.after_update();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Kurdish Snake starting...");

        let Some(window) = web_sys::window() else {
            web_sys::console::error_1(&"No window".into());
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let renderer = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .and_then(|canvas| CanvasRenderer::new(&canvas));
        if renderer.is_none() {
            log::warn!("Canvas unavailable, running without drawing");
        }

        // Timers dispatch back into the slot once it is filled
        let slot: GameSlot = Rc::new(RefCell::new(None));
        let weak = Rc::downgrade(&slot);
        let dispatch: Dispatch = Rc::new(move |kind| {
            if let Some(slot) = weak.upgrade() {
                with_game(&slot, |game| game.session.on_timer(kind));
            }
        });

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(
            BrowserScheduler::new(window.clone(), dispatch),
            LocalStore::new(),
            seed,
        );
        let audio = AudioManager::new(session.settings().sound_enabled);
        log::info!("Session ready with seed: {}", seed);

        *slot.borrow_mut() = Some(Game {
            session,
            renderer,
            audio,
            document: document.clone(),
            held_left: false,
            held_right: false,
            drag_origin: None,
            drag_direction: None,
            title_taps: 0,
            last_tap_ms: 0.0,
        });

        setup_keyboard(&window, slot.clone());
        setup_buttons(&document, slot.clone());
        setup_menus(&document, slot.clone());
        setup_joystick(&document, slot.clone());
        setup_auto_pause(&window, &document, slot.clone());

        with_game(&slot, |_| {});
        log::info!("Kurdish Snake running!");
    }

    fn setup_keyboard(window: &web_sys::Window, slot: GameSlot) {
        {
            let slot = slot.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                with_game(&slot, |game| game.on_key_down(&event));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                with_game(&slot, |game| game.on_key_up(&event));
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(
        document: &Document,
        id: &str,
        slot: &GameSlot,
        action: impl Fn(&mut Game) + 'static,
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        let slot = slot.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            with_game(&slot, |game| action(game));
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, slot: GameSlot) {
        on_click(document, "startBtn", &slot, |game| {
            game.session.start();
        });
        on_click(document, "pauseBtn", &slot, |game| {
            game.session.toggle_pause();
        });
        on_click(document, "resetBtn", &slot, |game| game.session.reset());
        on_click(document, "playAgainBtn", &slot, |game| {
            game.set_hidden("gameOverModal", true);
            game.session.restart();
        });
        on_click(document, "classicModeBtn", &slot, |game| {
            if let Err(e) = game.session.select_mode(GameMode::Classic) {
                log::warn!("{}", e);
            }
        });
        on_click(document, "modernModeBtn", &slot, |game| {
            if let Err(e) = game.session.select_mode(GameMode::Modern) {
                log::warn!("{}", e);
            }
        });
        on_click(document, "soundToggle", &slot, |game| {
            let enabled = game.session.toggle_sound();
            game.audio.set_enabled(enabled);
        });

        let touch = [
            ("upBtn", Direction::Up),
            ("downBtn", Direction::Down),
            ("leftBtn", Direction::Left),
            ("rightBtn", Direction::Right),
        ];
        for (id, direction) in touch {
            on_click(document, id, &slot, move |game| {
                game.session.input(Intent::Touch(direction))
            });
        }
    }

    /// Difficulty picker, shop, VIP title taps and the data reset dialog
    fn setup_menus(document: &Document, slot: GameSlot) {
        on_click(document, "difficultyBtn", &slot, |game| {
            game.set_hidden("difficultyModal", false)
        });
        on_click(document, "closeDifficulty", &slot, |game| {
            game.set_hidden("difficultyModal", true)
        });
        for difficulty in Difficulty::ALL {
            let id = format!("{}Difficulty", difficulty.as_str());
            on_click(document, &id, &slot, move |game| {
                game.choose_difficulty(difficulty)
            });
        }

        let themes = DEFAULT_THEMES
            .iter()
            .chain(&VIP_THEMES)
            .copied()
            .chain(THEME_PRICES.iter().map(|&(id, _)| id));
        for id in themes {
            on_click(document, &format!("theme-{}", id), &slot, move |game| {
                game.shop_click(ItemKind::Theme, id)
            });
        }
        let skins = DEFAULT_SKINS
            .iter()
            .chain(&VIP_SKINS)
            .copied()
            .chain(SKIN_PRICES.iter().map(|&(id, _)| id));
        for id in skins {
            on_click(document, &format!("skin-{}", id), &slot, move |game| {
                game.shop_click(ItemKind::Skin, id)
            });
        }

        on_click(document, "gameTitle", &slot, |game| game.on_title_tap());
        on_click(document, "resetDataBtn", &slot, |game| {
            game.set_hidden("resetModal", false)
        });
        on_click(document, "cancelReset", &slot, |game| {
            game.set_hidden("resetModal", true)
        });
        on_click(document, "confirmReset", &slot, |game| game.reset_data());
    }

    fn listen(
        target: &web_sys::EventTarget,
        event: &str,
        slot: &GameSlot,
        handler: impl Fn(&mut Game, &web_sys::Event) + 'static,
    ) {
        let slot = slot.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |e: web_sys::Event| {
            with_game(&slot, |game| handler(game, &e));
        });
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn mouse_point(event: &web_sys::Event) -> Option<(f32, f32)> {
        let event = event.dyn_ref::<MouseEvent>()?;
        Some((event.client_x() as f32, event.client_y() as f32))
    }

    fn touch_point(event: &web_sys::Event) -> Option<(f32, f32)> {
        let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
        Some((touch.client_x() as f32, touch.client_y() as f32))
    }

    /// Drag pad: mouse and single-finger touch
    fn setup_joystick(document: &Document, slot: GameSlot) {
        let Some(pad) = document.get_element_by_id("joystick") else {
            return;
        };

        listen(&pad, "mousedown", &slot, |game, event| {
            if let Some((x, y)) = mouse_point(event) {
                game.drag_start(x, y);
            }
        });
        listen(document, "mousemove", &slot, |game, event| {
            if let Some((x, y)) = mouse_point(event) {
                game.drag_move(x, y);
            }
        });
        listen(document, "mouseup", &slot, |game, _| game.drag_end());

        listen(&pad, "touchstart", &slot, |game, event| {
            if let Some((x, y)) = touch_point(event) {
                game.drag_start(x, y);
            }
        });
        listen(&pad, "touchmove", &slot, |game, event| {
            event.prevent_default();
            if let Some((x, y)) = touch_point(event) {
                game.drag_move(x, y);
            }
        });
        listen(&pad, "touchend", &slot, |game, _| game.drag_end());
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, slot: GameSlot) {
        // Visibility change (tab switch, minimize)
        {
            let slot = slot.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    with_game(&slot, |game| {
                        if game.session.pause() {
                            log::info!("Auto-paused (tab hidden)");
                        }
                    });
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                with_game(&slot, |game| {
                    if game.session.pause() {
                        log::info!("Auto-paused (window blur)");
                    }
                });
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use kurdish_snake::persistence::MemoryStore;
    use kurdish_snake::platform::ManualScheduler;
    use kurdish_snake::sim::geometry::cell_in_rect;
    use kurdish_snake::sim::{ActiveSimulation, ClassicGame, Direction, GameMode, Intent, ModernGame};
    use kurdish_snake::{Difficulty, GameEvent, GameSummary, Phase, Session, normalize_angle};

    /// Longest a demo run may last (virtual time)
    const RUN_LIMIT_MS: f64 = 180_000.0;

    /// Greedy classic policy: safe step closest to the food
    fn steer_classic(game: &ClassicGame) -> Option<Intent> {
        let head = game.head()?;
        Direction::ALL
            .iter()
            .copied()
            .filter(|&d| !game.heading.is_reversal(d.into()) || game.snake.len() == 1)
            .map(|d| (d, head.offset(d.delta().0, d.delta().1)))
            .filter(|&(_, c)| {
                c.in_bounds(game.tile_count)
                    && !game.snake.contains(&c)
                    && !game.obstacles.iter().any(|o| cell_in_rect(c, o))
                    && !game.bot.as_ref().is_some_and(|b| b.segments.contains(&c))
            })
            .min_by_key(|&(_, c)| (c.x - game.food.x).abs() + (c.y - game.food.y).abs())
            .map(|(d, _)| Intent::Key(d))
    }

    /// Turn toward the food
    fn steer_modern(game: &ModernGame) -> Option<Intent> {
        let head = game.snake.head()?;
        let to_food = game.food - head;
        let diff = normalize_angle(to_food.y.atan2(to_food.x) - game.snake.angle);
        Some(Intent::Hold {
            left: diff < -0.05,
            right: diff > 0.05,
        })
    }

    fn steer(sim: &ActiveSimulation) -> Option<Intent> {
        match sim {
            ActiveSimulation::Classic(game) => steer_classic(game),
            ActiveSimulation::Modern(game) => steer_modern(game),
        }
    }

    fn play(session: &mut Session<ManualScheduler, MemoryStore>) -> Option<GameSummary> {
        // Any directional key starts the run
        session.input(Intent::Key(Direction::Right));

        let mut played = 0.0;
        let mut summary = None;
        while session.phase() == Phase::Running && played < RUN_LIMIT_MS {
            if let Some(intent) = steer(session.simulation()) {
                session.input(intent);
            }
            let step = session.tick_interval_ms() as f64;
            session.advance_time(step);
            played += step;

            for event in session.drain_events() {
                match event {
                    GameEvent::GameOver { summary: s } => summary = Some(s),
                    other => log::debug!("{:?}", other),
                }
            }
        }
        summary
    }

    pub fn run(seed: u64, difficulty: Difficulty) {
        let mut session = Session::new(ManualScheduler::new(), MemoryStore::new(), seed);
        if let Err(e) = session.set_difficulty(difficulty) {
            log::error!("{}", e);
            return;
        }

        for mode in [GameMode::Classic, GameMode::Modern] {
            if let Err(e) = session.select_mode(mode) {
                log::error!("{}", e);
                return;
            }
            match play(&mut session) {
                Some(summary) => match serde_json::to_string(&summary) {
                    Ok(json) => log::info!("{} summary: {}", mode.as_str(), json),
                    Err(e) => log::warn!("Could not encode summary: {}", e),
                },
                None => log::info!(
                    "{} run still alive after {} s with score {}",
                    mode.as_str(),
                    RUN_LIMIT_MS / 1000.0,
                    session.score()
                ),
            }
        }

        log::info!(
            "Demo finished: {} coins, best classic {}, best modern {}",
            session.economy().coins,
            session.high_scores().classic,
            session.high_scores().modern
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let difficulty = args
        .next()
        .and_then(|s| kurdish_snake::Difficulty::from_str(&s))
        .unwrap_or_default();

    log::info!(
        "Kurdish Snake (native) headless demo, seed {}, {}",
        seed,
        difficulty.name()
    );
    log::info!("Run with `trunk serve` for the web version");
    demo::run(seed, difficulty);
}
