//! Sheet Jump entry point
//!
//! Native: headless autopilot run that logs the result and records it on
//! the ranking board. Web: exports `WebGame`, driven by a JS renderer
//! through JSON snapshots.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use sheet_jump::consts::*;
    use sheet_jump::input::{Controller, InputEvent, Key, make_controller};
    use sheet_jump::sim::{Difficulty, TickInput};
    use sheet_jump::{Rankings, Session, SessionCommand, Settings};

    const SETTINGS_KEY: &str = "sheet_jump_settings";

    /// Game instance owned by the page
    #[wasm_bindgen]
    pub struct WebGame {
        session: Session,
        controller: Box<dyn Controller>,
        accumulator: f32,
        autopilot: bool,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebGame {
            let settings = Settings::load(SETTINGS_KEY);
            let rankings = Rankings::load(&settings.rankings_path);
            let controller = make_controller(settings.controller, settings.joystick_dead_zone);
            let seed = js_sys::Date::now() as u64;
            WebGame {
                session: Session::new(settings, rankings, seed),
                controller,
                accumulator: 0.0,
                autopilot: false,
            }
        }

        pub fn key_down(&mut self, key: &str) {
            match key {
                "i" | "I" => {
                    self.autopilot = !self.autopilot;
                    log::info!("Autopilot: {}", self.autopilot);
                }
                "r" | "R" => self.reset(),
                _ => {
                    if let Some(key) = Key::from_dom_key(key) {
                        self.controller.handle(&InputEvent::KeyDown(key));
                    }
                }
            }
        }

        pub fn key_up(&mut self, key: &str) {
            if let Some(key) = Key::from_dom_key(key) {
                self.controller.handle(&InputEvent::KeyUp(key));
            }
        }

        pub fn pointer_down(&mut self, x: f32, y: f32) {
            self.controller
                .handle(&InputEvent::PointerDown(glam::Vec2::new(x, y)));
        }

        pub fn pointer_move(&mut self, x: f32, y: f32) {
            self.controller
                .handle(&InputEvent::PointerMove(glam::Vec2::new(x, y)));
        }

        pub fn pointer_up(&mut self) {
            self.controller.handle(&InputEvent::PointerUp);
        }

        /// Run simulation ticks for `dt` seconds of wall time
        pub fn update(&mut self, dt: f32) {
            self.accumulator += dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let mut input: TickInput = self.controller.tick_input();
                input.autopilot = self.autopilot;

                let events = self.session.step(&input);
                if events
                    .iter()
                    .any(|e| matches!(e, sheet_jump::sim::GameEvent::PlayerDied { .. }))
                {
                    if let Err(e) = self.session.save_rankings() {
                        log::warn!("Failed to save rankings: {}", e);
                    }
                }

                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Full game state as JSON for the renderer
        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(&self.session.state).unwrap_or_else(|e| {
                log::warn!("Snapshot failed: {}", e);
                String::from("{}")
            })
        }

        pub fn leaderboard_json(&self) -> String {
            serde_json::to_string(&self.session.leaderboard).unwrap_or_default()
        }

        pub fn reset(&mut self) {
            self.session.handle(SessionCommand::Reset);
        }

        pub fn change_difficulty(&mut self, name: &str) {
            let Some(difficulty) = Difficulty::from_str(name) else {
                log::warn!("Unknown difficulty '{}'", name);
                return;
            };
            self.session.handle(SessionCommand::ChangeDifficulty(difficulty));
            if let Err(e) = self.session.settings.save(SETTINGS_KEY) {
                log::warn!("Failed to save settings: {}", e);
            }
        }

        pub fn is_game_over(&self) -> bool {
            self.session.state.is_game_over()
        }

        pub fn score(&self) -> u32 {
            self.session.state.player.score
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }
        log::info!("Sheet Jump starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Tick cap for a headless run (ten minutes of play)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_MAX_TICKS: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sheet_jump::sim::{GameEvent, TickInput};
    use sheet_jump::{Rankings, Session, SessionCommand, Settings, settings::SETTINGS_FILE};

    env_logger::init();
    log::info!("Sheet Jump (native) starting...");

    let args: Vec<String> = std::env::args().collect();
    let mut settings = Settings::load(SETTINGS_FILE);
    settings.apply_cli_overrides(&args);

    let rankings = Rankings::load(&settings.rankings_path);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = Session::new(settings, rankings, seed);

    let autopilot = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut died = false;
    while session.state.time_ticks < HEADLESS_MAX_TICKS && !died {
        died = session
            .step(&autopilot)
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerDied { .. }));
    }

    let player = &session.state.player;
    log::info!(
        "Run over: seed={} difficulty={} ticks={} height={}m score={}",
        session.seed(),
        session.state.difficulty().as_str(),
        session.state.time_ticks,
        player.max_height,
        player.best_score(&session.state.profile)
    );

    if died {
        if let Err(e) = session.save_rankings() {
            log::warn!("Failed to save rankings to {}: {}", session.settings.rankings_path, e);
        }
        for line in &session.leaderboard {
            println!("{}", line);
        }
    } else {
        log::info!("Tick cap reached, run not ranked");
    }

    session.handle(SessionCommand::Quit);
}
