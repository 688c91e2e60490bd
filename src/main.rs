/// Entry point and game loop.

mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use boostsnake::config::LoggingConfig;
use boostsnake::sim::clock::{Clock, SystemClock};
use boostsnake::{Command, Direction, FrameInput, GameConfig, GameEvent, GameSession, Phase};
use ui::gamepad::GamepadState;
use ui::input::{InputState, KEYS_GROW};
use ui::renderer::Renderer;
use ui::sliders::SliderPanel;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let loaded = GameConfig::discover();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&config.logging);
    if let Err(e) = &loaded {
        warn!("{e}; using default settings");
    }

    let mut session = GameSession::from_config(&config);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        error!("terminal init failed: {e}");
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut session, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        error!("terminal cleanup failed: {e}");
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    println!("Final Score: {}", session.score());
}

/// Log to a file: the terminal is in raw alternate-screen mode while playing.
/// `RUST_LOG` overrides the configured level.
fn init_logging(cfg: &LoggingConfig) {
    let file = match File::create(&cfg.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", cfg.file.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn game_loop(
    session: &mut GameSession,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let clock = SystemClock::new();
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad connected");
    }
    let mut panel = SliderPanel::new();

    let mut last_tick = Instant::now();
    let mut pending_dir: Option<Direction> = None;
    let mut pending_grow = false;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let playing = session.phase() == Phase::Playing;
        if playing {
            // Latest direction since the previous tick wins.
            if let Some(dir) = kb.latest_direction().or_else(|| gp.direction_pressed()) {
                pending_dir = Some(dir);
            }
            if kb.any_pressed(KEYS_GROW) || gp.grow_pressed() {
                pending_grow = true;
            }
        } else {
            handle_menu(session, &mut panel, &kb, &gp);
        }

        let command = kb.command().or_else(|| gp.command());
        let due = !playing || last_tick.elapsed() >= session.tick_interval();

        if due || command == Some(Command::Quit) {
            let input = FrameInput {
                direction: pending_dir.take(),
                command,
                grow: std::mem::take(&mut pending_grow),
            };
            let events = session.step(input, clock.now_ms());
            last_tick = Instant::now();

            if process_events(&events) {
                break;
            }
        }

        renderer.render(session, &panel, clock.now_ms())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Returns true when the session asked to quit.
fn process_events(events: &[GameEvent]) -> bool {
    let mut quit = false;
    for event in events {
        debug!(?event, "sim event");
        if *event == GameEvent::QuitRequested {
            quit = true;
        }
    }
    quit
}

/// Settings panel navigation on the Waiting / GameOver screens.
fn handle_menu(session: &mut GameSession, panel: &mut SliderPanel, kb: &InputState, gp: &GamepadState) {
    if kb.any_pressed(&[KeyCode::Tab]) || gp.slider_next_pressed() {
        panel.next();
    }
    if kb.any_pressed(&[KeyCode::BackTab]) || gp.slider_prev_pressed() {
        panel.prev();
    }

    let delta = match kb.latest_direction().or_else(|| gp.direction_pressed()) {
        Some(Direction::Up) => {
            panel.prev();
            0
        }
        Some(Direction::Down) => {
            panel.next();
            0
        }
        Some(Direction::Left) => -1,
        Some(Direction::Right) => 1,
        None => 0,
    };
    let delta = if kb.any_pressed(&[KeyCode::PageUp]) {
        10
    } else if kb.any_pressed(&[KeyCode::PageDown]) {
        -10
    } else {
        delta
    };

    if delta != 0 && panel.adjust(session, delta) {
        let s = session.settings();
        debug!(
            food_count = s.food_count,
            boost_count = s.boost_count,
            spawn_probability = s.boost_spawn_probability,
            "settings changed"
        );
    }
}
