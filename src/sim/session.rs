/// GameSession: one snake, its food and boosts, the score, and the
/// Waiting -> Playing -> GameOver phase machine.
///
/// `step` is the only mutating entry point during play. Per Playing tick:
///   1. Boost timers (expire), then spawn roll for each inert boost
///   2. Input (turn, debug grow)
///   3. Snake movement; a failed move ends the round here
///   4. Food at the new head
///   5. Boost pickup at the new head
///   6. Flash flag = any boost active
///
/// Randomness comes from the session's own `StdRng`; time comes from the
/// `now` argument only.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::{GameConfig, TimingConfig};
use crate::domain::boost::{Boost, BoostChange};
use crate::domain::food::Food;
use crate::domain::grid::{Direction, Grid, Pos};
use crate::domain::snake::{MoveOutcome, Snake};
use super::event::{CrashKind, GameEvent};
use super::settings::Settings;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Waiting,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Start,
    Quit,
}

/// Everything the input side hands the simulation for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub direction: Option<Direction>,
    pub command: Option<Command>,
    /// Debug-only: add one to the snake's size. Ignored unless debug mode.
    pub grow: bool,
}

impl FrameInput {
    pub fn direction(dir: Direction) -> Self {
        FrameInput { direction: Some(dir), ..Default::default() }
    }

    pub fn command(cmd: Command) -> Self {
        FrameInput { command: Some(cmd), ..Default::default() }
    }
}

pub struct GameSession {
    grid: Grid,
    timing: TimingConfig,
    debug: bool,
    rng: StdRng,

    snake: Snake,
    foods: Vec<Food>,
    boosts: Vec<Boost>,
    score: u32,

    /// Edited between rounds, applied on Start.
    settings: Settings,
    /// Applied at the last Start.
    boost_spawn_probability: u32,

    phase: Phase,
}

// ── Construction ──

impl GameSession {
    pub fn new(grid: Grid, timing: TimingConfig, settings: Settings, mut rng: StdRng) -> Self {
        let settings = settings.normalized();
        let snake = Snake::new(&grid, &mut rng);
        let foods = (0..settings.food_count).map(|_| Food::new(&grid, &mut rng)).collect();
        let boosts = (0..settings.boost_count).map(|_| Boost::new()).collect();

        GameSession {
            grid,
            timing,
            debug: false,
            rng,
            snake,
            foods,
            boosts,
            score: 0,
            settings,
            boost_spawn_probability: settings.boost_spawn_probability,
            phase: Phase::Waiting,
        }
    }

    /// Build from loaded config. Seeded when `general.seed` is set.
    pub fn from_config(cfg: &GameConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GameSession::new(cfg.grid.into(), cfg.timing, cfg.settings, rng).with_debug(cfg.debug)
    }

    pub fn with_debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }
}

// ── Read access (renderer, HUD) ──

impl GameSession {
    pub fn phase(&self) -> Phase { self.phase }
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn timing(&self) -> &TimingConfig { &self.timing }
    pub fn snake(&self) -> &Snake { &self.snake }
    pub fn foods(&self) -> &[Food] { &self.foods }
    pub fn boosts(&self) -> &[Boost] { &self.boosts }
    pub fn score(&self) -> u32 { self.score }
    pub fn settings(&self) -> Settings { self.settings }
    pub fn boost_spawn_probability(&self) -> u32 { self.boost_spawn_probability }
    pub fn is_debug(&self) -> bool { self.debug }

    pub fn any_boost_active(&self) -> bool {
        self.boosts.iter().any(|b| b.active)
    }

    /// Ticks per second: base rate, plus the bonus while a boost is active.
    pub fn tick_rate(&self) -> u32 {
        if self.phase == Phase::Playing && self.any_boost_active() {
            self.timing.base_fps.saturating_add(self.timing.boost_fps_bonus)
        } else {
            self.timing.base_fps
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1_000 / u64::from(self.tick_rate().max(1)))
    }

    /// Whether a flashing snake is in its lit half-period at `now`.
    pub fn is_flashing_visible(&self, now: u64) -> bool {
        self.snake.is_flashing() && (now / self.timing.flash_period_ms.max(1)) % 2 == 0
    }
}

// ── Mutation ──

impl GameSession {
    /// Replace the pending settings. Only accepted outside of play; the
    /// values take effect on the next Start.
    pub fn configure(&mut self, settings: Settings) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.settings = settings.normalized();
        true
    }

    /// Advance by one tick.
    pub fn step(&mut self, input: FrameInput, now: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if input.command == Some(Command::Quit) {
            events.push(GameEvent::QuitRequested);
            return events;
        }

        match self.phase {
            Phase::Waiting | Phase::GameOver => {
                if input.command == Some(Command::Start) {
                    start_round(self, &mut events);
                }
            }
            Phase::Playing => play_tick(self, input, now, &mut events),
        }

        events
    }
}

// ══════════════════════════════════════════════════════════════
// Round start
// ══════════════════════════════════════════════════════════════

fn start_round(s: &mut GameSession, events: &mut Vec<GameEvent>) {
    let settings = s.settings;
    let grid = s.grid;

    s.foods = (0..settings.food_count).map(|_| Food::new(&grid, &mut s.rng)).collect();
    s.boosts = (0..settings.boost_count).map(|_| Boost::new()).collect();
    s.boost_spawn_probability = settings.boost_spawn_probability;

    s.snake.reset(&grid, &mut s.rng);
    for food in &mut s.foods {
        food.spawn(&grid, &mut s.rng);
    }
    for boost in &mut s.boosts {
        boost.appear = false;
    }
    s.score = 0;
    s.phase = Phase::Playing;

    info!(
        food_count = settings.food_count,
        boost_count = settings.boost_count,
        spawn_probability = settings.boost_spawn_probability,
        "round started"
    );
    events.push(GameEvent::RoundStarted {
        food_count: settings.food_count,
        boost_count: settings.boost_count,
        boost_spawn_probability: settings.boost_spawn_probability,
    });
}

// ══════════════════════════════════════════════════════════════
// Playing tick
// ══════════════════════════════════════════════════════════════

fn play_tick(s: &mut GameSession, input: FrameInput, now: u64, events: &mut Vec<GameEvent>) {
    resolve_boost_timers(s, now, events);
    resolve_input(s, input);
    if !resolve_movement(s, events) { return; }
    let head = s.snake.head();
    resolve_food(s, head, events);
    resolve_boost_pickup(s, head, now, events);
    let flashing = s.any_boost_active();
    s.snake.set_flashing(flashing);
}

/// Expire boosts, then give every inert boost one spawn roll.
fn resolve_boost_timers(s: &mut GameSession, now: u64, events: &mut Vec<GameEvent>) {
    let GameSession { boosts, rng, grid, timing, boost_spawn_probability, .. } = s;

    for (index, boost) in boosts.iter_mut().enumerate() {
        match boost.update(now) {
            Some(BoostChange::Expired) => {
                debug!(index, "boost expired uncollected");
                events.push(GameEvent::BoostExpired { index });
            }
            Some(BoostChange::Ended) => {
                debug!(index, "boost effect ended");
                events.push(GameEvent::BoostEnded { index });
            }
            None => {}
        }

        if boost.is_inert() && rng.gen_range(1..=100u32) <= *boost_spawn_probability {
            boost.spawn(now, grid, timing, rng);
            debug!(index, x = boost.position.x, y = boost.position.y, "boost spawned");
            events.push(GameEvent::BoostSpawned { index, at: boost.position });
        }
    }
}

fn resolve_input(s: &mut GameSession, input: FrameInput) {
    if let Some(dir) = input.direction {
        s.snake.turn(dir);
    }
    if input.grow && s.debug {
        s.snake.grow(1);
    }
}

/// Returns false when the move failed and the round is over.
fn resolve_movement(s: &mut GameSession, events: &mut Vec<GameEvent>) -> bool {
    let (kind, at) = match s.snake.move_step(&s.grid) {
        MoveOutcome::Moved { .. } => return true,
        MoveOutcome::HitWall { at } => (CrashKind::Wall, at),
        MoveOutcome::HitSelf { at } => (CrashKind::SelfBite, at),
    };

    s.phase = Phase::GameOver;
    info!(score = s.score, ?kind, x = at.x, y = at.y, "game over");
    events.push(GameEvent::SnakeCrashed { kind, at, score: s.score });
    false
}

/// Every food on the head cell is eaten, coincident ones included.
fn resolve_food(s: &mut GameSession, head: Pos, events: &mut Vec<GameEvent>) {
    let gain: u32 = if s.any_boost_active() { 2 } else { 1 };
    let grid = s.grid;

    for food in s.foods.iter_mut().filter(|f| f.position == head) {
        s.snake.grow(gain as usize);
        s.score += gain;
        food.spawn(&grid, &mut s.rng);
        debug!(gain, score = s.score, "food eaten");
        events.push(GameEvent::FoodEaten { at: head, gain });
    }
}

fn resolve_boost_pickup(s: &mut GameSession, head: Pos, now: u64, events: &mut Vec<GameEvent>) {
    for (index, boost) in s.boosts.iter_mut().enumerate() {
        if boost.appear && boost.position == head {
            boost.enable(now, &s.timing);
            debug!(index, "boost collected");
            events.push(GameEvent::BoostCollected { index, at: head });
        }
    }
}
