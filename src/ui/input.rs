/// Keyboard input tracker.
///
/// Snake controls are edge-triggered: a direction or command fires on the
/// key-down event and nothing is tracked while a key stays held. Repeat
/// events from a held key count as fresh presses, so holding an arrow keeps
/// re-requesting the same heading, which is harmless.
///
/// Mapping from physical keys to `Direction` / `Command` lives here; the
/// simulation only ever sees the abstract enums.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use boostsnake::{Command, Direction};

pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_START: &[KeyCode] = &[KeyCode::Enter];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
pub const KEYS_GROW: &[KeyCode] = &[KeyCode::Char(' ')];

pub struct InputState {
    /// Key codes pressed during the most recent `drain_events()`, in order.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for Ctrl+C detection.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key);
            }
        }
    }

    fn record(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        if key.kind != KeyEventKind::Release {
            self.fresh_presses.push(key.code);
        }
    }

    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// The last direction key pressed this frame, if any.
    pub fn latest_direction(&self) -> Option<Direction> {
        self.fresh_presses.iter().rev().find_map(|&c| direction_for(c))
    }

    /// Quit wins over Start when both arrive in one frame.
    pub fn command(&self) -> Option<Command> {
        if self.any_pressed(KEYS_QUIT) {
            Some(Command::Quit)
        } else if self.any_pressed(KEYS_START) {
            Some(Command::Start)
        } else {
            None
        }
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

pub fn direction_for(code: KeyCode) -> Option<Direction> {
    if KEYS_UP.contains(&code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(Direction::Down)
    } else if KEYS_LEFT.contains(&code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(Direction::Right)
    } else {
        None
    }
}
