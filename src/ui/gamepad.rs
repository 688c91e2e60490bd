/// Gamepad input tracker using gilrs (feature `gamepad`).
///
/// Button mapping for commands is loaded from `[gamepad]` in the config.
///   D-pad / Left Stick   →  Direction (edge-triggered)
///   Start / A            →  Start
///   Select               →  Quit
///   Y                    →  Debug grow
///   L1 / R1              →  Previous / next setting
///
/// Without the feature every query returns "not pressed".

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use boostsnake::config::GamepadConfig;
use boostsnake::{Command, Direction};

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    /// Update from a new held value, flagging the rising edge.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

/// Four directional states indexed by `Direction`.
#[derive(Clone, Copy, Debug, Default)]
struct DirPad([BtnState; 4]);

fn dir_index(d: Direction) -> usize {
    match d {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

impl DirPad {
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn get_mut(&mut self, d: Direction) -> &mut BtnState {
        &mut self.0[dir_index(d)]
    }

    fn just_pressed(&self, d: Direction) -> bool {
        self.0[dir_index(d)].just_pressed
    }

    fn clear_edges(&mut self) {
        for s in &mut self.0 { s.just_pressed = false; }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    start: Vec<Btn>,
    quit: Vec<Btn>,
    grow: Vec<Btn>,
    slider_prev: Vec<Btn>,
    slider_next: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            start: vec![Btn::Start, Btn::A],
            quit: vec![Btn::Select],
            grow: vec![Btn::Y],
            slider_prev: vec![Btn::L1],
            slider_next: vec![Btn::R1],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    dpad: DirPad,
    stick: DirPad,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                tracing::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: DirPad::default(),
            stick: DirPad::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Empty or unknown lists keep defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Option<Vec<Btn>> {
            let btns: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            (!btns.is_empty()).then_some(btns)
        }
        let map = &mut self.action_map;
        if let Some(b) = parse_list(&cfg.start) { map.start = b; }
        if let Some(b) = parse_list(&cfg.quit) { map.quit = b; }
        if let Some(b) = parse_list(&cfg.grow) { map.grow = b; }
        if let Some(b) = parse_list(&cfg.slider_prev) { map.slider_prev = b; }
        if let Some(b) = parse_list(&cfg.slider_next) { map.slider_next = b; }
    }

    pub fn update(&mut self) {
        for b in &mut self.buttons { b.just_pressed = false; }
        self.dpad.clear_edges();
        self.stick.clear_edges();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }

        // Stick → digital directions (Y axis points up).
        let (x, y) = (self.stick_x, self.stick_y);
        self.stick.get_mut(Direction::Left).set(x < -STICK_DEADZONE);
        self.stick.get_mut(Direction::Right).set(x > STICK_DEADZONE);
        self.stick.get_mut(Direction::Up).set(y > STICK_DEADZONE);
        self.stick.get_mut(Direction::Down).set(y < -STICK_DEADZONE);
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dir = match gilrs_btn {
            Button::DPadUp => Some(Direction::Up),
            Button::DPadDown => Some(Direction::Down),
            Button::DPadLeft => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(d) = dir {
            self.dpad.get_mut(d).set(held);
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn as usize].set(held);
        }
    }

    #[cfg(feature = "gamepad")]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.dpad = DirPad::default();
        self.stick = DirPad::default();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    /// D-pad or stick flicked toward a direction this frame.
    pub fn direction_pressed(&self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&d| self.dpad.just_pressed(d) || self.stick.just_pressed(d))
    }

    pub fn command(&self) -> Option<Command> {
        if self.any_just_pressed(&self.action_map.quit) {
            Some(Command::Quit)
        } else if self.any_just_pressed(&self.action_map.start) {
            Some(Command::Start)
        } else {
            None
        }
    }

    pub fn grow_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.grow)
    }

    pub fn slider_prev_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.slider_prev)
    }

    pub fn slider_next_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.slider_next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("lb"), Some(Btn::L1));
        assert_eq!(Btn::from_name("North"), Some(Btn::Y));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn rising_edge_only_once() {
        let mut s = BtnState::default();
        s.set(true);
        assert!(s.just_pressed);
        s.just_pressed = false;
        s.set(true);
        assert!(!s.just_pressed);
        s.set(false);
        s.set(true);
        assert!(s.just_pressed);
    }

    #[test]
    fn config_overrides_and_ignores_unknown() {
        let mut gp = GamepadState::new();
        let cfg = GamepadConfig {
            start: vec!["X".into()],
            quit: vec!["nope".into()],
            grow: vec![],
            slider_prev: vec!["L1".into()],
            slider_next: vec!["R1".into()],
        };
        gp.load_button_config(&cfg);
        assert_eq!(gp.action_map.start, vec![Btn::X]);
        assert_eq!(gp.action_map.quit, vec![Btn::Select]);
        assert_eq!(gp.action_map.grow, vec![Btn::Y]);

        gp.buttons[Btn::X as usize].just_pressed = true;
        assert_eq!(gp.command(), Some(Command::Start));
    }

    #[test]
    fn dpad_edge_reports_direction() {
        let mut gp = GamepadState::new();
        assert_eq!(gp.direction_pressed(), None);
        gp.dpad.0[dir_index(Direction::Left)].just_pressed = true;
        assert_eq!(gp.direction_pressed(), Some(Direction::Left));
    }
}
