/// Game rules that know nothing about phases, input devices or clocks.

pub mod boost;
pub mod food;
pub mod grid;
pub mod snake;
