//! Boost Snake simulation core.
//!
//! `domain` holds the snake, food and boost rules; `sim` ties them into a
//! `GameSession` driven one tick at a time by `GameSession::step`. Rendering
//! and input live in the binary.

pub mod config;
pub mod domain;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use domain::grid::{Direction, Grid, Pos};
pub use sim::event::GameEvent;
pub use sim::session::{Command, FrameInput, GameSession, Phase};
pub use sim::settings::Settings;
