/// External configuration loader.
///
/// Reads `boostsnake.toml` from the executable's directory (or CWD).
/// Missing keys fall back to defaults; a missing file yields the full default
/// config. Values the simulation cannot run with are reported as
/// `ConfigError::Invalid` so the caller can decide to fall back.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sim::settings::Settings;

pub const CONFIG_FILE: &str = "boostsnake.toml";

// ── Errors ──

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    /// Initial slider values.
    pub settings: Settings,
    pub gamepad: GamepadConfig,
    pub logging: LoggingConfig,
    pub debug: bool,
    pub seed: Option<u64>,
}

/// Playfield geometry in pixels. Every position is a multiple of `block_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub base_fps: u32,
    pub boost_fps_bonus: u32,
    pub boost_active_ms: u64,
    pub boost_appear_min_ms: u64,
    pub boost_appear_max_ms: u64,
    pub flash_period_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub start: Vec<String>,
    pub quit: Vec<String>,
    pub grow: Vec<String>,
    pub slider_prev: Vec<String>,
    pub slider_next: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub file: PathBuf,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            width: default_width(),
            height: default_height(),
            block_size: default_block_size(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            base_fps: default_base_fps(),
            boost_fps_bonus: default_boost_fps_bonus(),
            boost_active_ms: default_boost_active(),
            boost_appear_min_ms: default_appear_min(),
            boost_appear_max_ms: default_appear_max(),
            flash_period_ms: default_flash_period(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        // An empty document deserializes to the all-defaults schema.
        TomlConfig::default().resolve()
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    settings: TomlSettings,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    logging: TomlLogging,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_width")]
    width: i32,
    #[serde(default = "default_height")]
    height: i32,
    #[serde(default = "default_block_size")]
    block_size: i32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_base_fps")]
    base_fps: u32,
    #[serde(default = "default_boost_fps_bonus")]
    boost_fps_bonus: u32,
    #[serde(default = "default_boost_active")]
    boost_active_ms: u64,
    #[serde(default = "default_appear_min")]
    boost_appear_min_ms: u64,
    #[serde(default = "default_appear_max")]
    boost_appear_max_ms: u64,
    #[serde(default = "default_flash_period")]
    flash_period_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSettings {
    #[serde(default = "default_food_count")]
    food_count: u32,
    #[serde(default = "default_boost_count")]
    boost_count: u32,
    #[serde(default = "default_spawn_probability")]
    boost_spawn_probability: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_start")]
    start: Vec<String>,
    #[serde(default = "default_pad_quit")]
    quit: Vec<String>,
    #[serde(default = "default_pad_grow")]
    grow: Vec<String>,
    #[serde(default = "default_pad_slider_prev")]
    slider_prev: Vec<String>,
    #[serde(default = "default_pad_slider_next")]
    slider_next: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default = "default_log_level")]
    level: String,
    #[serde(default = "default_log_file")]
    file: String,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_width() -> i32 { 800 }
fn default_height() -> i32 { 600 }
fn default_block_size() -> i32 { 20 }

fn default_base_fps() -> u32 { 10 }
fn default_boost_fps_bonus() -> u32 { 15 }
fn default_boost_active() -> u64 { 3_000 }
fn default_appear_min() -> u64 { 3_000 }
fn default_appear_max() -> u64 { 10_000 }
fn default_flash_period() -> u64 { 100 }

fn default_food_count() -> u32 { Settings::default().food_count }
fn default_boost_count() -> u32 { Settings::default().boost_count }
fn default_spawn_probability() -> u32 { Settings::default().boost_spawn_probability }

fn default_pad_start() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_pad_quit() -> Vec<String> { vec!["Select".into()] }
fn default_pad_grow() -> Vec<String> { vec!["Y".into()] }
fn default_pad_slider_prev() -> Vec<String> { vec!["L1".into()] }
fn default_pad_slider_next() -> Vec<String> { vec!["R1".into()] }

fn default_log_level() -> String { "info".into() }
fn default_log_file() -> String { "boostsnake.log".into() }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            width: default_width(),
            height: default_height(),
            block_size: default_block_size(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            base_fps: default_base_fps(),
            boost_fps_bonus: default_boost_fps_bonus(),
            boost_active_ms: default_boost_active(),
            boost_appear_min_ms: default_appear_min(),
            boost_appear_max_ms: default_appear_max(),
            flash_period_ms: default_flash_period(),
        }
    }
}

impl Default for TomlSettings {
    fn default() -> Self {
        TomlSettings {
            food_count: default_food_count(),
            boost_count: default_boost_count(),
            boost_spawn_probability: default_spawn_probability(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            start: default_pad_start(),
            quit: default_pad_quit(),
            grow: default_pad_grow(),
            slider_prev: default_pad_slider_prev(),
            slider_next: default_pad_slider_next(),
        }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl TomlConfig {
    /// Map the schema onto the public structs, clamping soft limits.
    fn resolve(self) -> GameConfig {
        let min_appear = self.timing.boost_appear_min_ms;
        GameConfig {
            grid: GridConfig {
                width: self.grid.width,
                height: self.grid.height,
                block_size: self.grid.block_size,
            },
            timing: TimingConfig {
                base_fps: self.timing.base_fps.max(1),
                boost_fps_bonus: self.timing.boost_fps_bonus,
                boost_active_ms: self.timing.boost_active_ms,
                boost_appear_min_ms: min_appear,
                boost_appear_max_ms: self.timing.boost_appear_max_ms.max(min_appear),
                flash_period_ms: self.timing.flash_period_ms.max(1),
            },
            settings: Settings::clamped(
                self.settings.food_count,
                self.settings.boost_count,
                self.settings.boost_spawn_probability,
            ),
            gamepad: GamepadConfig {
                start: self.gamepad.start,
                quit: self.gamepad.quit,
                grow: self.gamepad.grow,
                slider_prev: self.gamepad.slider_prev,
                slider_next: self.gamepad.slider_next,
            },
            logging: LoggingConfig {
                level: self.logging.level,
                file: PathBuf::from(self.logging.file),
            },
            debug: self.general.debug,
            seed: self.general.seed,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Parse a TOML document. Keys left out take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg = toml::from_str::<TomlConfig>(text)?.resolve();
        cfg.grid.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `boostsnake.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// No file anywhere is not an error: the defaults are returned.
    pub fn discover() -> Result<Self, ConfigError> {
        match candidate_dirs()
            .into_iter()
            .map(|d| d.join(CONFIG_FILE))
            .find(|p| p.exists())
        {
            Some(path) => Self::from_path(&path),
            None => Ok(GameConfig::default()),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size <= 0 || self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions must be positive (width={}, height={}, block_size={})",
                self.width, self.height, self.block_size,
            )));
        }
        if self.width % self.block_size != 0 || self.height % self.block_size != 0 {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} is not a multiple of block_size {}",
                self.width, self.height, self.block_size,
            )));
        }
        Ok(())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
