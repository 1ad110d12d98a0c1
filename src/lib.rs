//! Brick Breaker - a single-screen brick-breaking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collisions, levels, game state machine)
//! - `game`: Fixed-rate loop tying input, simulation, audio and rendering together
//! - `renderer`: Drawable frame snapshot and the terminal renderer
//! - `platform`: Input collaborator and terminal input
//! - `audio`: Event-to-tone mapping
//! - `highscores`: Persisted high score record
//! - `settings`: Engine parameters and presets

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, GameError};
pub use highscores::{FileStore, HighScoreStore, MemoryStore};
pub use settings::{Preset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum catch-up ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Paddle defaults (sits flush with the bottom edge)
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;

    /// Ball defaults. Speed is in playfield units per tick.
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_SPEED: f32 = 5.0;

    /// Brick grid
    pub const BRICK_WIDTH: f32 = 50.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_COLUMNS: u32 = 16;
    pub const BRICK_TOP: f32 = 50.0;

    /// Maximum deflection from vertical off the paddle (degrees)
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;
    /// Ball speed increase applied when each level after the first loads
    pub const SPEED_INCREASE_PERCENT: f32 = 8.0;
    /// Number of levels in the default layout table
    pub const LEVEL_COUNT: u32 = 10;
}
