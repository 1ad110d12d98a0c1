//! Engine parameters and presets
//!
//! Loaded from an optional JSON file; every absent field falls back to the
//! preset the file names, or `Extended` when it names none.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::consts::*;
use crate::sim::LevelTable;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Rule-set presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Five levels, 70° bounce limit, 10% speed-up per level
    Classic,
    /// Ten levels, 60° bounce limit, 8% speed-up per level
    #[default]
    Extended,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Extended => "extended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Preset::Classic),
            "extended" | "ext" => Some(Preset::Extended),
            _ => None,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preset: Preset,

    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub ball_radius: f32,
    /// Base ball speed (units per tick)
    pub ball_start_speed: f32,

    // === Rules ===
    /// Maximum deflection from vertical off the paddle
    pub max_bounce_angle_deg: f32,
    /// Speed increase applied as each level after the first loads
    pub speed_increase_percent: f32,
    /// Level-number to pattern table
    pub layouts: LevelTable,
    /// Go straight from LevelComplete to LevelLoad without waiting for input
    pub auto_advance: bool,
    /// Check and persist the high score on winning, not only on game over
    pub persist_on_win: bool,

    // === Collaborators ===
    /// Override for the high score file location
    pub high_score_path: Option<PathBuf>,
    /// Play sound effects
    pub sound: bool,
    /// Master volume for sound effects (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(Preset::Extended)
    }
}

impl Settings {
    /// Settings with the rule values of a preset
    pub fn from_preset(preset: Preset) -> Self {
        let (max_bounce_angle_deg, speed_increase_percent, layouts) = match preset {
            Preset::Classic => (70.0, 10.0, LevelTable::classic()),
            Preset::Extended => (
                MAX_BOUNCE_ANGLE_DEG,
                SPEED_INCREASE_PERCENT,
                LevelTable::extended(),
            ),
        };

        Self {
            preset,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            ball_radius: BALL_RADIUS,
            ball_start_speed: BALL_START_SPEED,
            max_bounce_angle_deg,
            speed_increase_percent,
            layouts,
            auto_advance: true,
            persist_on_win: true,
            high_score_path: None,
            sound: true,
            volume: 1.0,
        }
    }

    /// Apply a preset's rule values, keeping playfield and collaborator settings
    pub fn apply_preset(&mut self, preset: Preset) {
        let rules = Self::from_preset(preset);
        self.preset = preset;
        self.max_bounce_angle_deg = rules.max_bounce_angle_deg;
        self.speed_increase_percent = rules.speed_increase_percent;
        self.layouts = rules.layouts;
    }

    pub fn max_bounce_angle(&self) -> f32 {
        self.max_bounce_angle_deg.to_radians()
    }

    pub fn level_count(&self) -> u32 {
        self.layouts.len()
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;

        log::info!(
            "Loaded settings from {:?} ({} levels, preset {})",
            path,
            settings.level_count(),
            settings.preset.as_str()
        );
        Ok(settings)
    }

    /// Parse settings JSON. Fields the document leaves out come from the
    /// preset it names (`Extended` when it names none).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let Value::Object(fields) = serde_json::from_str::<Value>(json)? else {
            return serde_json::from_str(json);
        };
        let preset = match fields.get("preset") {
            Some(value) => Preset::deserialize(value)?,
            None => Preset::default(),
        };

        let mut merged = serde_json::to_value(Self::from_preset(preset))?;
        if let Value::Object(base) = &mut merged {
            base.extend(fields);
        }
        serde_json::from_value(merged)
    }

    /// Reject parameter combinations the engine cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &str| Err(SettingsError::Invalid(msg.to_string()));

        if self.layouts.is_empty() {
            return invalid("layout table is empty");
        }
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return invalid("screen dimensions must be positive");
        }
        if self.paddle_width <= 0.0 || self.paddle_height <= 0.0 {
            return invalid("paddle dimensions must be positive");
        }
        if self.paddle_width > self.screen_width {
            return invalid("paddle is wider than the screen");
        }
        if self.ball_radius <= 0.0 || self.ball_start_speed <= 0.0 {
            return invalid("ball radius and speed must be positive");
        }
        if !(self.max_bounce_angle_deg > 0.0 && self.max_bounce_angle_deg < 90.0) {
            return invalid("bounce angle limit must be between 0 and 90 degrees");
        }
        if self.speed_increase_percent < 0.0 {
            return invalid("speed increase must not be negative");
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return invalid("volume must be between 0 and 1");
        }
        Ok(())
    }
}
