use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tiny_skia::ColorU8;

use crate::domain::curve::{CurveSpec, GeometryError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("Invalid egg curve: {0}")]
    Curve(#[from] GeometryError),
}

/// Colors used to draw a frame, as RGBA bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub background: [u8; 4],
    /// Egg color at zero progress; the green and blue channels fade out
    pub egg_fresh: [u8; 4],
    pub field_border: [u8; 4],
    pub field_background: [u8; 4],
    pub button: [u8; 4],
    pub button_text: [u8; 4],
    pub progress_track: [u8; 4],
    pub progress_fill: [u8; 4],
    pub text: [u8; 4],
}

impl PaletteConfig {
    pub fn color(rgba: [u8; 4]) -> ColorU8 {
        ColorU8::from_rgba(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            background: [255, 255, 255, 255],
            egg_fresh: [255, 239, 174, 255],
            field_border: [204, 204, 204, 255],
            field_background: [255, 255, 255, 255],
            button: [63, 81, 181, 255],
            button_text: [255, 255, 255, 255],
            progress_track: [224, 224, 224, 255],
            progress_fill: [63, 81, 181, 255],
            text: [0, 0, 0, 255],
        }
    }
}

/// Timer application settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Duration shown in the input before the user edits it, in seconds
    pub default_duration: f64,
    /// Ticks per second
    pub tick_hz: u32,
    pub window_width: i32,
    pub window_height: i32,
    pub font_size: f32,
    pub curve: CurveSpec,
    pub palette: PaletteConfig,
}

impl TimerConfig {
    pub const DEFAULT_DURATION: f64 = 10.0;
    pub const DEFAULT_TICK_HZ: u32 = 25;
    pub const MIN_TICK_HZ: u32 = 1;
    pub const MAX_TICK_HZ: u32 = 120;
    pub const DEFAULT_WINDOW_WIDTH: i32 = 400;
    pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
    pub const MIN_WINDOW_SIDE: i32 = 100;
    pub const DEFAULT_FONT_SIZE: f32 = 20.0;

    /// Loads and validates a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses, sanitizes and validates TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: TimerConfig = toml::from_str(text)?;
        config.tick_hz = Self::sanitize_tick_hz(config.tick_hz);
        config.validate()?;
        Ok(config)
    }

    pub fn sanitize_tick_hz(value: u32) -> u32 {
        value.clamp(Self::MIN_TICK_HZ, Self::MAX_TICK_HZ)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_duration.is_finite() || self.default_duration <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "default_duration",
                reason: format!(
                    "must be a positive number of seconds, got {}",
                    self.default_duration
                ),
            });
        }

        if self.window_width < Self::MIN_WINDOW_SIDE || self.window_height < Self::MIN_WINDOW_SIDE {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!(
                    "{}x{} is smaller than {}px on a side",
                    self.window_width,
                    self.window_height,
                    Self::MIN_WINDOW_SIDE
                ),
            });
        }

        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "font_size",
                reason: format!("must be positive, got {}", self.font_size),
            });
        }

        self.curve.validate()?;
        Ok(())
    }

    /// Time added per tick, in seconds
    pub fn tick_seconds(&self) -> f64 {
        1.0 / f64::from(Self::sanitize_tick_hz(self.tick_hz))
    }

    /// Wall-clock period between ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(self.tick_seconds())
    }

    /// Text the duration input starts with
    pub fn default_input(&self) -> String {
        format!("{}", self.default_duration)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration: Self::DEFAULT_DURATION,
            tick_hz: Self::DEFAULT_TICK_HZ,
            window_width: Self::DEFAULT_WINDOW_WIDTH,
            window_height: Self::DEFAULT_WINDOW_HEIGHT,
            font_size: Self::DEFAULT_FONT_SIZE,
            curve: CurveSpec::default(),
            palette: PaletteConfig::default(),
        }
    }
}
