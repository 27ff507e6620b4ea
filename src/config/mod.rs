//! Configuration module for eggtimer
//!
//! Holds the user-adjustable timer settings: initial duration, tick rate,
//! window size, egg curve parameters and colors. Settings come from
//! built-in defaults or a TOML file.

pub mod timer;

pub use timer::{ConfigError, PaletteConfig, TimerConfig};
