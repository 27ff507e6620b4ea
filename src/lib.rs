//! Egg timer UI core
//!
//! A countdown timer drawn as an egg that turns red as time runs out.
//! The crate is split into pure domain logic (geometry and the timer
//! state machine), a UI layer that turns state into draw commands, and
//! an application layer that owns state and talks to the host.

pub mod app;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ui;
