//! Domain logic and core data structures
//!
//! This module contains pure geometry and timer logic that is independent
//! of any drawing backend or host runtime.

pub mod core;
pub mod curve;
pub mod timer;
