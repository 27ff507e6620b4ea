//! Application orchestration layer
//!
//! This module connects the timer state, the tick source and the frame
//! composer, and exposes the event boundary a host runtime talks to.

pub mod controller;
pub mod ticker;

pub use controller::{AppError, Dispatch, Frame, HostEvent, TimerController};
pub use ticker::{TickSignal, Ticker, TickerError};
