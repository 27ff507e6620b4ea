//! Countdown timer state machine
//!
//! Defines the timer progress state and its transitions. The state is
//! mutated only by two events: a user toggle (carrying the current text
//! of the duration input) and a fixed-size tick. It has no knowledge of
//! rendering.

use thiserror::Error;
use tracing::debug;

/// Fractions this close to 1 are treated as complete, so repeated
/// `tick / target` additions land on 1 despite float rounding.
const COMPLETION_EPSILON: f64 = 1e-9;

/// Timer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    /// Not counting; editable input. Fraction is 0 or a paused value.
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Countdown finished, waiting for reset
    Complete,
}

/// Reasons a duration input is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationInputError {
    #[error("Duration input is empty")]
    Empty,
    #[error("Duration input is not a number: {0:?}")]
    NotANumber(String),
    #[error("Duration must be positive, got {0}")]
    NonPositive(String),
    #[error("Duration cannot be resumed at the current progress")]
    Unbounded,
}

/// Parses the user-entered duration in seconds
///
/// # Example
/// ```rust
/// use eggtimer::domain::timer::parse_duration;
///
/// assert_eq!(parse_duration(" 2.5 "), Ok(2.5));
/// assert!(parse_duration("abc").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<f64, DurationInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationInputError::Empty);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| DurationInputError::NotANumber(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(DurationInputError::NotANumber(trimmed.to_string()));
    }
    if value <= 0.0 {
        return Err(DurationInputError::NonPositive(trimmed.to_string()));
    }

    Ok(value)
}

/// Countdown progress owned by the application
///
/// Invariants: `fraction` is in `[0, 1]`, equals 1 when `Complete`, never
/// decreases while `Running`, and `target_duration_seconds` is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressState {
    status: TimerStatus,
    fraction: f64,
    target_duration_seconds: f64,
}

impl ProgressState {
    /// Creates an idle state with no progress
    ///
    /// A non-positive or non-finite `target_duration_seconds` falls back
    /// to one second so the invariant holds.
    pub fn new(target_duration_seconds: f64) -> Self {
        let target = if target_duration_seconds.is_finite() && target_duration_seconds > 0.0 {
            target_duration_seconds
        } else {
            1.0
        };

        Self {
            status: TimerStatus::Idle,
            fraction: 0.0,
            target_duration_seconds: target,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    /// Elapsed fraction in `[0, 1]`
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn target_duration_seconds(&self) -> f64 {
        self.target_duration_seconds
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// True when idle with progress kept from a stopped run
    pub fn is_paused(&self) -> bool {
        self.status == TimerStatus::Idle && self.fraction > 0.0
    }

    /// Seconds left at the current target
    pub fn remaining_seconds(&self) -> f64 {
        self.target_duration_seconds * (1.0 - self.fraction)
    }
}

/// Events that drive the timer
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// Start/stop/reset button pressed, with the current input text
    Toggle(String),
    /// Fixed-size time advance, in seconds
    Tick(f64),
}

/// State machine for timer transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes a timer event and returns the new state
    ///
    /// # Arguments
    /// * `current` - Current progress state
    /// * `event` - Event to process
    ///
    /// # Returns
    /// New progress state. Rejected input and ticks outside `Running`
    /// return the state unchanged.
    pub fn process_event(current: ProgressState, event: &TimerEvent) -> ProgressState {
        match (current.status, event) {
            (TimerStatus::Idle, TimerEvent::Toggle(input)) => {
                match Self::resume_target(&current, input) {
                    Ok(target) => {
                        debug!(
                            target_seconds = target,
                            fraction = current.fraction,
                            "timer: Idle -> Running"
                        );
                        ProgressState {
                            status: TimerStatus::Running,
                            target_duration_seconds: target,
                            ..current
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "timer: toggle ignored");
                        current
                    }
                }
            }

            (TimerStatus::Running, TimerEvent::Toggle(_)) => {
                // Stop keeps progress so the next toggle resumes
                debug!(fraction = current.fraction, "timer: Running -> Idle (paused)");
                ProgressState {
                    status: TimerStatus::Idle,
                    ..current
                }
            }

            (TimerStatus::Complete, TimerEvent::Toggle(_)) => {
                debug!("timer: Complete -> Idle (reset)");
                ProgressState {
                    status: TimerStatus::Idle,
                    fraction: 0.0,
                    ..current
                }
            }

            (TimerStatus::Running, TimerEvent::Tick(seconds)) => Self::advance(current, *seconds),

            // Ticks only count while running
            (TimerStatus::Idle | TimerStatus::Complete, TimerEvent::Tick(_)) => current,
        }
    }

    /// Target duration for leaving `Idle`
    ///
    /// The input is read as the seconds still to run, so the target is
    /// scaled by the remaining fraction: `input / (1 - fraction)`.
    fn resume_target(current: &ProgressState, input: &str) -> Result<f64, DurationInputError> {
        let seconds = parse_duration(input)?;
        let target = seconds / (1.0 - current.fraction);
        if !target.is_finite() || target <= 0.0 {
            return Err(DurationInputError::Unbounded);
        }
        Ok(target)
    }

    fn advance(current: ProgressState, seconds: f64) -> ProgressState {
        if !seconds.is_finite() || seconds <= 0.0 {
            return current;
        }

        let mut fraction = current.fraction + seconds / current.target_duration_seconds;
        if fraction >= 1.0 - COMPLETION_EPSILON {
            fraction = 1.0;
        }

        if fraction >= 1.0 {
            debug!("timer: Running -> Complete");
            ProgressState {
                status: TimerStatus::Complete,
                fraction: 1.0,
                ..current
            }
        } else {
            ProgressState { fraction, ..current }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f64 = 1.0 / 25.0;

    fn toggle(state: ProgressState, input: &str) -> ProgressState {
        StateMachine::process_event(state, &TimerEvent::Toggle(input.to_string()))
    }

    fn tick(state: ProgressState, count: usize) -> ProgressState {
        (0..count).fold(state, |s, _| StateMachine::process_event(s, &TimerEvent::Tick(TICK)))
    }

    #[test]
    fn default_state_is_idle() {
        let state = ProgressState::new(5.0);
        assert_eq!(state.status(), TimerStatus::Idle);
        assert_eq!(state.fraction(), 0.0);
        assert_eq!(state.target_duration_seconds(), 5.0);
    }

    #[test]
    fn invalid_initial_target_falls_back() {
        assert_eq!(ProgressState::new(0.0).target_duration_seconds(), 1.0);
        assert_eq!(ProgressState::new(f64::NAN).target_duration_seconds(), 1.0);
    }

    #[test]
    fn toggle_with_valid_input_starts_running() {
        let state = toggle(ProgressState::new(5.0), "10");
        assert_eq!(state.status(), TimerStatus::Running);
        assert_eq!(state.target_duration_seconds(), 10.0);
        assert_eq!(state.fraction(), 0.0);
    }

    #[test]
    fn countdown_completes_after_exact_tick_count() {
        let running = toggle(ProgressState::new(5.0), "10");

        let almost = tick(running, 249);
        assert_eq!(almost.status(), TimerStatus::Running);
        assert!(almost.fraction() < 1.0);

        let done = tick(almost, 1);
        assert_eq!(done.status(), TimerStatus::Complete);
        assert_eq!(done.fraction(), 1.0);
    }

    #[test]
    fn fraction_never_decreases_while_running() {
        let mut state = toggle(ProgressState::new(5.0), "3");
        let mut last = state.fraction();
        while state.is_running() {
            state = tick(state, 1);
            assert!(state.fraction() >= last);
            assert!(state.fraction() <= 1.0);
            last = state.fraction();
        }
        assert_eq!(state.status(), TimerStatus::Complete);
    }

    #[test]
    fn stop_preserves_fraction() {
        let running = tick(toggle(ProgressState::new(5.0), "10"), 50);
        let fraction = running.fraction();

        let paused = toggle(running, "ignored");
        assert_eq!(paused.status(), TimerStatus::Idle);
        assert_eq!(paused.fraction(), fraction);
        assert_eq!(paused.target_duration_seconds(), 10.0);
        assert!(paused.is_paused());
    }

    #[test]
    fn resume_with_remaining_text_keeps_target() {
        let running = tick(toggle(ProgressState::new(5.0), "10"), 125);
        let paused = toggle(running, "");
        assert!((paused.remaining_seconds() - 5.0).abs() < 1e-9);

        let resumed = toggle(paused, "5.0");
        assert_eq!(resumed.status(), TimerStatus::Running);
        assert!((resumed.target_duration_seconds() - 10.0).abs() < 1e-9);
        assert_eq!(resumed.fraction(), paused.fraction());
    }

    #[test]
    fn resume_with_edited_text_rescales_target() {
        let paused = toggle(tick(toggle(ProgressState::new(5.0), "10"), 125), "");
        let resumed = toggle(paused, "20");
        // 20 seconds left at half progress
        assert!((resumed.remaining_seconds() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn toggle_when_complete_resets() {
        let done = tick(toggle(ProgressState::new(5.0), "1"), 25);
        assert_eq!(done.status(), TimerStatus::Complete);

        let reset = toggle(done, "whatever");
        assert_eq!(reset.status(), TimerStatus::Idle);
        assert_eq!(reset.fraction(), 0.0);
    }

    #[test]
    fn invalid_input_is_ignored() {
        let initial = ProgressState::new(7.0);
        for input in ["abc", "-5", "", "0", "inf", "NaN"] {
            let state = toggle(initial, input);
            assert_eq!(state, initial, "input {input:?} changed state");
        }
    }

    #[test]
    fn ticks_outside_running_are_ignored() {
        let idle = ProgressState::new(7.0);
        assert_eq!(tick(idle, 10), idle);

        let done = tick(toggle(idle, "1"), 25);
        assert_eq!(tick(done, 10), done);
    }

    #[test]
    fn parse_duration_errors() {
        assert_eq!(parse_duration("  "), Err(DurationInputError::Empty));
        assert!(matches!(parse_duration("abc"), Err(DurationInputError::NotANumber(_))));
        assert!(matches!(parse_duration("-5"), Err(DurationInputError::NonPositive(_))));
        assert_eq!(parse_duration("10"), Ok(10.0));
    }
}
