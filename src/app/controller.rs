//! Application controller and host boundary
//!
//! The controller owns the timer progress and the duration input buffer.
//! Host events arrive through [`TimerController::dispatch`]; every state
//! read and write happens there, on the caller's task. Ticks from the
//! background [`Ticker`] are queued in a channel and applied before each
//! frame, so a tick that completes the countdown is always visible in the
//! very next frame.

use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use ab_glyph::FontArc;
use tracing::{debug, info};

use crate::app::ticker::{TickSignal, Ticker, TickerError};
use crate::config::{ConfigError, TimerConfig};
use crate::domain::core::{Rect, Size};
use crate::domain::timer::{ProgressState, StateMachine, TimerEvent, TimerStatus};
use crate::ui::composer::{FrameComposer, FrameError, FrameOutput};
use crate::ui::renderer::RendererError;
use crate::ui::surface::{CommandList, DrawCommand};

/// Application errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Ticker error: {0}")]
    Ticker(#[from] TickerError),

    #[error("Renderer error: {0}")]
    Renderer(#[from] RendererError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Events delivered by the host runtime
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The host wants a frame of `size` rendered now
    FrameReady { now: Instant, size: Size },
    /// The toggle button was activated
    ToggleClicked,
    /// Pointer press in frame coordinates; toggles when on the button
    PointerPressed { x: i32, y: i32 },
    /// The user edited the duration field
    TextEdited(String),
    /// The host is closing
    ShuttingDown,
}

/// One composed frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    pub output: FrameOutput,
}

/// What the host should do after an event
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Present this frame
    Frame(Frame),
    /// State may have changed; the host should request a frame
    Redraw,
    /// Nothing to do
    Ignored,
    /// Stop the event loop
    Exit,
}

/// Main application controller
pub struct TimerController {
    state: ProgressState,
    /// Duration text as shown in the input field
    input: String,
    /// Input text from the last fresh start, restored on reset
    started_input: Option<String>,
    composer: FrameComposer,
    ticks: Receiver<TickSignal>,
    tick_seconds: f64,
    /// Stopped on shutdown, or by its own `Drop`
    ticker: Option<Ticker>,
    font: Option<FontArc>,
    button_area: Option<Rect>,
}

impl TimerController {
    /// Creates a controller that reads ticks from `ticks`
    pub fn new(config: &TimerConfig, ticks: Receiver<TickSignal>) -> Self {
        Self {
            state: ProgressState::new(config.default_duration),
            input: config.default_input(),
            started_input: None,
            composer: FrameComposer::from_config(config),
            ticks,
            tick_seconds: config.tick_seconds(),
            ticker: None,
            font: None,
            button_area: None,
        }
    }

    /// Creates a controller driven by its own background ticker
    pub fn start(config: &TimerConfig) -> Result<Self, AppError> {
        let (sender, receiver) = mpsc::channel();
        let mut ticker = Ticker::new(config.tick_period());
        ticker.start(sender)?;

        let mut controller = Self::new(config, receiver);
        controller.ticker = Some(ticker);
        Ok(controller)
    }

    /// Uses `font` to measure text while composing
    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    /// Copy of the current progress state
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Current content of the duration field
    pub fn input_text(&self) -> &str {
        &self.input
    }

    /// Handles one host event
    pub fn dispatch(&mut self, event: HostEvent) -> Result<Dispatch, AppError> {
        match event {
            HostEvent::FrameReady { now, size } => {
                Ok(Dispatch::Frame(self.render_frame(now, size)?))
            }
            HostEvent::ToggleClicked => {
                self.toggle();
                Ok(Dispatch::Redraw)
            }
            HostEvent::PointerPressed { x, y } => match self.button_area {
                Some(area) if area.contains_point(x, y) => {
                    self.toggle();
                    Ok(Dispatch::Redraw)
                }
                _ => Ok(Dispatch::Ignored),
            },
            HostEvent::TextEdited(text) => match self.state.status() {
                TimerStatus::Running => {
                    debug!("input edit ignored while running");
                    Ok(Dispatch::Ignored)
                }
                status => {
                    // A duration typed after completion survives the reset
                    if status == TimerStatus::Complete {
                        self.started_input = None;
                    }
                    self.input = text;
                    Ok(Dispatch::Redraw)
                }
            },
            HostEvent::ShuttingDown => {
                if let Some(mut ticker) = self.ticker.take() {
                    ticker.stop()?;
                }
                info!("controller shutting down");
                Ok(Dispatch::Exit)
            }
        }
    }

    /// Applies every tick queued so far and returns how many there were
    pub fn apply_pending_ticks(&mut self) -> usize {
        let mut applied = 0;
        let event = TimerEvent::Tick(self.tick_seconds);
        for _ in self.ticks.try_iter() {
            self.state = StateMachine::process_event(self.state, &event);
            applied += 1;
        }
        applied
    }

    fn toggle(&mut self) {
        // Ticks queued before the toggle belong to the old status; in Idle
        // or Complete they are no-ops and get discarded here
        self.apply_pending_ticks();

        let before = self.state;
        self.state = StateMachine::process_event(before, &TimerEvent::Toggle(self.input.clone()));

        match (before.status(), self.state.status()) {
            (TimerStatus::Idle, TimerStatus::Running) if before.fraction() == 0.0 => {
                self.started_input = Some(self.input.clone());
            }
            (TimerStatus::Complete, TimerStatus::Idle) => {
                if let Some(input) = &self.started_input {
                    self.input = input.clone();
                }
            }
            _ => {}
        }
    }

    fn render_frame(&mut self, now: Instant, size: Size) -> Result<Frame, AppError> {
        self.apply_pending_ticks();

        let mut surface = CommandList::with_font(self.font.clone());
        let output = self
            .composer
            .compose(&self.state, &self.input, size, now, &mut surface)?;

        // The field shows the countdown while running
        if !output.visuals.input_editable {
            self.input.clone_from(&output.visuals.input_text);
        }
        self.button_area = Some(output.button_area);

        Ok(Frame {
            commands: surface.into_commands(),
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Sender;

    const SIZE: Size = Size { w: 400, h: 600 };

    fn controller() -> (TimerController, Sender<TickSignal>) {
        let (tx, rx) = mpsc::channel();
        (TimerController::new(&TimerConfig::default(), rx), tx)
    }

    fn frame(controller: &mut TimerController) -> Frame {
        match controller
            .dispatch(HostEvent::FrameReady {
                now: Instant::now(),
                size: SIZE,
            })
            .unwrap()
        {
            Dispatch::Frame(frame) => frame,
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle_with_default_input() {
        let (controller, _tx) = controller();
        assert_eq!(controller.state().status(), TimerStatus::Idle);
        assert_eq!(controller.input_text(), "10");
    }

    #[test]
    fn ticks_are_applied_before_the_frame() {
        let (mut controller, tx) = controller();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();

        for _ in 0..250 {
            tx.send(TickSignal).unwrap();
        }

        let frame = frame(&mut controller);
        assert_eq!(controller.state().status(), TimerStatus::Complete);
        assert_eq!(frame.output.visuals.button_label, "Reset");
        assert_eq!(frame.output.wake_at, None);
    }

    #[test]
    fn ticks_queued_before_start_are_discarded() {
        let (mut controller, tx) = controller();
        for _ in 0..300 {
            tx.send(TickSignal).unwrap();
        }
        controller.dispatch(HostEvent::ToggleClicked).unwrap();

        frame(&mut controller);
        assert_eq!(controller.state().status(), TimerStatus::Running);
        assert_eq!(controller.state().fraction(), 0.0);
    }

    #[test]
    fn ticks_queued_while_paused_are_discarded() {
        let (mut controller, tx) = controller();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        for _ in 0..25 {
            tx.send(TickSignal).unwrap();
        }
        frame(&mut controller);
        let before_pause = controller.state().fraction();

        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        for _ in 0..200 {
            tx.send(TickSignal).unwrap();
        }
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        frame(&mut controller);

        assert_eq!(controller.state().status(), TimerStatus::Running);
        assert_eq!(controller.state().fraction(), before_pause);
    }

    #[test]
    fn ticks_before_stop_are_counted() {
        let (mut controller, tx) = controller();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        for _ in 0..50 {
            tx.send(TickSignal).unwrap();
        }

        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        assert_eq!(controller.state().status(), TimerStatus::Idle);
        assert!((controller.state().fraction() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn running_frame_writes_remaining_time_back() {
        let (mut controller, tx) = controller();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        for _ in 0..50 {
            tx.send(TickSignal).unwrap();
        }

        let frame = frame(&mut controller);
        assert_eq!(controller.input_text(), "8.0");
        assert!(frame.output.wake_at.is_some());
    }

    #[test]
    fn stop_and_resume_keeps_target() {
        let (mut controller, tx) = controller();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        for _ in 0..125 {
            tx.send(TickSignal).unwrap();
        }
        frame(&mut controller);

        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        let paused = controller.state();
        assert_eq!(paused.status(), TimerStatus::Idle);
        assert!(paused.fraction() > 0.0);

        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        let resumed = controller.state();
        assert_eq!(resumed.status(), TimerStatus::Running);
        assert_eq!(resumed.fraction(), paused.fraction());
        assert!((resumed.target_duration_seconds() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn reset_restores_started_input() {
        let (mut controller, tx) = controller();
        controller.dispatch(HostEvent::TextEdited("1".into())).unwrap();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        for _ in 0..10 {
            tx.send(TickSignal).unwrap();
        }
        frame(&mut controller);
        for _ in 0..15 {
            tx.send(TickSignal).unwrap();
        }
        frame(&mut controller);
        assert_eq!(controller.state().status(), TimerStatus::Complete);

        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        assert_eq!(controller.state().status(), TimerStatus::Idle);
        assert_eq!(controller.state().fraction(), 0.0);
        assert_eq!(controller.input_text(), "1");
    }

    #[test]
    fn edits_are_ignored_while_running() {
        let (mut controller, _tx) = controller();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        let result = controller.dispatch(HostEvent::TextEdited("99".into())).unwrap();
        assert_eq!(result, Dispatch::Ignored);
        assert_eq!(controller.input_text(), "10");
    }

    #[test]
    fn edit_when_complete_survives_reset() {
        let (mut controller, tx) = controller();
        controller.dispatch(HostEvent::TextEdited("1".into())).unwrap();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        for _ in 0..25 {
            tx.send(TickSignal).unwrap();
        }
        let frame = frame(&mut controller);
        assert_eq!(controller.state().status(), TimerStatus::Complete);
        assert!(frame.output.visuals.input_editable);

        let result = controller.dispatch(HostEvent::TextEdited("5".into())).unwrap();
        assert_eq!(result, Dispatch::Redraw);
        assert_eq!(controller.input_text(), "5");

        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        assert_eq!(controller.state().status(), TimerStatus::Idle);
        assert_eq!(controller.input_text(), "5");
    }

    #[test]
    fn invalid_input_does_not_start() {
        let (mut controller, _tx) = controller();
        controller.dispatch(HostEvent::TextEdited("abc".into())).unwrap();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();
        assert_eq!(controller.state().status(), TimerStatus::Idle);
        assert_eq!(controller.state().target_duration_seconds(), 10.0);
    }

    #[test]
    fn pointer_press_on_button_toggles() {
        let (mut controller, _tx) = controller();

        // No frame yet, so no known button area
        let ignored = controller.dispatch(HostEvent::PointerPressed { x: 300, y: 410 }).unwrap();
        assert_eq!(ignored, Dispatch::Ignored);

        let frame = frame(&mut controller);
        let area = frame.output.button_area;
        let outside = controller.dispatch(HostEvent::PointerPressed { x: 5, y: 5 }).unwrap();
        assert_eq!(outside, Dispatch::Ignored);

        let inside = controller
            .dispatch(HostEvent::PointerPressed {
                x: area.x + 1,
                y: area.y + 1,
            })
            .unwrap();
        assert_eq!(inside, Dispatch::Redraw);
        assert_eq!(controller.state().status(), TimerStatus::Running);
    }

    #[test]
    fn shutdown_exits() {
        let (mut controller, _tx) = controller();
        assert_eq!(controller.dispatch(HostEvent::ShuttingDown).unwrap(), Dispatch::Exit);
    }

    #[test]
    fn started_controller_receives_ticks() {
        let mut config = TimerConfig::default();
        config.tick_hz = TimerConfig::MAX_TICK_HZ;
        let mut controller = TimerController::start(&config).unwrap();
        controller.dispatch(HostEvent::ToggleClicked).unwrap();

        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        while controller.state().fraction() == 0.0 && Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(10));
            controller.apply_pending_ticks();
        }

        assert!(controller.state().fraction() > 0.0);
        assert_eq!(controller.dispatch(HostEvent::ShuttingDown).unwrap(), Dispatch::Exit);
    }
}
