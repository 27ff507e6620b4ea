//! Per-frame composition of the timer UI
//!
//! Reads the timer progress, derives what the frame should show and
//! emits the draw commands for it. Layout from top to bottom:
//!
//! ```text
//! +--------------------------+
//! |           egg            |
//! +------------+-------------+
//! |  duration  |   button    |   <- SplitLayout
//! +------------+-------------+
//! |  ======progress=====     |
//! +--------------------------+
//! ```

use std::time::{Duration, Instant};

use thiserror::Error;
use tiny_skia::ColorU8;
use tracing::trace;

use crate::config::{PaletteConfig, TimerConfig};
use crate::domain::core::{Constraints, Dimensions, Rect, Size};
use crate::domain::curve::{CurveSpec, GeometryError, generate_egg_outline};
use crate::domain::timer::{ProgressState, TimerStatus};
use crate::ui::path::fill_outline;
use crate::ui::split::{SplitLayout, Widget};
use crate::ui::surface::{DrawSurface, RenderError};
use crate::ui::widgets::{Button, ProgressBar, TextField};

/// Errors that abort composing a frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("Egg outline failed: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Drawing failed: {0}")]
    Render(#[from] RenderError),
}

/// Resolved frame colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: ColorU8,
    pub egg_fresh: ColorU8,
    pub field_border: ColorU8,
    pub field_background: ColorU8,
    pub button: ColorU8,
    pub button_text: ColorU8,
    pub progress_track: ColorU8,
    pub progress_fill: ColorU8,
    pub text: ColorU8,
}

impl From<&PaletteConfig> for Palette {
    fn from(config: &PaletteConfig) -> Self {
        Self {
            background: PaletteConfig::color(config.background),
            egg_fresh: PaletteConfig::color(config.egg_fresh),
            field_border: PaletteConfig::color(config.field_border),
            field_background: PaletteConfig::color(config.field_background),
            button: PaletteConfig::color(config.button),
            button_text: PaletteConfig::color(config.button_text),
            progress_track: PaletteConfig::color(config.progress_track),
            progress_fill: PaletteConfig::color(config.progress_fill),
            text: PaletteConfig::color(config.text),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from(&PaletteConfig::default())
    }
}

/// Everything a frame shows that is derived from the timer state
#[derive(Debug, Clone, PartialEq)]
pub struct FrameVisuals {
    /// Egg fill; fades from the fresh color towards pure red
    pub egg_color: ColorU8,
    /// Text shown in the duration field
    pub input_text: String,
    /// False while the field shows the live countdown
    pub input_editable: bool,
    /// Progress bar fill in `[0, 1]`
    pub progress: f64,
    pub button_label: &'static str,
}

impl FrameVisuals {
    /// Derives the visuals for `state`
    ///
    /// `input_text` is the current content of the duration field and is
    /// shown as-is unless the timer is running.
    pub fn derive(state: &ProgressState, input_text: &str, egg_fresh: ColorU8) -> Self {
        let fraction = state.fraction();
        let fade = |channel: u8| (f64::from(channel) * (1.0 - fraction)) as u8;
        let egg_color = ColorU8::from_rgba(
            egg_fresh.red(),
            fade(egg_fresh.green()),
            fade(egg_fresh.blue()),
            255,
        );

        let (input_text, input_editable) = match state.status() {
            TimerStatus::Running => (format_remaining(state.remaining_seconds()), false),
            TimerStatus::Idle | TimerStatus::Complete => (input_text.to_string(), true),
        };

        let button_label = match state.status() {
            TimerStatus::Idle => "Start",
            TimerStatus::Running => "Stop",
            TimerStatus::Complete => "Reset",
        };

        Self {
            egg_color,
            input_text,
            input_editable,
            progress: fraction,
            button_label,
        }
    }
}

/// Formats remaining seconds with one decimal place
pub fn format_remaining(seconds: f64) -> String {
    format!("{:.1}", (seconds * 10.0).round() / 10.0)
}

/// Result of composing one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub visuals: FrameVisuals,
    /// When the host should render again without user input
    pub wake_at: Option<Instant>,
    /// Toggle button area in frame coordinates
    pub button_area: Rect,
    pub dimensions: Dimensions,
}

/// Builds the draw commands for each frame
#[derive(Debug, Clone)]
pub struct FrameComposer {
    curve: CurveSpec,
    palette: Palette,
    font_size: f32,
    tick_period: Duration,
}

impl FrameComposer {
    /// Space above and below the egg
    const EGG_MARGIN: i32 = 20;
    const CONTROL_ROW_HEIGHT: i32 = 64;
    const CONTROL_MARGIN: i32 = 10;
    const FIELD_BORDER_WIDTH: i32 = 2;
    const PROGRESS_GAP: i32 = 16;
    const PROGRESS_HEIGHT: i32 = 12;
    const PROGRESS_INSET: i32 = 25;

    pub fn new(curve: CurveSpec, palette: Palette, font_size: f32, tick_period: Duration) -> Self {
        Self {
            curve,
            palette,
            font_size,
            tick_period,
        }
    }

    pub fn from_config(config: &TimerConfig) -> Self {
        Self::new(
            config.curve,
            Palette::from(&config.palette),
            config.font_size,
            config.tick_period(),
        )
    }

    /// Height of the row holding the egg
    fn egg_row_height(&self) -> i32 {
        2 * (self.curve.vertical_extent().ceil() as i32 + Self::EGG_MARGIN)
    }

    /// Composes one frame of `size` onto `surface`
    ///
    /// Rendering the same state and input twice yields identical
    /// commands. A wake-up one tick period after `now` is requested only
    /// while the timer runs.
    pub fn compose(
        &self,
        state: &ProgressState,
        input_text: &str,
        size: Size,
        now: Instant,
        surface: &mut dyn DrawSurface,
    ) -> Result<FrameOutput, FrameError> {
        let visuals = FrameVisuals::derive(state, input_text, self.palette.egg_fresh);

        surface.fill_rect(Rect::from_size(size), self.palette.background)?;

        self.draw_egg(surface, size, visuals.egg_color)?;

        let control_y = self.egg_row_height();
        let button_area = self.draw_controls(surface, size, control_y, &visuals)?;

        let progress_y = control_y + Self::CONTROL_ROW_HEIGHT + Self::PROGRESS_GAP;
        self.draw_progress(surface, size, progress_y, visuals.progress)?;

        let wake_at = state.is_running().then(|| now + self.tick_period);
        trace!(
            status = ?state.status(),
            fraction = state.fraction(),
            wake = wake_at.is_some(),
            "frame composed"
        );

        Ok(FrameOutput {
            visuals,
            wake_at,
            button_area,
            dimensions: Dimensions::new(size),
        })
    }

    fn draw_egg(
        &self,
        surface: &mut dyn DrawSurface,
        size: Size,
        color: ColorU8,
    ) -> Result<(), FrameError> {
        let outline = generate_egg_outline(&self.curve)?;
        let center_y = Self::EGG_MARGIN + self.curve.vertical_extent().ceil() as i32;

        surface.push_offset(size.w / 2, center_y);
        let result = fill_outline(&outline, color, surface);
        surface.pop_offset();

        Ok(result?)
    }

    /// Draws the duration field and toggle button, returning the button area
    fn draw_controls(
        &self,
        surface: &mut dyn DrawSurface,
        size: Size,
        top: i32,
        visuals: &FrameVisuals,
    ) -> Result<Rect, FrameError> {
        let row = Size::new(size.w, Self::CONTROL_ROW_HEIGHT);
        let constraints = Constraints::new(Size::new(size.w, 0), row);

        let field = TextField {
            text: &visuals.input_text,
            border: self.palette.field_border,
            background: self.palette.field_background,
            text_color: self.palette.text,
            font_size: self.font_size,
            margin: Self::CONTROL_MARGIN,
            border_width: Self::FIELD_BORDER_WIDTH,
        };
        let button = Button {
            label: visuals.button_label,
            background: self.palette.button,
            text_color: self.palette.button_text,
            font_size: self.font_size,
            margin: Self::CONTROL_MARGIN,
        };

        surface.push_offset(0, top);
        let result = SplitLayout.layout(surface, constraints, field, button);
        surface.pop_offset();
        result?;

        let (_, right) = SplitLayout::regions(constraints);
        let area = button
            .hit_area(Constraints::exact(right.size()))
            .translated(right.x, right.y + top);
        Ok(area)
    }

    fn draw_progress(
        &self,
        surface: &mut dyn DrawSurface,
        size: Size,
        top: i32,
        fraction: f64,
    ) -> Result<(), FrameError> {
        let width = (size.w - 2 * Self::PROGRESS_INSET).max(0);
        let mut bar = ProgressBar {
            fraction,
            track: self.palette.progress_track,
            fill: self.palette.progress_fill,
        };

        surface.push_offset(Self::PROGRESS_INSET, top);
        let constraints = Constraints::exact(Size::new(width, Self::PROGRESS_HEIGHT));
        let result = bar.layout(surface, constraints);
        surface.pop_offset();
        result?;

        Ok(())
    }
}
