//! Drawing surface abstraction
//!
//! Widgets draw through the [`DrawSurface`] trait. The main implementation
//! is [`CommandList`], which records a deterministic sequence of
//! [`DrawCommand`]s that a backend (see [`crate::ui::renderer`]) replays
//! later. Keeping layout and drawing apart from rasterization lets tests
//! compare frames command by command.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use tiny_skia::ColorU8;

use crate::domain::core::{Point, Rect};

/// Errors raised while issuing draw commands
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Path needs at least 3 points, got {points}")]
    DegeneratePath { points: usize },

    #[error("Drawing surface rejected command: {0}")]
    Surface(String),
}

/// Measured extent of a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

/// Single recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the closed outline through `points`
    FillPath { points: Vec<Point>, color: ColorU8 },
    /// Fill an axis-aligned rectangle
    FillRect { rect: Rect, color: ColorU8 },
    /// Draw text with its top-left corner at `origin`
    Text {
        text: String,
        origin: Point,
        size: f32,
        color: ColorU8,
    },
    /// Translate the coordinate origin until the matching `PopOffset`
    PushOffset { dx: i32, dy: i32 },
    /// Undo the most recent `PushOffset`
    PopOffset,
}

/// Primitive drawing operations offered by the host
pub trait DrawSurface {
    /// Fills a closed outline with a solid color
    fn fill_path(&mut self, points: &[Point], color: ColorU8) -> Result<(), RenderError>;

    /// Fills a rectangle with a solid color
    fn fill_rect(&mut self, rect: Rect, color: ColorU8) -> Result<(), RenderError>;

    /// Draws a single line of text with its top-left corner at `origin`
    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        size: f32,
        color: ColorU8,
    ) -> Result<(), RenderError>;

    /// Measures a single line of text at the given pixel size
    fn measure_text(&self, text: &str, size: f32) -> TextMetrics;

    /// Translates the coordinate origin for subsequent commands
    fn push_offset(&mut self, dx: i32, dy: i32);

    /// Restores the origin saved by the matching `push_offset`
    fn pop_offset(&mut self);
}

/// Recording surface
///
/// Text is measured with the configured font when one is set, otherwise
/// with a fixed per-character estimate.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
    font: Option<FontArc>,
    depth: usize,
}

impl CommandList {
    /// Average glyph advance, as a fraction of the pixel size, used
    /// when no font is available
    const FALLBACK_ADVANCE: f32 = 0.55;

    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder that measures text with `font`
    pub fn with_font(font: Option<FontArc>) -> Self {
        Self {
            font,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// True when every `PushOffset` has been popped
    pub fn is_balanced(&self) -> bool {
        self.depth == 0
    }

    /// Drops recorded commands, keeping the font
    pub fn clear(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }
}

impl DrawSurface for CommandList {
    fn fill_path(&mut self, points: &[Point], color: ColorU8) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::FillPath {
            points: points.to_vec(),
            color,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorU8) -> Result<(), RenderError> {
        if rect.w < 0 || rect.h < 0 {
            return Err(RenderError::Surface(format!("negative rectangle {rect:?}")));
        }
        self.commands.push(DrawCommand::FillRect { rect, color });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        size: f32,
        color: ColorU8,
    ) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            size,
            color,
        });
        Ok(())
    }

    fn measure_text(&self, text: &str, size: f32) -> TextMetrics {
        match &self.font {
            Some(font) => measure_with_font(font, text, size),
            None => TextMetrics {
                width: text.chars().count() as f32 * size * Self::FALLBACK_ADVANCE,
                height: size,
            },
        }
    }

    fn push_offset(&mut self, dx: i32, dy: i32) {
        self.depth += 1;
        self.commands.push(DrawCommand::PushOffset { dx, dy });
    }

    fn pop_offset(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopOffset);
    }
}

/// Measures `text` using the font's horizontal advances and kerning
pub fn measure_with_font(font: &FontArc, text: &str, size: f32) -> TextMetrics {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0;
    let mut previous = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }

    TextMetrics {
        width,
        height: scaled.ascent() - scaled.descent(),
    }
}
