//! Frame rasterization using tiny-skia
//!
//! Replays a recorded [`DrawCommand`] sequence into a pixmap. Text is
//! rasterized with ab_glyph when a font has been loaded; without a font
//! text commands are skipped.

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use tiny_skia::{
    ColorU8, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect as SkiaRect,
    Transform,
};
use tracing::{debug, warn};

use crate::domain::core::{Point, Rect, Size};
use crate::ui::surface::DrawCommand;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create pixmap for rendering")]
    PixmapCreationFailed,

    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidFrameDimensions { width: i32, height: i32 },

    #[error("Failed to read font {path}: {source}")]
    FontRead { path: String, source: std::io::Error },

    #[error("Font data is not a supported font: {0}")]
    InvalidFont(String),

    #[error("Failed to write frame image: {0}")]
    ImageWrite(String),
}

/// Loads a TrueType/OpenType font from disk
pub fn load_font(path: &Path) -> Result<FontArc, RendererError> {
    let bytes = std::fs::read(path).map_err(|source| RendererError::FontRead {
        path: path.display().to_string(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| RendererError::InvalidFont(path.display().to_string()))
}

/// Software renderer for recorded frames
#[derive(Debug, Default)]
pub struct FrameRenderer {
    font: Option<FontArc>,
    warned_missing_font: bool,
}

impl FrameRenderer {
    /// Create a renderer without a font
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer that draws text with `font`
    pub fn with_font(font: FontArc) -> Self {
        Self {
            font: Some(font),
            warned_missing_font: false,
        }
    }

    pub fn font(&self) -> Option<&FontArc> {
        self.font.as_ref()
    }

    /// Render a command sequence to a new pixmap of `size`
    pub fn render(
        &mut self,
        commands: &[DrawCommand],
        size: Size,
    ) -> Result<Pixmap, RendererError> {
        if size.w <= 0 || size.h <= 0 {
            return Err(RendererError::InvalidFrameDimensions {
                width: size.w,
                height: size.h,
            });
        }

        let mut pixmap = Pixmap::new(size.w as u32, size.h as u32)
            .ok_or(RendererError::PixmapCreationFailed)?;
        pixmap.fill(tiny_skia::Color::TRANSPARENT);

        // Cumulative origin for each pushed offset
        let mut offsets: Vec<(i32, i32)> = Vec::new();

        for command in commands {
            let (ox, oy) = offsets.last().copied().unwrap_or((0, 0));
            match command {
                DrawCommand::PushOffset { dx, dy } => offsets.push((ox + dx, oy + dy)),
                DrawCommand::PopOffset => {
                    if offsets.pop().is_none() {
                        warn!("renderer: unbalanced PopOffset ignored");
                    }
                }
                DrawCommand::FillRect { rect, color } => {
                    Self::fill_rect(&mut pixmap, rect.translated(ox, oy), *color);
                }
                DrawCommand::FillPath { points, color } => {
                    Self::fill_path(&mut pixmap, points, *color, ox, oy);
                }
                DrawCommand::Text {
                    text,
                    origin,
                    size,
                    color,
                } => {
                    let origin = Point::new(origin.x + ox as f32, origin.y + oy as f32);
                    self.draw_text(&mut pixmap, text, origin, *size, *color);
                }
            }
        }

        Ok(pixmap)
    }

    /// Render and write a PNG file
    pub fn render_to_png(
        &mut self,
        commands: &[DrawCommand],
        size: Size,
        path: &Path,
    ) -> Result<(), RendererError> {
        let pixmap = self.render(commands, size)?;
        pixmap
            .save_png(path)
            .map_err(|e| RendererError::ImageWrite(format!("{}: {e}", path.display())))
    }

    fn paint(color: ColorU8) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.red(), color.green(), color.blue(), color.alpha());
        paint.anti_alias = true;
        paint
    }

    fn fill_rect(pixmap: &mut Pixmap, rect: Rect, color: ColorU8) {
        // Zero-sized panes are legal and draw nothing
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }
        let (x, y) = (rect.x as f32, rect.y as f32);
        if let Some(rect) = SkiaRect::from_xywh(x, y, rect.w as f32, rect.h as f32) {
            pixmap.fill_rect(rect, &Self::paint(color), Transform::identity(), None);
        }
    }

    fn fill_path(pixmap: &mut Pixmap, points: &[Point], color: ColorU8, ox: i32, oy: i32) {
        let mut path_builder = PathBuilder::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path_builder.move_to(first.x, first.y);
        }
        for p in iter {
            path_builder.line_to(p.x, p.y);
        }
        path_builder.close();

        if let Some(path) = path_builder.finish() {
            pixmap.fill_path(
                &path,
                &Self::paint(color),
                FillRule::Winding,
                Transform::from_translate(ox as f32, oy as f32),
                None,
            );
        }
    }

    fn draw_text(
        &mut self,
        pixmap: &mut Pixmap,
        text: &str,
        origin: Point,
        size: f32,
        color: ColorU8,
    ) {
        let Some(font) = self.font.as_ref() else {
            if !self.warned_missing_font {
                debug!("renderer: no font loaded, text is not drawn");
                self.warned_missing_font = true;
            }
            return;
        };

        let scaled = font.as_scaled(PxScale::from(size));
        let baseline = origin.y + scaled.ascent();
        let mut caret = origin.x;
        let mut previous = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|x, y, coverage| {
                    let px = bounds.min.x as i32 + x as i32;
                    let py = bounds.min.y as i32 + y as i32;
                    blend_pixel(pixmap, px, py, color, coverage);
                });
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` into one pixel
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: ColorU8, coverage: f32) {
    if x < 0 || y < 0 || x >= pixmap.width() as i32 || y >= pixmap.height() as i32 {
        return;
    }

    let sa = (f32::from(color.alpha()) * coverage.clamp(0.0, 1.0)).round() as u32;
    if sa == 0 {
        return;
    }

    let index = y as usize * pixmap.width() as usize + x as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];

    let premul = |c: u8| (u32::from(c) * sa + 127) / 255;
    let over = |s: u32, d: u8| (s + (u32::from(d) * (255 - sa) + 127) / 255).min(255) as u8;

    let blended = PremultipliedColorU8::from_rgba(
        over(premul(color.red()), dst.red()),
        over(premul(color.green()), dst.green()),
        over(premul(color.blue()), dst.blue()),
        over(sa, dst.alpha()),
    );
    if let Some(blended) = blended {
        pixels[index] = blended;
    }
}
