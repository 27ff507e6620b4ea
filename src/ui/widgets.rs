//! Basic widgets used by the timer frame and the split showcase

use tiny_skia::ColorU8;

use crate::domain::core::{Constraints, Dimensions, Point, Rect};
use crate::ui::split::Widget;
use crate::ui::surface::{DrawSurface, RenderError};

/// Draws `text` centred inside `area`
fn draw_centered_text(
    surface: &mut dyn DrawSurface,
    area: Rect,
    text: &str,
    size: f32,
    color: ColorU8,
) -> Result<(), RenderError> {
    if text.is_empty() || area.w == 0 || area.h == 0 {
        return Ok(());
    }

    let metrics = surface.measure_text(text, size);
    let x = area.x as f32 + (area.w as f32 - metrics.width) / 2.0;
    let y = area.y as f32 + (area.h as f32 - metrics.height) / 2.0;
    surface.draw_text(text, Point::new(x.round(), y.round()), size, color)
}

/// Fills all of its maximum constraint with one color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBox {
    pub color: ColorU8,
}

impl Widget for ColorBox {
    fn layout(
        &mut self,
        surface: &mut dyn DrawSurface,
        constraints: Constraints,
    ) -> Result<Dimensions, RenderError> {
        surface.fill_rect(Rect::from_size(constraints.max), self.color)?;
        Ok(Dimensions::new(constraints.max))
    }
}

/// Color box with a centred label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledBox<'a> {
    pub text: &'a str,
    pub background: ColorU8,
    pub text_color: ColorU8,
    pub font_size: f32,
}

impl Widget for LabeledBox<'_> {
    fn layout(
        &mut self,
        surface: &mut dyn DrawSurface,
        constraints: Constraints,
    ) -> Result<Dimensions, RenderError> {
        let dims = ColorBox { color: self.background }.layout(surface, constraints)?;
        draw_centered_text(
            surface,
            Rect::from_size(constraints.max),
            self.text,
            self.font_size,
            self.text_color,
        )?;
        Ok(dims)
    }
}

/// Single-line text field with a border
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextField<'a> {
    pub text: &'a str,
    pub border: ColorU8,
    pub background: ColorU8,
    pub text_color: ColorU8,
    pub font_size: f32,
    pub margin: i32,
    pub border_width: i32,
}

impl Widget for TextField<'_> {
    fn layout(
        &mut self,
        surface: &mut dyn DrawSurface,
        constraints: Constraints,
    ) -> Result<Dimensions, RenderError> {
        let outer = Rect::from_size(constraints.max).inset(self.margin);
        let inner = outer.inset(self.border_width);

        surface.fill_rect(outer, self.border)?;
        surface.fill_rect(inner, self.background)?;
        draw_centered_text(surface, inner, self.text, self.font_size, self.text_color)?;

        Ok(Dimensions::new(constraints.max))
    }
}

/// Solid button with a centred label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button<'a> {
    pub label: &'a str,
    pub background: ColorU8,
    pub text_color: ColorU8,
    pub font_size: f32,
    pub margin: i32,
}

impl Button<'_> {
    /// Area that reacts to pointer input, relative to the widget origin
    pub fn hit_area(&self, constraints: Constraints) -> Rect {
        Rect::from_size(constraints.max).inset(self.margin)
    }
}

impl Widget for Button<'_> {
    fn layout(
        &mut self,
        surface: &mut dyn DrawSurface,
        constraints: Constraints,
    ) -> Result<Dimensions, RenderError> {
        let area = self.hit_area(constraints);
        surface.fill_rect(area, self.background)?;
        draw_centered_text(surface, area, self.label, self.font_size, self.text_color)?;
        Ok(Dimensions::new(constraints.max))
    }
}

/// Horizontal progress bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    /// Filled share in `[0, 1]`
    pub fraction: f64,
    pub track: ColorU8,
    pub fill: ColorU8,
}

impl ProgressBar {
    /// Width of the filled part for a bar `width` wide
    pub fn filled_width(&self, width: i32) -> i32 {
        let fraction = self.fraction.clamp(0.0, 1.0);
        ((width as f64) * fraction).round() as i32
    }
}

impl Widget for ProgressBar {
    fn layout(
        &mut self,
        surface: &mut dyn DrawSurface,
        constraints: Constraints,
    ) -> Result<Dimensions, RenderError> {
        let track = Rect::from_size(constraints.max);
        surface.fill_rect(track, self.track)?;

        let filled = self.filled_width(track.w);
        if filled > 0 {
            surface.fill_rect(Rect::new(0, 0, filled, track.h), self.fill)?;
        }

        Ok(Dimensions::new(constraints.max))
    }
}
