//! Filled outline rendering

use tiny_skia::ColorU8;

use crate::domain::core::Point;
use crate::ui::surface::{DrawSurface, RenderError};

/// Minimum number of points that encloses an area
pub const MIN_OUTLINE_POINTS: usize = 3;

/// Fills the closed outline through `points` with `color`
///
/// Issues exactly one fill command. The outline is closed implicitly, so
/// callers may pass the first point again at the end or not. Surface
/// errors are returned unchanged.
pub fn fill_outline(
    points: &[Point],
    color: ColorU8,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    if points.len() < MIN_OUTLINE_POINTS {
        return Err(RenderError::DegeneratePath { points: points.len() });
    }

    surface.fill_path(points, color)
}
