//! Two-pane horizontal split layout
//!
//! Divides the minimum width of the incoming constraints between a left
//! and a right widget. Any odd pixel from the floor division goes to the
//! right pane, so the two widths always sum to the minimum width. Both
//! panes get the full maximum height.

use crate::domain::core::{Constraints, Dimensions, Rect, Region, Size};
use crate::ui::surface::{DrawSurface, RenderError};

/// Anything that can render into a given constraint and report its size
pub trait Widget {
    fn layout(
        &mut self,
        surface: &mut dyn DrawSurface,
        constraints: Constraints,
    ) -> Result<Dimensions, RenderError>;
}

impl<F> Widget for F
where
    F: FnMut(&mut dyn DrawSurface, Constraints) -> Result<Dimensions, RenderError>,
{
    fn layout(
        &mut self,
        surface: &mut dyn DrawSurface,
        constraints: Constraints,
    ) -> Result<Dimensions, RenderError> {
        self(surface, constraints)
    }
}

/// Horizontal two-way split
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitLayout;

impl SplitLayout {
    /// Computes the left and right regions for `constraints`
    ///
    /// # Example
    /// ```rust
    /// use eggtimer::domain::core::{Constraints, Rect, Size};
    /// use eggtimer::ui::SplitLayout;
    ///
    /// let (left, right) = SplitLayout::regions(Constraints::exact(Size::new(5, 10)));
    /// assert_eq!(left, Rect::new(0, 0, 2, 10));
    /// assert_eq!(right, Rect::new(2, 0, 3, 10));
    /// ```
    pub fn regions(constraints: Constraints) -> (Region, Region) {
        let left_width = constraints.min.w / 2;
        let right_width = constraints.min.w - left_width;
        let height = constraints.max.h;

        (
            Rect::new(0, 0, left_width, height),
            Rect::new(left_width, 0, right_width, height),
        )
    }

    /// Lays out `left` and `right` side by side
    ///
    /// The right widget draws inside an origin offset of the left width.
    /// The offset is popped before returning, including when the right
    /// widget fails. The split always claims `constraints.max`.
    pub fn layout<L, R>(
        &self,
        surface: &mut dyn DrawSurface,
        constraints: Constraints,
        mut left: L,
        mut right: R,
    ) -> Result<Dimensions, RenderError>
    where
        L: Widget,
        R: Widget,
    {
        let (left_region, right_region) = Self::regions(constraints);

        left.layout(surface, Constraints::exact(left_region.size()))?;

        surface.push_offset(right_region.x, 0);
        let right_result = right.layout(surface, Constraints::exact(right_region.size()));
        surface.pop_offset();
        right_result?;

        Ok(Dimensions::new(Size::new(constraints.max.w, constraints.max.h)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::surface::{CommandList, DrawCommand};
    use proptest::prelude::*;
    use tiny_skia::ColorU8;

    const RED: ColorU8 = ColorU8::from_rgba(0xC0, 0x40, 0x40, 0xFF);
    const BLUE: ColorU8 = ColorU8::from_rgba(0x40, 0x40, 0xC0, 0xFF);

    fn fill(
        color: ColorU8,
    ) -> impl FnMut(&mut dyn DrawSurface, Constraints) -> Result<Dimensions, RenderError> {
        move |surface: &mut dyn DrawSurface, c: Constraints| {
            surface.fill_rect(Rect::from_size(c.max), color)?;
            Ok(Dimensions::new(c.max))
        }
    }

    #[test]
    fn right_pane_is_offset_and_scoped() {
        let mut list = CommandList::new();
        let constraints = Constraints::new(Size::new(101, 0), Size::new(200, 300));

        let dims = SplitLayout.layout(&mut list, constraints, fill(RED), fill(BLUE)).unwrap();

        assert_eq!(dims.size, Size::new(200, 300));
        assert_eq!(
            list.commands(),
            &[
                DrawCommand::FillRect {
                    rect: Rect::new(0, 0, 50, 300),
                    color: RED
                },
                DrawCommand::PushOffset { dx: 50, dy: 0 },
                DrawCommand::FillRect {
                    rect: Rect::new(0, 0, 51, 300),
                    color: BLUE
                },
                DrawCommand::PopOffset,
            ]
        );
        assert!(list.is_balanced());
    }

    #[test]
    fn children_get_exact_constraints() {
        let mut seen = Vec::new();
        let mut list = CommandList::new();
        {
            let record =
                |_: &mut dyn DrawSurface, c: Constraints| -> Result<Dimensions, RenderError> {
                    seen.push(c);
                    Ok(Dimensions::new(Size::new(1, 1)))
                };
            let constraints = Constraints::exact(Size::new(9, 40));
            // Smaller children do not shrink the split
            let dims = SplitLayout.layout(&mut list, constraints, record, fill(BLUE)).unwrap();
            assert_eq!(dims.size, Size::new(9, 40));
        }
        assert_eq!(seen, vec![Constraints::exact(Size::new(4, 40))]);
    }

    #[test]
    fn tiny_widths_do_not_panic() {
        for width in [0, 1] {
            let mut list = CommandList::new();
            let constraints = Constraints::exact(Size::new(width, 10));
            let result = SplitLayout.layout(&mut list, constraints, fill(RED), fill(BLUE));
            assert!(result.is_ok());
            let (left, right) = SplitLayout::regions(constraints);
            assert_eq!((left.w, right.w), (0, width));
        }
    }

    #[test]
    fn offset_is_popped_when_right_fails() {
        let mut list = CommandList::new();
        let failing = |_: &mut dyn DrawSurface, _: Constraints| -> Result<Dimensions, RenderError> {
            Err(RenderError::Surface("boom".into()))
        };

        let constraints = Constraints::exact(Size::new(10, 10));
        let result = SplitLayout.layout(&mut list, constraints, fill(RED), failing);

        assert!(result.is_err());
        assert!(list.is_balanced());
        assert_eq!(list.commands().last(), Some(&DrawCommand::PopOffset));
    }

    proptest! {
        #[test]
        fn widths_sum_to_minimum(width in 0i32..100_000, height in 0i32..10_000) {
            let constraints = Constraints::new(Size::new(width, 0), Size::new(width + 50, height));
            let (left, right) = SplitLayout::regions(constraints);

            prop_assert_eq!(left.w + right.w, width);
            prop_assert_eq!(left.w, width / 2);
            prop_assert_eq!(right.x, left.w);
            prop_assert_eq!(left.h, height);
            prop_assert_eq!(right.h, height);
        }
    }
}
