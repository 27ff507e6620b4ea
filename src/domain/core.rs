//! Core domain types and operations
//!
//! This module defines pure geometric types shared by layout, curve
//! generation and rendering. Nothing here knows about pixels on a screen
//! or any drawing backend.

/// Point in floating-point surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Creates a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Integer size in layout units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    /// Creates a new size
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Componentwise minimum
    pub fn min(self, other: Size) -> Size {
        Size::new(self.w.min(other.w), self.h.min(other.h))
    }

    /// Componentwise maximum
    pub fn max(self, other: Size) -> Size {
        Size::new(self.w.max(other.w), self.h.max(other.h))
    }
}

/// Rectangle in layout units
///
/// Used both as a resolved layout region (origin offset plus exact size)
/// and as a hit-test area for pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Resolved sub-rectangle assigned to one child of a layout
pub type Region = Rect;

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a rectangle at the origin with the given size
    pub fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.w, size.h)
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Returns the size of the rectangle
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Returns true if this rectangle contains the given point
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns the same rectangle moved by (dx, dy)
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Shrinks the rectangle by `inset` on every side, never below zero size
    pub fn inset(&self, inset: i32) -> Rect {
        let w = (self.w - 2 * inset).max(0);
        let h = (self.h - 2 * inset).max(0);
        Rect::new(self.x + inset, self.y + inset, w, h)
    }
}

/// Minimum and maximum size a layout child may occupy
///
/// Invariant: `0 <= min <= max` componentwise. [`Constraints::new`]
/// clamps its inputs so the invariant always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub min: Size,
    pub max: Size,
}

impl Constraints {
    /// Creates constraints, clamping `min` into `[0, max]`
    pub fn new(min: Size, max: Size) -> Self {
        let max = max.max(Size::default());
        let min = min.max(Size::default()).min(max);
        Self { min, max }
    }

    /// Constraints allowing exactly one size
    pub fn exact(size: Size) -> Self {
        Self::new(size, size)
    }

    /// Constraints allowing anything from zero up to `max`
    pub fn loose(max: Size) -> Self {
        Self::new(Size::default(), max)
    }

    /// Clamps a size into these constraints
    pub fn constrain(&self, size: Size) -> Size {
        size.max(self.min).min(self.max)
    }
}

/// Size reported by a widget after it has been laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub size: Size,
}

impl Dimensions {
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}
