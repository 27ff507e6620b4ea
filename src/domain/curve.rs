//! Parametric egg curve
//!
//! Generates the closed outline of an egg shape from three radii. The
//! outline is centred on the origin and does not depend on any window or
//! surface size; callers position it with an offset.
//!
//! For an angle θ the outline point is:
//!
//! ```text
//! x = a·cos(θ)
//! y = -( sqrt(b² − d²·cos²(θ)) + d·sin(θ) ) · sin(θ)
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::domain::core::Point;

/// Errors raised while evaluating a curve specification
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid curve specification: {reason}")]
    InvalidSpec { reason: String },
}

/// Parameters of the egg curve
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurveSpec {
    /// Horizontal radius
    pub a: f64,
    /// Vertical radius
    pub b: f64,
    /// Asymmetry offset, must not exceed `b`
    pub d: f64,
    /// Angular sampling step in degrees
    pub step_degrees: f64,
}

impl CurveSpec {
    pub const DEFAULT_A: f64 = 110.0;
    pub const DEFAULT_B: f64 = 150.0;
    pub const DEFAULT_D: f64 = 20.0;
    pub const DEFAULT_STEP: f64 = 1.0;
    /// Finest sampling step, 36 000 points per outline
    pub const MIN_STEP: f64 = 0.01;
    /// Largest accepted radius or offset
    pub const MAX_RADIUS: f64 = 10_000.0;

    pub fn new(a: f64, b: f64, d: f64, step_degrees: f64) -> Self {
        Self { a, b, d, step_degrees }
    }

    /// Checks the parameters without generating points
    pub fn validate(&self) -> Result<(), GeometryError> {
        let invalid = |reason: String| Err(GeometryError::InvalidSpec { reason });

        if !self.step_degrees.is_finite() || self.step_degrees <= 0.0 {
            return invalid(format!("step must be positive, got {}", self.step_degrees));
        }
        if self.step_degrees < Self::MIN_STEP {
            return invalid(format!(
                "step must be at least {}, got {}",
                Self::MIN_STEP,
                self.step_degrees
            ));
        }
        for (name, value) in [("a", self.a), ("b", self.b), ("d", self.d)] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
            if value > Self::MAX_RADIUS {
                return invalid(format!("{name} must be at most {}, got {value}", Self::MAX_RADIUS));
            }
        }
        if self.b < self.d {
            return invalid(format!("b ({}) must be >= d ({})", self.b, self.d));
        }

        Ok(())
    }

    /// Upper bound on |y| for any point on the outline
    pub fn vertical_extent(&self) -> f64 {
        self.b + self.d
    }

    /// Evaluates the curve at one angle given in degrees
    fn point_at(&self, degrees: f64) -> Point {
        let rad = degrees.to_radians();
        let cos_t = rad.cos();
        let sin_t = rad.sin();

        let x = self.a * cos_t;
        let root = (self.b * self.b - self.d * self.d * cos_t * cos_t).sqrt();
        let y = -(root + self.d * sin_t) * sin_t;

        Point::new(x as f32, y as f32)
    }
}

impl Default for CurveSpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_A, Self::DEFAULT_B, Self::DEFAULT_D, Self::DEFAULT_STEP)
    }
}

/// Generates the egg outline for `spec`
///
/// Points run from 0° to 360° inclusive in steps of `spec.step_degrees`,
/// which fixes the winding order. Angles are computed as `i * step` so no
/// error accumulates. When 360 is not a multiple of the step a final
/// point at exactly 360° is appended, so the sequence is always closed.
///
/// # Example
/// ```rust
/// use eggtimer::domain::curve::{generate_egg_outline, CurveSpec};
///
/// let points = generate_egg_outline(&CurveSpec::default()).unwrap();
/// assert_eq!(points.len(), 361);
/// ```
pub fn generate_egg_outline(spec: &CurveSpec) -> Result<Vec<Point>, GeometryError> {
    spec.validate()?;

    let steps = (360.0 / spec.step_degrees).floor() as usize;
    let mut points = Vec::with_capacity(steps + 2);

    for i in 0..=steps {
        points.push(spec.point_at(i as f64 * spec.step_degrees));
    }

    let last_angle = steps as f64 * spec.step_degrees;
    if last_angle < 360.0 {
        points.push(spec.point_at(360.0));
    }

    Ok(points)
}
