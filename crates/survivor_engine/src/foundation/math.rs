//! Math utilities and types
//!
//! Provides the 2D math types used by top-down games.

pub use nalgebra::Vector2;

use serde::{Deserialize, Serialize};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Two times Pi
    pub const TWO_PI: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Normalize a vector, returning zero for degenerate input instead of NaN
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.norm();
    if len > f32::EPSILON {
        v / len
    } else {
        Vec2::zeros()
    }
}

/// Rotate a vector counter-clockwise by `degrees`
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = (degrees * constants::DEG_TO_RAD).sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Unit vector pointing at `radians` from the positive x axis
pub fn from_angle(radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(cos, sin)
}

/// Linear interpolation between two vectors
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Axis-aligned rectangular region, used for world bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Bounds2 {
    /// Create bounds from a minimum and maximum corner
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounds spanning `(0, 0)` to `(width, height)`
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::zeros(), Vec2::new(width, height))
    }

    /// Center of the region
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Shrink the region by `margin` on every side
    pub fn inset(&self, margin: f32) -> Self {
        let margin = Vec2::new(margin, margin);
        Self::new(self.min + margin, self.max - margin)
    }

    /// Clamp a point into the region
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x.max(self.min.x)),
            p.y.clamp(self.min.y, self.max.y.max(self.min.y)),
        )
    }

    /// Whether the region contains a point (inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_normalize_or_zero() {
        assert_eq!(normalize_or_zero(Vec2::zeros()), Vec2::zeros());
        assert_relative_eq!(normalize_or_zero(Vec2::new(3.0, 4.0)), Vec2::new(0.6, 0.8), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_degrees() {
        let up = rotate_degrees(Vec2::new(1.0, 0.0), 90.0);
        assert_relative_eq!(up, Vec2::new(0.0, 1.0), epsilon = EPSILON);

        let back = rotate_degrees(up, -90.0);
        assert_relative_eq!(back, Vec2::new(1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_bounds_clamp_and_inset() {
        let world = Bounds2::from_size(100.0, 50.0);
        assert_eq!(world.clamp(Vec2::new(-5.0, 80.0)), Vec2::new(0.0, 50.0));

        let inner = world.inset(10.0);
        assert_eq!(inner.clamp(Vec2::new(0.0, 0.0)), Vec2::new(10.0, 10.0));
        assert!(inner.contains(Vec2::new(50.0, 25.0)));
        assert!(!inner.contains(Vec2::new(95.0, 25.0)));
        assert_eq!(world.center(), Vec2::new(50.0, 25.0));
    }
}
