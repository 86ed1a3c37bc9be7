//! Collision primitives

use crate::foundation::math::Vec2;

/// Circle collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center in world space
    pub center: Vec2,
    /// Radius
    pub radius: f32,
}

impl Circle {
    /// Create a circle
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether two circles overlap (touching counts)
    pub fn intersects(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        (self.center - other.center).norm_squared() <= reach * reach
    }

    /// Whether a point lies inside the circle
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }
}

/// Axis-aligned bounding box collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Create from corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create from a center point and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Center of the box
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the box
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Box-versus-circle overlap
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        circle.contains(self.closest_point(circle.center))
    }

    /// Box-versus-box overlap
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Radius of the circle enclosing the box, for broad-phase queries
    pub fn bounding_radius(&self) -> f32 {
        self.size().norm() * 0.5
    }
}
