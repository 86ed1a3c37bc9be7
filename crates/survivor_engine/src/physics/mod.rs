//! Physics module
//!
//! Lightweight 2D overlap tests and layer filtering. There is no rigid-body
//! response; games decide what an overlap means.

pub mod collision_layers;
pub mod primitives;

pub use collision_layers::CollisionLayers;
pub use primitives::{Aabb, Circle};
