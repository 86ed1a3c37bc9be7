//! Spatial partitioning data structures
//!
//! Provides spatial indexing for broad-phase collision detection and
//! proximity queries in 2D space.

mod grid;

pub use grid::{GridEntry, SpatialGrid};
