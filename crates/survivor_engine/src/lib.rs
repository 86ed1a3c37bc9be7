//! # Survivor Engine
//!
//! Game-agnostic foundation for frame-stepped 2D action games.
//!
//! ## Features
//!
//! - **Math**: 2D vector types over `nalgebra` plus the small helpers games reach for
//! - **Timing**: delta-time clock with a cap, dt-driven cooldowns, stopwatches
//! - **Arenas**: `slotmap`-backed storage with stable generational identifiers
//! - **Config**: TOML / RON / JSON files with a fall-back-to-defaults loader
//! - **Events**: typed per-frame event queues
//! - **Collision**: layer filtering, circle/box overlap, uniform spatial grid
//! - **Input**: key and mouse state tracking with per-frame edges
//!
//! ## Quick Start
//!
//! ```rust
//! use survivor_engine::prelude::*;
//!
//! let mut clock = FrameClock::new(0.1);
//! let mut cooldown = Cooldown::new(1.0);
//!
//! let dt = clock.advance(0.016);
//! if cooldown.tick(dt) {
//!     // fire!
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        events::EventQueue,
        foundation::{
            math::{Bounds2, Vec2},
            time::{Cooldown, FrameClock, Stopwatch},
        },
        input::{InputState, KeyCode, MouseButton},
        physics::{Aabb, Circle, CollisionLayers},
        spatial::SpatialGrid,
    };
}
