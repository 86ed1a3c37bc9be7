//! # Survivors
//!
//! Simulation core of a top-down survival action game. The player walks an
//! arena while equipped weapons fire on their own; enemies arrive in ever
//! denser waves, drop experience gems, and every level-up offers a choice of
//! weapon and passive upgrades.
//!
//! ## Layout
//!
//! - [`run::Run`] steps one play-through frame by frame
//! - [`session::Session`] wraps runs in menus, options and high scores
//! - [`spawner`], [`weapons`], [`collision`] and [`progression`] are the
//!   per-frame systems the run drives in order
//! - [`registry::World`] owns every live entity in slot-map arenas
//!
//! ## Quick Start
//!
//! ```rust
//! use survivors::autopilot::Autopilot;
//! use survivors::config::GameConfig;
//! use survivors::run::Run;
//!
//! let mut run = Run::new(GameConfig::default(), 42).unwrap();
//! let pilot = Autopilot::default();
//! for _ in 0..120 {
//!     let input = pilot.decide(&run);
//!     run.step(1.0 / 60.0, &input);
//! }
//! assert!(run.elapsed() > 1.9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod autopilot;
pub mod catalog;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod error;
pub mod events;
pub mod input;
pub mod persistence;
pub mod pickup;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod registry;
pub mod run;
pub mod session;
pub mod spawner;
pub mod stats;
pub mod weapons;

pub use error::{GameError, GameResult};

/// Common imports for game users
pub mod prelude {
    pub use crate::{
        autopilot::Autopilot,
        catalog::{EnemyKind, GemTier, PassiveKind, WeaponKind},
        config::GameConfig,
        error::{GameError, GameResult},
        events::{EndReason, GameEvent},
        input::{FrameInput, InputBindings},
        persistence::{HighScore, Options, Storage},
        progression::UpgradeChoice,
        run::{Phase, Run, RunSummary},
        session::{Screen, Session},
    };
}
