//! Game error types

use survivor_engine::config::ConfigError;

use crate::catalog::{PassiveKind, WeaponKind};

/// Errors raised by the game library
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// An upgrade was chosen while no choice was on offer
    #[error("no upgrade choice is pending")]
    NoPendingChoice,

    /// Upgrade index outside the offered cards
    #[error("upgrade choice {index} out of range (offered {offered})")]
    InvalidChoice {
        /// Index that was requested
        index: usize,
        /// Number of cards on offer
        offered: usize,
    },

    /// All weapon slots are in use
    #[error("weapon slots full")]
    WeaponSlotsFull,

    /// All passive slots are in use
    #[error("passive slots full")]
    PassiveSlotsFull,

    /// Weapon is not in the inventory
    #[error("{0:?} is not equipped")]
    WeaponNotOwned(WeaponKind),

    /// Weapon is already at its maximum level
    #[error("{0:?} is already at max level")]
    WeaponMaxLevel(WeaponKind),

    /// Passive is already at its maximum level
    #[error("{0:?} is already at max level")]
    PassiveMaxLevel(PassiveKind),

    /// Weapon does not meet evolution requirements
    #[error("{0:?} cannot evolve")]
    CannotEvolve(WeaponKind),

    /// Tunables failed validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Config or persistence file problem
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for game operations
pub type GameResult<T> = Result<T, GameError>;
