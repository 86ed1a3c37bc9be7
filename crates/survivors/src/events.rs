//! Frame events reported to audio and UI collaborators

use serde::{Deserialize, Serialize};
use survivor_engine::foundation::math::Vec2;

use crate::catalog::EnemyKind;
use crate::pickup::PickupKind;
use crate::progression::UpgradeChoice;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Player HP reached zero
    Died,
    /// Player quit
    Quit,
}

/// Something that happened during a frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An enemy died
    EnemyKilled {
        /// Enemy kind
        kind: EnemyKind,
        /// Where it died
        position: Vec2,
    },
    /// The player lost HP
    PlayerHit {
        /// HP removed after armor
        damage: f32,
        /// HP left
        hp: f32,
    },
    /// The player reached a new level
    LevelUp {
        /// New level
        level: u32,
    },
    /// A boss entered the arena
    BossSpawned {
        /// Spawn position
        position: Vec2,
    },
    /// A pickup was collected
    PickupCollected {
        /// What was collected
        kind: PickupKind,
    },
    /// An upgrade card was applied
    UpgradeApplied {
        /// The card
        choice: UpgradeChoice,
    },
    /// The run ended
    GameOver {
        /// Why
        reason: EndReason,
    },
}
