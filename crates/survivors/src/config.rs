//! Game configuration
//!
//! Every tunable has a default, and every section is `#[serde(default)]`, so
//! a config file only needs to name the values it changes.

use serde::{Deserialize, Serialize};
use survivor_engine::config::Config;
use survivor_engine::foundation::math::{Bounds2, Vec2};

use crate::catalog::{PassiveKind, WeaponKind, MAX_PASSIVE_LEVEL, MAX_WEAPON_LEVEL};
use crate::error::{GameError, GameResult};
use crate::input::InputBindings;
use crate::stats::StatBlock;

/// Root game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World and view geometry
    pub world: WorldConfig,
    /// Player starting state
    pub player: PlayerConfig,
    /// Spawn pacing and difficulty
    pub spawner: SpawnerConfig,
    /// Pickup drops and collection
    pub drops: DropConfig,
    /// Experience curve and upgrade offers
    pub progression: ProgressionConfig,
    /// Developer settings
    pub cheats: CheatConfig,
    /// Frame timing
    pub timing: TimingConfig,
    /// Key bindings
    pub controls: InputBindings,
}

/// World configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width
    pub width: f32,
    /// World height
    pub height: f32,
    /// Visible area width, used to place spawns off screen
    pub view_width: f32,
    /// Visible area height
    pub view_height: f32,
    /// Broad-phase grid cell size
    pub grid_cell_size: f32,
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Stats before any passive
    pub stats: StatBlock,
    /// Collision radius
    pub radius: f32,
    /// Invincibility window after a hit (seconds)
    pub invincibility: f32,
    /// Weapon equipped at the start of a run
    pub starting_weapon: WeaponKind,
    /// Level of the starting weapon
    pub starting_weapon_level: u32,
    /// Passives owned at the start, with their levels
    pub starting_passives: Vec<(PassiveKind, u32)>,
}

/// Spawner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Spawns per second at minute zero
    pub base_rate: f32,
    /// Spawns per second added per minute
    pub rate_per_minute: f32,
    /// Spawn rate ceiling
    pub max_rate: f32,
    /// Difficulty multiplier added per minute
    pub difficulty_per_minute: f32,
    /// Seconds between bosses
    pub boss_interval: f32,
    /// Extra difficulty factor for bosses
    pub boss_difficulty: f32,
    /// Live regular enemies above which regular spawns pause
    pub max_enemies: usize,
    /// Distance beyond the view edge where enemies appear
    pub spawn_buffer: f32,
    /// Distance kept from the world edge
    pub world_margin: f32,
    /// Scatter around the leader for group spawns
    pub group_spread: f32,
}

/// Drop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Chance per kill of a health pickup
    pub health_chance: f64,
    /// Chance per kill of a chest
    pub chest_chance: f64,
    /// HP restored by a health pickup
    pub health_value: f32,
    /// Base pull speed of magnetized pickups
    pub magnet_speed: f32,
    /// Distance at which a magnetized pickup is collected
    pub collect_distance: f32,
    /// Chest touch distance
    pub chest_reach: f32,
}

/// Progression configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Base experience for the level curve
    pub base_xp: u32,
    /// Experience added per level
    pub xp_per_level: u32,
    /// Level cap
    pub max_level: u32,
    /// Fraction of max HP restored on level-up
    pub level_up_heal: f32,
    /// Cards offered per choice
    pub choices: usize,
}

/// Developer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheatConfig {
    /// Player takes no damage
    pub unlimited_health: bool,
    /// Scales collected experience
    pub exp_multiplier: f32,
}

/// Frame timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Largest simulation step (seconds)
    pub max_delta: f32,
    /// Step used by fixed-rate drivers
    pub fixed_step: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            view_width: 1280.0,
            view_height: 720.0,
            grid_cell_size: 64.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stats: StatBlock::default(),
            radius: 24.0,
            invincibility: 0.5,
            starting_weapon: WeaponKind::Whip,
            starting_weapon_level: 1,
            starting_passives: Vec::new(),
        }
    }
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            base_rate: 1.0,
            rate_per_minute: 0.1,
            max_rate: 10.0,
            difficulty_per_minute: 0.05,
            boss_interval: 600.0,
            boss_difficulty: 1.5,
            max_enemies: 400,
            spawn_buffer: 100.0,
            world_margin: 50.0,
            group_spread: 30.0,
        }
    }
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            health_chance: 0.02,
            chest_chance: 0.005,
            health_value: 20.0,
            magnet_speed: 500.0,
            collect_distance: 5.0,
            chest_reach: 10.0,
        }
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_xp: 100,
            xp_per_level: 50,
            max_level: 100,
            level_up_heal: 0.1,
            choices: 3,
        }
    }
}

impl Default for CheatConfig {
    fn default() -> Self {
        Self {
            unlimited_health: false,
            exp_multiplier: 1.0,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_delta: 0.1,
            fixed_step: 1.0 / 60.0,
        }
    }
}

impl Config for GameConfig {}

impl WorldConfig {
    /// World rectangle
    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_size(self.width, self.height)
    }

    /// Player start position
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Spawn ring radius for a given buffer: half the view diagonal plus buffer
    pub fn spawn_radius(&self, buffer: f32) -> f32 {
        Vec2::new(self.view_width * 0.5, self.view_height * 0.5).norm() + buffer
    }
}

impl GameConfig {
    /// Load from a TOML, RON or JSON file and validate
    pub fn load(path: impl AsRef<std::path::Path>) -> GameResult<Self> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `load`, but a missing, malformed or invalid file yields defaults
    pub fn load_or_fallback(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Ignoring config {}: {}; using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> GameResult<()> {
        let fail = |msg: &str| Err(GameError::InvalidConfig(msg.to_string()));

        if self.world.width <= 2.0 * self.spawner.world_margin
            || self.world.height <= 2.0 * self.spawner.world_margin
        {
            return fail("world must be larger than twice the spawn margin");
        }
        if self.world.grid_cell_size <= 0.0 {
            return fail("grid_cell_size must be positive");
        }
        if self.spawner.base_rate <= 0.0 || self.spawner.max_rate < self.spawner.base_rate {
            return fail("spawn rates must be positive with max_rate >= base_rate");
        }
        if self.spawner.rate_per_minute < 0.0 || self.spawner.difficulty_per_minute < 0.0 {
            return fail("spawn rate and difficulty must not decrease over time");
        }
        if self.spawner.boss_interval <= 0.0 {
            return fail("boss_interval must be positive");
        }
        if self.progression.choices == 0 || self.progression.max_level < 2 {
            return fail("progression needs at least one choice and two levels");
        }
        if !(1..=MAX_WEAPON_LEVEL).contains(&self.player.starting_weapon_level) {
            return fail("starting_weapon_level must be within 1..=8");
        }
        if self
            .player
            .starting_passives
            .iter()
            .any(|(_, level)| !(1..=MAX_PASSIVE_LEVEL).contains(level))
        {
            return fail("starting passive levels must be within 1..=5");
        }
        if !(0.25..=5.0).contains(&self.cheats.exp_multiplier) {
            return fail("exp_multiplier must be within 0.25..=5.0");
        }
        if self.timing.max_delta <= 0.0 || self.timing.fixed_step <= 0.0 {
            return fail("timing steps must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use survivor_engine::config::ConfigFormat;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_spawn_radius_is_half_diagonal_plus_buffer() {
        let world = WorldConfig::default();
        let half_diagonal = (640.0f32 * 640.0 + 360.0 * 360.0).sqrt();
        assert_relative_eq!(world.spawn_radius(100.0), half_diagonal + 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let text = r#"
            [spawner]
            max_enemies = 50

            [player]
            starting_weapon = "knife"
        "#;
        let config = GameConfig::from_str_as(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.spawner.max_enemies, 50);
        assert_eq!(config.player.starting_weapon, WeaponKind::Knife);
        assert_relative_eq!(config.spawner.base_rate, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_overrides() {
        let text = "(cheats: (unlimited_health: true, exp_multiplier: 2.0))";
        let config = GameConfig::from_str_as(text, ConfigFormat::Ron).unwrap();
        assert!(config.cheats.unlimited_health);
        assert_relative_eq!(config.cheats.exp_multiplier, 2.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.player.starting_weapon_level = 9;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = GameConfig::default();
        config.spawner.rate_per_minute = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_config_files_fall_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();

        let malformed = dir.path().join("broken.toml");
        std::fs::write(&malformed, "[spawner\nmax_enemies = ").unwrap();
        assert!(GameConfig::load(&malformed).is_err());
        assert_eq!(GameConfig::load_or_fallback(&malformed), GameConfig::default());

        let invalid = dir.path().join("invalid.toml");
        std::fs::write(&invalid, "[player]\nstarting_weapon_level = 12\n").unwrap();
        assert!(matches!(GameConfig::load(&invalid), Err(GameError::InvalidConfig(_))));
        assert_eq!(GameConfig::load_or_fallback(&invalid), GameConfig::default());

        let missing = dir.path().join("absent.ron");
        assert_eq!(GameConfig::load_or_fallback(&missing), GameConfig::default());

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[spawner]\nmax_enemies = 25\n").unwrap();
        assert_eq!(GameConfig::load_or_fallback(&good).spawner.max_enemies, 25);
    }
}
