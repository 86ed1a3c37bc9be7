//! Run controller
//!
//! A `Run` owns one play-through: the world, the inventory, the level-up
//! queue and the RNG. `step` advances it by one frame in a fixed order:
//! elapsed time, spawns, movement, weapon fire, collisions, pickups and
//! progression, then removal of dead and spent entities. Paused, level-up
//! and game-over phases freeze the simulation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use survivor_engine::events::EventQueue;
use survivor_engine::foundation::time::{format_mm_ss, FrameClock, Stopwatch};

use crate::collision::CollisionSystem;
use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::error::{GameError, GameResult};
use crate::events::{EndReason, GameEvent};
use crate::input::FrameInput;
use crate::pickup::PickupKind;
use crate::player::Player;
use crate::progression::{apply_passive, Progression, UpgradeChoice};
use crate::registry::{EntityCounts, PickupId, World};
use crate::spawner::{Spawner, SpawnerStats};
use crate::weapons::{Arsenal, FireContext};

/// What the run is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Simulation advancing
    Playing,
    /// Frozen by the player
    Paused,
    /// Frozen while an upgrade card is picked
    LevelUp,
    /// Finished
    GameOver(EndReason),
}

/// Final numbers of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// RNG seed
    pub seed: u64,
    /// Seconds survived
    pub survival_time: f32,
    /// Enemies killed
    pub kills: u32,
    /// Level reached
    pub level: u32,
    /// HP removed from enemies
    pub damage_dealt: f32,
    /// HP lost
    pub damage_taken: f32,
    /// Bosses that appeared
    pub bosses_spawned: u32,
    /// How the run ended, if it has
    pub reason: Option<EndReason>,
}

/// Numbers for the debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSnapshot {
    /// Frames stepped
    pub frame: u64,
    /// Seconds of play
    pub elapsed: f32,
    /// Live entities
    pub counts: EntityCounts,
    /// Regular spawns per second right now
    pub spawn_rate: f32,
    /// Difficulty multiplier right now
    pub difficulty: f32,
    /// Spawner totals
    pub spawner: SpawnerStats,
}

/// One play-through
#[derive(Debug, Clone)]
pub struct Run {
    config: GameConfig,
    seed: u64,
    rng: StdRng,
    clock: FrameClock,
    stopwatch: Stopwatch,
    world: World,
    arsenal: Arsenal,
    progression: Progression,
    spawner: Spawner,
    collisions: CollisionSystem,
    events: EventQueue<GameEvent>,
    phase: Phase,
    show_debug: bool,
}

impl Run {
    /// Start a run with the player at the world center holding the starting loadout
    pub fn new(config: GameConfig, seed: u64) -> GameResult<Self> {
        config.validate()?;

        let mut world = World::new(&config);
        let mut arsenal = Arsenal::new();
        let start = config.player.starting_weapon;
        arsenal.add_weapon(start, &world.player.stats)?;
        for _ in 1..config.player.starting_weapon_level {
            arsenal.level_weapon(start, &world.player.stats)?;
        }
        for &(kind, level) in &config.player.starting_passives {
            for _ in 0..level {
                arsenal.add_passive(kind)?;
                apply_passive(kind, &mut world.player);
            }
        }
        arsenal.refresh(&world.player.stats);

        log::info!(
            "Run started (seed {}, weapon {}, {} passive(s))",
            seed,
            start.name(),
            arsenal.passives().len()
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            clock: FrameClock::new(config.timing.max_delta),
            stopwatch: Stopwatch::start_new(),
            progression: Progression::new(&config.progression),
            spawner: Spawner::new(config.spawner.clone(), config.world.clone()),
            collisions: CollisionSystem::new(config.world.grid_cell_size),
            events: EventQueue::new(),
            phase: Phase::Playing,
            show_debug: false,
            seed,
            world,
            arsenal,
            config,
        })
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the run has ended
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// Seconds of play so far
    pub fn elapsed(&self) -> f32 {
        self.stopwatch.elapsed_secs()
    }

    /// RNG seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Tunables this run was started with
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Every live entity
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for scripted scenarios and tools
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.world.player
    }

    /// Weapons and passives
    pub fn arsenal(&self) -> &Arsenal {
        &self.arsenal
    }

    /// Level-up queue and current offer
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Whether the debug overlay is on
    pub fn show_debug(&self) -> bool {
        self.show_debug
    }

    /// Take this frame's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Advance by one frame; returns the capped step actually used
    pub fn step(&mut self, raw_dt: f32, input: &FrameInput) -> f32 {
        let dt = self.clock.advance(raw_dt);
        if self.is_over() {
            return dt;
        }
        if input.quit {
            self.end(EndReason::Quit);
            return dt;
        }
        if input.toggle_debug {
            self.show_debug = !self.show_debug;
        }

        match self.phase {
            Phase::Playing if input.pause => self.phase = Phase::Paused,
            Phase::Playing => self.simulate(dt, input),
            Phase::Paused => {
                if input.pause {
                    self.phase = Phase::Playing;
                }
            }
            Phase::LevelUp => self.handle_level_up(input),
            Phase::GameOver(_) => {}
        }
        dt
    }

    /// Apply card `index` of the current offer
    pub fn choose_upgrade(&mut self, index: usize) -> GameResult<UpgradeChoice> {
        if self.phase != Phase::LevelUp {
            return Err(GameError::NoPendingChoice);
        }
        let choice = self
            .progression
            .choose(index, &mut self.world.player, &mut self.arsenal)?;
        self.events.send(GameEvent::UpgradeApplied { choice });

        if !self.progression.prepare_offer(&self.arsenal, &mut self.rng) {
            self.phase = Phase::Playing;
        }
        Ok(choice)
    }

    /// End the run by player request
    pub fn quit(&mut self) {
        if !self.is_over() {
            self.end(EndReason::Quit);
        }
    }

    /// Final or running totals
    pub fn summary(&self) -> RunSummary {
        let player = &self.world.player;
        RunSummary {
            seed: self.seed,
            survival_time: self.elapsed(),
            kills: player.kills,
            level: player.experience.level,
            damage_dealt: player.damage_dealt,
            damage_taken: player.damage_taken,
            bosses_spawned: self.spawner.stats().bosses_spawned,
            reason: match self.phase {
                Phase::GameOver(reason) => Some(reason),
                _ => None,
            },
        }
    }

    /// Numbers for the debug overlay
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        let minutes = self.stopwatch.elapsed_minutes();
        DebugSnapshot {
            frame: self.clock.frame_count(),
            elapsed: self.elapsed(),
            counts: self.world.counts(),
            spawn_rate: self.spawner.spawn_rate(minutes),
            difficulty: self.spawner.difficulty(minutes),
            spawner: self.spawner.stats(),
        }
    }

    fn handle_level_up(&mut self, input: &FrameInput) {
        if input.nav != 0 {
            self.progression.navigate(input.nav);
        }
        let index = match (input.choice, input.confirm) {
            (Some(index), _) => index,
            (None, true) => self.progression.selected(),
            (None, false) => return,
        };
        if let Err(err) = self.choose_upgrade(index) {
            log::warn!("Upgrade rejected: {}", err);
        }
    }

    fn simulate(&mut self, dt: f32, input: &FrameInput) {
        self.stopwatch.tick(dt);
        let elapsed = self.stopwatch.elapsed_secs();
        let now = f64::from(elapsed);

        // Spawns
        let player_pos = self.world.player.position;
        let requests = self.spawner.update(
            dt,
            elapsed,
            player_pos,
            self.world.regular_enemy_count(),
            &mut self.rng,
        );
        for request in requests {
            let enemy = Enemy::spawn(request.kind, request.position, request.difficulty);
            if request.kind.is_boss() {
                self.events.send(GameEvent::BossSpawned {
                    position: request.position,
                });
            }
            self.world.spawn_enemy(enemy);
        }

        // Movement
        let bounds = self.world.bounds;
        self.world.player.steer(input.movement, dt, &bounds);
        self.world.player.tick(dt);
        let target = self.world.player.position;
        for enemy in self.world.enemies.values_mut() {
            enemy.update(dt, target, &bounds);
        }
        let enemies = &self.world.enemies;
        for projectile in self.world.projectiles.values_mut() {
            let homing_goal = projectile
                .target()
                .and_then(|id| enemies.get(id))
                .filter(|e| !e.is_dead())
                .map(|e| e.position);
            projectile.update(dt, homing_goal);
        }

        // Weapons
        self.collisions.rebuild(&self.world);
        let context = FireContext {
            origin: self.world.player.position,
            facing: self.world.player.facing,
            nearest_enemy: self.collisions.nearest_enemy(self.world.player.position),
        };
        for shot in self.arsenal.fire(dt, &context, &mut self.rng) {
            self.world.spawn_projectile(shot);
        }

        // Collisions
        let report = self.collisions.resolve(
            &mut self.world,
            &mut self.arsenal,
            &self.config.drops,
            now,
            &mut self.rng,
            &mut self.events,
        );

        // Pickups and progression
        self.collect_pickups(dt);

        // Cleanup
        let removed = self.world.prune();
        CollisionSystem::forget(&mut self.arsenal, &removed);

        if report.player_died || self.world.player.is_dead() {
            self.end(EndReason::Died);
        } else if self.progression.prepare_offer(&self.arsenal, &mut self.rng) {
            self.phase = Phase::LevelUp;
        }
    }

    fn collect_pickups(&mut self, dt: f32) {
        let player_pos = self.world.player.position;
        let radius = self.world.player.stats.pickup_radius;
        let drops = &self.config.drops;
        let collected: Vec<(PickupId, PickupKind)> = self
            .world
            .pickups
            .iter_mut()
            .filter_map(|(id, pickup)| pickup.update(dt, player_pos, radius, drops).then_some((id, pickup.kind)))
            .collect();

        let mut gem_xp = 0;
        for (id, kind) in collected {
            self.world.pickups.remove(id);
            match kind {
                PickupKind::Gem(tier) => gem_xp += tier.value(),
                PickupKind::Health => self.world.player.heal(self.config.drops.health_value),
                PickupKind::Chest => self.progression.queue_chest(),
            }
            self.events.send(GameEvent::PickupCollected { kind });
        }

        // The multiplier scales the frame's total so small gems still count
        let xp = (gem_xp as f32 * self.config.cheats.exp_multiplier) as u32;
        if xp > 0 && self.progression.gain_experience(&mut self.world.player, xp) > 0 {
            self.events.send(GameEvent::LevelUp {
                level: self.world.player.experience.level,
            });
        }
    }

    fn end(&mut self, reason: EndReason) {
        self.phase = Phase::GameOver(reason);
        self.stopwatch.stop();
        self.events.send(GameEvent::GameOver { reason });
        let player = &self.world.player;
        log::info!(
            "Run over ({:?}) at {} with {} kills, level {}",
            reason,
            format_mm_ss(self.stopwatch.elapsed_secs()),
            player.kills,
            player.experience.level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnemyKind, GemTier, PassiveKind, WeaponKind};
    use crate::pickup::Pickup;
    use approx::assert_relative_eq;
    use survivor_engine::foundation::math::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_config() -> GameConfig {
        let mut config = GameConfig::default();
        // Nearly no regular spawns so tests control the arena
        config.spawner.base_rate = 0.001;
        config.spawner.max_rate = 0.001;
        config.spawner.rate_per_minute = 0.0;
        config
    }

    fn run() -> Run {
        Run::new(quiet_config(), 7).unwrap()
    }

    fn pause() -> FrameInput {
        FrameInput {
            pause: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn test_starting_loadout() {
        let mut config = quiet_config();
        config.player.starting_weapon = WeaponKind::Knife;
        config.player.starting_weapon_level = 3;
        config.player.starting_passives = vec![(PassiveKind::HollowHeart, 2)];
        let run = Run::new(config, 1).unwrap();
        assert_eq!(run.arsenal().weapon(WeaponKind::Knife).map(|w| w.level), Some(3));
        assert_relative_eq!(run.player().stats.max_hp, 140.0);
        assert_relative_eq!(run.player().hp, 140.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.progression.choices = 0;
        assert!(Run::new(config, 0).is_err());
    }

    #[test]
    fn test_delta_is_capped() {
        let mut run = run();
        assert_relative_eq!(run.step(5.0, &FrameInput::default()), 0.1);
        assert_relative_eq!(run.elapsed(), 0.1);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut run = run();
        run.step(DT, &FrameInput::default());
        let before = run.elapsed();
        run.step(DT, &pause());
        assert_eq!(run.phase(), Phase::Paused);
        for _ in 0..30 {
            run.step(DT, &FrameInput::default());
        }
        assert_relative_eq!(run.elapsed(), before);
        run.step(DT, &pause());
        assert_eq!(run.phase(), Phase::Playing);
    }

    #[test]
    fn test_quit_ends_run() {
        let mut run = run();
        run.step(
            DT,
            &FrameInput {
                quit: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(run.phase(), Phase::GameOver(EndReason::Quit));
        assert!(run
            .drain_events()
            .contains(&GameEvent::GameOver { reason: EndReason::Quit }));
        assert_eq!(run.summary().reason, Some(EndReason::Quit));
    }

    #[test]
    fn test_gems_trigger_level_up_choice() {
        let mut run = run();
        let at = run.player().position;
        run.world.spawn_pickup(Pickup::new(PickupKind::Gem(GemTier::Large), at));
        run.world.spawn_pickup(Pickup::new(PickupKind::Gem(GemTier::Large), at));
        run.step(DT, &FrameInput::default());

        assert_eq!(run.phase(), Phase::LevelUp);
        assert_eq!(run.player().experience.level, 2);
        assert!(!run.progression().offer().is_empty());

        // Frozen while choosing
        let frozen = run.elapsed();
        run.step(DT, &FrameInput::default());
        assert_relative_eq!(run.elapsed(), frozen);

        assert!(run.choose_upgrade(9).is_err());
        assert_eq!(run.phase(), Phase::LevelUp);

        run.step(DT, &FrameInput::choosing(0));
        assert_eq!(run.phase(), Phase::Playing);
        assert!(run
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::UpgradeApplied { .. })));
    }

    #[test]
    fn test_choose_outside_level_up_is_error() {
        let mut run = run();
        assert!(matches!(run.choose_upgrade(0), Err(GameError::NoPendingChoice)));
    }

    #[test]
    fn test_exp_multiplier_scales_gems() {
        let mut config = quiet_config();
        config.cheats.exp_multiplier = 2.0;
        let mut run = Run::new(config, 3).unwrap();
        let at = run.player().position;
        run.world.spawn_pickup(Pickup::new(PickupKind::Gem(GemTier::Medium), at));
        run.step(DT, &FrameInput::default());
        assert_eq!(run.player().experience.xp, 10);
    }

    #[test]
    fn test_fractional_multiplier_scales_frame_total() {
        let mut config = quiet_config();
        config.cheats.exp_multiplier = 0.5;
        let mut run = Run::new(config, 3).unwrap();
        let at = run.player().position;
        for _ in 0..10 {
            run.world.spawn_pickup(Pickup::new(PickupKind::Gem(GemTier::Small), at));
        }
        run.world.spawn_pickup(Pickup::new(PickupKind::Gem(GemTier::Medium), at));
        run.step(DT, &FrameInput::default());

        assert!(run.world().pickups.is_empty());
        // (10 + 5) * 0.5 rounds down once
        assert_eq!(run.player().experience.xp, 7);
    }

    #[test]
    fn test_chest_queues_choice() {
        let mut run = run();
        let at = run.player().position;
        run.world.spawn_pickup(Pickup::new(PickupKind::Chest, at));
        run.step(DT, &FrameInput::default());
        assert_eq!(run.phase(), Phase::LevelUp);
        assert_eq!(run.player().experience.level, 1);
    }

    #[test]
    fn test_death_ends_run() {
        let mut run = run();
        run.world.player.hp = 1.0;
        let at = run.player().position + Vec2::new(10.0, 0.0);
        run.world.spawn_enemy(Enemy::spawn(EnemyKind::Boss, at, 1.0));
        run.step(DT, &FrameInput::default());
        assert_eq!(run.phase(), Phase::GameOver(EndReason::Died));
        let events = run.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
        assert!(events.contains(&GameEvent::GameOver { reason: EndReason::Died }));

        // Further steps do nothing
        let t = run.elapsed();
        run.step(DT, &FrameInput::default());
        assert_relative_eq!(run.elapsed(), t);
    }

    #[test]
    fn test_debug_toggle_and_snapshot() {
        let mut run = run();
        run.step(
            DT,
            &FrameInput {
                toggle_debug: true,
                ..FrameInput::default()
            },
        );
        assert!(run.show_debug());
        let snapshot = run.debug_snapshot();
        assert_eq!(snapshot.frame, 1);
        assert_relative_eq!(snapshot.difficulty, 1.0, epsilon = 1e-3);
    }
}
