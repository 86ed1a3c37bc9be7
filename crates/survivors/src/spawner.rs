//! Enemy spawning and difficulty pacing
//!
//! Regular spawns accumulate through a timer whose interval shrinks with
//! elapsed minutes, so a long frame can produce several spawns. Bosses are
//! counted against elapsed time: the k-th boss appears at the first update at
//! or after `k * boss_interval`, never earlier and never twice.

use rand::Rng;
use survivor_engine::foundation::math::{from_angle, constants::TWO_PI, Vec2};

use crate::catalog::EnemyKind;
use crate::config::{SpawnerConfig, WorldConfig};

/// One enemy the spawner wants created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    /// Kind to create
    pub kind: EnemyKind,
    /// Where to place it
    pub position: Vec2,
    /// Difficulty multiplier to apply
    pub difficulty: f32,
}

/// Spawn statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnerStats {
    /// Enemies requested so far
    pub total_spawned: u64,
    /// Bosses requested so far
    pub bosses_spawned: u32,
    /// Regular spawns skipped because the cap was reached
    pub capped: u64,
}

/// Decides what appears and when
#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnerConfig,
    world: WorldConfig,
    timer: f32,
    stats: SpawnerStats,
}

impl Spawner {
    /// Create a spawner
    pub fn new(config: SpawnerConfig, world: WorldConfig) -> Self {
        Self {
            config,
            world,
            timer: 0.0,
            stats: SpawnerStats::default(),
        }
    }

    /// Spawn statistics
    pub fn stats(&self) -> SpawnerStats {
        self.stats
    }

    /// Regular spawns per second at `minutes` into the run
    pub fn spawn_rate(&self, minutes: f32) -> f32 {
        (self.config.base_rate + self.config.rate_per_minute * minutes.max(0.0)).min(self.config.max_rate)
    }

    /// Difficulty multiplier at `minutes` into the run
    pub fn difficulty(&self, minutes: f32) -> f32 {
        1.0 + self.config.difficulty_per_minute * minutes.max(0.0)
    }

    /// Spawn weights at `minutes` into the run
    ///
    /// Tanks grow more common after minute 2, ghosts and bats after minute 3.
    pub fn weights(&self, minutes: f32) -> Vec<(EnemyKind, f32)> {
        let growth = 1.0 + minutes * 0.1;
        EnemyKind::REGULAR
            .iter()
            .map(|&kind| {
                let base = kind.base().spawn_weight;
                let weight = match kind {
                    EnemyKind::Tank if minutes > 2.0 => base * growth,
                    EnemyKind::Ghost | EnemyKind::Bat if minutes > 3.0 => base * growth,
                    _ => base,
                };
                (kind, weight)
            })
            .collect()
    }

    /// Weighted random regular kind
    pub fn choose_kind(&self, rng: &mut impl Rng, minutes: f32) -> EnemyKind {
        let weights = self.weights(minutes);
        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return EnemyKind::Chaser;
        }

        let mut roll = rng.gen_range(0.0..total);
        for (kind, weight) in weights {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        EnemyKind::Chaser
    }

    /// Random point on the spawn ring around `center`, clamped into the world
    pub fn ring_position(&self, rng: &mut impl Rng, center: Vec2) -> Vec2 {
        let radius = self.world.spawn_radius(self.config.spawn_buffer);
        let point = center + from_angle(rng.gen_range(0.0..TWO_PI)) * radius;
        self.world.bounds().inset(self.config.world_margin).clamp(point)
    }

    /// Advance by `dt` and return what to spawn
    ///
    /// `elapsed` is run time after this step. Regular spawns that would push
    /// the live regular count past the cap are dropped, not deferred.
    pub fn update(
        &mut self,
        dt: f32,
        elapsed: f32,
        player_pos: Vec2,
        live_regular: usize,
        rng: &mut impl Rng,
    ) -> Vec<SpawnRequest> {
        let minutes = elapsed / 60.0;
        let mut requests = Vec::new();
        let mut room = self.config.max_enemies.saturating_sub(live_regular);

        self.timer += dt;
        let interval = 1.0 / self.spawn_rate(minutes);
        while self.timer >= interval {
            self.timer -= interval;
            if room == 0 {
                self.stats.capped += 1;
                continue;
            }

            let kind = self.choose_kind(rng, minutes);
            let difficulty = self.difficulty(minutes);
            let leader = self.ring_position(rng, player_pos);
            let group = (kind.base().group_size as usize).min(room);
            let inner = self.world.bounds().inset(self.config.world_margin);
            let spread = self.config.group_spread;

            for i in 0..group {
                let position = if i == 0 {
                    leader
                } else {
                    let offset = Vec2::new(rng.gen_range(-spread..=spread), rng.gen_range(-spread..=spread));
                    inner.clamp(leader + offset)
                };
                requests.push(SpawnRequest {
                    kind,
                    position,
                    difficulty,
                });
            }
            room -= group;
        }

        let due = (elapsed / self.config.boss_interval).floor() as u32;
        while self.stats.bosses_spawned < due {
            self.stats.bosses_spawned += 1;
            let difficulty = self.difficulty(minutes) * self.config.boss_difficulty;
            let position = self.ring_position(rng, player_pos);
            log::info!(
                "Boss #{} due at {:.0}s (difficulty {:.2})",
                self.stats.bosses_spawned,
                elapsed,
                difficulty
            );
            requests.push(SpawnRequest {
                kind: EnemyKind::Boss,
                position,
                difficulty,
            });
        }

        self.stats.total_spawned += requests.len() as u64;
        requests
    }
}
