//! Scripted player for headless runs
//!
//! Steers away from nearby enemies, drifts toward the closest pickup and
//! back toward the arena center, and always takes the first upgrade card.

use survivor_engine::foundation::math::{normalize_or_zero, Vec2};

use crate::input::FrameInput;
use crate::run::{Phase, Run};

/// Steering weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    /// Enemies closer than this push the player away
    pub danger_radius: f32,
    /// Pull toward the closest pickup
    pub pickup_weight: f32,
    /// Pull toward the arena center
    pub center_weight: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            danger_radius: 160.0,
            pickup_weight: 0.6,
            center_weight: 0.2,
        }
    }
}

impl Autopilot {
    /// Input for the next frame of `run`
    pub fn decide(&self, run: &Run) -> FrameInput {
        match run.phase() {
            Phase::LevelUp => FrameInput::choosing(0),
            Phase::Paused => FrameInput {
                pause: true,
                ..FrameInput::default()
            },
            Phase::Playing => FrameInput::moving(self.steer(run)),
            Phase::GameOver(_) => FrameInput::default(),
        }
    }

    fn steer(&self, run: &Run) -> Vec2 {
        let world = run.world();
        let me = world.player.position;

        let mut flee = Vec2::zeros();
        for enemy in world.enemies.values().filter(|e| !e.is_dead()) {
            let away = me - enemy.position;
            let distance = away.norm();
            if distance < self.danger_radius {
                let urgency = 1.0 - distance / self.danger_radius;
                flee += normalize_or_zero(away) * urgency;
            }
        }

        let seek = world
            .pickups
            .values()
            .map(|p| p.position - me)
            .min_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))
            .map_or_else(Vec2::zeros, normalize_or_zero);

        let home = normalize_or_zero(world.bounds.center() - me);

        normalize_or_zero(flee * 2.0 + seek * self.pickup_weight + home * self.center_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnemyKind, GemTier};
    use crate::config::GameConfig;
    use crate::enemy::Enemy;
    use crate::pickup::{Pickup, PickupKind};

    fn run() -> Run {
        Run::new(GameConfig::default(), 11).unwrap()
    }

    #[test]
    fn test_flees_close_enemy() {
        let mut run = run();
        let me = run.player().position;
        run.world_mut()
            .spawn_enemy(Enemy::spawn(EnemyKind::Tank, me + Vec2::new(60.0, 0.0), 1.0));
        let input = Autopilot::default().decide(&run);
        assert!(input.movement.x < 0.0);
    }

    #[test]
    fn test_seeks_pickup_when_safe() {
        let mut run = run();
        let me = run.player().position;
        run.world_mut()
            .spawn_pickup(Pickup::new(PickupKind::Gem(GemTier::Small), me + Vec2::new(0.0, 300.0)));
        let input = Autopilot::default().decide(&run);
        assert!(input.movement.y > 0.0);
    }

    #[test]
    fn test_over_run_sends_nothing() {
        let mut run = run();
        run.quit();
        assert_eq!(Autopilot::default().decide(&run), FrameInput::default());
    }
}
