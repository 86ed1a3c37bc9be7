//! Character stat block and upgrade modifiers

use serde::{Deserialize, Serialize};

/// Upper bound on cooldown reduction so intervals never collapse to zero
pub const MAX_COOLDOWN_REDUCTION: f32 = 0.9;

/// Attributes a modifier can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    /// Maximum hit points
    MaxHp,
    /// Units per second
    MoveSpeed,
    /// Gem attraction distance
    PickupRadius,
    /// Damage multiplier
    Might,
    /// Fractional cooldown reduction
    CooldownReduction,
    /// Flat damage reduction
    Armor,
    /// HP restored per second
    Regen,
}

/// How a modifier changes a stat
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    /// Added to the current value
    Flat(f32),
    /// Multiplies the current value by `1 + pct`
    Percent(f32),
}

/// A modifier bound to its stat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatModifier {
    /// Target stat
    pub stat: Stat,
    /// Change to apply
    pub modifier: Modifier,
}

/// Numeric attributes of a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    /// Maximum hit points
    pub max_hp: f32,
    /// Units per second
    pub move_speed: f32,
    /// Gem attraction distance
    pub pickup_radius: f32,
    /// Damage multiplier
    pub might: f32,
    /// Fractional cooldown reduction
    pub cooldown_reduction: f32,
    /// Flat damage reduction
    pub armor: f32,
    /// HP restored per second
    pub regen: f32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            move_speed: 200.0,
            pickup_radius: 80.0,
            might: 1.0,
            cooldown_reduction: 0.0,
            armor: 0.0,
            regen: 0.0,
        }
    }
}

impl StatBlock {
    /// Current value of a stat
    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::MaxHp => self.max_hp,
            Stat::MoveSpeed => self.move_speed,
            Stat::PickupRadius => self.pickup_radius,
            Stat::Might => self.might,
            Stat::CooldownReduction => self.cooldown_reduction,
            Stat::Armor => self.armor,
            Stat::Regen => self.regen,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut f32 {
        match stat {
            Stat::MaxHp => &mut self.max_hp,
            Stat::MoveSpeed => &mut self.move_speed,
            Stat::PickupRadius => &mut self.pickup_radius,
            Stat::Might => &mut self.might,
            Stat::CooldownReduction => &mut self.cooldown_reduction,
            Stat::Armor => &mut self.armor,
            Stat::Regen => &mut self.regen,
        }
    }

    /// Apply a modifier and return how much the stat changed
    pub fn apply(&mut self, change: StatModifier) -> f32 {
        let slot = self.slot(change.stat);
        let before = *slot;
        *slot = match change.modifier {
            Modifier::Flat(amount) => before + amount,
            Modifier::Percent(pct) => before * (1.0 + pct),
        };
        if change.stat == Stat::CooldownReduction {
            *slot = slot.clamp(0.0, MAX_COOLDOWN_REDUCTION);
        }
        *slot - before
    }

    /// Multiplier applied to weapon intervals
    pub fn cooldown_factor(&self) -> f32 {
        1.0 - self.cooldown_reduction.clamp(0.0, MAX_COOLDOWN_REDUCTION)
    }

    /// Damage taken from a hit after armor; never below 1
    pub fn mitigate(&self, damage: f32) -> f32 {
        (damage - self.armor).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_and_percent_modifiers() {
        let mut stats = StatBlock::default();
        let gained = stats.apply(StatModifier {
            stat: Stat::MaxHp,
            modifier: Modifier::Flat(20.0),
        });
        assert_relative_eq!(gained, 20.0);
        assert_relative_eq!(stats.max_hp, 120.0);

        stats.apply(StatModifier {
            stat: Stat::PickupRadius,
            modifier: Modifier::Percent(0.2),
        });
        stats.apply(StatModifier {
            stat: Stat::PickupRadius,
            modifier: Modifier::Percent(0.2),
        });
        assert_relative_eq!(stats.pickup_radius, 80.0 * 1.2 * 1.2, epsilon = 1e-4);
    }

    #[test]
    fn test_cooldown_reduction_is_capped() {
        let mut stats = StatBlock::default();
        for _ in 0..20 {
            stats.apply(StatModifier {
                stat: Stat::CooldownReduction,
                modifier: Modifier::Flat(0.08),
            });
        }
        assert_relative_eq!(stats.cooldown_reduction, MAX_COOLDOWN_REDUCTION);
        assert_relative_eq!(stats.cooldown_factor(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_armor_never_reduces_below_one() {
        let stats = StatBlock {
            armor: 3.0,
            ..StatBlock::default()
        };
        assert_relative_eq!(stats.mitigate(10.0), 7.0);
        assert_relative_eq!(stats.mitigate(2.0), 1.0);
    }
}
