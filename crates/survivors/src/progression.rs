//! Experience, level-ups and upgrade offers
//!
//! Crossing an XP threshold queues a pending choice. While a choice is
//! pending the run freezes and the player picks one of up to three cards.
//! Several thresholds crossed in one frame queue several choices; chests
//! queue one more.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{PassiveKind, WeaponKind, MAX_PASSIVE_LEVEL};
use crate::config::ProgressionConfig;
use crate::error::{GameError, GameResult};
use crate::player::Player;
use crate::weapons::Arsenal;

/// Level and XP toward the next level
#[derive(Debug, Clone)]
pub struct Experience {
    /// Current level, starting at 1
    pub level: u32,
    /// XP gathered toward the next level
    pub xp: u32,
    /// XP needed to leave the current level
    pub xp_to_next: u32,
    /// XP gathered over the whole run
    pub total: u64,
    base_xp: u32,
    xp_per_level: u32,
    max_level: u32,
}

impl Experience {
    /// Level 1 with no XP
    pub fn new(config: &ProgressionConfig) -> Self {
        let mut experience = Self {
            level: 1,
            xp: 0,
            xp_to_next: 0,
            total: 0,
            base_xp: config.base_xp,
            xp_per_level: config.xp_per_level,
            max_level: config.max_level,
        };
        experience.xp_to_next = experience.threshold(1);
        experience
    }

    /// XP required to leave `level`
    pub fn threshold(&self, level: u32) -> u32 {
        (self.base_xp + level.saturating_sub(1) * self.xp_per_level) / 2
    }

    /// Whether the level cap has been reached
    pub fn is_max_level(&self) -> bool {
        self.level >= self.max_level
    }

    /// Progress toward the next level in 0..=1
    pub fn fraction(&self) -> f32 {
        if self.is_max_level() || self.xp_to_next == 0 {
            1.0
        } else {
            (self.xp as f32 / self.xp_to_next as f32).min(1.0)
        }
    }

    /// Add XP; returns how many levels were gained
    pub fn gain(&mut self, amount: u32) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        self.total += u64::from(amount);

        let mut gained = 0;
        while !self.is_max_level() && self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.xp_to_next = self.threshold(self.level);
            gained += 1;
        }
        gained
    }
}

/// One card on the level-up screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeChoice {
    /// Equip a weapon not yet owned
    NewWeapon(WeaponKind),
    /// Raise an owned weapon to the given level
    WeaponLevel(WeaponKind, u32),
    /// Pick up a passive not yet owned
    NewPassive(PassiveKind),
    /// Raise an owned passive to the given level
    PassiveLevel(PassiveKind, u32),
    /// Evolve a max-level weapon
    Evolution(WeaponKind),
}

impl UpgradeChoice {
    /// Card title
    pub fn title(&self) -> String {
        match self {
            UpgradeChoice::NewWeapon(kind) => format!("New: {}", kind.name()),
            UpgradeChoice::WeaponLevel(kind, level) => format!("{} Lv {}", kind.name(), level),
            UpgradeChoice::NewPassive(kind) => format!("New: {}", kind.name()),
            UpgradeChoice::PassiveLevel(kind, level) => format!("{} Lv {}", kind.name(), level),
            UpgradeChoice::Evolution(kind) => match kind.evolution() {
                Some(evolution) => format!("Evolve: {}", evolution.name),
                None => format!("Evolve: {}", kind.name()),
            },
        }
    }

    /// Card body text
    pub fn description(&self) -> String {
        match self {
            UpgradeChoice::NewWeapon(kind) | UpgradeChoice::WeaponLevel(kind, _) => {
                kind.description().to_string()
            }
            UpgradeChoice::NewPassive(kind) | UpgradeChoice::PassiveLevel(kind, _) => {
                kind.description().to_string()
            }
            UpgradeChoice::Evolution(kind) => format!("Transform {} into its final form", kind.name()),
        }
    }
}

/// Apply one level of a passive's stat effect to the player
///
/// Hollow Heart also heals the HP it adds.
pub fn apply_passive(kind: PassiveKind, player: &mut Player) {
    let delta = player.stats.apply(kind.effect());
    if kind == PassiveKind::HollowHeart {
        player.heal(delta);
    }
}

/// Level-up queue and the offer currently on screen
#[derive(Debug, Clone)]
pub struct Progression {
    pending: u32,
    offer: Vec<UpgradeChoice>,
    selected: usize,
    choices: usize,
    level_up_heal: f32,
}

impl Progression {
    /// Empty queue
    pub fn new(config: &ProgressionConfig) -> Self {
        Self {
            pending: 0,
            offer: Vec::new(),
            selected: 0,
            choices: config.choices,
            level_up_heal: config.level_up_heal,
        }
    }

    /// Choices still owed to the player, the one on screen included
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Whether a choice is waiting for the player
    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// Cards currently offered
    pub fn offer(&self) -> &[UpgradeChoice] {
        &self.offer
    }

    /// Highlighted card
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the highlight by `delta` cards, wrapping around
    pub fn navigate(&mut self, delta: i32) {
        if self.offer.is_empty() || delta == 0 {
            return;
        }
        let len = self.offer.len() as i64;
        self.selected = (self.selected as i64 + i64::from(delta)).rem_euclid(len) as usize;
    }

    /// Add XP to the player; each level gained heals and queues a choice
    pub fn gain_experience(&mut self, player: &mut Player, amount: u32) -> u32 {
        let levels = player.experience.gain(amount);
        for _ in 0..levels {
            player.heal(player.stats.max_hp * self.level_up_heal);
        }
        if levels > 0 {
            self.pending += levels;
            log::info!("Level up: now level {}", player.experience.level);
        }
        levels
    }

    /// Queue one extra choice from a chest
    pub fn queue_chest(&mut self) {
        self.pending += 1;
    }

    /// Every legal upgrade for the current inventory, in a stable order
    pub fn available_choices(arsenal: &Arsenal) -> Vec<UpgradeChoice> {
        let mut options = Vec::new();

        for weapon in arsenal.weapons() {
            if weapon.can_level() {
                options.push(UpgradeChoice::WeaponLevel(weapon.kind, weapon.level + 1));
            }
        }
        if arsenal.has_weapon_slot() {
            options.extend(
                WeaponKind::ALL
                    .into_iter()
                    .filter(|kind| arsenal.weapon(*kind).is_none())
                    .map(UpgradeChoice::NewWeapon),
            );
        }

        for passive in arsenal.passives() {
            if passive.level < MAX_PASSIVE_LEVEL {
                options.push(UpgradeChoice::PassiveLevel(passive.kind, passive.level + 1));
            }
        }
        if arsenal.has_passive_slot() {
            options.extend(
                PassiveKind::ALL
                    .into_iter()
                    .filter(|kind| arsenal.passive_level(*kind).is_none())
                    .map(UpgradeChoice::NewPassive),
            );
        }

        options.extend(arsenal.evolvable().into_iter().map(UpgradeChoice::Evolution));
        options
    }

    /// Make sure an offer is on screen when a choice is pending
    ///
    /// Returns true while the player has a choice to make. A pending choice
    /// with nothing left to offer is dropped.
    pub fn prepare_offer(&mut self, arsenal: &Arsenal, rng: &mut impl Rng) -> bool {
        if !self.offer.is_empty() {
            return true;
        }
        if self.pending == 0 {
            return false;
        }

        let mut options = Self::available_choices(arsenal);
        if options.is_empty() {
            log::debug!("No upgrades left; dropping {} pending choice(s)", self.pending);
            self.pending = 0;
            return false;
        }

        options.shuffle(rng);
        options.truncate(self.choices);
        self.offer = options;
        self.selected = 0;
        true
    }

    /// Apply card `index`; errors leave the offer untouched
    pub fn choose(&mut self, index: usize, player: &mut Player, arsenal: &mut Arsenal) -> GameResult<UpgradeChoice> {
        if self.offer.is_empty() {
            return Err(GameError::NoPendingChoice);
        }
        let choice = *self.offer.get(index).ok_or(GameError::InvalidChoice {
            index,
            offered: self.offer.len(),
        })?;

        Self::apply(choice, player, arsenal)?;
        log::debug!("Applied upgrade: {}", choice.title());

        self.offer.clear();
        self.selected = 0;
        self.pending = self.pending.saturating_sub(1);
        Ok(choice)
    }

    /// Apply the highlighted card
    pub fn confirm(&mut self, player: &mut Player, arsenal: &mut Arsenal) -> GameResult<UpgradeChoice> {
        self.choose(self.selected, player, arsenal)
    }

    fn apply(choice: UpgradeChoice, player: &mut Player, arsenal: &mut Arsenal) -> GameResult<()> {
        match choice {
            UpgradeChoice::NewWeapon(kind) => arsenal.add_weapon(kind, &player.stats),
            UpgradeChoice::WeaponLevel(kind, _) => arsenal.level_weapon(kind, &player.stats).map(|_| ()),
            UpgradeChoice::NewPassive(kind) | UpgradeChoice::PassiveLevel(kind, _) => {
                arsenal.add_passive(kind)?;
                apply_passive(kind, player);
                arsenal.refresh(&player.stats);
                Ok(())
            }
            UpgradeChoice::Evolution(kind) => arsenal.evolve(kind, &player.stats),
        }
    }
}
