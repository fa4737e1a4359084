use serde::{Deserialize, Serialize};

use super::timestamp::{MS_PER_MINUTE, Timestamp};

pub const STARTING_BAMBOO: u64 = 1000;
pub const STARTING_SEEDS: u32 = 5;
pub const STARTING_CHARMS: u32 = 1;

/// Trainable unit types. Each is trained at a Barracks and spent on raids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TroopKind {
    Warrior,
    Archer,
    Monk,
    Bomber,
}

impl TroopKind {
    pub const ALL: [TroopKind; 4] = [
        TroopKind::Warrior,
        TroopKind::Archer,
        TroopKind::Monk,
        TroopKind::Bomber,
    ];

    /// Bamboo cost and training time for a single unit.
    pub const fn training_cost(self) -> (u64, u64) {
        match self {
            TroopKind::Warrior => (50, 2 * MS_PER_MINUTE),
            TroopKind::Archer => (100, 3 * MS_PER_MINUTE),
            TroopKind::Monk => (150, 4 * MS_PER_MINUTE),
            TroopKind::Bomber => (200, 5 * MS_PER_MINUTE),
        }
    }

    /// Points this unit takes from the raid squad budget.
    pub const fn squad_points(self) -> u32 {
        match self {
            TroopKind::Warrior => 2,
            TroopKind::Archer | TroopKind::Monk => 3,
            TroopKind::Bomber => 4,
        }
    }

    /// Unscaled (hp, dps) on a raid.
    pub const fn base_stats(self) -> (f64, f64) {
        match self {
            TroopKind::Warrior => (100.0, 1.0),
            TroopKind::Archer => (70.0, 5.0),
            TroopKind::Monk => (80.0, 10.0),
            TroopKind::Bomber => (60.0, 15.0),
        }
    }
}

/// Trained troops waiting in the player's inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Troops {
    pub warrior: u32,
    pub archer: u32,
    pub monk: u32,
    pub bomber: u32,
}

impl Troops {
    pub fn get(&self, kind: TroopKind) -> u32 {
        match kind {
            TroopKind::Warrior => self.warrior,
            TroopKind::Archer => self.archer,
            TroopKind::Monk => self.monk,
            TroopKind::Bomber => self.bomber,
        }
    }

    pub fn get_mut(&mut self, kind: TroopKind) -> &mut u32 {
        match kind {
            TroopKind::Warrior => &mut self.warrior,
            TroopKind::Archer => &mut self.archer,
            TroopKind::Monk => &mut self.monk,
            TroopKind::Bomber => &mut self.bomber,
        }
    }

    /// Count per kind in a list of selected units.
    pub fn tally(units: &[TroopKind]) -> Self {
        let mut counts = Self::default();
        for &kind in units {
            *counts.get_mut(kind) += 1;
        }
        counts
    }

    /// True if every kind in `needed` is covered by `self`.
    pub fn covers(&self, needed: &Troops) -> bool {
        TroopKind::ALL
            .iter()
            .all(|&kind| self.get(kind) >= needed.get(kind))
    }

    pub fn total(&self) -> u32 {
        self.warrior + self.archer + self.monk + self.bomber
    }
}

/// Monotonic lifetime counters that drive quest progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub buildings_built: u64,
    pub bamboo_planted: u64,
    pub convoys_completed: u64,
    pub bamboo_collected: u64,
}

/// Per-player raid bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidRecord {
    pub attempts_used: u32,
    /// Lifetime stars, the sum of the best star rating earned on each camp.
    pub stars: u32,
    /// Last daily camp refresh. `None` until camps have been generated once.
    pub last_refresh: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub bamboo: u64,
    pub seeds: u32,
    pub charms: u32,
    pub stats: PlayerStats,
    pub last_gamble: Option<Timestamp>,
    pub raids: RaidRecord,
    pub troops: Troops,
}

impl Player {
    pub fn new() -> Self {
        Self {
            bamboo: STARTING_BAMBOO,
            seeds: STARTING_SEEDS,
            charms: STARTING_CHARMS,
            stats: PlayerStats::default(),
            last_gamble: None,
            raids: RaidRecord::default(),
            troops: Troops::default(),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
