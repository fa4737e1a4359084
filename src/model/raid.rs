use serde::{Deserialize, Serialize};

use super::player::TroopKind;
use super::timestamp::{MS_PER_MINUTE, Timestamp};

pub const RAID_DURATION_MS: u64 = 90_000;
pub const CORE_HP: f64 = 500.0;
pub const LANES: u8 = 3;
pub const SQUAD_POINT_BUDGET: u32 = 10;
pub const ABILITY_SLOTS: usize = 2;
/// Unit stats grow 8% per HQ level above 1.
pub const HQ_STAT_BONUS_PER_LEVEL: f64 = 0.08;
/// Lane progress gained per raid tick, out of 100.
pub const PROGRESS_PER_TICK: f64 = 1.0;
/// Share of a unit's dps dealt to the core per tick while at the core.
pub const CORE_DAMAGE_PER_TICK: f64 = 0.1;
pub const HEAL_AMOUNT: f64 = 120.0;

/// Victories with more than this much time left get the speed bonus and star.
pub const FAST_CLEAR_THRESHOLD_MS: u64 = 45_000;
pub const FAST_CLEAR_BAMBOO_BONUS: f64 = 1.15;
pub const TIMEOUT_BAMBOO_SHARE: f64 = 0.3;

pub const SAFE_ROUTE_DURATION_MS: u64 = 45 * MS_PER_MINUTE;
pub const SAFE_ROUTE_BONUS_PER_CAMP: f64 = 20.0;
pub const SAFE_ROUTE_BONUS_CAP: f64 = 30.0;

pub const BASE_DAILY_ATTEMPTS: u32 = 3;
pub const MAX_BONUS_ATTEMPTS: u32 = 2;
pub const STARS_PER_BONUS_ATTEMPT: u32 = 6;

pub const MIN_CAMPS: usize = 6;
pub const MAX_CAMPS: usize = 10;
pub const MAX_TIER: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseKind {
    WatchPost,
    HornTower,
    SpikeTile,
}

impl DefenseKind {
    /// (hp, dps) for a freshly generated defense.
    pub const fn stats(self) -> (f64, f64) {
        match self {
            DefenseKind::WatchPost => (50.0, 20.0),
            DefenseKind::HornTower => (40.0, 0.0),
            DefenseKind::SpikeTile => (1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanePosition {
    pub lane: u8,
    /// 0 at the entry, 100 at the core.
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    pub kind: DefenseKind,
    pub hp: f64,
    pub max_hp: f64,
    pub dps: f64,
    pub position: LanePosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampRewards {
    pub bamboo: u64,
    /// Percent chance of one seed on victory.
    pub seed_chance: u32,
    /// Percent chance of one charm on victory.
    pub charm_chance: u32,
}

impl CampRewards {
    /// Fixed reward table by tier. Tiers outside 1..=5 are clamped.
    pub const fn for_tier(tier: u8) -> Self {
        let (bamboo, seed_chance) = match tier {
            0 | 1 => (400, 10),
            2 => (1000, 20),
            3 => (2200, 35),
            4 => (4000, 50),
            _ => (7000, 65),
        };
        Self {
            bamboo,
            seed_chance,
            charm_chance: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidCamp {
    pub id: u64,
    pub tier: u8,
    pub position: CampPosition,
    pub defenses: Vec<Defense>,
    pub rewards: CampRewards,
    pub cleared_today: bool,
    /// Best star rating earned on this camp today, 0..=3.
    pub stars: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_route_expiry: Option<Timestamp>,
}

impl RaidCamp {
    pub fn safe_route_active(&self, now: Timestamp) -> bool {
        self.safe_route_expiry.is_some_and(|expiry| expiry > now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Smoke,
    Rally,
    Heal,
    Snare,
    Thunder,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 5] = [
        AbilityKind::Smoke,
        AbilityKind::Rally,
        AbilityKind::Heal,
        AbilityKind::Snare,
        AbilityKind::Thunder,
    ];

    pub const fn cooldown_ms(self) -> u64 {
        match self {
            AbilityKind::Smoke | AbilityKind::Snare => 25_000,
            AbilityKind::Rally | AbilityKind::Thunder => 30_000,
            AbilityKind::Heal => 20_000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::Smoke => "Smoke Bomb",
            AbilityKind::Rally => "Rally Drum",
            AbilityKind::Heal => "Gourd Heal",
            AbilityKind::Snare => "Snare Trap",
            AbilityKind::Thunder => "Thunderclap",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AbilityKind::Smoke => "3s dodge (-75% damage)",
            AbilityKind::Rally => "+25% speed for 6s",
            AbilityKind::Heal => "Heal 120 HP in area",
            AbilityKind::Snare => "Root enemies for 2s",
            AbilityKind::Thunder => "0.75s global stun",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaidAbility {
    pub kind: AbilityKind,
    pub cooldown_ms: u64,
    pub last_used: Option<Timestamp>,
}

impl RaidAbility {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            cooldown_ms: kind.cooldown_ms(),
            last_used: None,
        }
    }

    pub fn is_ready(&self, now: Timestamp) -> bool {
        self.last_used
            .is_none_or(|used| now.elapsed_since(used) >= self.cooldown_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Alive,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaidUnit {
    pub id: u32,
    pub troop: TroopKind,
    pub hp: f64,
    pub max_hp: f64,
    pub dps: f64,
    pub position: LanePosition,
    pub status: UnitStatus,
}

impl RaidUnit {
    pub fn is_alive(&self) -> bool {
        self.status == UnitStatus::Alive
    }
}

/// How a raid ended. `Defeat` is an explicit retreat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaidOutcome {
    Victory,
    Defeat,
    Timeout,
}

/// The single raid in progress. Removed from the state when it ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRaid {
    pub camp_id: u64,
    pub started_at: Timestamp,
    pub duration_ms: u64,
    pub units: Vec<RaidUnit>,
    pub abilities: Vec<RaidAbility>,
    pub core_hp: f64,
    pub max_core_hp: f64,
    pub time_left_ms: u64,
}

impl ActiveRaid {
    pub fn casualties(&self) -> usize {
        self.units.iter().filter(|u| !u.is_alive()).count()
    }
}
