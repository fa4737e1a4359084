use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bundle::ResourceBundle;
use super::clock::TimeSpeed;
use super::player::TroopKind;
use super::timestamp::{MS_PER_SECOND, Timestamp};

pub const BAMBOO_STORED_CAP: f64 = 100.0;
pub const BAMBOO_BASE_PRODUCTION: f64 = 20.0;
pub const MAX_BUILDING_LEVEL: u32 = 4;

/// Integer grid coordinate, keyed as `"x,y"` wherever it is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 8 surrounding coordinates, diagonals included.
    pub fn neighbors(self) -> [TileCoord; 8] {
        let Self { x, y } = self;
        [
            Self::new(x - 1, y - 1),
            Self::new(x, y - 1),
            Self::new(x + 1, y - 1),
            Self::new(x - 1, y),
            Self::new(x + 1, y),
            Self::new(x - 1, y + 1),
            Self::new(x, y + 1),
            Self::new(x + 1, y + 1),
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tile key: {0:?}")]
pub struct ParseCoordError(String);

impl FromStr for TileCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordError(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        Ok(Self { x, y })
    }
}

impl From<TileCoord> for String {
    fn from(coord: TileCoord) -> Self {
        coord.to_string()
    }
}

impl TryFrom<String> for TileCoord {
    type Error = ParseCoordError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Start/duration/completed triple shared by every single-slot timed job.
///
/// `duration_ms` is already divided by the time multiplier that was live when
/// the job started. `completed` only ever flips from false to true.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedProcess {
    pub started_at: Timestamp,
    pub duration_ms: f64,
    pub completed: bool,
}

impl TimedProcess {
    pub fn start(now: Timestamp, base_duration_ms: f64, speed: &TimeSpeed) -> Self {
        Self {
            started_at: now,
            duration_ms: speed.scale_duration(base_duration_ms),
            completed: false,
        }
    }

    /// Mark complete once enough effective time has passed. Returns true only
    /// on the call that performs the transition.
    pub fn refresh(&mut self, now: Timestamp, speed: &TimeSpeed) -> bool {
        if self.completed {
            return false;
        }
        let elapsed = speed.effective_elapsed(now.elapsed_since(self.started_at));
        if elapsed >= self.duration_ms {
            self.completed = true;
            return true;
        }
        false
    }
}

/// The catalog of placeable buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    #[serde(rename = "HQ")]
    Hq,
    Depot,
    Nursery,
    Barracks,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 4] = [
        BuildingKind::Hq,
        BuildingKind::Depot,
        BuildingKind::Nursery,
        BuildingKind::Barracks,
    ];

    pub const fn build_cost(self) -> ResourceBundle {
        match self {
            BuildingKind::Hq => ResourceBundle::bamboo(500).with_seeds(1),
            BuildingKind::Depot => ResourceBundle::bamboo(300),
            BuildingKind::Nursery => ResourceBundle::bamboo(600),
            BuildingKind::Barracks => ResourceBundle::bamboo(250),
        }
    }

    /// Cost of going from `current_level` to the next one. `None` means the
    /// building is at its max level or has no upgrade ladder.
    pub const fn upgrade_cost(self, current_level: u32) -> Option<ResourceBundle> {
        match (self, current_level) {
            (BuildingKind::Hq, 1) => Some(ResourceBundle::seeds(3)),
            (BuildingKind::Hq, 2) => Some(ResourceBundle::seeds(5)),
            (BuildingKind::Hq, 3) => Some(ResourceBundle::seeds(10)),
            (BuildingKind::Depot, 1) => Some(ResourceBundle::seeds(1)),
            (BuildingKind::Depot, 2) => Some(ResourceBundle::seeds(3)),
            (BuildingKind::Depot, 3) => Some(ResourceBundle::seeds(5)),
            (BuildingKind::Barracks, 1) => Some(ResourceBundle::bamboo(1000)),
            (BuildingKind::Barracks, 2) => Some(ResourceBundle::bamboo(1750)),
            (BuildingKind::Barracks, 3) => Some(ResourceBundle::bamboo(2500)),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::Hq => "HQ",
            BuildingKind::Depot => "Depot",
            BuildingKind::Nursery => "Nursery",
            BuildingKind::Barracks => "Barracks",
        }
    }
}

/// Extra bamboo storage granted by one Depot. Unknown levels fall back to level 1.
pub const fn depot_storage_bonus(level: u32) -> u64 {
    match level {
        2 => 1500,
        3 => 3000,
        4 => 6000,
        _ => 500,
    }
}

/// The one in-progress job a building may hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildingJob {
    SeedCrafting {
        timer: TimedProcess,
    },
    TroopTraining {
        troop: TroopKind,
        quantity: u32,
        timer: TimedProcess,
    },
}

impl BuildingJob {
    pub fn timer(&self) -> &TimedProcess {
        match self {
            BuildingJob::SeedCrafting { timer } | BuildingJob::TroopTraining { timer, .. } => timer,
        }
    }

    pub fn timer_mut(&mut self) -> &mut TimedProcess {
        match self {
            BuildingJob::SeedCrafting { timer } | BuildingJob::TroopTraining { timer, .. } => timer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<BuildingJob>,
}

impl Building {
    pub fn new(kind: BuildingKind) -> Self {
        Self {
            kind,
            level: 1,
            job: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BambooPlant {
    pub level: u32,
    /// Units per effective hour.
    pub production: f64,
    /// Grown but uncollected bamboo, fractional, capped at 100.
    pub stored: f64,
    /// Advanced on every production tick.
    pub last_collected: Timestamp,
    /// Growth-stage clock, reset on every successful collection.
    pub planted_at: Timestamp,
}

impl BambooPlant {
    pub fn new(now: Timestamp) -> Self {
        Self {
            level: 1,
            production: BAMBOO_BASE_PRODUCTION,
            stored: 0.0,
            last_collected: now,
            planted_at: now,
        }
    }

    /// Visual growth stage 1..=4, one stage per 60 effective seconds since
    /// the growth clock was last reset.
    pub fn growth_stage(&self, now: Timestamp, speed: &TimeSpeed) -> u8 {
        let secs = speed.effective_elapsed(now.elapsed_since(self.planted_at)) / MS_PER_SECOND as f64;
        if secs >= 180.0 {
            4
        } else if secs >= 120.0 {
            3
        } else if secs >= 60.0 {
            2
        } else {
            1
        }
    }
}

/// Occupant of a coordinate. Empty tiles are simply absent from the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tile {
    Bamboo(BambooPlant),
    Building(Building),
}

impl Tile {
    pub fn as_building(&self) -> Option<&Building> {
        match self {
            Tile::Building(b) => Some(b),
            Tile::Bamboo(_) => None,
        }
    }

    pub fn as_building_mut(&mut self) -> Option<&mut Building> {
        match self {
            Tile::Building(b) => Some(b),
            Tile::Bamboo(_) => None,
        }
    }

    pub fn as_bamboo(&self) -> Option<&BambooPlant> {
        match self {
            Tile::Bamboo(p) => Some(p),
            Tile::Building(_) => None,
        }
    }

    pub fn as_bamboo_mut(&mut self) -> Option<&mut BambooPlant> {
        match self {
            Tile::Bamboo(p) => Some(p),
            Tile::Building(_) => None,
        }
    }

    pub fn is_building(&self) -> bool {
        matches!(self, Tile::Building(_))
    }
}
