pub mod bundle;
pub mod clock;
pub mod convoy;
pub mod player;
pub mod quest;
pub mod raid;
pub mod state;
pub mod tile;
pub mod timestamp;

pub use bundle::ResourceBundle;
pub use clock::TimeSpeed;
pub use convoy::{Convoy, ConvoyKind, ConvoyParams};
pub use player::{Player, PlayerStats, RaidRecord, TroopKind, Troops};
pub use quest::{Quest, QuestKind};
pub use raid::{
    AbilityKind, ActiveRaid, CampPosition, CampRewards, Defense, DefenseKind, LanePosition,
    RaidAbility, RaidCamp, RaidOutcome, RaidUnit, UnitStatus,
};
pub use state::{GameState, RaidBoard};
pub use tile::{BambooPlant, Building, BuildingJob, BuildingKind, Tile, TileCoord, TimedProcess};
pub use timestamp::Timestamp;
