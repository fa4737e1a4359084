//! Outcome types for engine operations and persistence.

use thiserror::Error;

/// Why an intent was refused. A rejected intent never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("not enough bamboo")]
    InsufficientBamboo,
    #[error("not enough seeds")]
    InsufficientSeeds,
    #[error("not enough charms")]
    InsufficientCharms,
    #[error("tile is already occupied")]
    TileOccupied,
    #[error("buildings need one free tile between them")]
    TooCloseToBuilding,
    #[error("no matching tile at that coordinate")]
    NoSuchTile,
    #[error("that building cannot do this")]
    WrongBuilding,
    #[error("building is already busy")]
    ProcessBusy,
    #[error("nothing is ready to collect")]
    ProcessNotReady,
    #[error("quantity must be between 1 and 10")]
    InvalidQuantity,
    #[error("convoy duration is out of range")]
    InvalidDuration,
    #[error("building is at max level")]
    MaxLevel,
    #[error("HQ level is too low")]
    HqLevelTooLow,
    #[error("gamble multiplier must be at least 2")]
    InvalidMultiplier,
    #[error("still on cooldown")]
    OnCooldown,
    #[error("no raid attempts left today")]
    NoAttemptsLeft,
    #[error("a raid is already in progress")]
    RaidInProgress,
    #[error("no raid is in progress")]
    NoActiveRaid,
    #[error("unknown raid camp")]
    UnknownCamp,
    #[error("camp tier is locked")]
    TierLocked,
    #[error("squad exceeds the point budget")]
    SquadOverBudget,
    #[error("squad is empty")]
    EmptySquad,
    #[error("not enough trained troops")]
    NotEnoughTroops,
    #[error("pick exactly two different abilities")]
    AbilitySelection,
    #[error("ability was not brought on this raid")]
    UnknownAbility,
    #[error("unknown quest")]
    UnknownQuest,
    #[error("quest already completed")]
    QuestAlreadyCompleted,
}

/// Failures at the save/load boundary. Never fatal to gameplay.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid player id: {0:?}")]
    InvalidPlayerId(String),
}
