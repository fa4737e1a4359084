//! The save/load boundary. The engine never calls a store itself; drivers
//! call [`autosave`] on their own timer and load once at session start.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::error::PersistError;
use crate::model::{GameState, Timestamp};

pub const SAVE_VERSION: i32 = 1;

/// One saved snapshot as it is written to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub player_id: String,
    pub game_state: GameState,
    pub last_updated: Timestamp,
    pub version: i32,
}

impl SaveRecord {
    pub fn new(player_id: &str, state: &GameState, now: Timestamp) -> Self {
        Self {
            player_id: player_id.to_string(),
            game_state: state.clone(),
            last_updated: now,
            version: SAVE_VERSION,
        }
    }
}

/// Player IDs become file names and primary keys: ASCII letters, digits,
/// `-` and `_` only.
pub fn validate_player_id(player_id: &str) -> Result<(), PersistError> {
    let valid = !player_id.is_empty()
        && player_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistError::InvalidPlayerId(player_id.to_string()))
    }
}

/// Somewhere a game can be saved to and loaded from.
#[allow(async_fn_in_trait)]
pub trait SaveStore {
    async fn save(
        &self,
        player_id: &str,
        state: &GameState,
        now: Timestamp,
    ) -> Result<(), PersistError>;

    /// The most recent save for `player_id`, or `None` if there is none.
    async fn load(&self, player_id: &str) -> Result<Option<GameState>, PersistError>;
}

/// Decides when the next autosave is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveSchedule {
    pub interval_ms: u64,
    pub last_saved: Option<Timestamp>,
}

impl AutosaveSchedule {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_saved: None,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.last_saved
            .is_none_or(|last| now.elapsed_since(last) >= self.interval_ms)
    }
}

/// Save the engine's state if the schedule says so. Returns true only when a
/// save was written.
///
/// A failed save is logged and otherwise ignored: the engine keeps running on
/// its in-memory state and the next attempt waits a full interval.
pub async fn autosave<S: SaveStore>(
    store: &S,
    player_id: &str,
    engine: &Engine,
    schedule: &mut AutosaveSchedule,
    now: Timestamp,
) -> bool {
    if !schedule.is_due(now) {
        return false;
    }
    schedule.last_saved = Some(now);
    match store.save(player_id, engine.state(), now).await {
        Ok(()) => {
            debug!(player_id, "autosaved");
            true
        }
        Err(err) => {
            warn!(player_id, error = %err, "autosave failed");
            false
        }
    }
}
