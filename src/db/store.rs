use sqlx::PgPool;

use crate::error::PersistError;
use crate::model::{GameState, Timestamp};
use crate::persist::{SAVE_VERSION, SaveStore, validate_player_id};

/// Postgres-backed save store: one row per player in `game_saves`, replaced
/// on every save. Run [`super::migrate`] once before use.
#[derive(Debug, Clone)]
pub struct PgSaveStore {
    pool: PgPool,
}

impl PgSaveStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl SaveStore for PgSaveStore {
    async fn save(
        &self,
        player_id: &str,
        state: &GameState,
        now: Timestamp,
    ) -> Result<(), PersistError> {
        validate_player_id(player_id)?;
        let payload = serde_json::to_string(state)?;
        let last_updated = i64::try_from(now.as_millis()).unwrap_or(i64::MAX);
        sqlx::query(
            "INSERT INTO game_saves (player_id, game_state, last_updated, version) \
             VALUES ($1, $2::jsonb, $3, $4) \
             ON CONFLICT (player_id) DO UPDATE SET \
             game_state = EXCLUDED.game_state, \
             last_updated = EXCLUDED.last_updated, \
             version = EXCLUDED.version",
        )
        .bind(player_id)
        .bind(payload)
        .bind(last_updated)
        .bind(SAVE_VERSION)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn load(&self, player_id: &str) -> Result<Option<GameState>, PersistError> {
        validate_player_id(player_id)?;
        let payload: Option<String> =
            sqlx::query_scalar("SELECT game_state::text FROM game_saves WHERE player_id = $1")
                .bind(player_id)
                .fetch_optional(&self.pool)
                .await?;
        match payload {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}
