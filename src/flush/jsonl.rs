use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::PersistError;
use crate::model::{GameState, Timestamp};
use crate::persist::{SaveRecord, SaveStore, validate_player_id};

/// Records kept per player. Older saves are dropped on the next write.
pub const MAX_HISTORY: usize = 16;

/// Write every item as one JSON line to `path`, replacing it atomically: the
/// lines go to a sibling temp file that is then renamed over `path`.
fn write_jsonl<T: serde::Serialize>(path: &Path, items: &[T]) -> io::Result<()> {
    let tmp = path.with_extension("jsonl.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        for item in items {
            serde_json::to_writer(&mut writer, item)?;
            writer.write_all(b"\n")?;
        }
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    }
    fs::rename(&tmp, path)
}

/// Directory-backed save store: one `<player_id>.jsonl` file per player, one
/// [`SaveRecord`] per line, newest last, at most [`MAX_HISTORY`] lines.
#[derive(Debug, Clone)]
pub struct JsonlSaveStore {
    dir: PathBuf,
}

impl JsonlSaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, player_id: &str) -> PathBuf {
        self.dir.join(format!("{player_id}.jsonl"))
    }

    /// Every record saved for `player_id`, oldest first.
    ///
    /// An unreadable last line (a write cut short) is skipped with a warning.
    /// Anywhere else it is an error.
    pub fn history(&self, player_id: &str) -> Result<Vec<SaveRecord>, PersistError> {
        validate_player_id(player_id)?;
        let file = match File::open(self.path_for(player_id)) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }

        let mut records = Vec::with_capacity(lines.len());
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(err) if i == last => {
                    warn!(player_id, error = %err, "skipping torn trailing save line");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(records)
    }
}

impl SaveStore for JsonlSaveStore {
    async fn save(
        &self,
        player_id: &str,
        state: &GameState,
        now: Timestamp,
    ) -> Result<(), PersistError> {
        let mut records = self.history(player_id)?;
        records.push(SaveRecord::new(player_id, state, now));
        let keep_from = records.len().saturating_sub(MAX_HISTORY);

        fs::create_dir_all(&self.dir)?;
        write_jsonl(&self.path_for(player_id), &records[keep_from..])?;
        Ok(())
    }

    async fn load(&self, player_id: &str) -> Result<Option<GameState>, PersistError> {
        Ok(self.history(player_id)?.pop().map(|record| record.game_state))
    }
}
