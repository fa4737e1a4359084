pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod flush;
pub mod id;
pub mod model;
pub mod persist;
pub mod sim;

#[cfg(test)]
mod testutil;

pub use config::EngineConfig;
pub use db::PgSaveStore;
pub use engine::Engine;
pub use error::{PersistError, Rejection};
pub use flush::JsonlSaveStore;
pub use id::IdGenerator;
pub use model::{GameState, Timestamp};
pub use persist::{AutosaveSchedule, SaveRecord, SaveStore, autosave};
pub use sim::{RaidSummary, TickCadence, TickReport};
