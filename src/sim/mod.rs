pub mod combat;
mod context;
pub mod convoys;
pub mod farming;
pub mod gamble;
mod ledger;
pub mod quests;
pub mod raids;
mod report;
mod runner;
mod system;
pub mod upgrades;
pub mod workshops;

pub use context::TickContext;
pub use convoys::ConvoyForecast;
pub use gamble::GambleOutcome;
pub use ledger::BASE_BAMBOO_STORAGE;
pub use report::{ConvoyResolution, RaidSummary, TickReport};
pub use runner::{TickSchedule, default_systems, dispatch_systems};
pub use system::{GameSystem, TickCadence};
pub use workshops::TrainingCost;
