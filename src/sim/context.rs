use rand::RngCore;

use super::report::TickReport;
use crate::model::{GameState, Timestamp};

/// Context passed to each system on every tick.
///
/// `now` is read once per dispatch so every system in the pass agrees on it.
pub struct TickContext<'a> {
    pub state: &'a mut GameState,
    pub rng: &'a mut dyn RngCore,
    pub now: Timestamp,
    /// Systems record what happened here for the driver.
    pub report: &'a mut TickReport,
}
