use serde::Serialize;

use crate::model::{ConvoyKind, RaidOutcome, TileCoord, Troops};

/// How a single convoy resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvoyResolution {
    pub convoy_id: u64,
    pub kind: ConvoyKind,
    pub success: bool,
    /// Failure rate in percent after the safe-route bonus.
    pub failure_rate: f64,
    /// Profit on success, zero on failure.
    pub profit: u64,
    /// Bamboo actually credited after the storage cap.
    pub credited: u64,
}

/// What a finished raid paid out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaidSummary {
    pub camp_id: u64,
    pub outcome: RaidOutcome,
    pub bamboo: u64,
    pub seeds: u32,
    pub charms: u32,
    /// Star rating earned by this attempt (0 unless victorious).
    pub stars: u8,
    /// Lifetime stars added, the improvement over the camp's previous best.
    pub new_stars: u32,
    pub survivors: Troops,
}

/// Everything observable that happened during one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub convoys: Vec<ConvoyResolution>,
    pub quests_completed: Vec<String>,
    pub seeds_ready: Vec<TileCoord>,
    pub troops_ready: Vec<TileCoord>,
    pub camps_refreshed: bool,
    pub raid_ended: Option<RaidSummary>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Fold a later dispatch's report into this one.
    pub fn merge(&mut self, later: TickReport) {
        self.convoys.extend(later.convoys);
        self.quests_completed.extend(later.quests_completed);
        self.seeds_ready.extend(later.seeds_ready);
        self.troops_ready.extend(later.troops_ready);
        self.camps_refreshed |= later.camps_refreshed;
        if later.raid_ended.is_some() {
            self.raid_ended = later.raid_ended;
        }
    }
}
