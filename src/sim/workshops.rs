//! Single-slot timed jobs: seed crafting at a Nursery and troop training at a
//! Barracks. Each slot goes idle -> in progress -> completed -> idle (on collect).

use tracing::debug;

use super::context::TickContext;
use super::system::{GameSystem, TickCadence};
use crate::error::Rejection;
use crate::model::timestamp::MS_PER_MINUTE;
use crate::model::{
    Building, BuildingJob, BuildingKind, GameState, Tile, TileCoord, TimedProcess, Timestamp,
    TroopKind,
};

pub const SEED_CRAFT_BAMBOO: u64 = 20;
pub const SEED_CRAFT_DURATION_MS: u64 = 10 * MS_PER_MINUTE;
pub const MAX_TRAINING_BATCH: u32 = 10;

/// Price and base (unaccelerated) duration of a training batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingCost {
    pub bamboo: u64,
    pub duration_ms: u64,
}

pub fn troop_training_cost(troop: TroopKind, quantity: u32) -> TrainingCost {
    let (bamboo, duration_ms) = troop.training_cost();
    TrainingCost {
        bamboo: bamboo * u64::from(quantity),
        duration_ms: duration_ms * u64::from(quantity),
    }
}

fn idle_building(
    state: &GameState,
    coord: TileCoord,
    kind: BuildingKind,
) -> Result<&Building, Rejection> {
    let building = state.building(coord).ok_or(Rejection::NoSuchTile)?;
    if building.kind != kind {
        return Err(Rejection::WrongBuilding);
    }
    if building.job.is_some() {
        return Err(Rejection::ProcessBusy);
    }
    Ok(building)
}

pub fn can_craft_seed(state: &GameState, coord: TileCoord) -> Result<(), Rejection> {
    idle_building(state, coord, BuildingKind::Nursery)?;
    if state.player.bamboo < SEED_CRAFT_BAMBOO {
        return Err(Rejection::InsufficientBamboo);
    }
    Ok(())
}

pub fn start_seed_crafting(
    state: &mut GameState,
    coord: TileCoord,
    now: Timestamp,
) -> Result<(), Rejection> {
    can_craft_seed(state, coord)?;
    let timer = TimedProcess::start(now, SEED_CRAFT_DURATION_MS as f64, &state.time_speed);
    state.spend_bamboo(SEED_CRAFT_BAMBOO)?;
    if let Some(nursery) = state.building_mut(coord) {
        nursery.job = Some(BuildingJob::SeedCrafting { timer });
    }
    debug!(%coord, "seed crafting started");
    Ok(())
}

pub fn collect_crafted_seed(state: &mut GameState, coord: TileCoord) -> Result<(), Rejection> {
    let nursery = state.building_mut(coord).ok_or(Rejection::NoSuchTile)?;
    if nursery.kind != BuildingKind::Nursery {
        return Err(Rejection::WrongBuilding);
    }
    match nursery.job {
        Some(BuildingJob::SeedCrafting { timer }) if timer.completed => {
            nursery.job = None;
        }
        Some(BuildingJob::SeedCrafting { .. }) | None => return Err(Rejection::ProcessNotReady),
        Some(BuildingJob::TroopTraining { .. }) => {
            panic!("collect_crafted_seed: Nursery at {coord} holds a training job")
        }
    }
    state.add_seeds(1);
    debug!(%coord, "crafted seed collected");
    Ok(())
}

pub fn can_train_troop(
    state: &GameState,
    coord: TileCoord,
    troop: TroopKind,
    quantity: u32,
) -> Result<(), Rejection> {
    idle_building(state, coord, BuildingKind::Barracks)?;
    if !(1..=MAX_TRAINING_BATCH).contains(&quantity) {
        return Err(Rejection::InvalidQuantity);
    }
    if state.player.bamboo < troop_training_cost(troop, quantity).bamboo {
        return Err(Rejection::InsufficientBamboo);
    }
    Ok(())
}

pub fn start_troop_training(
    state: &mut GameState,
    coord: TileCoord,
    troop: TroopKind,
    quantity: u32,
    now: Timestamp,
) -> Result<(), Rejection> {
    can_train_troop(state, coord, troop, quantity)?;
    let cost = troop_training_cost(troop, quantity);
    let timer = TimedProcess::start(now, cost.duration_ms as f64, &state.time_speed);
    state.spend_bamboo(cost.bamboo)?;
    if let Some(barracks) = state.building_mut(coord) {
        barracks.job = Some(BuildingJob::TroopTraining {
            troop,
            quantity,
            timer,
        });
    }
    debug!(%coord, ?troop, quantity, "troop training started");
    Ok(())
}

pub fn collect_trained_troops(state: &mut GameState, coord: TileCoord) -> Result<(), Rejection> {
    let barracks = state.building_mut(coord).ok_or(Rejection::NoSuchTile)?;
    if barracks.kind != BuildingKind::Barracks {
        return Err(Rejection::WrongBuilding);
    }
    let (troop, quantity) = match barracks.job {
        Some(BuildingJob::TroopTraining {
            troop,
            quantity,
            timer,
        }) if timer.completed => (troop, quantity),
        Some(BuildingJob::TroopTraining { .. }) | None => return Err(Rejection::ProcessNotReady),
        Some(BuildingJob::SeedCrafting { .. }) => {
            panic!("collect_trained_troops: Barracks at {coord} holds a crafting job")
        }
    };
    barracks.job = None;
    *state.player.troops.get_mut(troop) += quantity;
    debug!(%coord, ?troop, quantity, "trained troops collected");
    Ok(())
}

/// Flip finished jobs of one building kind to completed. Returns the tiles
/// whose job completed on this call.
fn complete_jobs(state: &mut GameState, kind: BuildingKind, now: Timestamp) -> Vec<TileCoord> {
    let speed = state.time_speed;
    let mut finished = Vec::new();
    for (coord, tile) in state.tiles.iter_mut() {
        let Tile::Building(building) = tile else {
            continue;
        };
        if building.kind != kind {
            continue;
        }
        if let Some(job) = building.job.as_mut()
            && job.timer_mut().refresh(now, &speed)
        {
            finished.push(*coord);
        }
    }
    finished
}

pub fn update_seed_crafting(state: &mut GameState, now: Timestamp) -> Vec<TileCoord> {
    complete_jobs(state, BuildingKind::Nursery, now)
}

pub fn update_troop_training(state: &mut GameState, now: Timestamp) -> Vec<TileCoord> {
    complete_jobs(state, BuildingKind::Barracks, now)
}

pub struct SeedCraftingSystem;

impl GameSystem for SeedCraftingSystem {
    fn name(&self) -> &str {
        "seed_crafting"
    }

    fn cadence(&self) -> TickCadence {
        TickCadence::World
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let ready = update_seed_crafting(ctx.state, ctx.now);
        ctx.report.seeds_ready.extend(ready);
    }
}

pub struct TroopTrainingSystem;

impl GameSystem for TroopTrainingSystem {
    fn name(&self) -> &str {
        "troop_training"
    }

    fn cadence(&self) -> TickCadence {
        TickCadence::World
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let ready = update_troop_training(ctx.state, ctx.now);
        ctx.report.troops_ready.extend(ready);
    }
}
