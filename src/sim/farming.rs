//! Tile placement, bamboo planting, growth and harvest.

use tracing::debug;

use super::context::TickContext;
use super::quests::update_quests;
use super::system::{GameSystem, TickCadence};
use crate::error::Rejection;
use crate::model::tile::BAMBOO_STORED_CAP;
use crate::model::timestamp::MS_PER_HOUR;
use crate::model::{BambooPlant, Building, BuildingKind, GameState, Tile, TileCoord, Timestamp};

/// Seeds consumed by planting one bamboo tile.
pub const PLANT_SEED_COST: u32 = 1;

/// A building may go on an empty tile with no building on any of its 8 neighbors.
pub fn can_place_building(state: &GameState, coord: TileCoord) -> Result<(), Rejection> {
    if state.tiles.contains_key(&coord) {
        return Err(Rejection::TileOccupied);
    }
    let crowded = coord
        .neighbors()
        .iter()
        .any(|n| state.tiles.get(n).is_some_and(Tile::is_building));
    if crowded {
        return Err(Rejection::TooCloseToBuilding);
    }
    Ok(())
}

pub fn build_on_tile(
    state: &mut GameState,
    coord: TileCoord,
    kind: BuildingKind,
) -> Result<(), Rejection> {
    let cost = kind.build_cost();
    state.check_affordable(&cost)?;
    can_place_building(state, coord)?;

    state.pay(&cost)?;
    state.player.stats.buildings_built += 1;
    state.tiles.insert(coord, Tile::Building(Building::new(kind)));
    debug!(%coord, building = kind.name(), "building placed");

    update_quests(state);
    Ok(())
}

pub fn plant_bamboo(state: &mut GameState, coord: TileCoord, now: Timestamp) -> Result<(), Rejection> {
    if state.player.seeds < PLANT_SEED_COST {
        return Err(Rejection::InsufficientSeeds);
    }
    if state.tiles.contains_key(&coord) {
        return Err(Rejection::TileOccupied);
    }

    state.spend_seeds(PLANT_SEED_COST)?;
    state.player.stats.bamboo_planted += 1;
    state.tiles.insert(coord, Tile::Bamboo(BambooPlant::new(now)));
    debug!(%coord, "bamboo planted");

    update_quests(state);
    Ok(())
}

/// Grow every bamboo tile by the effective time since its last tick.
///
/// Stored bamboo never exceeds 100. `last_collected` always advances to `now`,
/// even when the tile was already full.
pub fn update_bamboo_production(state: &mut GameState, now: Timestamp) {
    let speed = state.time_speed;
    for plant in state.tiles.values_mut().filter_map(Tile::as_bamboo_mut) {
        if plant.stored < BAMBOO_STORED_CAP {
            let effective_ms = speed.effective_elapsed(now.elapsed_since(plant.last_collected));
            let grown = effective_ms / MS_PER_HOUR as f64 * plant.production;
            plant.stored = (plant.stored + grown).min(BAMBOO_STORED_CAP);
        }
        plant.last_collected = now;
    }
}

/// Move up to `limit` whole units off a plant. Whatever does not fit stays on
/// the tile along with the fractional remainder. The growth clock resets only
/// when something was actually taken.
fn harvest(plant: &mut BambooPlant, limit: u64, now: Timestamp) -> u64 {
    let whole = plant.stored.floor();
    let taken = (whole as u64).min(limit);
    if taken == 0 {
        return 0;
    }
    plant.stored -= taken as f64;
    plant.last_collected = now;
    plant.planted_at = now;
    taken
}

/// Collect one tile into storage. Returns the amount actually collected.
pub fn collect_bamboo(state: &mut GameState, coord: TileCoord, now: Timestamp) -> u64 {
    let headroom = state.storage_headroom();
    let Some(plant) = state.tiles.get_mut(&coord).and_then(Tile::as_bamboo_mut) else {
        return 0;
    };
    let taken = harvest(plant, headroom, now);
    if taken > 0 {
        state.player.bamboo += taken;
        state.player.stats.bamboo_collected += taken;
        debug!(%coord, taken, "bamboo collected");
    }
    taken
}

/// Collect every ripe tile, spending storage headroom greedily in coordinate order.
pub fn collect_all_bamboo(state: &mut GameState, now: Timestamp) -> u64 {
    let mut remaining = state.storage_headroom();
    let mut total = 0;
    for plant in state.tiles.values_mut().filter_map(Tile::as_bamboo_mut) {
        if remaining == 0 {
            break;
        }
        if plant.stored < 1.0 {
            continue;
        }
        let taken = harvest(plant, remaining, now);
        remaining -= taken;
        total += taken;
    }
    state.player.bamboo += total;
    state.player.stats.bamboo_collected += total;
    if total > 0 {
        debug!(total, "collected all bamboo");
    }
    total
}

pub struct BambooGrowthSystem;

impl GameSystem for BambooGrowthSystem {
    fn name(&self) -> &str {
        "bamboo_growth"
    }

    fn cadence(&self) -> TickCadence {
        TickCadence::World
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        update_bamboo_production(ctx.state, ctx.now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timestamp::MS_PER_MINUTE;
    use crate::testutil::T0;

    fn coord(x: i32, y: i32) -> TileCoord {
        TileCoord::new(x, y)
    }

    #[test]
    fn placement_needs_a_gap_in_all_directions() {
        let mut state = GameState::new();
        build_on_tile(&mut state, coord(0, 0), BuildingKind::Depot).unwrap();

        assert_eq!(can_place_building(&state, coord(0, 0)), Err(Rejection::TileOccupied));
        assert_eq!(can_place_building(&state, coord(1, 1)), Err(Rejection::TooCloseToBuilding));
        assert_eq!(can_place_building(&state, coord(-1, 0)), Err(Rejection::TooCloseToBuilding));
        assert!(can_place_building(&state, coord(2, 0)).is_ok());
        assert!(can_place_building(&state, coord(2, 2)).is_ok());
    }

    #[test]
    fn bamboo_neighbors_do_not_block_buildings() {
        let mut state = GameState::new();
        plant_bamboo(&mut state, coord(1, 0), T0).unwrap();
        assert!(can_place_building(&state, coord(0, 0)).is_ok());
    }

    #[test]
    fn build_debits_cost_and_counts() {
        let mut state = GameState::new();
        build_on_tile(&mut state, coord(0, 0), BuildingKind::Hq).unwrap();
        // 1000 - 500 + 100 from the first-hq quest
        assert_eq!(state.player.bamboo, 600);
        assert_eq!(state.player.seeds, 4);
        assert_eq!(state.player.stats.buildings_built, 1);
        assert_eq!(state.building(coord(0, 0)).map(|b| b.level), Some(1));
    }

    #[test]
    fn build_rejected_without_funds_changes_nothing() {
        let mut state = GameState::new();
        state.player.bamboo = 200;
        let before = state.clone();
        assert_eq!(
            build_on_tile(&mut state, coord(0, 0), BuildingKind::Depot),
            Err(Rejection::InsufficientBamboo)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn plant_then_grow_then_collect() {
        let mut state = GameState::new();
        plant_bamboo(&mut state, coord(2, 2), T0).unwrap();
        assert_eq!(state.player.seeds, 4);
        let plant = state.bamboo(coord(2, 2)).unwrap();
        assert_eq!(plant.level, 1);
        assert_eq!(plant.production, 20.0);
        assert_eq!(plant.stored, 0.0);

        let later = T0.plus_ms(60 * MS_PER_MINUTE);
        update_bamboo_production(&mut state, later);
        assert!((state.bamboo(coord(2, 2)).unwrap().stored - 20.0).abs() < 1e-9);

        state.player.bamboo = 500;
        let collect_at = later.plus_ms(1);
        assert_eq!(collect_bamboo(&mut state, coord(2, 2), collect_at), 20);
        assert_eq!(state.player.bamboo, 520);
        let plant = state.bamboo(coord(2, 2)).unwrap();
        assert!(plant.stored < 1.0);
        assert_eq!(plant.planted_at, collect_at);
        assert_eq!(state.player.stats.bamboo_collected, 20);
    }

    #[test]
    fn growth_is_capped_at_one_hundred() {
        let mut state = GameState::new();
        state.time_speed.set_enabled(true);
        state.time_speed.set_multiplier(50.0);
        plant_bamboo(&mut state, coord(0, 0), T0).unwrap();
        update_bamboo_production(&mut state, T0.plus_ms(100 * MS_PER_HOUR));
        assert_eq!(state.bamboo(coord(0, 0)).unwrap().stored, 100.0);
    }

    #[test]
    fn full_storage_collect_keeps_growth_clock() {
        let mut state = GameState::new();
        plant_bamboo(&mut state, coord(0, 0), T0).unwrap();
        update_bamboo_production(&mut state, T0.plus_ms(2 * MS_PER_HOUR));
        state.player.bamboo = state.max_bamboo_storage();

        assert_eq!(collect_bamboo(&mut state, coord(0, 0), T0.plus_ms(3 * MS_PER_HOUR)), 0);
        let plant = state.bamboo(coord(0, 0)).unwrap();
        assert_eq!(plant.planted_at, T0);
        assert!((plant.stored - 40.0).abs() < 1e-9);
    }

    #[test]
    fn partial_collect_leaves_overflow_on_tile() {
        let mut state = GameState::new();
        plant_bamboo(&mut state, coord(0, 0), T0).unwrap();
        if let Some(Tile::Bamboo(p)) = state.tiles.get_mut(&coord(0, 0)) {
            p.stored = 30.5;
        }
        state.player.bamboo = 990;
        assert_eq!(collect_bamboo(&mut state, coord(0, 0), T0), 10);
        assert_eq!(state.player.bamboo, 1000);
        assert!((state.bamboo(coord(0, 0)).unwrap().stored - 20.5).abs() < 1e-9);
    }

    #[test]
    fn collect_all_spends_headroom_in_order() {
        let mut state = GameState::new();
        state.player.seeds = 3;
        for x in [0, 1, 2] {
            plant_bamboo(&mut state, coord(x, 0), T0).unwrap();
            if let Some(Tile::Bamboo(p)) = state.tiles.get_mut(&coord(x, 0)) {
                p.stored = 10.25;
            }
        }
        state.player.bamboo = 985;
        let now = T0.plus_ms(5);

        assert_eq!(collect_all_bamboo(&mut state, now), 15);
        assert_eq!(state.player.bamboo, 1000);
        let first = state.bamboo(coord(0, 0)).unwrap();
        let second = state.bamboo(coord(1, 0)).unwrap();
        let third = state.bamboo(coord(2, 0)).unwrap();
        assert!((first.stored - 0.25).abs() < 1e-9);
        assert!((second.stored - 5.25).abs() < 1e-9);
        assert_eq!(second.planted_at, now);
        assert!((third.stored - 10.25).abs() < 1e-9);
        assert_eq!(third.planted_at, T0);
    }

    #[test]
    fn plant_requires_seed_and_free_tile() {
        let mut state = GameState::new();
        plant_bamboo(&mut state, coord(0, 0), T0).unwrap();
        assert_eq!(plant_bamboo(&mut state, coord(0, 0), T0), Err(Rejection::TileOccupied));
        state.player.seeds = 0;
        assert_eq!(plant_bamboo(&mut state, coord(5, 5), T0), Err(Rejection::InsufficientSeeds));
    }
}
