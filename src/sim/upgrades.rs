use tracing::debug;

use crate::error::Rejection;
use crate::model::{BuildingKind, GameState, ResourceBundle, TileCoord};

/// Cost to take the building at `coord` one level up. `None` when there is no
/// building there or it is already at its top level.
pub fn upgrade_cost(state: &GameState, coord: TileCoord) -> Option<ResourceBundle> {
    let building = state.building(coord)?;
    building.kind.upgrade_cost(building.level)
}

/// Non-HQ buildings may not be raised above the current HQ level.
pub fn can_upgrade(state: &GameState, coord: TileCoord) -> Result<ResourceBundle, Rejection> {
    let building = state.building(coord).ok_or(Rejection::NoSuchTile)?;
    let cost = building
        .kind
        .upgrade_cost(building.level)
        .ok_or(Rejection::MaxLevel)?;
    let target = building.level + 1;
    if building.kind != BuildingKind::Hq && target > state.hq_level() {
        return Err(Rejection::HqLevelTooLow);
    }
    state.check_affordable(&cost)?;
    Ok(cost)
}

pub fn upgrade_building(state: &mut GameState, coord: TileCoord) -> Result<u32, Rejection> {
    let cost = can_upgrade(state, coord)?;
    state.pay(&cost)?;
    let building = state.building_mut(coord).ok_or(Rejection::NoSuchTile)?;
    building.level += 1;
    debug!(%coord, building = building.kind.name(), level = building.level, "building upgraded");
    Ok(building.level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Building, Tile};

    const HQ_AT: TileCoord = TileCoord::new(0, 0);
    const SITE: TileCoord = TileCoord::new(4, 0);

    fn base(hq_level: u32, other: BuildingKind, other_level: u32) -> GameState {
        let mut state = GameState::new();
        let mut hq = Building::new(BuildingKind::Hq);
        hq.level = hq_level;
        state.tiles.insert(HQ_AT, Tile::Building(hq));
        let mut building = Building::new(other);
        building.level = other_level;
        state.tiles.insert(SITE, Tile::Building(building));
        state
    }

    #[test]
    fn hq_upgrades_itself() {
        let mut state = base(1, BuildingKind::Depot, 1);
        assert_eq!(upgrade_cost(&state, HQ_AT), Some(ResourceBundle::seeds(3)));
        assert_eq!(upgrade_building(&mut state, HQ_AT), Ok(2));
        assert_eq!(state.player.seeds, 2);
        assert_eq!(state.hq_level(), 2);
    }

    #[test]
    fn other_buildings_cannot_outlevel_hq() {
        let mut state = base(1, BuildingKind::Barracks, 1);
        assert_eq!(can_upgrade(&state, SITE), Err(Rejection::HqLevelTooLow));

        state.building_mut(HQ_AT).unwrap().level = 2;
        assert_eq!(upgrade_building(&mut state, SITE), Ok(2));
        assert_eq!(state.player.bamboo, 0);
        assert_eq!(can_upgrade(&state, SITE), Err(Rejection::HqLevelTooLow));
    }

    #[test]
    fn max_level_and_costless_buildings() {
        let state = base(4, BuildingKind::Nursery, 1);
        assert_eq!(upgrade_cost(&state, SITE), None);
        assert_eq!(can_upgrade(&state, SITE), Err(Rejection::MaxLevel));
        assert_eq!(can_upgrade(&state, HQ_AT), Err(Rejection::MaxLevel));
        assert_eq!(can_upgrade(&state, TileCoord::new(9, 9)), Err(Rejection::NoSuchTile));
    }

    #[test]
    fn unaffordable_upgrade_changes_nothing() {
        let mut state = base(3, BuildingKind::Depot, 2);
        state.player.seeds = 2;
        let before = state.clone();
        assert_eq!(upgrade_building(&mut state, SITE), Err(Rejection::InsufficientSeeds));
        assert_eq!(state, before);
    }
}
