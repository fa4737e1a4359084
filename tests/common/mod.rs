#![allow(dead_code)]

use bamboo_lands::model::*;
use bamboo_lands::{Engine, EngineConfig};

pub const T0: Timestamp = Timestamp::from_millis(1_700_000_000_000);

pub const HQ_AT: TileCoord = TileCoord::new(0, 0);
pub const BARRACKS_AT: TileCoord = TileCoord::new(4, 0);
pub const NURSERY_AT: TileCoord = TileCoord::new(0, 4);

/// A mid-game state: HQ, Barracks and Nursery placed, storage half full,
/// a mixed troop inventory and one tier-1 camp (id 1) previously cleared
/// for one star. Camps count as refreshed at `T0`.
pub fn build_test_state() -> GameState {
    let mut state = GameState::new();
    state.player.bamboo = 500;
    state.player.seeds = 5;
    state.player.troops = Troops {
        warrior: 4,
        archer: 2,
        monk: 1,
        bomber: 1,
    };
    state.player.raids.last_refresh = Some(T0);
    state.player.raids.stars = 1;

    for (coord, kind) in [
        (HQ_AT, BuildingKind::Hq),
        (BARRACKS_AT, BuildingKind::Barracks),
        (NURSERY_AT, BuildingKind::Nursery),
    ] {
        state.tiles.insert(coord, Tile::Building(Building::new(kind)));
    }
    // The HQ is already standing, so its quest has paid out.
    for quest in state.quests.iter_mut().filter(|q| q.id == "first-hq") {
        quest.progress = 1;
        quest.completed = true;
    }

    let id = state.id_gen.next_id();
    state.raids.camps.push(RaidCamp {
        id,
        tier: 1,
        position: CampPosition { x: 0.0, y: 0.0 },
        defenses: Vec::new(),
        rewards: CampRewards::for_tier(1),
        cleared_today: false,
        stars: 1,
        safe_route_expiry: None,
    });
    state
}

pub fn started_engine() -> Engine {
    Engine::with_state(EngineConfig::default(), build_test_state())
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
