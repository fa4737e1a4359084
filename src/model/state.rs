use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::clock::TimeSpeed;
use super::convoy::Convoy;
use super::player::Player;
use super::quest::{Quest, default_quests};
use super::raid::{ActiveRaid, RaidCamp};
use super::tile::{BambooPlant, Building, BuildingKind, Tile, TileCoord};
use crate::id::IdGenerator;

/// Raid camps for the current day plus the raid in progress, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaidBoard {
    pub camps: Vec<RaidCamp>,
    pub active: Option<ActiveRaid>,
}

impl RaidBoard {
    pub fn camp(&self, id: u64) -> Option<&RaidCamp> {
        self.camps.iter().find(|c| c.id == id)
    }

    pub fn camp_mut(&mut self, id: u64) -> Option<&mut RaidCamp> {
        self.camps.iter_mut().find(|c| c.id == id)
    }
}

/// Everything the engine simulates, as plain serializable data.
///
/// This is the save payload: loading replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub time_speed: TimeSpeed,
    pub tiles: BTreeMap<TileCoord, Tile>,
    pub convoys: Vec<Convoy>,
    pub quests: Vec<Quest>,
    pub raids: RaidBoard,
    pub id_gen: IdGenerator,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            player: Player::new(),
            time_speed: TimeSpeed::new(),
            tiles: BTreeMap::new(),
            convoys: Vec::new(),
            quests: default_quests(),
            raids: RaidBoard::default(),
            id_gen: IdGenerator::new(),
        }
    }

    pub fn building(&self, coord: TileCoord) -> Option<&Building> {
        self.tiles.get(&coord).and_then(Tile::as_building)
    }

    pub fn building_mut(&mut self, coord: TileCoord) -> Option<&mut Building> {
        self.tiles.get_mut(&coord).and_then(Tile::as_building_mut)
    }

    pub fn bamboo(&self, coord: TileCoord) -> Option<&BambooPlant> {
        self.tiles.get(&coord).and_then(Tile::as_bamboo)
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.tiles.values().filter_map(Tile::as_building)
    }

    pub fn building_count(&self, kind: BuildingKind) -> usize {
        self.buildings().filter(|b| b.kind == kind).count()
    }

    /// Highest level among built HQs, 1 if there is none.
    pub fn hq_level(&self) -> u32 {
        self.buildings()
            .filter(|b| b.kind == BuildingKind::Hq)
            .map(|b| b.level)
            .max()
            .unwrap_or(1)
            .max(1)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hq_level_defaults_to_one() {
        let mut state = GameState::new();
        assert_eq!(state.hq_level(), 1);

        let mut hq = Building::new(BuildingKind::Hq);
        hq.level = 3;
        state.tiles.insert(TileCoord::new(0, 0), Tile::Building(hq));
        let mut second = Building::new(BuildingKind::Hq);
        second.level = 2;
        state.tiles.insert(TileCoord::new(4, 4), Tile::Building(second));
        assert_eq!(state.hq_level(), 3);
        assert_eq!(state.building_count(BuildingKind::Hq), 2);
        assert_eq!(state.building_count(BuildingKind::Depot), 0);
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = GameState::new();
        state
            .tiles
            .insert(TileCoord::new(-1, 2), Tile::Building(Building::new(BuildingKind::Depot)));
        let json = serde_json::to_value(&state).unwrap();
        assert!(json["tiles"]["-1,2"].is_object());

        let restored: GameState = serde_json::from_value(json).unwrap();
        assert_eq!(restored, state);
    }
}
