use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Rejection;
use crate::model::{
    AbilityKind, BuildingKind, ConvoyKind, GameState, ResourceBundle, TileCoord, Timestamp,
    TroopKind,
};
use crate::sim::{
    ConvoyForecast, GambleOutcome, GameSystem, RaidSummary, TickCadence, TickReport,
    TickSchedule, TrainingCost, combat, convoys, default_systems, dispatch_systems, farming,
    gamble, quests, raids, upgrades, workshops,
};

fn rejected<T>(intent: &'static str, result: Result<T, Rejection>) -> Result<T, Rejection> {
    result.inspect_err(|reason| debug!(intent, %reason, "intent rejected"))
}

/// One running game: the state, the RNG and the tick systems that drive it.
///
/// Every intent either applies completely and returns `Ok`, or returns the
/// [`Rejection`] and leaves the state untouched. Time never advances on its
/// own: callers pass `now` to anything time-dependent and drive
/// [`Engine::pump`] (or the per-cadence ticks) from their own timer.
pub struct Engine {
    config: EngineConfig,
    state: GameState,
    rng: SmallRng,
    systems: Vec<Box<dyn GameSystem>>,
    schedule: TickSchedule,
}

impl Engine {
    /// Start a new game with the default player, quests and an empty grid.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_state(config, GameState::new())
    }

    /// Resume from a saved state.
    pub fn with_state(config: EngineConfig, state: GameState) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            schedule: TickSchedule::new(&config),
            systems: default_systems(),
            state,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replace the whole state with a loaded one. The RNG is reseeded and the
    /// tick schedule restarts, so the next pump fires every cadence.
    pub fn restore(&mut self, state: GameState) {
        self.state = state;
        self.rng = SmallRng::seed_from_u64(self.config.seed);
        self.schedule = TickSchedule::new(&self.config);
        debug!("state restored");
    }

    // --- ticks ---

    pub fn tick_world(&mut self, now: Timestamp) -> TickReport {
        self.schedule.mark_fired(TickCadence::World, now);
        dispatch_systems(
            &mut self.state,
            &mut self.systems,
            &mut self.rng,
            now,
            TickCadence::World,
        )
    }

    /// No-op report when no raid is active.
    pub fn tick_raid(&mut self, now: Timestamp) -> TickReport {
        self.schedule.mark_fired(TickCadence::Raid, now);
        dispatch_systems(
            &mut self.state,
            &mut self.systems,
            &mut self.rng,
            now,
            TickCadence::Raid,
        )
    }

    /// Fire whichever cadences are due at `now`. The raid cadence is only
    /// considered while a raid is active.
    pub fn pump(&mut self, now: Timestamp) -> TickReport {
        let mut report = TickReport::default();
        if self.schedule.is_due(TickCadence::World, now) {
            report.merge(self.tick_world(now));
        }
        if self.state.raids.active.is_some() && self.schedule.is_due(TickCadence::Raid, now) {
            report.merge(self.tick_raid(now));
        }
        report
    }

    // --- time speed ---

    pub fn set_time_speed_enabled(&mut self, enabled: bool) {
        self.state.time_speed.set_enabled(enabled);
    }

    /// Clamped to `[0.1, 50]`.
    pub fn set_time_speed_multiplier(&mut self, multiplier: f64) {
        self.state.time_speed.set_multiplier(multiplier);
    }

    // --- grid ---

    pub fn max_bamboo_storage(&self) -> u64 {
        self.state.max_bamboo_storage()
    }

    pub fn can_place_building(&self, coord: TileCoord) -> Result<(), Rejection> {
        farming::can_place_building(&self.state, coord)
    }

    pub fn build(&mut self, coord: TileCoord, kind: BuildingKind) -> Result<(), Rejection> {
        rejected("build", farming::build_on_tile(&mut self.state, coord, kind))
    }

    pub fn plant(&mut self, coord: TileCoord, now: Timestamp) -> Result<(), Rejection> {
        rejected("plant", farming::plant_bamboo(&mut self.state, coord, now))
    }

    /// Amount actually moved into storage; 0 when there was nothing to take
    /// or no room for it.
    pub fn collect(&mut self, coord: TileCoord, now: Timestamp) -> u64 {
        farming::collect_bamboo(&mut self.state, coord, now)
    }

    pub fn collect_all(&mut self, now: Timestamp) -> u64 {
        farming::collect_all_bamboo(&mut self.state, now)
    }

    /// Growth stage 1..=4 of the bamboo at `coord`, if there is any.
    pub fn growth_stage(&self, coord: TileCoord, now: Timestamp) -> Option<u8> {
        let plant = self.state.bamboo(coord)?;
        Some(plant.growth_stage(now, &self.state.time_speed))
    }

    pub fn upgrade_cost(&self, coord: TileCoord) -> Option<ResourceBundle> {
        upgrades::upgrade_cost(&self.state, coord)
    }

    pub fn can_upgrade(&self, coord: TileCoord) -> Result<ResourceBundle, Rejection> {
        upgrades::can_upgrade(&self.state, coord)
    }

    /// Returns the new level.
    pub fn upgrade(&mut self, coord: TileCoord) -> Result<u32, Rejection> {
        rejected("upgrade", upgrades::upgrade_building(&mut self.state, coord))
    }

    // --- workshops ---

    pub fn can_craft_seed(&self, coord: TileCoord) -> Result<(), Rejection> {
        workshops::can_craft_seed(&self.state, coord)
    }

    pub fn start_seed_crafting(
        &mut self,
        coord: TileCoord,
        now: Timestamp,
    ) -> Result<(), Rejection> {
        rejected(
            "start_seed_crafting",
            workshops::start_seed_crafting(&mut self.state, coord, now),
        )
    }

    pub fn collect_crafted_seed(&mut self, coord: TileCoord) -> Result<(), Rejection> {
        rejected(
            "collect_crafted_seed",
            workshops::collect_crafted_seed(&mut self.state, coord),
        )
    }

    pub fn training_cost(&self, troop: TroopKind, quantity: u32) -> TrainingCost {
        workshops::troop_training_cost(troop, quantity)
    }

    pub fn can_train(
        &self,
        coord: TileCoord,
        troop: TroopKind,
        quantity: u32,
    ) -> Result<(), Rejection> {
        workshops::can_train_troop(&self.state, coord, troop, quantity)
    }

    pub fn start_troop_training(
        &mut self,
        coord: TileCoord,
        troop: TroopKind,
        quantity: u32,
        now: Timestamp,
    ) -> Result<(), Rejection> {
        rejected(
            "start_troop_training",
            workshops::start_troop_training(&mut self.state, coord, troop, quantity, now),
        )
    }

    pub fn collect_trained_troops(&mut self, coord: TileCoord) -> Result<(), Rejection> {
        rejected(
            "collect_trained_troops",
            workshops::collect_trained_troops(&mut self.state, coord),
        )
    }

    // --- convoys and gambling ---

    /// Returns the convoy ID. `minutes` defaults to the kind's standard trip.
    pub fn dispatch_convoy(
        &mut self,
        kind: ConvoyKind,
        wager: u64,
        minutes: Option<u64>,
        now: Timestamp,
    ) -> Result<u64, Rejection> {
        rejected(
            "dispatch_convoy",
            convoys::dispatch_convoy(&mut self.state, kind, wager, minutes, now),
        )
    }

    /// Odds for a convoy dispatched now, with any safe-route bonus that is open.
    pub fn convoy_forecast(
        &self,
        kind: ConvoyKind,
        wager: u64,
        minutes: f64,
        now: Timestamp,
    ) -> ConvoyForecast {
        let bonus = raids::safe_route_bonus(&self.state, "trade", now);
        convoys::convoy_forecast(kind, wager, minutes, bonus)
    }

    pub fn can_gamble(&self, now: Timestamp) -> Result<(), Rejection> {
        gamble::can_gamble(&self.state, now)
    }

    pub fn gamble(
        &mut self,
        wager: u64,
        multiplier: u32,
        now: Timestamp,
    ) -> Result<GambleOutcome, Rejection> {
        rejected(
            "gamble",
            gamble::gamble(&mut self.state, &mut self.rng, wager, multiplier, now),
        )
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> Result<(), Rejection> {
        rejected("complete_quest", quests::complete_quest(&mut self.state, quest_id))
    }

    // --- raids ---

    pub fn can_access_tier(&self, tier: u8) -> bool {
        raids::can_access_tier(&self.state, tier)
    }

    /// `(current, max)` attempts for today.
    pub fn raid_attempts(&self) -> (u32, u32) {
        raids::raid_attempts(&self.state)
    }

    pub fn safe_route_bonus(&self, route: &str, now: Timestamp) -> f64 {
        raids::safe_route_bonus(&self.state, route, now)
    }

    pub fn start_raid(
        &mut self,
        camp_id: u64,
        squad: &[TroopKind],
        abilities: &[AbilityKind],
        now: Timestamp,
    ) -> Result<(), Rejection> {
        let result = combat::start_raid(&mut self.state, camp_id, squad, abilities, now);
        if result.is_ok() {
            // First raid tick fires on the next pump.
            self.schedule.mark_fired(TickCadence::Raid, now);
        }
        rejected("start_raid", result)
    }

    pub fn use_ability(&mut self, kind: AbilityKind, now: Timestamp) -> Result<(), Rejection> {
        rejected("use_ability", combat::use_ability(&mut self.state, kind, now))
    }

    pub fn retreat(&mut self, now: Timestamp) -> Result<RaidSummary, Rejection> {
        rejected("retreat", combat::retreat(&mut self.state, &mut self.rng, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RaidOutcome;
    use crate::model::timestamp::MS_PER_MINUTE;
    use crate::testutil::T0;

    #[test]
    fn new_game_defaults() {
        let engine = Engine::new(EngineConfig::default());
        let player = &engine.state().player;
        assert_eq!((player.bamboo, player.seeds, player.charms), (1000, 5, 1));
        assert_eq!(player.troops.total(), 0);
        assert!(engine.state().tiles.is_empty());
        assert_eq!(engine.state().quests.len(), 3);
        assert!(!engine.state().time_speed.enabled);
        assert_eq!(engine.raid_attempts(), (3, 3));
    }

    #[test]
    fn pump_respects_cadence_intervals() {
        let mut engine = Engine::new(EngineConfig::default());
        let first = engine.pump(T0);
        assert!(first.camps_refreshed);

        engine.plant(TileCoord::new(0, 0), T0).unwrap();
        assert!(engine.pump(T0.plus_ms(4_000)).is_empty());
        // Production only advanced on the world tick, not the skipped pump.
        assert_eq!(engine.state().bamboo(TileCoord::new(0, 0)).unwrap().stored, 0.0);

        engine.pump(T0.plus_ms(60 * MS_PER_MINUTE));
        let stored = engine.state().bamboo(TileCoord::new(0, 0)).unwrap().stored;
        assert!((stored - 20.0).abs() < 1e-9);
    }

    #[test]
    fn pump_drives_an_active_raid() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.pump(T0);
        let camp = engine
            .state()
            .raids
            .camps
            .iter()
            .find(|c| c.tier <= 2)
            .map(|c| c.id);
        let Some(camp) = camp else {
            return;
        };
        engine.state.player.troops.warrior = 1;
        let picks = [AbilityKind::Heal, AbilityKind::Smoke];
        engine
            .start_raid(camp, &[TroopKind::Warrior], &picks, T0)
            .unwrap();

        engine.pump(T0.plus_ms(1_000));
        let raid = engine.state().raids.active.as_ref().unwrap();
        assert_eq!(raid.units[0].position.progress, 1.0);
        assert_eq!(raid.time_left_ms, 89_000);

        let report = engine.pump(T0.plus_ms(90_000));
        let summary = report.raid_ended.unwrap();
        assert_eq!(summary.outcome, RaidOutcome::Timeout);
        assert_eq!(engine.state().player.troops.warrior, 1);
    }

    #[test]
    fn restore_replaces_everything() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.plant(TileCoord::new(1, 1), T0).unwrap();
        let saved = engine.state().clone();

        engine.build(TileCoord::new(5, 5), BuildingKind::Depot).unwrap();
        engine.restore(saved.clone());
        assert_eq!(engine.state(), &saved);
    }

    #[test]
    fn rejected_intents_leave_state_alone() {
        let mut engine = Engine::new(EngineConfig::default());
        let before = engine.state().clone();
        assert_eq!(engine.collect_crafted_seed(TileCoord::new(0, 0)), Err(Rejection::NoSuchTile));
        assert_eq!(engine.retreat(T0), Err(Rejection::NoActiveRaid));
        assert_eq!(engine.use_ability(AbilityKind::Heal, T0), Err(Rejection::NoActiveRaid));
        assert_eq!(engine.upgrade(TileCoord::new(0, 0)), Err(Rejection::NoSuchTile));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn time_speed_setters_clamp() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.set_time_speed_enabled(true);
        engine.set_time_speed_multiplier(500.0);
        assert_eq!(engine.state().time_speed.multiplier, 50.0);
        engine.set_time_speed_multiplier(0.0);
        assert_eq!(engine.state().time_speed.multiplier, 0.1);
    }
}
