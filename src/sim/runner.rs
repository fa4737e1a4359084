use rand::RngCore;

use super::combat::RaidSystem;
use super::context::TickContext;
use super::convoys::ConvoySystem;
use super::farming::BambooGrowthSystem;
use super::quests::QuestSystem;
use super::raids::RaidRefreshSystem;
use super::report::TickReport;
use super::system::{GameSystem, TickCadence};
use super::workshops::{SeedCraftingSystem, TroopTrainingSystem};
use crate::config::EngineConfig;
use crate::model::{GameState, Timestamp};

/// The standard systems in dispatch order.
///
/// World systems run convoys first so quest progress sees the convoys that
/// landed on the same tick. The raid system is the only raid-cadence system.
pub fn default_systems() -> Vec<Box<dyn GameSystem>> {
    vec![
        Box::new(ConvoySystem),
        Box::new(BambooGrowthSystem),
        Box::new(QuestSystem),
        Box::new(SeedCraftingSystem),
        Box::new(TroopTrainingSystem),
        Box::new(RaidRefreshSystem),
        Box::new(RaidSystem),
    ]
}

/// Run every system registered for `cadence`, in registration order, against
/// one shared `now`.
pub fn dispatch_systems(
    state: &mut GameState,
    systems: &mut [Box<dyn GameSystem>],
    rng: &mut dyn RngCore,
    now: Timestamp,
    cadence: TickCadence,
) -> TickReport {
    let mut report = TickReport::default();
    for system in systems.iter_mut() {
        if system.cadence() != cadence {
            continue;
        }
        let mut ctx = TickContext {
            state,
            rng,
            now,
            report: &mut report,
        };
        system.tick(&mut ctx);
    }
    report
}

/// Tracks when each cadence last fired so a driver with a single timer can
/// ask what is due.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSchedule {
    pub world_interval_ms: u64,
    pub raid_interval_ms: u64,
    last_world: Option<Timestamp>,
    last_raid: Option<Timestamp>,
}

impl TickSchedule {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            world_interval_ms: config.world_tick_ms,
            raid_interval_ms: config.raid_tick_ms,
            last_world: None,
            last_raid: None,
        }
    }

    fn interval(&self, cadence: TickCadence) -> u64 {
        match cadence {
            TickCadence::World => self.world_interval_ms,
            TickCadence::Raid => self.raid_interval_ms,
        }
    }

    fn last(&self, cadence: TickCadence) -> Option<Timestamp> {
        match cadence {
            TickCadence::World => self.last_world,
            TickCadence::Raid => self.last_raid,
        }
    }

    /// A cadence that never fired is due immediately.
    pub fn is_due(&self, cadence: TickCadence, now: Timestamp) -> bool {
        self.last(cadence)
            .is_none_or(|last| now.elapsed_since(last) >= self.interval(cadence))
    }

    pub fn mark_fired(&mut self, cadence: TickCadence, now: Timestamp) {
        match cadence {
            TickCadence::World => self.last_world = Some(now),
            TickCadence::Raid => self.last_raid = Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::ConvoyKind;
    use crate::model::timestamp::MS_PER_MINUTE;
    use crate::sim::convoys::dispatch_convoy;
    use crate::testutil::T0;

    struct Recorder {
        name: &'static str,
        cadence: TickCadence,
        log: std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>,
    }

    impl GameSystem for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn cadence(&self) -> TickCadence {
            self.cadence
        }

        fn tick(&mut self, _ctx: &mut TickContext) {
            self.log.borrow_mut().push(self.name);
        }
    }

    #[test]
    fn dispatch_runs_matching_cadence_in_order() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut systems: Vec<Box<dyn GameSystem>> = vec![
            Box::new(Recorder {
                name: "a",
                cadence: TickCadence::World,
                log: log.clone(),
            }),
            Box::new(Recorder {
                name: "raid",
                cadence: TickCadence::Raid,
                log: log.clone(),
            }),
            Box::new(Recorder {
                name: "b",
                cadence: TickCadence::World,
                log: log.clone(),
            }),
        ];
        let mut state = GameState::new();
        let mut rng = SmallRng::seed_from_u64(0);

        dispatch_systems(&mut state, &mut systems, &mut rng, T0, TickCadence::World);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        dispatch_systems(&mut state, &mut systems, &mut rng, T0, TickCadence::Raid);
        assert_eq!(*log.borrow(), vec!["a", "b", "raid"]);
    }

    #[test]
    fn first_world_tick_generates_camps() {
        let mut state = GameState::new();
        let mut systems = default_systems();
        let mut rng = SmallRng::seed_from_u64(42);
        let report = dispatch_systems(&mut state, &mut systems, &mut rng, T0, TickCadence::World);
        assert!(report.camps_refreshed);
        assert!(!state.raids.camps.is_empty());

        let again = dispatch_systems(&mut state, &mut systems, &mut rng, T0, TickCadence::World);
        assert!(again.is_empty());
    }

    #[test]
    fn convoy_landing_counts_toward_quests_same_tick() {
        let mut state = GameState::new();
        state.player.stats.convoys_completed = 2;
        state.player.bamboo = 100;
        state.player.raids.last_refresh = Some(T0);
        dispatch_convoy(&mut state, ConvoyKind::Raft, 50, Some(30), T0).unwrap();

        let mut systems = default_systems();
        // Any roll under 0.9 succeeds for a 30 minute raft.
        let mut rng = crate::testutil::FixedRng::LOW;
        let report = dispatch_systems(
            &mut state,
            &mut systems,
            &mut rng,
            T0.plus_ms(30 * MS_PER_MINUTE),
            TickCadence::World,
        );
        assert_eq!(report.convoys.len(), 1);
        assert_eq!(report.quests_completed, vec!["trade-routes".to_string()]);
    }

    #[test]
    fn schedule_fires_each_cadence_on_its_interval() {
        let mut schedule = TickSchedule::new(&EngineConfig::default());
        assert!(schedule.is_due(TickCadence::World, T0));
        schedule.mark_fired(TickCadence::World, T0);
        schedule.mark_fired(TickCadence::Raid, T0);

        assert!(!schedule.is_due(TickCadence::World, T0.plus_ms(4_999)));
        assert!(schedule.is_due(TickCadence::Raid, T0.plus_ms(1_000)));
        assert!(schedule.is_due(TickCadence::World, T0.plus_ms(5_000)));
    }
}
