//! Daily raid camp board: generation, tier gating, attempts and the
//! safe-route buff camps hand out once cleared.

use rand::{Rng, RngCore};
use tracing::debug;

use super::context::TickContext;
use super::system::{GameSystem, TickCadence};
use crate::id::IdGenerator;
use crate::model::raid::{
    BASE_DAILY_ATTEMPTS, LANES, LanePosition, MAX_BONUS_ATTEMPTS, MAX_CAMPS, MAX_TIER, MIN_CAMPS,
    SAFE_ROUTE_BONUS_CAP, SAFE_ROUTE_BONUS_PER_CAMP, STARS_PER_BONUS_ATTEMPT,
};
use crate::model::timestamp::MS_PER_DAY;
use crate::model::{
    CampPosition, CampRewards, Defense, DefenseKind, GameState, RaidCamp, Timestamp,
};

/// Highest tier the daily roll produces. Tiers above it exist in the reward
/// table but are never generated.
const MAX_ROLLED_TIER: u8 = 3;
const CAMP_SPREAD: f64 = 5.0;

fn defense(kind: DefenseKind, lane: u8, progress: f64) -> Defense {
    let (hp, dps) = kind.stats();
    Defense {
        kind,
        hp,
        max_hp: hp,
        dps,
        position: LanePosition { lane, progress },
    }
}

/// Build a camp's defenses for its tier.
///
/// Watch posts fill lanes in turn; horn towers and spike tiles land on a
/// random lane.
pub fn generate_defenses(tier: u8, rng: &mut dyn RngCore) -> Vec<Defense> {
    let watch_posts = (2 + tier).min(6);
    let horn_towers = match tier {
        0 | 1 => 0,
        2 | 3 => 1,
        _ => 2,
    };
    let spike_tiles = 2 * tier;

    let mut defenses = Vec::with_capacity(usize::from(watch_posts + horn_towers + spike_tiles));
    for i in 0..watch_posts {
        let progress = rng.random_range(50.0..90.0);
        defenses.push(defense(DefenseKind::WatchPost, i % LANES, progress));
    }
    for _ in 0..horn_towers {
        let lane = rng.random_range(0..LANES);
        let progress = rng.random_range(30.0..60.0);
        defenses.push(defense(DefenseKind::HornTower, lane, progress));
    }
    for _ in 0..spike_tiles {
        let lane = rng.random_range(0..LANES);
        let progress = rng.random_range(20.0..80.0);
        defenses.push(defense(DefenseKind::SpikeTile, lane, progress));
    }
    defenses
}

/// Roll a fresh board of 6 to 10 camps.
pub fn generate_camps(id_gen: &mut IdGenerator, rng: &mut dyn RngCore) -> Vec<RaidCamp> {
    let count = rng.random_range(MIN_CAMPS..=MAX_CAMPS);
    let mut camps = Vec::with_capacity(count);
    for _ in 0..count {
        let tier = rng.random_range(1..=MAX_ROLLED_TIER).min(MAX_TIER);
        let position = CampPosition {
            x: rng.random_range(-CAMP_SPREAD..CAMP_SPREAD),
            y: rng.random_range(-CAMP_SPREAD..CAMP_SPREAD),
        };
        camps.push(RaidCamp {
            id: id_gen.next_id(),
            tier,
            position,
            defenses: generate_defenses(tier, rng),
            rewards: CampRewards::for_tier(tier),
            cleared_today: false,
            stars: 0,
            safe_route_expiry: None,
        });
    }
    camps
}

/// Replace the camp board and reset daily attempts once more than 24 hours
/// have passed since the last refresh. A game that has never refreshed
/// refreshes immediately.
///
/// Deferred while a raid is in progress so the raid's camp stays on the board.
/// Returns true when the board was regenerated.
pub fn refresh_raid_camps(state: &mut GameState, rng: &mut dyn RngCore, now: Timestamp) -> bool {
    if state.raids.active.is_some() {
        return false;
    }
    let due = state
        .player
        .raids
        .last_refresh
        .is_none_or(|last| now.elapsed_since(last) > MS_PER_DAY);
    if !due {
        return false;
    }

    state.player.raids.last_refresh = Some(now);
    state.player.raids.attempts_used = 0;
    state.raids.camps = generate_camps(&mut state.id_gen, rng);
    debug!(camps = state.raids.camps.len(), "raid camps refreshed");
    true
}

/// Tiers 1-2 are open to everyone, 3-4 need HQ level 3, tier 5 needs HQ level 5.
pub fn can_access_tier(state: &GameState, tier: u8) -> bool {
    let hq = state.hq_level();
    match tier {
        0..=2 => true,
        3 | 4 => hq >= 3,
        _ => hq >= 5,
    }
}

/// Attempts left today and today's maximum. Every 6 lifetime stars add one
/// attempt, up to 2 extra.
pub fn raid_attempts(state: &GameState) -> (u32, u32) {
    let record = &state.player.raids;
    let bonus = (record.stars / STARS_PER_BONUS_ATTEMPT).min(MAX_BONUS_ATTEMPTS);
    let max = BASE_DAILY_ATTEMPTS + bonus;
    (max.saturating_sub(record.attempts_used), max)
}

/// Percentage points shaved off convoy failure rates: 20 per camp whose safe
/// route is still open, at most 30.
///
/// The bonus applies to every route alike; `_route` is accepted for callers
/// that name one.
pub fn safe_route_bonus(state: &GameState, _route: &str, now: Timestamp) -> f64 {
    let open = state
        .raids
        .camps
        .iter()
        .filter(|camp| camp.safe_route_active(now))
        .count();
    (open as f64 * SAFE_ROUTE_BONUS_PER_CAMP).min(SAFE_ROUTE_BONUS_CAP)
}

pub struct RaidRefreshSystem;

impl GameSystem for RaidRefreshSystem {
    fn name(&self) -> &str {
        "raid_refresh"
    }

    fn cadence(&self) -> TickCadence {
        TickCadence::World
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        if refresh_raid_camps(ctx.state, ctx.rng, ctx.now) {
            ctx.report.camps_refreshed = true;
        }
    }
}
