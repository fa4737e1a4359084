//! The single active raid: squad validation, lane advance, abilities and
//! the payout when it ends.
//!
//! Raid time is wall-clock time. The time multiplier does not apply here.

use rand::{Rng, RngCore};
use tracing::info;

use super::context::TickContext;
use super::raids::{can_access_tier, raid_attempts};
use super::report::RaidSummary;
use super::system::{GameSystem, TickCadence};
use crate::error::Rejection;
use crate::model::raid::{
    ABILITY_SLOTS, CORE_DAMAGE_PER_TICK, CORE_HP, FAST_CLEAR_BAMBOO_BONUS,
    FAST_CLEAR_THRESHOLD_MS, HEAL_AMOUNT, HQ_STAT_BONUS_PER_LEVEL, LANES, PROGRESS_PER_TICK,
    RAID_DURATION_MS, SAFE_ROUTE_DURATION_MS, SQUAD_POINT_BUDGET, TIMEOUT_BAMBOO_SHARE,
};
use crate::model::{
    AbilityKind, ActiveRaid, GameState, LanePosition, RaidAbility, RaidOutcome, RaidUnit,
    Timestamp, TroopKind, Troops, UnitStatus,
};

const LANE_END: f64 = 100.0;

/// Everything a raid start checks, in order. Nothing is consumed here.
pub fn validate_squad(
    state: &GameState,
    camp_id: u64,
    squad: &[TroopKind],
    abilities: &[AbilityKind],
) -> Result<(), Rejection> {
    if state.raids.active.is_some() {
        return Err(Rejection::RaidInProgress);
    }
    let camp = state.raids.camp(camp_id).ok_or(Rejection::UnknownCamp)?;
    if !can_access_tier(state, camp.tier) {
        return Err(Rejection::TierLocked);
    }
    if raid_attempts(state).0 == 0 {
        return Err(Rejection::NoAttemptsLeft);
    }
    if squad.is_empty() {
        return Err(Rejection::EmptySquad);
    }
    let points: u32 = squad.iter().map(|t| t.squad_points()).sum();
    if points > SQUAD_POINT_BUDGET {
        return Err(Rejection::SquadOverBudget);
    }
    if !state.player.troops.covers(&Troops::tally(squad)) {
        return Err(Rejection::NotEnoughTroops);
    }
    if abilities.len() != ABILITY_SLOTS || abilities[0] == abilities[1] {
        return Err(Rejection::AbilitySelection);
    }
    Ok(())
}

fn muster(squad: &[TroopKind], hq_level: u32) -> Vec<RaidUnit> {
    let scale = 1.0 + f64::from(hq_level.saturating_sub(1)) * HQ_STAT_BONUS_PER_LEVEL;
    squad
        .iter()
        .zip(0u32..)
        .map(|(&troop, id)| {
            let (hp, dps) = troop.base_stats();
            let hp = (hp * scale).floor();
            RaidUnit {
                id,
                troop,
                hp,
                max_hp: hp,
                dps: (dps * scale).floor(),
                position: LanePosition {
                    lane: (id % u32::from(LANES)) as u8,
                    progress: 0.0,
                },
                status: UnitStatus::Alive,
            }
        })
        .collect()
}

/// Launch a raid on `camp_id`. Consumes one daily attempt and reserves the
/// squad's troops until the raid ends.
pub fn start_raid(
    state: &mut GameState,
    camp_id: u64,
    squad: &[TroopKind],
    abilities: &[AbilityKind],
    now: Timestamp,
) -> Result<(), Rejection> {
    validate_squad(state, camp_id, squad, abilities)?;

    state.player.raids.attempts_used += 1;
    let reserved = Troops::tally(squad);
    for kind in TroopKind::ALL {
        *state.player.troops.get_mut(kind) -= reserved.get(kind);
    }

    state.raids.active = Some(ActiveRaid {
        camp_id,
        started_at: now,
        duration_ms: RAID_DURATION_MS,
        units: muster(squad, state.hq_level()),
        abilities: abilities.iter().map(|&k| RaidAbility::new(k)).collect(),
        core_hp: CORE_HP,
        max_core_hp: CORE_HP,
        time_left_ms: RAID_DURATION_MS,
    });
    info!(camp = camp_id, units = squad.len(), "raid started");
    Ok(())
}

/// Advance the active raid by one step. Returns the summary if the raid
/// ended on this step.
pub fn tick_raid(
    state: &mut GameState,
    rng: &mut dyn RngCore,
    now: Timestamp,
) -> Option<RaidSummary> {
    let raid = state.raids.active.as_mut()?;
    raid.time_left_ms = raid
        .duration_ms
        .saturating_sub(now.elapsed_since(raid.started_at));
    if raid.time_left_ms == 0 {
        return Some(finish(state, rng, RaidOutcome::Timeout, now));
    }

    for unit in raid.units.iter_mut().filter(|u| u.is_alive()) {
        unit.position.progress = (unit.position.progress + PROGRESS_PER_TICK).min(LANE_END);
        if unit.position.progress >= LANE_END {
            raid.core_hp = (raid.core_hp - unit.dps * CORE_DAMAGE_PER_TICK).max(0.0);
        }
    }

    if raid.core_hp <= 0.0 {
        return Some(finish(state, rng, RaidOutcome::Victory, now));
    }
    None
}

/// Fire one of the abilities brought on this raid. Only heal has an effect
/// beyond starting its cooldown.
pub fn use_ability(
    state: &mut GameState,
    kind: AbilityKind,
    now: Timestamp,
) -> Result<(), Rejection> {
    let raid = state.raids.active.as_mut().ok_or(Rejection::NoActiveRaid)?;
    let ability = raid
        .abilities
        .iter_mut()
        .find(|a| a.kind == kind)
        .ok_or(Rejection::UnknownAbility)?;
    if !ability.is_ready(now) {
        return Err(Rejection::OnCooldown);
    }
    ability.last_used = Some(now);

    if kind == AbilityKind::Heal {
        for unit in raid.units.iter_mut().filter(|u| u.is_alive()) {
            unit.hp = (unit.hp + HEAL_AMOUNT).min(unit.max_hp);
        }
    }
    Ok(())
}

/// Star rating for a victory: one for winning, one for a fast clear, one
/// for losing at most one unit.
pub fn victory_stars(time_left_ms: u64, casualties: usize) -> u8 {
    1 + u8::from(time_left_ms > FAST_CLEAR_THRESHOLD_MS) + u8::from(casualties <= 1)
}

/// Close the active raid with `outcome`, pay out and return survivors.
///
/// # Panics
///
/// Panics if the active raid's camp is no longer on the board. Camp refresh
/// waits for the raid to end, so this is a logic error.
fn finish(
    state: &mut GameState,
    rng: &mut dyn RngCore,
    outcome: RaidOutcome,
    now: Timestamp,
) -> RaidSummary {
    let Some(mut raid) = state.raids.active.take() else {
        panic!("finish: no active raid");
    };
    raid.time_left_ms = raid
        .duration_ms
        .saturating_sub(now.elapsed_since(raid.started_at));
    let Some(camp) = state.raids.camp_mut(raid.camp_id) else {
        panic!("finish: camp {} of the active raid is missing", raid.camp_id);
    };

    let mut earned_bamboo = 0;
    let mut seeds = 0;
    let mut charms = 0;
    let mut stars = 0;
    let mut new_stars = 0;
    match outcome {
        RaidOutcome::Victory => {
            let fast = raid.time_left_ms > FAST_CLEAR_THRESHOLD_MS;
            let bonus = if fast { FAST_CLEAR_BAMBOO_BONUS } else { 1.0 };
            earned_bamboo = (camp.rewards.bamboo as f64 * bonus).floor() as u64;
            if rng.random_range(0.0..100.0) < f64::from(camp.rewards.seed_chance) {
                seeds = 1;
            }
            if rng.random_range(0.0..100.0) < f64::from(camp.rewards.charm_chance) {
                charms = 1;
            }

            stars = victory_stars(raid.time_left_ms, raid.casualties());
            let previous = camp.stars;
            camp.stars = camp.stars.max(stars);
            new_stars = u32::from(camp.stars - previous);
            camp.cleared_today = true;
            camp.safe_route_expiry = Some(now.plus_ms(SAFE_ROUTE_DURATION_MS));
        }
        RaidOutcome::Timeout => {
            earned_bamboo = (camp.rewards.bamboo as f64 * TIMEOUT_BAMBOO_SHARE).floor() as u64;
        }
        RaidOutcome::Defeat => {}
    }

    let bamboo = state.add_bamboo(earned_bamboo);
    state.add_seeds(seeds);
    state.player.charms += charms;
    state.player.raids.stars += new_stars;

    let survivors = Troops::tally(
        &raid
            .units
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| u.troop)
            .collect::<Vec<_>>(),
    );
    for kind in TroopKind::ALL {
        *state.player.troops.get_mut(kind) += survivors.get(kind);
    }

    info!(
        camp = raid.camp_id,
        ?outcome,
        bamboo,
        seeds,
        charms,
        stars,
        new_stars,
        "raid ended"
    );
    RaidSummary {
        camp_id: raid.camp_id,
        outcome,
        bamboo,
        seeds,
        charms,
        stars,
        new_stars,
        survivors,
    }
}

/// Give up on the active raid. No rewards; survivors still come home.
///
/// This is the only way a player ends a raid. Victory and timeout are
/// decided by [`tick_raid`].
pub fn retreat(
    state: &mut GameState,
    rng: &mut dyn RngCore,
    now: Timestamp,
) -> Result<RaidSummary, Rejection> {
    if state.raids.active.is_none() {
        return Err(Rejection::NoActiveRaid);
    }
    Ok(finish(state, rng, RaidOutcome::Defeat, now))
}

pub struct RaidSystem;

impl GameSystem for RaidSystem {
    fn name(&self) -> &str {
        "raid"
    }

    fn cadence(&self) -> TickCadence {
        TickCadence::Raid
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        if let Some(summary) = tick_raid(ctx.state, ctx.rng, ctx.now) {
            ctx.report.raid_ended = Some(summary);
        }
    }
}
