//! Convoy dispatch and resolution.
//!
//! Risk and reward are recomputed at resolution from the un-accelerated
//! duration chosen at dispatch, so changing the time multiplier mid-flight
//! only changes when a convoy lands, never what it pays.

use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::info;

use super::context::TickContext;
use super::raids::safe_route_bonus;
use super::report::ConvoyResolution;
use super::system::{GameSystem, TickCadence};
use crate::error::Rejection;
use crate::model::convoy::{FAILED_CONVOY_RETURN, apply_safe_route};
use crate::model::timestamp::MS_PER_MINUTE;
use crate::model::{Convoy, ConvoyKind, GameState, Timestamp};

/// Route name passed to the safe-route lookup. The bonus is not route-specific.
const TRADE_ROUTE: &str = "trade";

/// Send `wager` bamboo out on a convoy. `minutes` of `None` or zero means the
/// kind's standard trip. Returns the new convoy's ID.
pub fn dispatch_convoy(
    state: &mut GameState,
    kind: ConvoyKind,
    wager: u64,
    minutes: Option<u64>,
    now: Timestamp,
) -> Result<u64, Rejection> {
    let minutes = match minutes {
        None | Some(0) => kind.params().default_duration,
        Some(minutes) => minutes,
    };
    let original_duration_ms = minutes
        .checked_mul(MS_PER_MINUTE)
        .ok_or(Rejection::InvalidDuration)?;
    state.spend_bamboo(wager)?;

    let id = state.id_gen.next_id();
    state.convoys.push(Convoy {
        id,
        kind,
        started_at: now,
        duration_ms: state.time_speed.scale_duration(original_duration_ms as f64),
        original_duration_ms,
        wager,
    });
    info!(convoy = id, ?kind, wager, minutes, "convoy dispatched");
    Ok(id)
}

fn resolve(
    state: &mut GameState,
    convoy: &Convoy,
    bonus: f64,
    rng: &mut dyn RngCore,
) -> ConvoyResolution {
    let params = convoy.kind.params();
    let progress = params.duration_progress(convoy.original_minutes());
    let failure_rate = apply_safe_route(params.failure_rate(progress), bonus);
    let success = rng.random_range(0.0..1.0) < (100.0 - failure_rate) / 100.0;

    let (profit, credited) = if success {
        let profit = (convoy.wager as f64 * params.profit_rate(progress)).floor() as u64;
        let credited = state.add_bamboo(convoy.wager + profit);
        state.player.stats.convoys_completed += 1;
        (profit, credited)
    } else {
        let refund = (convoy.wager as f64 * FAILED_CONVOY_RETURN).floor() as u64;
        (0, state.add_bamboo(refund))
    };

    info!(
        convoy = convoy.id,
        kind = ?convoy.kind,
        success,
        failure_rate,
        profit,
        credited,
        "convoy resolved"
    );
    ConvoyResolution {
        convoy_id: convoy.id,
        kind: convoy.kind,
        success,
        failure_rate,
        profit,
        credited,
    }
}

/// Resolve and remove every convoy whose effective travel time has elapsed.
/// Convoys still in flight keep their order.
pub fn resolve_convoys(
    state: &mut GameState,
    rng: &mut dyn RngCore,
    now: Timestamp,
) -> Vec<ConvoyResolution> {
    let speed = state.time_speed;
    let (arrived, in_flight): (Vec<Convoy>, Vec<Convoy>) = std::mem::take(&mut state.convoys)
        .into_iter()
        .partition(|c| speed.effective_elapsed(now.elapsed_since(c.started_at)) >= c.duration_ms);
    state.convoys = in_flight;
    if arrived.is_empty() {
        return Vec::new();
    }

    let bonus = safe_route_bonus(state, TRADE_ROUTE, now);
    let mut resolved = Vec::with_capacity(arrived.len());
    for convoy in &arrived {
        resolved.push(resolve(state, convoy, bonus, rng));
    }
    resolved
}

/// Preview of a convoy's odds, computed the same way resolution does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvoyForecast {
    /// Percent, after the safe-route bonus.
    pub failure_rate: f64,
    /// Percent.
    pub success_rate: f64,
    pub profit_rate: f64,
    /// Probability-weighted net bamboo: profit on success, minus the lost
    /// quarter of the wager on failure.
    pub expected_profit: f64,
    /// Suggested wager range for this kind. Not enforced.
    pub recommended_capacity: (u64, u64),
}

pub fn convoy_forecast(
    kind: ConvoyKind,
    wager: u64,
    minutes: f64,
    safe_route_bonus: f64,
) -> ConvoyForecast {
    let params = kind.params();
    let progress = params.duration_progress(minutes);
    let failure_rate = apply_safe_route(params.failure_rate(progress), safe_route_bonus);
    let success_rate = 100.0 - failure_rate;
    let profit_rate = params.profit_rate(progress);

    let profit = (wager as f64 * profit_rate).floor();
    let loss = wager as f64 - (wager as f64 * FAILED_CONVOY_RETURN).floor();
    ConvoyForecast {
        failure_rate,
        success_rate,
        profit_rate,
        expected_profit: success_rate / 100.0 * profit - failure_rate / 100.0 * loss,
        recommended_capacity: params.recommended_capacity,
    }
}

pub struct ConvoySystem;

impl GameSystem for ConvoySystem {
    fn name(&self) -> &str {
        "convoys"
    }

    fn cadence(&self) -> TickCadence {
        TickCadence::World
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let resolved = resolve_convoys(ctx.state, ctx.rng, ctx.now);
        ctx.report.convoys.extend(resolved);
    }
}
