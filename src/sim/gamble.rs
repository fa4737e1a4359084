use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::info;

use crate::error::Rejection;
use crate::model::timestamp::MS_PER_MINUTE;
use crate::model::{GameState, Timestamp};

pub const GAMBLE_COOLDOWN_MS: u64 = 15 * MS_PER_MINUTE;
pub const MIN_GAMBLE_MULTIPLIER: u32 = 2;
const MIN_WIN_CHANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GambleOutcome {
    pub won: bool,
    /// `wager * multiplier` on a win, zero on a loss.
    pub payout: u64,
    /// Part of `payout` that fit in storage.
    pub credited: u64,
}

/// Chance of winning at `multiplier`: 50% at 2x, 10 points less per step, never under 5%.
pub fn win_chance(multiplier: u32) -> f64 {
    (0.5 - (f64::from(multiplier) - 2.0) * 0.1).max(MIN_WIN_CHANCE)
}

/// A player who has never gambled may always gamble.
pub fn can_gamble(state: &GameState, now: Timestamp) -> Result<(), Rejection> {
    let Some(last) = state.player.last_gamble else {
        return Ok(());
    };
    let effective = state.time_speed.effective_elapsed(now.elapsed_since(last));
    if effective < GAMBLE_COOLDOWN_MS as f64 {
        return Err(Rejection::OnCooldown);
    }
    Ok(())
}

/// Stake `wager` for a `multiplier`x return. The wager is debited either way.
pub fn gamble(
    state: &mut GameState,
    rng: &mut dyn RngCore,
    wager: u64,
    multiplier: u32,
    now: Timestamp,
) -> Result<GambleOutcome, Rejection> {
    if multiplier < MIN_GAMBLE_MULTIPLIER {
        return Err(Rejection::InvalidMultiplier);
    }
    can_gamble(state, now)?;
    state.spend_bamboo(wager)?;
    state.player.last_gamble = Some(now);

    let won = rng.random_range(0.0..1.0) < win_chance(multiplier);
    let payout = if won {
        wager.saturating_mul(u64::from(multiplier))
    } else {
        0
    };
    let credited = state.add_bamboo(payout);
    info!(wager, multiplier, won, payout, credited, "gamble settled");
    Ok(GambleOutcome {
        won,
        payout,
        credited,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FixedRng, T0};

    #[test]
    fn win_chance_falls_with_multiplier() {
        assert!((win_chance(2) - 0.5).abs() < 1e-9);
        assert!((win_chance(3) - 0.4).abs() < 1e-9);
        assert!((win_chance(6) - 0.1).abs() < 1e-9);
        assert_eq!(win_chance(10), 0.05);
    }

    #[test]
    fn winning_pays_multiplied_wager() {
        let mut state = GameState::new();
        state.player.bamboo = 100;
        let outcome = gamble(&mut state, &mut FixedRng::LOW, 50, 3, T0).unwrap();
        assert_eq!(
            outcome,
            GambleOutcome {
                won: true,
                payout: 150,
                credited: 150,
            }
        );
        assert_eq!(state.player.bamboo, 200);
        assert_eq!(state.player.last_gamble, Some(T0));
    }

    #[test]
    fn losing_keeps_the_wager() {
        let mut state = GameState::new();
        let outcome = gamble(&mut state, &mut FixedRng::HIGH, 300, 2, T0).unwrap();
        assert!(!outcome.won);
        assert_eq!((outcome.payout, outcome.credited), (0, 0));
        assert_eq!(state.player.bamboo, 700);
    }

    #[test]
    fn payout_is_storage_capped() {
        let mut state = GameState::new();
        let outcome = gamble(&mut state, &mut FixedRng::LOW, 600, 2, T0).unwrap();
        assert_eq!(outcome.payout, 1200);
        assert_eq!(outcome.credited, 600);
        assert_eq!(state.player.bamboo, 1000);
    }

    #[test]
    fn cooldown_uses_effective_time() {
        let mut state = GameState::new();
        gamble(&mut state, &mut FixedRng::HIGH, 10, 2, T0).unwrap();
        let before = state.clone();
        assert_eq!(
            gamble(&mut state, &mut FixedRng::LOW, 10, 2, T0.plus_ms(GAMBLE_COOLDOWN_MS - 1)),
            Err(Rejection::OnCooldown)
        );
        assert_eq!(state, before);
        assert!(can_gamble(&state, T0.plus_ms(GAMBLE_COOLDOWN_MS)).is_ok());

        state.time_speed.set_enabled(true);
        state.time_speed.set_multiplier(15.0);
        assert!(can_gamble(&state, T0.plus_ms(MS_PER_MINUTE)).is_ok());
    }

    #[test]
    fn rejects_bad_input_without_mutation() {
        let mut state = GameState::new();
        let before = state.clone();
        assert_eq!(
            gamble(&mut state, &mut FixedRng::LOW, 10, 1, T0),
            Err(Rejection::InvalidMultiplier)
        );
        assert_eq!(
            gamble(&mut state, &mut FixedRng::LOW, 1001, 2, T0),
            Err(Rejection::InsufficientBamboo)
        );
        assert_eq!(state, before);
    }
}
