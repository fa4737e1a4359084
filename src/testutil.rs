use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::RngCore;

use crate::model::{GameState, Timestamp};
use crate::sim::{GameSystem, TickContext, TickReport};

/// An arbitrary but realistic wall-clock start for unit tests.
pub const T0: Timestamp = Timestamp::from_millis(1_700_000_000_000);

/// RNG that returns the same word forever.
///
/// `FixedRng::LOW` makes every `random_range(0.0..1.0)` roll 0.0 (every
/// chance succeeds); `FixedRng::HIGH` rolls just under 1.0 (every chance fails).
pub struct FixedRng(pub u64);

impl FixedRng {
    pub const LOW: FixedRng = FixedRng(0);
    pub const HIGH: FixedRng = FixedRng(u64::MAX);
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let bytes = self.0.to_le_bytes();
        for (i, b) in dst.iter_mut().enumerate() {
            *b = bytes[i % 8];
        }
    }
}

/// Run a single system once at `now`. Returns what it reported.
pub fn tick_system_at(
    state: &mut GameState,
    system: &mut dyn GameSystem,
    now: Timestamp,
    seed: u64,
) -> TickReport {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut report = TickReport::default();
    let mut ctx = TickContext {
        state,
        rng: &mut rng,
        now,
        report: &mut report,
    };
    system.tick(&mut ctx);
    report
}
