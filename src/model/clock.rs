use serde::{Deserialize, Serialize};

pub const MIN_MULTIPLIER: f64 = 0.1;
pub const MAX_MULTIPLIER: f64 = 50.0;

/// Debug time acceleration.
///
/// When enabled, elapsed wall-clock time is multiplied and freshly created
/// durations are divided by `multiplier`. Production and training ticks read
/// the live multiplier every tick; convoy economics instead use the original
/// duration frozen at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpeed {
    pub enabled: bool,
    pub multiplier: f64,
}

impl TimeSpeed {
    pub fn new() -> Self {
        Self {
            enabled: false,
            multiplier: 1.0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the multiplier, clamped to `[0.1, 50]`.
    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = if multiplier.is_nan() {
            MIN_MULTIPLIER
        } else {
            multiplier.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
        };
    }

    /// Effective simulation time for a wall-clock interval.
    pub fn effective_elapsed(&self, wall_ms: u64) -> f64 {
        if self.enabled {
            wall_ms as f64 * self.multiplier
        } else {
            wall_ms as f64
        }
    }

    /// Nominal duration for a process created right now.
    pub fn scale_duration(&self, duration_ms: f64) -> f64 {
        if self.enabled {
            duration_ms / self.multiplier
        } else {
            duration_ms
        }
    }
}

impl Default for TimeSpeed {
    fn default() -> Self {
        Self::new()
    }
}
