use serde::{Deserialize, Serialize};

use super::timestamp::{MS_PER_MINUTE, Timestamp};

/// Failure share of the wager: a failed convoy returns 75%.
pub const FAILED_CONVOY_RETURN: f64 = 0.75;
/// The safe-route bonus may cut the failure rate by at most 30% of itself.
pub const SAFE_ROUTE_MAX_RELATIVE_CUT: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvoyKind {
    Porter,
    Raft,
}

/// Risk/reward bounds for one convoy kind. Durations are in minutes, rates
/// in percent, profit rates as fractions of the wager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvoyParams {
    pub min_duration: f64,
    pub max_duration: f64,
    pub min_failure_rate: f64,
    pub max_failure_rate: f64,
    pub base_profit_rate: f64,
    pub max_profit_rate: f64,
    /// Duration used when the dispatcher does not pick one.
    pub default_duration: u64,
    /// Wager range the UI suggests. Informational only.
    pub recommended_capacity: (u64, u64),
}

impl ConvoyKind {
    pub const fn params(self) -> ConvoyParams {
        match self {
            ConvoyKind::Porter => ConvoyParams {
                min_duration: 10.0,
                max_duration: 60.0,
                min_failure_rate: 5.0,
                max_failure_rate: 25.0,
                base_profit_rate: 0.1,
                max_profit_rate: 0.5,
                default_duration: 15,
                recommended_capacity: (100, 500),
            },
            ConvoyKind::Raft => ConvoyParams {
                min_duration: 3.0,
                max_duration: 30.0,
                min_failure_rate: 10.0,
                max_failure_rate: 35.0,
                base_profit_rate: 0.15,
                max_profit_rate: 0.7,
                default_duration: 25,
                recommended_capacity: (200, 1000),
            },
        }
    }
}

impl ConvoyParams {
    /// Position of `minutes` between this kind's min and max duration, in `[0, 1]`.
    pub fn duration_progress(&self, minutes: f64) -> f64 {
        ((minutes - self.min_duration) / (self.max_duration - self.min_duration)).clamp(0.0, 1.0)
    }

    /// Failure rate in percent before any safe-route bonus.
    pub fn failure_rate(&self, progress: f64) -> f64 {
        self.max_failure_rate - progress * (self.max_failure_rate - self.min_failure_rate)
    }

    pub fn profit_rate(&self, progress: f64) -> f64 {
        self.base_profit_rate + progress * (self.max_profit_rate - self.base_profit_rate)
    }
}

/// Apply a safe-route bonus (percentage points) to a failure rate, never
/// cutting it by more than 30% of its value.
pub fn apply_safe_route(failure_rate: f64, bonus: f64) -> f64 {
    (failure_rate * SAFE_ROUTE_MAX_RELATIVE_CUT).max(failure_rate - bonus)
}

/// A wager in flight. Convoys leave the list when they resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convoy {
    pub id: u64,
    pub kind: ConvoyKind,
    pub started_at: Timestamp,
    /// Time-accelerated duration fixed at dispatch.
    pub duration_ms: f64,
    /// Un-accelerated duration, used to recompute risk and reward at resolution.
    pub original_duration_ms: u64,
    pub wager: u64,
}

impl Convoy {
    pub fn original_minutes(&self) -> f64 {
        self.original_duration_ms as f64 / MS_PER_MINUTE as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn porter_at_min_duration_is_riskiest() {
        let p = ConvoyKind::Porter.params();
        let progress = p.duration_progress(10.0);
        assert_eq!(progress, 0.0);
        assert_eq!(p.failure_rate(progress), 25.0);
        assert_eq!(p.profit_rate(progress), 0.1);
    }

    #[test]
    fn progress_is_clamped() {
        let p = ConvoyKind::Raft.params();
        assert_eq!(p.duration_progress(1.0), 0.0);
        assert_eq!(p.duration_progress(90.0), 1.0);
        assert!((p.failure_rate(1.0) - 10.0).abs() < 1e-9);
        assert!((p.profit_rate(1.0) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn safe_route_cut_is_capped_at_thirty_percent() {
        assert!((apply_safe_route(25.0, 20.0) - 17.5).abs() < 1e-9);
        assert!((apply_safe_route(25.0, 5.0) - 20.0).abs() < 1e-9);
        assert_eq!(apply_safe_route(25.0, 0.0), 25.0);
    }
}
