/// Driver and RNG settings for an [`Engine`](crate::Engine).
///
/// Balance numbers are not configurable; they live with the catalog types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for the engine's RNG. The same seed and intent sequence replay
    /// the same game.
    pub seed: u64,
    /// Interval between world ticks while the game is open.
    pub world_tick_ms: u64,
    /// Interval between raid ticks while a raid is active.
    pub raid_tick_ms: u64,
    pub autosave_ms: u64,
}

impl EngineConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world_tick_ms: 5_000,
            raid_tick_ms: 1_000,
            autosave_ms: 30_000,
        }
    }
}
