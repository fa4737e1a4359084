use super::context::TickContext;

/// Which driver cadence a system runs on.
///
/// Ordered coarsest-to-finest: world ticks every few seconds, the raid tick
/// runs faster while a raid is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TickCadence {
    World,
    Raid,
}

/// A periodic update step driven by the external clock.
///
/// Object-safe so systems can be stored as `Box<dyn GameSystem>`.
pub trait GameSystem {
    fn name(&self) -> &str;
    fn cadence(&self) -> TickCadence;
    fn tick(&mut self, ctx: &mut TickContext);
}
