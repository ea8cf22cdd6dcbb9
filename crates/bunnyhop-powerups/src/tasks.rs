use bunnyhop_core::powerup::PowerUpKind;
use bunnyhop_core::timer::Scheduler;
use bunnyhop_core::world::Collectible;

/// Deferred work owned by the power-up engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Duration of an active power-up ran out.
    Expire(PowerUpKind),
    /// The combo window closed with no further collection.
    ComboReset,
    /// Time to spawn the next collectible power-up.
    Spawn,
    /// One drop of a carrot-rain burst.
    DropCollectible(Collectible),
}

pub type TaskQueue = Scheduler<TimerAction>;
