use crate::powerup::{PowerUpDefinition, PowerUpKind};
use crate::time::GameMillis;
use crate::world::EntityRef;

/// One-way notifications from the power-up engine to the renderer.
///
/// Every method defaults to a no-op so adapters only implement what they
/// draw. The engine never waits on or reads anything back from these calls.
pub trait Presentation {
    /// Materialize a collectible for `kind`. The adapter should despawn it
    /// after `lifetime_ms` if it was not collected.
    fn on_spawn_requested(
        &mut self,
        _kind: PowerUpKind,
        _def: &PowerUpDefinition,
        _lifetime_ms: GameMillis,
    ) {
    }

    /// The entity was collected and should be removed with a burst effect.
    fn on_collected(&mut self, _entity: EntityRef, _def: &PowerUpDefinition) {}

    fn on_power_up_activated(&mut self, _kind: PowerUpKind, _def: &PowerUpDefinition) {}

    fn on_power_up_upgraded(
        &mut self,
        _kind: PowerUpKind,
        _def: &PowerUpDefinition,
        _new_stacks: u32,
    ) {
    }

    fn on_power_up_deactivated(&mut self, _kind: PowerUpKind) {}

    /// Combo HUD state changed, including resets back to `(1.0, 0)`.
    fn on_combo_changed(&mut self, _multiplier: f32, _count: u32) {}

    /// Big combo banner. Only sent when the combo count exceeds one.
    fn on_combo_burst(&mut self, _multiplier: f32) {}

    fn on_instant_effect(&mut self, _kind: PowerUpKind) {}

    fn on_air_jump(&mut self) {}
}

/// Presentation adapter that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresentation;

impl Presentation for NullPresentation {}
