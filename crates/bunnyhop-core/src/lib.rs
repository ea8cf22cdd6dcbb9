pub mod powerup;
pub mod presentation;
pub mod time;
pub mod timer;
pub mod world;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::powerup::{PowerUpDefinition, PowerUpKind};
    use crate::presentation::Presentation;
    use crate::time::GameMillis;
    use crate::world::{Collectible, EntityRef, PlayerEffectState, PlayerWorld};

    /// In-memory world that records every mutation requested by the engine.
    #[derive(Debug, Default, Clone)]
    pub struct TestWorld {
        pub effects: PlayerEffectState,
        pub score: u64,
        pub player_x: f32,
        pub collectibles: Vec<Collectible>,
        pub air_jumps: u32,
    }

    impl TestWorld {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_score(score: u64) -> Self {
            Self {
                score,
                ..Self::default()
            }
        }
    }

    impl PlayerWorld for TestWorld {
        fn effects(&self) -> &PlayerEffectState {
            &self.effects
        }

        fn effects_mut(&mut self) -> &mut PlayerEffectState {
            &mut self.effects
        }

        fn score(&self) -> u64 {
            self.score
        }

        fn add_score(&mut self, points: u64) {
            self.score += points;
        }

        fn translate_player(&mut self, dx: f32) {
            self.player_x += dx;
        }

        fn spawn_collectible(&mut self, collectible: Collectible) {
            self.collectibles.push(collectible);
        }

        fn launch_air_jump(&mut self) {
            self.air_jumps += 1;
        }
    }

    /// One presentation callback, captured for assertions.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Notification {
        SpawnRequested {
            kind: PowerUpKind,
            lifetime_ms: GameMillis,
        },
        Collected {
            entity: EntityRef,
            kind: PowerUpKind,
        },
        Activated(PowerUpKind),
        Upgraded {
            kind: PowerUpKind,
            stacks: u32,
        },
        Deactivated(PowerUpKind),
        ComboChanged {
            multiplier: f32,
            count: u32,
        },
        ComboBurst(f32),
        InstantEffect(PowerUpKind),
        AirJump,
    }

    /// Presentation adapter that records notifications in call order.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingPresenter {
        pub notifications: Vec<Notification>,
    }

    impl RecordingPresenter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn deactivations(&self) -> Vec<PowerUpKind> {
            self.notifications
                .iter()
                .filter_map(|n| match n {
                    Notification::Deactivated(kind) => Some(*kind),
                    _ => None,
                })
                .collect()
        }

        pub fn spawned(&self) -> Vec<PowerUpKind> {
            self.notifications
                .iter()
                .filter_map(|n| match n {
                    Notification::SpawnRequested { kind, .. } => Some(*kind),
                    _ => None,
                })
                .collect()
        }

        pub fn count(&self, pred: impl Fn(&Notification) -> bool) -> usize {
            self.notifications.iter().filter(|n| pred(n)).count()
        }

        pub fn clear(&mut self) {
            self.notifications.clear();
        }
    }

    impl Presentation for RecordingPresenter {
        fn on_spawn_requested(
            &mut self,
            kind: PowerUpKind,
            _def: &PowerUpDefinition,
            lifetime_ms: GameMillis,
        ) {
            self.notifications
                .push(Notification::SpawnRequested { kind, lifetime_ms });
        }

        fn on_collected(&mut self, entity: EntityRef, def: &PowerUpDefinition) {
            self.notifications.push(Notification::Collected {
                entity,
                kind: def.kind,
            });
        }

        fn on_power_up_activated(&mut self, kind: PowerUpKind, _def: &PowerUpDefinition) {
            self.notifications.push(Notification::Activated(kind));
        }

        fn on_power_up_upgraded(
            &mut self,
            kind: PowerUpKind,
            _def: &PowerUpDefinition,
            new_stacks: u32,
        ) {
            self.notifications.push(Notification::Upgraded {
                kind,
                stacks: new_stacks,
            });
        }

        fn on_power_up_deactivated(&mut self, kind: PowerUpKind) {
            self.notifications.push(Notification::Deactivated(kind));
        }

        fn on_combo_changed(&mut self, multiplier: f32, count: u32) {
            self.notifications
                .push(Notification::ComboChanged { multiplier, count });
        }

        fn on_combo_burst(&mut self, multiplier: f32) {
            self.notifications.push(Notification::ComboBurst(multiplier));
        }

        fn on_instant_effect(&mut self, kind: PowerUpKind) {
            self.notifications.push(Notification::InstantEffect(kind));
        }

        fn on_air_jump(&mut self) {
            self.notifications.push(Notification::AirJump);
        }
    }
}
