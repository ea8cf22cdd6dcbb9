use bunnyhop_core::powerup::PowerUpKind;
use bunnyhop_core::time::GameMillis;
use bunnyhop_core::world::{Collectible, PlayerWorld};

use crate::config::EffectTuning;
use crate::tasks::{TaskQueue, TimerAction};

/// Radius within which an active magnet pulls items toward the bunny.
pub const MAGNET_RANGE: f32 = 200.0;
const MAGNET_CARROT_STRENGTH: f32 = 10.0;
const MAGNET_POWERUP_STRENGTH: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnetTarget {
    Carrot,
    PowerUp,
}

/// Attraction applied to an item `distance` units away while the magnet is active.
pub fn magnet_pull(distance: f32, target: MagnetTarget) -> f32 {
    if !(0.0..MAGNET_RANGE).contains(&distance) {
        return 0.0;
    }
    let base = match target {
        MagnetTarget::Carrot => MAGNET_CARROT_STRENGTH,
        MagnetTarget::PowerUp => MAGNET_POWERUP_STRENGTH,
    };
    (MAGNET_RANGE - distance) / MAGNET_RANGE * base
}

fn is_instant_kind(kind: PowerUpKind) -> bool {
    matches!(kind, PowerUpKind::Teleport | PowerUpKind::CarrotRain)
}

/// Maps each power-up kind to its player-state mutation.
#[derive(Debug, Clone, Default)]
pub struct EffectDispatcher {
    tuning: EffectTuning,
}

impl EffectDispatcher {
    pub fn new(tuning: EffectTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &EffectTuning {
        &self.tuning
    }

    pub fn activate<W: PlayerWorld + ?Sized>(&self, kind: PowerUpKind, world: &mut W) {
        debug_assert!(!is_instant_kind(kind), "{kind:?} has no timed activation");
        let fx = world.effects_mut();
        match kind {
            PowerUpKind::DoubleJump => {
                fx.has_double_jump = true;
                fx.double_jump_count = 0;
            },
            PowerUpKind::SpeedBoost => fx.speed_multiplier = self.tuning.speed_multiplier,
            PowerUpKind::Shield => fx.has_shield = true,
            PowerUpKind::Magnet => fx.has_magnet = true,
            PowerUpKind::TimeSlow => {
                fx.has_time_slow = true;
                fx.time_scale = self.tuning.time_slow_scale;
            },
            PowerUpKind::GravityReverse => {
                fx.has_gravity_reverse = true;
                fx.gravity_sign = -1.0;
            },
            PowerUpKind::MultiCollect => fx.has_multi_collect = true,
            PowerUpKind::Invincibility => fx.has_invincibility = true,
            PowerUpKind::WallJump => fx.has_wall_jump = true,
            PowerUpKind::Dash => fx.has_dash = true,
            PowerUpKind::Bounce => {
                fx.has_bounce = true;
                fx.bounce_multiplier = self.tuning.bounce_multiplier;
            },
            PowerUpKind::PhaseThrough => fx.has_phase_through = true,
            PowerUpKind::TimeFreeze => fx.has_time_freeze = true,
            PowerUpKind::GhostMode => fx.has_ghost_mode = true,
            PowerUpKind::SuperJump => {
                fx.has_super_jump = true;
                fx.super_jump_multiplier = self.tuning.super_jump_multiplier;
            },
            PowerUpKind::Teleport | PowerUpKind::CarrotRain => {},
        }
    }

    pub fn deactivate<W: PlayerWorld + ?Sized>(&self, kind: PowerUpKind, world: &mut W) {
        debug_assert!(!is_instant_kind(kind), "{kind:?} has no timed deactivation");
        let fx = world.effects_mut();
        match kind {
            PowerUpKind::DoubleJump => {
                fx.has_double_jump = false;
                fx.double_jump_count = 0;
            },
            PowerUpKind::SpeedBoost => fx.speed_multiplier = 1.0,
            PowerUpKind::Shield => fx.has_shield = false,
            PowerUpKind::Magnet => fx.has_magnet = false,
            PowerUpKind::TimeSlow => {
                fx.has_time_slow = false;
                fx.time_scale = 1.0;
            },
            PowerUpKind::GravityReverse => {
                fx.has_gravity_reverse = false;
                fx.gravity_sign = 1.0;
            },
            PowerUpKind::MultiCollect => fx.has_multi_collect = false,
            PowerUpKind::Invincibility => fx.has_invincibility = false,
            PowerUpKind::WallJump => fx.has_wall_jump = false,
            PowerUpKind::Dash => fx.has_dash = false,
            PowerUpKind::Bounce => {
                fx.has_bounce = false;
                fx.bounce_multiplier = 1.0;
            },
            PowerUpKind::PhaseThrough => fx.has_phase_through = false,
            PowerUpKind::TimeFreeze => fx.has_time_freeze = false,
            PowerUpKind::GhostMode => fx.has_ghost_mode = false,
            PowerUpKind::SuperJump => {
                fx.has_super_jump = false;
                fx.super_jump_multiplier = 1.0;
            },
            PowerUpKind::Teleport | PowerUpKind::CarrotRain => {},
        }
    }

    /// Apply a zero-duration power-up. Carrot rain is spread over time as
    /// scheduled drops starting at `now`.
    pub fn instant<W: PlayerWorld + ?Sized>(
        &self,
        kind: PowerUpKind,
        world: &mut W,
        tasks: &mut TaskQueue,
        now: GameMillis,
    ) {
        debug_assert!(is_instant_kind(kind), "{kind:?} is not an instant power-up");
        match kind {
            PowerUpKind::Teleport => {
                world.translate_player(self.tuning.teleport_distance);
                world.add_score(self.tuning.teleport_score);
            },
            PowerUpKind::CarrotRain => {
                let interval = self.tuning.carrot_rain_interval_ms;
                for i in 0..u64::from(self.tuning.carrot_rain_count) {
                    tasks.schedule(
                        now.saturating_add(i.saturating_mul(interval)),
                        TimerAction::DropCollectible(Collectible::Carrot),
                    );
                }
            },
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunnyhop_core::test_helpers::TestWorld;
    use bunnyhop_core::world::{GHOST_ALPHA, PHASE_ALPHA, PlayerEffectState};

    const TIMED: [PowerUpKind; 15] = [
        PowerUpKind::DoubleJump,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
        PowerUpKind::TimeSlow,
        PowerUpKind::GravityReverse,
        PowerUpKind::MultiCollect,
        PowerUpKind::Invincibility,
        PowerUpKind::WallJump,
        PowerUpKind::Dash,
        PowerUpKind::Bounce,
        PowerUpKind::PhaseThrough,
        PowerUpKind::TimeFreeze,
        PowerUpKind::GhostMode,
        PowerUpKind::SuperJump,
    ];

    #[test]
    fn every_timed_kind_changes_state_and_restores_it() {
        let dispatcher = EffectDispatcher::default();
        for kind in TIMED {
            let mut world = TestWorld::new();
            dispatcher.activate(kind, &mut world);
            assert_ne!(
                world.effects,
                PlayerEffectState::default(),
                "{kind:?} activation had no effect"
            );
            dispatcher.deactivate(kind, &mut world);
            assert_eq!(
                world.effects,
                PlayerEffectState::default(),
                "{kind:?} deactivation left residue"
            );
        }
    }

    #[test]
    fn side_parameters_follow_tuning() {
        let dispatcher = EffectDispatcher::default();
        let mut world = TestWorld::new();
        for kind in [
            PowerUpKind::SpeedBoost,
            PowerUpKind::TimeSlow,
            PowerUpKind::GravityReverse,
            PowerUpKind::Bounce,
            PowerUpKind::SuperJump,
        ] {
            dispatcher.activate(kind, &mut world);
        }
        let fx = &world.effects;
        assert_eq!(fx.speed_multiplier, 1.5);
        assert_eq!(fx.time_scale, 0.5);
        assert_eq!(fx.gravity_sign, -1.0);
        assert_eq!(fx.bounce_multiplier, 1.5);
        assert_eq!(fx.super_jump_multiplier, 2.0);
    }

    #[test]
    fn overlapping_ghost_and_phase_alpha() {
        let dispatcher = EffectDispatcher::default();
        let mut world = TestWorld::new();
        dispatcher.activate(PowerUpKind::PhaseThrough, &mut world);
        dispatcher.activate(PowerUpKind::GhostMode, &mut world);
        assert_eq!(world.effects.player_alpha(), GHOST_ALPHA);
        dispatcher.deactivate(PowerUpKind::GhostMode, &mut world);
        assert_eq!(world.effects.player_alpha(), PHASE_ALPHA);
        dispatcher.deactivate(PowerUpKind::PhaseThrough, &mut world);
        assert_eq!(world.effects.player_alpha(), 1.0);
    }

    #[test]
    fn teleport_moves_and_scores() {
        let dispatcher = EffectDispatcher::default();
        let mut world = TestWorld::with_score(40);
        let mut tasks = TaskQueue::new();
        dispatcher.instant(PowerUpKind::Teleport, &mut world, &mut tasks, 0);
        assert_eq!(world.player_x, 200.0);
        assert_eq!(world.score, 540);
        assert!(tasks.is_empty());
    }

    #[test]
    fn carrot_rain_schedules_spaced_drops() {
        let dispatcher = EffectDispatcher::default();
        let mut world = TestWorld::new();
        let mut tasks = TaskQueue::new();
        dispatcher.instant(PowerUpKind::CarrotRain, &mut world, &mut tasks, 1_000);
        assert_eq!(tasks.len(), 15);
        assert!(world.collectibles.is_empty());

        let mut fire_times = Vec::new();
        while let Some(due) = tasks.pop_due(u64::MAX) {
            assert_eq!(due.action, TimerAction::DropCollectible(Collectible::Carrot));
            fire_times.push(due.fire_at);
        }
        assert_eq!(fire_times, (0..15).map(|i| 1_000 + i * 100).collect::<Vec<_>>());
    }

    #[test]
    fn carrot_rain_with_huge_interval_saturates() {
        let dispatcher = EffectDispatcher::new(EffectTuning {
            carrot_rain_count: 3,
            carrot_rain_interval_ms: GameMillis::MAX,
            ..EffectTuning::default()
        });
        let mut world = TestWorld::new();
        let mut tasks = TaskQueue::new();
        dispatcher.instant(PowerUpKind::CarrotRain, &mut world, &mut tasks, 1_000);

        let mut fire_times = Vec::new();
        while let Some(due) = tasks.pop_due(GameMillis::MAX) {
            fire_times.push(due.fire_at);
        }
        assert_eq!(fire_times, vec![1_000, GameMillis::MAX, GameMillis::MAX]);
    }

    #[test]
    fn magnet_pull_falls_off_linearly() {
        assert_eq!(magnet_pull(0.0, MagnetTarget::Carrot), 10.0);
        assert_eq!(magnet_pull(100.0, MagnetTarget::Carrot), 5.0);
        assert_eq!(magnet_pull(100.0, MagnetTarget::PowerUp), 2.5);
        assert_eq!(magnet_pull(200.0, MagnetTarget::Carrot), 0.0);
        assert_eq!(magnet_pull(350.0, MagnetTarget::PowerUp), 0.0);
    }
}
