use bunnyhop_core::powerup::{PowerUpKind, Rarity};
use bunnyhop_core::presentation::Presentation;
use bunnyhop_core::time::{GameClock, GameMillis};
use bunnyhop_core::timer::{DueTask, TaskId};
use bunnyhop_core::world::{EntityRef, PlayerWorld};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::combo::{ComboTracker, ComboUpdate};
use crate::config::PowerUpConfig;
use crate::effects::EffectDispatcher;
use crate::history::{CollectionHistory, HistoryEntry};
use crate::registry::{ActivePowerUpRegistry, Transition};
use crate::selector;
use crate::tasks::{TaskQueue, TimerAction};

/// HUD view of one active power-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PowerUpKind,
    pub name: &'static str,
    pub rarity: Rarity,
    pub stacks: u32,
    pub remaining_ms: GameMillis,
}

/// Serializable read-only view of the engine for HUD rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpSnapshot {
    pub now: GameMillis,
    pub active: Vec<ActiveSnapshot>,
    pub combo: ComboUpdate,
    /// Most recent first.
    pub history: Vec<HistoryEntry>,
    pub next_spawn_at: Option<GameMillis>,
}

/// The power-up engine and its inbound entry points.
///
/// Owns the registry, combo tracker, history and every pending timer. The
/// world and presentation adapters are passed into each call, so the engine
/// never holds a reference to either.
#[derive(Debug)]
pub struct PowerUpSystem {
    config: PowerUpConfig,
    catalog: &'static Catalog,
    clock: GameClock,
    tasks: TaskQueue,
    registry: ActivePowerUpRegistry,
    combo: ComboTracker,
    history: CollectionHistory,
    dispatcher: EffectDispatcher,
    rng: StdRng,
    spawn_task: Option<TaskId>,
}

impl PowerUpSystem {
    pub fn new(config: PowerUpConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut tasks = TaskQueue::new();
        let spawn_task = Some(tasks.schedule(config.spawn.base_delay_ms, TimerAction::Spawn));

        Self {
            catalog: Catalog::standard(),
            clock: GameClock::new(),
            tasks,
            registry: ActivePowerUpRegistry::new(),
            combo: ComboTracker::new(config.combo.clone()),
            history: CollectionHistory::new(config.history_capacity),
            dispatcher: EffectDispatcher::new(config.effects.clone()),
            rng,
            spawn_task,
            config,
        }
    }

    /// Advance game time from the external clock and fire everything due.
    ///
    /// While `is_paused` the clock does not move, so no expiry, combo reset,
    /// spawn or carrot drop can fire.
    pub fn on_tick<W, P>(
        &mut self,
        now_ms: u64,
        is_paused: bool,
        world: &mut W,
        presenter: &mut P,
    ) where
        W: PlayerWorld + ?Sized,
        P: Presentation + ?Sized,
    {
        self.clock.advance(now_ms, is_paused);
        if is_paused {
            return;
        }
        let now = self.clock.now();
        while let Some(task) = self.tasks.pop_due(now) {
            self.fire(task, world, presenter);
        }
    }

    fn fire<W, P>(&mut self, task: DueTask<TimerAction>, world: &mut W, presenter: &mut P)
    where
        W: PlayerWorld + ?Sized,
        P: Presentation + ?Sized,
    {
        match task.action {
            TimerAction::Expire(kind) => {
                if self.registry.expire(kind, task.id).is_some() {
                    self.dispatcher.deactivate(kind, world);
                    presenter.on_power_up_deactivated(kind);
                    tracing::debug!(kind = kind.token(), at = task.fire_at, "Power-up expired");
                }
            },
            TimerAction::ComboReset => {
                if self.combo.idle_reset(task.id) {
                    let update = self.combo.update();
                    presenter.on_combo_changed(update.multiplier, update.count);
                    tracing::debug!(at = task.fire_at, "Combo reset");
                }
            },
            TimerAction::Spawn => {
                if self.spawn_task == Some(task.id) {
                    self.spawn(task.fire_at, world, presenter);
                }
            },
            TimerAction::DropCollectible(collectible) => world.spawn_collectible(collectible),
        }
    }

    fn spawn<W, P>(&mut self, fired_at: GameMillis, world: &mut W, presenter: &mut P)
    where
        W: PlayerWorld + ?Sized,
        P: Presentation + ?Sized,
    {
        let kind = selector::choose_kind(self.catalog, &mut self.rng);
        let def = self.catalog.lookup(kind);
        presenter.on_spawn_requested(kind, def, self.config.spawn.powerup_lifetime_ms);

        let interval = self.config.spawn.interval_for_score(world.score());
        self.spawn_task = match fired_at.checked_add(interval) {
            Some(at) => Some(self.tasks.schedule(at, TimerAction::Spawn)),
            None => {
                tracing::warn!(fired_at, interval, "Game clock exhausted, spawning stopped");
                None
            },
        };
        tracing::debug!(
            kind = kind.token(),
            rarity = ?def.rarity,
            next_in_ms = interval,
            "Power-up spawn requested"
        );
    }

    /// Resolve a collision between the bunny and a power-up entity.
    pub fn on_collect<W, P>(
        &mut self,
        kind: PowerUpKind,
        entity: EntityRef,
        world: &mut W,
        presenter: &mut P,
    ) -> Transition
    where
        W: PlayerWorld + ?Sized,
        P: Presentation + ?Sized,
    {
        let now = self.clock.now();
        let def = self.catalog.lookup(kind);
        presenter.on_collected(entity, def);
        self.history.record(kind, def.rarity, now);

        let transition = self.registry.collect(
            def,
            now,
            &mut self.tasks,
            self.config.upgrade_duration_step,
        );
        match transition {
            Transition::Instant => {
                self.dispatcher.instant(kind, world, &mut self.tasks, now);
                presenter.on_instant_effect(kind);
                tracing::debug!(kind = kind.token(), "Instant power-up applied");
                return transition;
            },
            Transition::Activated => {
                self.dispatcher.activate(kind, world);
                presenter.on_power_up_activated(kind, def);
                tracing::debug!(
                    kind = kind.token(),
                    duration_ms = def.duration_ms,
                    "Power-up activated"
                );
            },
            Transition::Upgraded { stacks, grew } => {
                presenter.on_power_up_upgraded(kind, def, stacks);
                tracing::debug!(kind = kind.token(), stacks, grew, "Power-up upgraded");
            },
            Transition::Deactivated => {},
        }

        let update = self.combo.register(now, &mut self.tasks);
        presenter.on_combo_changed(update.multiplier, update.count);
        if update.count > 1 {
            presenter.on_combo_burst(update.multiplier);
        }
        transition
    }

    /// Spend a double-jump charge if the bunny is airborne and has one.
    /// Returns whether an air jump was granted.
    pub fn on_jump_attempt<W, P>(
        &mut self,
        is_airborne: bool,
        world: &mut W,
        presenter: &mut P,
    ) -> bool
    where
        W: PlayerWorld + ?Sized,
        P: Presentation + ?Sized,
    {
        let Some(stacks) = self.registry.stacks_of(PowerUpKind::DoubleJump) else {
            return false;
        };
        if !is_airborne || !world.effects().has_double_jump {
            return false;
        }

        let fx = world.effects_mut();
        fx.double_jump_count += 1;
        let used = fx.double_jump_count;
        world.launch_air_jump();
        presenter.on_air_jump();

        if used >= stacks {
            self.registry.force_expire(PowerUpKind::DoubleJump, &mut self.tasks);
            self.dispatcher.deactivate(PowerUpKind::DoubleJump, world);
            presenter.on_power_up_deactivated(PowerUpKind::DoubleJump);
            tracing::debug!(used, "Double jump charges exhausted");
        }
        true
    }

    /// Deactivate every active power-up now. Returns how many were active.
    pub fn force_deactivate_all<W, P>(&mut self, world: &mut W, presenter: &mut P) -> usize
    where
        W: PlayerWorld + ?Sized,
        P: Presentation + ?Sized,
    {
        let kinds = self.registry.force_deactivate_all(&mut self.tasks);
        for &kind in &kinds {
            self.dispatcher.deactivate(kind, world);
            presenter.on_power_up_deactivated(kind);
        }
        kinds.len()
    }

    /// Scene teardown: end all effects, clear the combo and cancel every
    /// pending timer including the spawn cadence. Safe to call repeatedly.
    pub fn on_cleanup<W, P>(&mut self, world: &mut W, presenter: &mut P)
    where
        W: PlayerWorld + ?Sized,
        P: Presentation + ?Sized,
    {
        let deactivated = self.force_deactivate_all(world, presenter);
        let had_combo = self.combo.count() > 0;
        self.combo.clear(&mut self.tasks);
        if had_combo {
            let update = self.combo.update();
            presenter.on_combo_changed(update.multiplier, update.count);
        }
        let cancelled = self.tasks.len();
        self.tasks.clear();
        self.spawn_task = None;
        tracing::info!(deactivated, cancelled, "Power-up system cleaned up");
    }

    pub fn now(&self) -> GameMillis {
        self.clock.now()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.registry.is_active(kind)
    }

    pub fn stacks_of(&self, kind: PowerUpKind) -> Option<u32> {
        self.registry.stacks_of(kind)
    }

    pub fn remaining_ms(&self, kind: PowerUpKind) -> Option<GameMillis> {
        self.registry.remaining_ms(kind, self.clock.now())
    }

    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn history(&self) -> &CollectionHistory {
        &self.history
    }

    pub fn registry(&self) -> &ActivePowerUpRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn config(&self) -> &PowerUpConfig {
        &self.config
    }

    /// When the next spawn is due, if the cadence is still running.
    pub fn next_spawn_at(&self) -> Option<GameMillis> {
        self.spawn_task.and_then(|id| self.tasks.fire_time(id))
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn snapshot(&self) -> PowerUpSnapshot {
        let now = self.clock.now();
        PowerUpSnapshot {
            now,
            active: self
                .registry
                .iter()
                .map(|entry| {
                    let def = self.catalog.lookup(entry.kind);
                    ActiveSnapshot {
                        kind: entry.kind,
                        name: def.name,
                        rarity: def.rarity,
                        stacks: entry.stacks,
                        remaining_ms: entry.remaining_ms(now),
                    }
                })
                .collect(),
            combo: self.combo.update(),
            history: self.history.recent(self.history.capacity()).copied().collect(),
            next_spawn_at: self.next_spawn_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunnyhop_core::test_helpers::{Notification, RecordingPresenter, TestWorld};

    fn seeded() -> PowerUpSystem {
        PowerUpSystem::new(PowerUpConfig {
            seed: Some(42),
            ..PowerUpConfig::default()
        })
    }

    /// Start the clock at external time 0 so game time equals external time.
    fn started() -> (PowerUpSystem, TestWorld, RecordingPresenter) {
        let mut system = seeded();
        let mut world = TestWorld::new();
        let mut presenter = RecordingPresenter::new();
        system.on_tick(0, false, &mut world, &mut presenter);
        (system, world, presenter)
    }

    #[test]
    fn first_spawn_uses_base_delay() {
        let (mut system, mut world, mut presenter) = started();
        assert_eq!(system.next_spawn_at(), Some(12_000));
        system.on_tick(11_999, false, &mut world, &mut presenter);
        assert!(presenter.spawned().is_empty());
        system.on_tick(12_000, false, &mut world, &mut presenter);
        assert_eq!(presenter.spawned().len(), 1);
        assert_eq!(system.next_spawn_at(), Some(24_000));
        assert!(matches!(
            presenter.notifications[0],
            Notification::SpawnRequested {
                lifetime_ms: 10_000,
                ..
            }
        ));
    }

    #[test]
    fn activation_notifies_and_mutates_world() {
        let (mut system, mut world, mut presenter) = started();
        let t = system.on_collect(PowerUpKind::Shield, EntityRef(1), &mut world, &mut presenter);
        assert_eq!(t, Transition::Activated);
        assert!(world.effects.has_shield);
        assert_eq!(
            presenter.notifications,
            vec![
                Notification::Collected {
                    entity: EntityRef(1),
                    kind: PowerUpKind::Shield
                },
                Notification::Activated(PowerUpKind::Shield),
                Notification::ComboChanged {
                    multiplier: 1.2,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn upgrade_does_not_compound_speed() {
        let (mut system, mut world, mut presenter) = started();
        system.on_collect(PowerUpKind::SpeedBoost, EntityRef(1), &mut world, &mut presenter);
        system.on_collect(PowerUpKind::SpeedBoost, EntityRef(2), &mut world, &mut presenter);
        assert_eq!(world.effects.speed_multiplier, 1.5);
        assert_eq!(system.stacks_of(PowerUpKind::SpeedBoost), Some(2));
        assert_eq!(
            presenter.count(|n| matches!(n, Notification::Upgraded { stacks: 2, .. })),
            1
        );
        assert_eq!(presenter.count(|n| matches!(n, Notification::ComboBurst(_))), 1);
    }

    #[test]
    fn instant_collection_skips_combo() {
        let (mut system, mut world, mut presenter) = started();
        let t = system.on_collect(PowerUpKind::Teleport, EntityRef(9), &mut world, &mut presenter);
        assert_eq!(t, Transition::Instant);
        assert!(system.registry().is_empty());
        assert_eq!(system.combo().count(), 0);
        assert_eq!(system.history().len(), 1);
        assert_eq!(world.score, 500);
        assert!(presenter
            .notifications
            .contains(&Notification::InstantEffect(PowerUpKind::Teleport)));
    }

    #[test]
    fn air_jump_requires_airborne_and_active_double_jump() {
        let (mut system, mut world, mut presenter) = started();
        assert!(!system.on_jump_attempt(true, &mut world, &mut presenter));

        system.on_collect(PowerUpKind::DoubleJump, EntityRef(1), &mut world, &mut presenter);
        assert!(!system.on_jump_attempt(false, &mut world, &mut presenter));
        assert!(system.on_jump_attempt(true, &mut world, &mut presenter));
        assert_eq!(world.air_jumps, 1);
        assert!(!system.is_active(PowerUpKind::DoubleJump));
        assert!(!world.effects.has_double_jump);
        assert_eq!(presenter.deactivations(), vec![PowerUpKind::DoubleJump]);
    }

    #[test]
    fn snapshot_reports_active_and_recent() {
        let (mut system, mut world, mut presenter) = started();
        system.on_collect(PowerUpKind::Magnet, EntityRef(1), &mut world, &mut presenter);
        system.on_tick(4_000, false, &mut world, &mut presenter);
        system.on_collect(PowerUpKind::Teleport, EntityRef(2), &mut world, &mut presenter);

        let snap = system.snapshot();
        assert_eq!(snap.now, 4_000);
        assert_eq!(snap.active.len(), 1);
        assert_eq!(snap.active[0].kind, PowerUpKind::Magnet);
        assert_eq!(snap.active[0].remaining_ms, 6_000);
        assert_eq!(snap.history[0].kind, PowerUpKind::Teleport);
        assert_eq!(snap.combo.count, 1);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["active"][0]["kind"], "magnet");
        assert_eq!(json["history"][1]["rarity"], "uncommon");
    }
}
