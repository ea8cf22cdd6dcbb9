use std::collections::BTreeMap;

use bunnyhop_core::powerup::{PowerUpDefinition, PowerUpKind};
use bunnyhop_core::time::GameMillis;
use bunnyhop_core::timer::TaskId;
use serde::Serialize;

use crate::tasks::{TaskQueue, TimerAction};

/// Outcome of feeding a collection or timer into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transition {
    /// Zero-duration kind; nothing was recorded.
    Instant,
    /// First collection while inactive.
    Activated,
    /// Collected again while active. `grew` is false once at max stacks.
    Upgraded { stacks: u32, grew: bool },
    Deactivated,
}

/// One active timed power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub stacks: u32,
    pub started_at: GameMillis,
    pub expires_at: GameMillis,
    #[serde(skip)]
    timer: TaskId,
}

impl ActivePowerUp {
    pub fn remaining_ms(&self, now: GameMillis) -> GameMillis {
        self.expires_at.saturating_sub(now)
    }

    /// The expiry task currently armed for this entry.
    pub fn timer(&self) -> TaskId {
        self.timer
    }
}

/// Duration granted by a collection that leaves the entry at `stacks`.
/// Saturates at `GameMillis::MAX`.
pub fn extended_duration(duration_ms: GameMillis, stacks: u32, step: f64) -> GameMillis {
    (duration_ms as f64 * (1.0 + f64::from(stacks) * step)).round() as GameMillis
}

/// Tracks which timed power-ups are active, their stacks and expiry timers.
///
/// An entry exists exactly while its kind is active. Every entry owns one
/// pending `Expire` task; replacing a timer always cancels the old one first,
/// and [`expire`](Self::expire) ignores tasks that are no longer current.
#[derive(Debug, Clone, Default)]
pub struct ActivePowerUpRegistry {
    entries: BTreeMap<PowerUpKind, ActivePowerUp>,
}

impl ActivePowerUpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(
        &mut self,
        def: &PowerUpDefinition,
        now: GameMillis,
        tasks: &mut TaskQueue,
        upgrade_step: f64,
    ) -> Transition {
        if def.is_instant() {
            return Transition::Instant;
        }

        match self.entries.get_mut(&def.kind) {
            Some(entry) => {
                let grew = entry.stacks < def.max_stacks;
                if grew {
                    entry.stacks += 1;
                }
                tasks.cancel(entry.timer);
                let duration = extended_duration(def.duration_ms, entry.stacks, upgrade_step);
                entry.expires_at = now.saturating_add(duration);
                entry.timer = tasks.schedule(entry.expires_at, TimerAction::Expire(def.kind));
                Transition::Upgraded {
                    stacks: entry.stacks,
                    grew,
                }
            },
            None => {
                let expires_at = now.saturating_add(def.duration_ms);
                let timer = tasks.schedule(expires_at, TimerAction::Expire(def.kind));
                self.entries.insert(
                    def.kind,
                    ActivePowerUp {
                        kind: def.kind,
                        stacks: 1,
                        started_at: now,
                        expires_at,
                        timer,
                    },
                );
                Transition::Activated
            },
        }
    }

    /// Handle a fired expiry task. Stale tasks (superseded by an upgrade or
    /// belonging to an entry that is already gone) return `None`.
    pub fn expire(&mut self, kind: PowerUpKind, task: TaskId) -> Option<Transition> {
        match self.entries.get(&kind) {
            Some(entry) if entry.timer == task => {
                self.entries.remove(&kind);
                Some(Transition::Deactivated)
            },
            _ => None,
        }
    }

    /// End an entry before its timer fires. Returns `false` if it was not active.
    pub fn force_expire(&mut self, kind: PowerUpKind, tasks: &mut TaskQueue) -> bool {
        match self.entries.remove(&kind) {
            Some(entry) => {
                tasks.cancel(entry.timer);
                true
            },
            None => false,
        }
    }

    /// End every entry. Returns the deactivated kinds in canonical order.
    pub fn force_deactivate_all(&mut self, tasks: &mut TaskQueue) -> Vec<PowerUpKind> {
        let entries = std::mem::take(&mut self.entries);
        entries
            .into_values()
            .map(|entry| {
                tasks.cancel(entry.timer);
                entry.kind
            })
            .collect()
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn stacks_of(&self, kind: PowerUpKind) -> Option<u32> {
        self.entries.get(&kind).map(|e| e.stacks)
    }

    pub fn remaining_ms(&self, kind: PowerUpKind, now: GameMillis) -> Option<GameMillis> {
        self.entries.get(&kind).map(|e| e.remaining_ms(now))
    }

    pub fn started_at(&self, kind: PowerUpKind) -> Option<GameMillis> {
        self.entries.get(&kind).map(|e| e.started_at)
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<&ActivePowerUp> {
        self.entries.get(&kind)
    }

    /// Active entries in canonical kind order.
    pub fn iter(&self) -> impl Iterator<Item = &ActivePowerUp> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
