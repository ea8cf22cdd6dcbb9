use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::time::GameMillis;

/// Handle to a scheduled task. Ids are never reused, so a stale handle can be
/// compared against the current one to detect superseded callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A task whose fire time has been reached.
#[derive(Debug, Clone, PartialEq)]
pub struct DueTask<A> {
    pub id: TaskId,
    pub fire_at: GameMillis,
    pub action: A,
}

/// Single-threaded timer queue keyed on game time.
///
/// Tasks fire in `(fire_at, id)` order, so tasks due at the same instant fire
/// in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    next_id: u64,
    queue: BTreeMap<(GameMillis, TaskId), A>,
    pending: HashMap<TaskId, GameMillis>,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            queue: BTreeMap::new(),
            pending: HashMap::new(),
        }
    }

    pub fn schedule(&mut self, fire_at: GameMillis, action: A) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.insert((fire_at, id), action);
        self.pending.insert(id, fire_at);
        id
    }

    /// Cancel a pending task. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.pending.remove(&id) {
            Some(fire_at) => self.queue.remove(&(fire_at, id)).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: GameMillis) -> Option<DueTask<A>> {
        let (&(fire_at, id), _) = self.queue.first_key_value()?;
        if fire_at > now {
            return None;
        }
        let action = self.queue.remove(&(fire_at, id))?;
        self.pending.remove(&id);
        Some(DueTask {
            id,
            fire_at,
            action,
        })
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn fire_time(&self, id: TaskId) -> Option<GameMillis> {
        self.pending.get(&id).copied()
    }

    pub fn next_fire_at(&self) -> Option<GameMillis> {
        self.queue.first_key_value().map(|(&(fire_at, _), _)| fire_at)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending task. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_time_then_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(200, "late");
        s.schedule(100, "first");
        s.schedule(100, "second");

        assert!(s.pop_due(99).is_none());
        assert_eq!(s.pop_due(250).map(|t| t.action), Some("first"));
        assert_eq!(s.pop_due(250).map(|t| t.action), Some("second"));
        let late = s.pop_due(250).unwrap();
        assert_eq!(late.action, "late");
        assert_eq!(late.fire_at, 200);
        assert!(s.is_empty());
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut s = Scheduler::new();
        let id = s.schedule(10, ());
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.is_pending(id));
        assert!(s.pop_due(1_000).is_none());
    }

    #[test]
    fn cancelling_fired_task_is_noop() {
        let mut s = Scheduler::new();
        let id = s.schedule(10, ());
        assert!(s.pop_due(10).is_some());
        assert!(!s.cancel(id));
        assert!(!s.cancel(id));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut s = Scheduler::new();
        let a = s.schedule(5, ());
        s.clear();
        let b = s.schedule(5, ());
        assert_ne!(a, b);
        assert!(!s.cancel(a));
        assert!(s.is_pending(b));
    }

    #[test]
    fn next_fire_at_tracks_earliest() {
        let mut s = Scheduler::new();
        assert_eq!(s.next_fire_at(), None);
        let a = s.schedule(300, ());
        s.schedule(500, ());
        assert_eq!(s.next_fire_at(), Some(300));
        assert_eq!(s.fire_time(a), Some(300));
        s.cancel(a);
        assert_eq!(s.next_fire_at(), Some(500));
        assert_eq!(s.len(), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pops_are_sorted_and_skip_cancelled(
                times in proptest::collection::vec(0u64..10_000, 1..60),
                cancel_mask in proptest::collection::vec(any::<bool>(), 60)
            ) {
                let mut s = Scheduler::new();
                let ids: Vec<TaskId> = times.iter().map(|&t| s.schedule(t, t)).collect();
                let mut cancelled = 0;
                for (id, cancel) in ids.iter().zip(&cancel_mask) {
                    if *cancel && s.cancel(*id) {
                        cancelled += 1;
                    }
                }

                let mut fired = Vec::new();
                while let Some(task) = s.pop_due(u64::MAX) {
                    prop_assert_eq!(task.fire_at, task.action);
                    fired.push((task.fire_at, task.id));
                }
                prop_assert_eq!(fired.len(), times.len() - cancelled);
                prop_assert!(fired.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
