use bunnyhop_core::time::GameMillis;
use bunnyhop_core::timer::TaskId;
use serde::Serialize;

use crate::config::ComboConfig;
use crate::tasks::{TaskQueue, TimerAction};

/// Combo HUD state after a change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComboUpdate {
    pub count: u32,
    pub multiplier: f32,
}

/// Rapid-collection combo counter.
///
/// Each timed collection within `window_ms` of the previous one extends the
/// combo. A longer gap restarts the count before it is incremented, and an
/// idle-reset task zeroes the state once the window closes.
#[derive(Debug, Clone)]
pub struct ComboTracker {
    count: u32,
    multiplier: f32,
    last_at: Option<GameMillis>,
    reset_task: Option<TaskId>,
    config: ComboConfig,
}

impl ComboTracker {
    pub fn new(config: ComboConfig) -> Self {
        Self {
            count: 0,
            multiplier: 1.0,
            last_at: None,
            reset_task: None,
            config,
        }
    }

    pub fn register(&mut self, now: GameMillis, tasks: &mut TaskQueue) -> ComboUpdate {
        if let Some(last) = self.last_at
            && now.saturating_sub(last) > self.config.window_ms
        {
            self.count = 0;
        }
        self.count += 1;
        self.last_at = Some(now);
        self.multiplier = multiplier_for(self.count, &self.config);

        if let Some(task) = self.reset_task.take() {
            tasks.cancel(task);
        }
        let reset_at = now.saturating_add(self.config.window_ms);
        self.reset_task = Some(tasks.schedule(reset_at, TimerAction::ComboReset));

        self.update()
    }

    /// Handle a fired idle-reset task. Returns `true` if it was current and
    /// the combo was zeroed.
    pub fn idle_reset(&mut self, task: TaskId) -> bool {
        if self.reset_task != Some(task) {
            return false;
        }
        self.reset_task = None;
        self.zero();
        true
    }

    /// Cancel any pending reset and zero the combo.
    pub fn clear(&mut self, tasks: &mut TaskQueue) {
        if let Some(task) = self.reset_task.take() {
            tasks.cancel(task);
        }
        self.zero();
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn last_collected_at(&self) -> Option<GameMillis> {
        self.last_at
    }

    pub fn update(&self) -> ComboUpdate {
        ComboUpdate {
            count: self.count,
            multiplier: self.multiplier,
        }
    }

    fn zero(&mut self) {
        self.count = 0;
        self.multiplier = 1.0;
        self.last_at = None;
    }
}

/// `min(max, 1 + count × step)`.
pub fn multiplier_for(count: u32, config: &ComboConfig) -> f32 {
    (1.0 + count as f32 * config.step).min(config.max_multiplier)
}
