use std::collections::VecDeque;

use bunnyhop_core::powerup::{PowerUpKind, Rarity};
use bunnyhop_core::time::GameMillis;
use serde::Serialize;

/// Number of entries the HUD shows.
pub const HUD_RECENT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub kind: PowerUpKind,
    pub rarity: Rarity,
    pub collected_at: GameMillis,
}

/// Bounded FIFO of recent collections, oldest evicted first.
#[derive(Debug, Clone)]
pub struct CollectionHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl CollectionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, kind: PowerUpKind, rarity: Rarity, at: GameMillis) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            kind,
            rarity,
            collected_at: at,
        });
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev().take(n)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CollectionHistory {
    fn default() -> Self {
        Self::new(10)
    }
}
