use serde::{Deserialize, Serialize};

/// Milliseconds of unpaused game time.
pub type GameMillis = u64;

/// Pause-aware game clock driven by an external monotonic millisecond clock.
///
/// The first observation only establishes the baseline. After that, each
/// external delta is added to game time unless the tick reports a pause, so
/// nothing scheduled against [`GameClock::now`] progresses while paused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    now: GameMillis,
    last_external: Option<u64>,
    paused: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an external timestamp. Returns the game time that elapsed.
    pub fn advance(&mut self, external_ms: u64, paused: bool) -> GameMillis {
        let delta = match self.last_external {
            Some(last) => external_ms.saturating_sub(last),
            None => 0,
        };
        self.last_external = Some(external_ms.max(self.last_external.unwrap_or(0)));
        self.paused = paused;
        if paused {
            return 0;
        }
        self.now = self.now.saturating_add(delta);
        delta
    }

    pub fn now(&self) -> GameMillis {
        self.now
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
