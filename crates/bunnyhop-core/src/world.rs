use serde::{Deserialize, Serialize};

/// Opaque handle to a materialized collectible owned by the world adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub u64);

/// Non-power-up pickups the engine can ask the world to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collectible {
    Carrot,
}

/// Gameplay modifiers applied to the bunny by active power-ups.
///
/// Owned by the world adapter and read by its physics step. The engine only
/// touches it through [`PlayerWorld::effects_mut`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEffectState {
    pub has_double_jump: bool,
    /// Air jumps spent since double jump was activated.
    pub double_jump_count: u32,
    pub has_shield: bool,
    pub has_magnet: bool,
    pub has_time_slow: bool,
    pub has_gravity_reverse: bool,
    pub has_multi_collect: bool,
    pub has_invincibility: bool,
    pub has_wall_jump: bool,
    pub has_dash: bool,
    pub has_bounce: bool,
    pub has_phase_through: bool,
    pub has_time_freeze: bool,
    pub has_ghost_mode: bool,
    pub has_super_jump: bool,
    /// Multiplier on horizontal run speed.
    pub speed_multiplier: f32,
    /// Multiplier on obstacle velocity.
    pub time_scale: f32,
    /// +1.0 for normal gravity, -1.0 while reversed.
    pub gravity_sign: f32,
    pub bounce_multiplier: f32,
    pub super_jump_multiplier: f32,
}

impl Default for PlayerEffectState {
    fn default() -> Self {
        Self {
            has_double_jump: false,
            double_jump_count: 0,
            has_shield: false,
            has_magnet: false,
            has_time_slow: false,
            has_gravity_reverse: false,
            has_multi_collect: false,
            has_invincibility: false,
            has_wall_jump: false,
            has_dash: false,
            has_bounce: false,
            has_phase_through: false,
            has_time_freeze: false,
            has_ghost_mode: false,
            has_super_jump: false,
            speed_multiplier: 1.0,
            time_scale: 1.0,
            gravity_sign: 1.0,
            bounce_multiplier: 1.0,
            super_jump_multiplier: 1.0,
        }
    }
}

/// Bunny opacity while ghost mode is active.
pub const GHOST_ALPHA: f32 = 0.3;
/// Bunny opacity while phasing through obstacles.
pub const PHASE_ALPHA: f32 = 0.6;

impl PlayerEffectState {
    /// Sprite opacity. Ghost mode wins over phase-through when both are active.
    pub fn player_alpha(&self) -> f32 {
        if self.has_ghost_mode {
            GHOST_ALPHA
        } else if self.has_phase_through {
            PHASE_ALPHA
        } else {
            1.0
        }
    }

    /// Whether obstacle hits should be ignored.
    pub fn is_protected(&self) -> bool {
        self.has_shield || self.has_invincibility
    }

    /// Whether moving bodies should hold their velocity at zero.
    pub fn is_frozen(&self) -> bool {
        self.has_time_freeze
    }

    /// Whether obstacles should be passed through rather than collided with.
    pub fn passes_through_obstacles(&self) -> bool {
        self.has_phase_through || self.has_ghost_mode
    }
}

/// The world/player-state side of the engine boundary.
pub trait PlayerWorld {
    fn effects(&self) -> &PlayerEffectState;

    fn effects_mut(&mut self) -> &mut PlayerEffectState;

    /// Current score, used to tighten the spawn cadence.
    fn score(&self) -> u64;

    fn add_score(&mut self, points: u64);

    /// Move the bunny horizontally by `dx` world units.
    fn translate_player(&mut self, dx: f32);

    fn spawn_collectible(&mut self, collectible: Collectible);

    /// Apply the upward impulse of a mid-air jump granted by double jump.
    fn launch_air_jump(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_neutral() {
        let state = PlayerEffectState::default();
        assert_eq!(state.speed_multiplier, 1.0);
        assert_eq!(state.gravity_sign, 1.0);
        assert_eq!(state.player_alpha(), 1.0);
        assert!(!state.is_protected());
        assert!(!state.is_frozen());
        assert!(!state.passes_through_obstacles());
    }

    #[test]
    fn ghost_alpha_overrides_phase_alpha() {
        let mut state = PlayerEffectState {
            has_phase_through: true,
            ..Default::default()
        };
        assert_eq!(state.player_alpha(), PHASE_ALPHA);
        state.has_ghost_mode = true;
        assert_eq!(state.player_alpha(), GHOST_ALPHA);
        state.has_ghost_mode = false;
        assert_eq!(state.player_alpha(), PHASE_ALPHA);
    }

    #[test]
    fn shield_or_invincibility_protects() {
        let shield = PlayerEffectState {
            has_shield: true,
            ..Default::default()
        };
        let invincible = PlayerEffectState {
            has_invincibility: true,
            ..Default::default()
        };
        assert!(shield.is_protected());
        assert!(invincible.is_protected());
    }
}
