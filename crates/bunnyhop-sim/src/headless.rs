use bunnyhop_core::powerup::{PowerUpDefinition, PowerUpKind};
use bunnyhop_core::presentation::Presentation;
use bunnyhop_core::time::GameMillis;
use bunnyhop_core::world::{Collectible, EntityRef, PlayerEffectState, PlayerWorld};
use bunnyhop_powerups::effects::{MagnetTarget, magnet_pull};

/// Points for picking up a single carrot.
pub const CARROT_POINTS: u64 = 10;
/// How far ahead of the bunny carrots and power-ups appear.
pub const SPAWN_AHEAD: f32 = 150.0;

/// In-memory stand-in for the game scene.
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    pub effects: PlayerEffectState,
    pub score: u64,
    pub distance: f32,
    /// Gap between the bunny and each carrot still on the field.
    pub carrots_ahead: Vec<f32>,
    pub carrots_collected: u32,
    pub air_jumps: u32,
}

impl HeadlessWorld {
    /// Run the bunny forward for `dt_ms`, scoring distance at the current
    /// speed. Returns the distance covered.
    pub fn run(&mut self, dt_ms: u64) -> f32 {
        let dx = dt_ms as f32 * 0.1 * self.effects.speed_multiplier;
        self.distance += dx;
        self.score += dx as u64;
        dx
    }

    /// Gap left to an item after the bunny covers `dx`. An active magnet
    /// also drags the item in by its per-tick pull.
    pub fn close_gap(&self, gap: f32, dx: f32, target: MagnetTarget) -> f32 {
        let pull = if self.effects.has_magnet {
            magnet_pull(gap, target)
        } else {
            0.0
        };
        gap - dx - pull
    }

    /// Close in on every carrot and pick up the ones reached.
    pub fn collect_carrots(&mut self, dx: f32) -> u32 {
        let mut ahead = std::mem::take(&mut self.carrots_ahead);
        for gap in &mut ahead {
            *gap = self.close_gap(*gap, dx, MagnetTarget::Carrot);
        }
        let before = ahead.len();
        ahead.retain(|gap| *gap > 0.0);
        let n = (before - ahead.len()) as u32;
        self.carrots_ahead = ahead;
        self.carrots_collected += n;
        self.score += u64::from(n) * CARROT_POINTS;
        n
    }
}

impl PlayerWorld for HeadlessWorld {
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
        self.distance += dx;
    }

    fn spawn_collectible(&mut self, collectible: Collectible) {
        match collectible {
            Collectible::Carrot => self.carrots_ahead.push(SPAWN_AHEAD),
        }
    }

    fn launch_air_jump(&mut self) {
        self.air_jumps += 1;
    }
}

/// Running totals of what the presentation layer was asked to show.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStats {
    pub spawned: u32,
    pub collected: u32,
    pub activations: u32,
    pub upgrades: u32,
    pub deactivations: u32,
    pub instant_effects: u32,
    pub combo_bursts: u32,
    pub peak_combo: u32,
    pub peak_multiplier: f32,
    pub air_jumps: u32,
    pub camera_shakes: u32,
}

/// Presentation adapter that logs every notification and hands spawned
/// power-ups to the scripted bunny.
#[derive(Debug, Default)]
pub struct LoggingPresenter {
    next_entity: u64,
    spawned: Vec<(PowerUpKind, EntityRef)>,
    pub stats: SessionStats,
}

impl LoggingPresenter {
    /// Power-ups materialized since the last call.
    pub fn take_spawned(&mut self) -> Vec<(PowerUpKind, EntityRef)> {
        std::mem::take(&mut self.spawned)
    }
}

impl Presentation for LoggingPresenter {
    fn on_spawn_requested(
        &mut self,
        kind: PowerUpKind,
        def: &PowerUpDefinition,
        lifetime_ms: GameMillis,
    ) {
        self.next_entity += 1;
        let entity = EntityRef(self.next_entity);
        self.spawned.push((kind, entity));
        self.stats.spawned += 1;
        tracing::info!(
            entity = entity.0,
            name = def.name,
            rarity = ?def.rarity,
            glow = def.rarity.glow(),
            lifetime_ms,
            "{} spawned",
            def.icon
        );
    }

    fn on_collected(&mut self, entity: EntityRef, def: &PowerUpDefinition) {
        self.stats.collected += 1;
        if def.rarity.shakes_camera() {
            self.stats.camera_shakes += 1;
        }
        tracing::info!(entity = entity.0, name = def.name, "Collected");
    }

    fn on_power_up_activated(&mut self, _kind: PowerUpKind, def: &PowerUpDefinition) {
        self.stats.activations += 1;
        tracing::info!(duration_ms = def.duration_ms, "{}", def.effect);
    }

    fn on_power_up_upgraded(
        &mut self,
        _kind: PowerUpKind,
        def: &PowerUpDefinition,
        new_stacks: u32,
    ) {
        self.stats.upgrades += 1;
        tracing::info!(stacks = new_stacks, "{} upgraded: {}", def.name, def.upgrade_effect);
    }

    fn on_power_up_deactivated(&mut self, kind: PowerUpKind) {
        self.stats.deactivations += 1;
        tracing::info!(kind = kind.token(), "Power-up ended");
    }

    fn on_combo_changed(&mut self, multiplier: f32, count: u32) {
        if count > self.stats.peak_combo {
            self.stats.peak_combo = count;
        }
        if multiplier > self.stats.peak_multiplier {
            self.stats.peak_multiplier = multiplier;
        }
        tracing::debug!(count, multiplier, "Combo");
    }

    fn on_combo_burst(&mut self, multiplier: f32) {
        self.stats.combo_bursts += 1;
        tracing::info!("COMBO x{multiplier:.1}!");
    }

    fn on_instant_effect(&mut self, kind: PowerUpKind) {
        self.stats.instant_effects += 1;
        tracing::info!(kind = kind.token(), "Instant effect");
    }

    fn on_air_jump(&mut self) {
        self.stats.air_jumps += 1;
        tracing::debug!("Air jump");
    }
}
