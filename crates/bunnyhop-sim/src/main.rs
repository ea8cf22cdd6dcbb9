//! Headless Bunny Hop power-up session.
//!
//! Drives `PowerUpSystem` with a scripted bunny that runs, jumps, grabs most
//! spawned power-ups once it reaches them and pauses once mid-run.

mod headless;

use std::path::PathBuf;
use std::process::ExitCode;

use bunnyhop_core::powerup::PowerUpKind;
use bunnyhop_core::time::GameMillis;
use bunnyhop_core::world::EntityRef;
use bunnyhop_powerups::effects::MagnetTarget;
use bunnyhop_powerups::history::HUD_RECENT;
use bunnyhop_powerups::{PowerUpConfig, PowerUpSystem};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use headless::{HeadlessWorld, LoggingPresenter, SPAWN_AHEAD, SessionStats};

/// Every n-th spawned power-up is left to despawn.
const MISS_EVERY: u64 = 5;
/// Game time between regular jumps.
const JUMP_PERIOD_MS: GameMillis = 1_200;
/// Offset into a jump at which the bunny tries a mid-air jump.
const AIR_JUMP_OFFSET_MS: GameMillis = 300;
const JUMP_AIRTIME_MS: GameMillis = 700;
/// Wall-clock length of the mid-run pause.
const PAUSE_MS: u64 = 3_000;

#[derive(Parser, Debug)]
#[command(name = "bunnyhop-sim", about = "Replay a scripted Bunny Hop power-up session")]
struct Args {
    /// RNG seed; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Unpaused session length in seconds.
    #[arg(long, default_value_t = 90)]
    duration_secs: u64,
    /// External clock step between ticks.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Power-up tuning TOML. Defaults to $BUNNYHOP_POWERUPS_CONFIG or config/powerups.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the final snapshot and stats as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

struct Pickup {
    kind: PowerUpKind,
    entity: EntityRef,
    gap: f32,
    spawned_at: GameMillis,
}

/// External-clock layout of a session: run, with a fixed pause halfway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timeline {
    pause_start: u64,
    pause_end: u64,
    end: u64,
}

impl Timeline {
    fn new(duration_secs: u64) -> Self {
        let run_ms = duration_secs.saturating_mul(1_000);
        let pause_start = run_ms / 2;
        Self {
            pause_start,
            pause_end: pause_start.saturating_add(PAUSE_MS),
            end: run_ms.saturating_add(PAUSE_MS),
        }
    }

    fn is_paused(&self, external_ms: u64) -> bool {
        (self.pause_start..self.pause_end).contains(&external_ms)
    }
}

struct Session {
    system: PowerUpSystem,
    world: HeadlessWorld,
    presenter: LoggingPresenter,
    pickups: Vec<Pickup>,
    missed: u32,
    next_jump_at: GameMillis,
    air_jump_at: Option<GameMillis>,
    airborne_until: GameMillis,
}

impl Session {
    fn new(config: PowerUpConfig) -> Self {
        Self {
            system: PowerUpSystem::new(config),
            world: HeadlessWorld::default(),
            presenter: LoggingPresenter::default(),
            pickups: Vec::new(),
            missed: 0,
            next_jump_at: JUMP_PERIOD_MS,
            air_jump_at: None,
            airborne_until: 0,
        }
    }

    fn step(&mut self, external_ms: u64, paused: bool, dt_ms: u64) {
        self.system
            .on_tick(external_ms, paused, &mut self.world, &mut self.presenter);
        if paused {
            return;
        }
        let now = self.system.now();
        let dx = self.world.run(dt_ms);
        self.world.collect_carrots(dx);

        for (kind, entity) in self.presenter.take_spawned() {
            if entity.0 % MISS_EVERY == 0 {
                self.missed += 1;
                tracing::debug!(entity = entity.0, "Power-up left behind");
                continue;
            }
            self.pickups.push(Pickup {
                kind,
                entity,
                gap: SPAWN_AHEAD,
                spawned_at: now,
            });
        }

        let lifetime = self.system.config().spawn.powerup_lifetime_ms;
        let mut reached = Vec::new();
        for mut pickup in std::mem::take(&mut self.pickups) {
            pickup.gap = self.world.close_gap(pickup.gap, dx, MagnetTarget::PowerUp);
            if pickup.gap <= 0.0 {
                reached.push(pickup);
            } else if now.saturating_sub(pickup.spawned_at) >= lifetime {
                self.missed += 1;
                tracing::debug!(entity = pickup.entity.0, "Power-up despawned uncollected");
            } else {
                self.pickups.push(pickup);
            }
        }
        for pickup in reached {
            self.system.on_collect(
                pickup.kind,
                pickup.entity,
                &mut self.world,
                &mut self.presenter,
            );
        }

        self.jump(now);
    }

    fn jump(&mut self, now: GameMillis) {
        if now >= self.next_jump_at {
            self.airborne_until = now + JUMP_AIRTIME_MS;
            self.air_jump_at = Some(now + AIR_JUMP_OFFSET_MS);
            self.next_jump_at = now + JUMP_PERIOD_MS;
        }
        if let Some(at) = self.air_jump_at
            && now >= at
        {
            self.air_jump_at = None;
            let airborne = now < self.airborne_until;
            if self
                .system
                .on_jump_attempt(airborne, &mut self.world, &mut self.presenter)
            {
                self.airborne_until = now + JUMP_AIRTIME_MS;
            }
        }
    }
}

fn load_config(args: &Args) -> Result<PowerUpConfig, bunnyhop_powerups::ConfigError> {
    let mut config = match &args.config {
        Some(path) => PowerUpConfig::load_from(path)?,
        None => PowerUpConfig::load(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn print_summary(session: &Session, stats: &SessionStats) {
    println!("Bunny Hop power-up session");
    println!("  game time        {} ms", session.system.now());
    println!("  score            {}", session.world.score);
    println!("  distance         {:.0}", session.world.distance);
    println!(
        "  power-ups        {} spawned, {} collected, {} missed",
        stats.spawned, stats.collected, session.missed
    );
    println!(
        "  transitions      {} activated, {} upgraded, {} ended, {} instant",
        stats.activations, stats.upgrades, stats.deactivations, stats.instant_effects
    );
    println!(
        "  combo            peak {} (x{:.1}), {} bursts",
        stats.peak_combo, stats.peak_multiplier, stats.combo_bursts
    );
    println!("  air jumps        {}", session.world.air_jumps);
    println!("  carrots          {}", session.world.carrots_collected);
    println!("  camera shakes    {}", stats.camera_shakes);
    println!("  recent pickups:");
    for entry in session.system.history().recent(HUD_RECENT) {
        let def = session.system.catalog().lookup(entry.kind);
        println!("    {} {} at {} ms", def.icon, def.name, entry.collected_at);
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid power-up config");
            return ExitCode::FAILURE;
        },
    };
    let tick_ms = args.tick_ms.max(1);
    tracing::info!(
        seed = ?config.seed,
        duration_secs = args.duration_secs,
        tick_ms,
        "Session starting"
    );

    let mut session = Session::new(config);
    let timeline = Timeline::new(args.duration_secs);

    let mut external: u64 = 0;
    while external <= timeline.end {
        session.step(external, timeline.is_paused(external), tick_ms);
        match external.checked_add(tick_ms) {
            Some(next) => external = next,
            None => break,
        }
    }

    let snapshot = session.system.snapshot();
    session
        .system
        .on_cleanup(&mut session.world, &mut session.presenter);
    let stats = session.presenter.stats;

    if args.json {
        let report = serde_json::json!({
            "score": session.world.score,
            "carrots": session.world.carrots_collected,
            "spawned": stats.spawned,
            "collected": stats.collected,
            "missed": session.missed,
            "activations": stats.activations,
            "upgrades": stats.upgrades,
            "deactivations": stats.deactivations,
            "instant_effects": stats.instant_effects,
            "peak_combo": stats.peak_combo,
            "air_jumps": stats.air_jumps,
            "snapshot": snapshot,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode report");
                return ExitCode::FAILURE;
            },
        }
    } else {
        print_summary(&session, &stats);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_pauses_halfway() {
        let timeline = Timeline::new(90);
        assert_eq!(timeline.pause_start, 45_000);
        assert_eq!(timeline.pause_end, 48_000);
        assert_eq!(timeline.end, 93_000);
        assert!(!timeline.is_paused(44_999));
        assert!(timeline.is_paused(45_000));
        assert!(!timeline.is_paused(48_000));
    }

    #[test]
    fn huge_duration_saturates() {
        let timeline = Timeline::new(u64::MAX);
        assert_eq!(timeline.end, u64::MAX);
        assert_eq!(timeline.pause_start, u64::MAX / 2);
        assert_eq!(timeline.pause_end, u64::MAX / 2 + PAUSE_MS);
    }

    #[test]
    fn session_collects_reached_power_ups() {
        let config = PowerUpConfig {
            seed: Some(3),
            ..PowerUpConfig::default()
        };
        let mut session = Session::new(config);
        let mut external = 0;
        while external <= 30_000 {
            session.step(external, false, 16);
            external += 16;
        }
        let stats = session.presenter.stats;
        assert!(stats.spawned >= 2);
        assert_eq!(stats.collected, stats.spawned);
        assert_eq!(session.missed, 0);
    }
}
