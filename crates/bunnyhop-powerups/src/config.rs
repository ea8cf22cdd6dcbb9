use std::path::Path;

use bunnyhop_core::time::GameMillis;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced while loading power-up tuning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid power-up config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// Spawn cadence tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Interval between spawns at score zero.
    pub base_delay_ms: GameMillis,
    /// Lower bound on the score-driven interval factor.
    pub min_difficulty_factor: f64,
    /// Score at which the interval factor would reach zero before clamping.
    pub difficulty_score_span: f64,
    /// How long an uncollected power-up stays in the world.
    pub powerup_lifetime_ms: GameMillis,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 12_000,
            min_difficulty_factor: 0.5,
            difficulty_score_span: 10_000.0,
            powerup_lifetime_ms: 10_000,
        }
    }
}

impl SpawnConfig {
    /// Spawn interval for the given score: `base × max(min_factor, 1 − score / span)`,
    /// never shorter than 1 ms.
    pub fn interval_for_score(&self, score: u64) -> GameMillis {
        let factor =
            (1.0 - score as f64 / self.difficulty_score_span).max(self.min_difficulty_factor);
        ((self.base_delay_ms as f64 * factor).round() as GameMillis).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    pub window_ms: GameMillis,
    pub step: f32,
    pub max_multiplier: f32,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            window_ms: 5_000,
            step: 0.2,
            max_multiplier: 3.0,
        }
    }
}

/// Magnitudes applied by the effect dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub speed_multiplier: f32,
    pub time_slow_scale: f32,
    pub bounce_multiplier: f32,
    pub super_jump_multiplier: f32,
    pub teleport_distance: f32,
    pub teleport_score: u64,
    pub carrot_rain_count: u32,
    pub carrot_rain_interval_ms: GameMillis,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.5,
            time_slow_scale: 0.5,
            bounce_multiplier: 1.5,
            super_jump_multiplier: 2.0,
            teleport_distance: 200.0,
            teleport_score: 500,
            carrot_rain_count: 15,
            carrot_rain_interval_ms: 100,
        }
    }
}

/// Top-level power-up configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub spawn: SpawnConfig,
    pub combo: ComboConfig,
    pub effects: EffectTuning,
    /// Duration bonus per stack when a power-up is collected again.
    pub upgrade_duration_step: f64,
    pub history_capacity: usize,
    /// Fixed RNG seed. Seeded from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnConfig::default(),
            combo: ComboConfig::default(),
            effects: EffectTuning::default(),
            upgrade_duration_step: 0.5,
            history_capacity: 10,
            seed: None,
        }
    }
}

impl PowerUpConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing, unparseable or out of range.
    pub fn load() -> Self {
        let path = std::env::var("BUNNYHOP_POWERUPS_CONFIG")
            .unwrap_or_else(|_| "config/powerups.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    PowerUpConfig::default()
                },
            },
            Err(_) => PowerUpConfig::default(),
        }
    }

    /// Strict load used when the caller named the file explicitly.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: PowerUpConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "spawn.base_delay_ms",
            "positive",
            self.spawn.base_delay_ms as f64,
            |v| v > 0.0,
        )?;
        check(
            "spawn.min_difficulty_factor",
            "in (0, 1]",
            self.spawn.min_difficulty_factor,
            |v| v > 0.0 && v <= 1.0,
        )?;
        check(
            "spawn.difficulty_score_span",
            "positive",
            self.spawn.difficulty_score_span,
            |v| v > 0.0,
        )?;
        check(
            "combo.window_ms",
            "positive",
            self.combo.window_ms as f64,
            |v| v > 0.0,
        )?;
        check(
            "combo.step",
            "non-negative",
            f64::from(self.combo.step),
            |v| v >= 0.0,
        )?;
        check(
            "combo.max_multiplier",
            "at least 1",
            f64::from(self.combo.max_multiplier),
            |v| v >= 1.0,
        )?;
        check(
            "effects.time_slow_scale",
            "in (0, 1]",
            f64::from(self.effects.time_slow_scale),
            |v| v > 0.0 && v <= 1.0,
        )?;
        for (field, value) in [
            ("effects.speed_multiplier", self.effects.speed_multiplier),
            ("effects.bounce_multiplier", self.effects.bounce_multiplier),
            (
                "effects.super_jump_multiplier",
                self.effects.super_jump_multiplier,
            ),
        ] {
            check(field, "positive", f64::from(value), |v| v > 0.0)?;
        }
        check(
            "upgrade_duration_step",
            "non-negative",
            self.upgrade_duration_step,
            |v| v >= 0.0,
        )?;
        check(
            "history_capacity",
            "at least 1",
            self.history_capacity as f64,
            |v| v >= 1.0,
        )?;
        Ok(())
    }
}

fn check(
    field: &'static str,
    expected: &'static str,
    value: f64,
    ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    if ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = PowerUpConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, PowerUpConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = PowerUpConfig::from_toml_str(
            r#"
            seed = 7

            [combo]
            window_ms = 3000

            [effects]
            carrot_rain_count = 20
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.combo.window_ms, 3000);
        assert_eq!(cfg.combo.step, 0.2);
        assert_eq!(cfg.effects.carrot_rain_count, 20);
        assert_eq!(cfg.effects.teleport_score, 500);
        assert_eq!(cfg.spawn, SpawnConfig::default());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = PowerUpConfig::from_toml_str("spawn = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = PowerUpConfig::from_toml_str("[spawn]\nmin_difficulty_factor = 0.0").unwrap_err();
        match err {
            ConfigError::OutOfRange { field, .. } => {
                assert_eq!(field, "spawn.min_difficulty_factor");
            },
            other => panic!("unexpected error: {other}"),
        }

        let err = PowerUpConfig::from_toml_str("history_capacity = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "history_capacity",
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PowerUpConfig::load_from("/nonexistent/bunnyhop/powerups.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("powerups.toml"));
    }

    #[test]
    fn spawn_interval_shrinks_with_score_to_floor() {
        let spawn = SpawnConfig::default();
        assert_eq!(spawn.interval_for_score(0), 12_000);
        assert_eq!(spawn.interval_for_score(2_500), 9_000);
        assert_eq!(spawn.interval_for_score(5_000), 6_000);
        assert_eq!(spawn.interval_for_score(7_500), 6_000);
        assert_eq!(spawn.interval_for_score(u64::MAX), 6_000);
    }

    #[test]
    fn tiny_base_delay_never_yields_zero_interval() {
        let cfg = PowerUpConfig::from_toml_str(
            "[spawn]\nbase_delay_ms = 1\nmin_difficulty_factor = 0.4\n",
        )
        .unwrap();
        assert_eq!(cfg.spawn.interval_for_score(0), 1);
        assert_eq!(cfg.spawn.interval_for_score(1_000_000), 1);
    }

    #[test]
    fn default_config_validates() {
        PowerUpConfig::default().validate().unwrap();
    }
}
