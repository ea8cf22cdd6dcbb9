use serde::{Deserialize, Serialize};

/// Every collectible power-up in Bunny Hop, in canonical catalog order.
///
/// The declaration order is observable: the weighted selector walks kinds in
/// this order, and `Ord` follows it so ordered maps iterate canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    DoubleJump,
    SpeedBoost,
    Shield,
    Magnet,
    TimeSlow,
    GravityReverse,
    Teleport,
    MultiCollect,
    Invincibility,
    WallJump,
    Dash,
    Bounce,
    PhaseThrough,
    CarrotRain,
    TimeFreeze,
    GhostMode,
    SuperJump,
}

impl PowerUpKind {
    /// All kinds in canonical order.
    pub const ALL: [PowerUpKind; 17] = [
        PowerUpKind::DoubleJump,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
        PowerUpKind::TimeSlow,
        PowerUpKind::GravityReverse,
        PowerUpKind::Teleport,
        PowerUpKind::MultiCollect,
        PowerUpKind::Invincibility,
        PowerUpKind::WallJump,
        PowerUpKind::Dash,
        PowerUpKind::Bounce,
        PowerUpKind::PhaseThrough,
        PowerUpKind::CarrotRain,
        PowerUpKind::TimeFreeze,
        PowerUpKind::GhostMode,
        PowerUpKind::SuperJump,
    ];

    /// Position of this kind in canonical order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier shared with the presentation layer (`"doubleJump"`, ...).
    pub fn token(self) -> &'static str {
        match self {
            PowerUpKind::DoubleJump => "doubleJump",
            PowerUpKind::SpeedBoost => "speedBoost",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::TimeSlow => "timeSlow",
            PowerUpKind::GravityReverse => "gravityReverse",
            PowerUpKind::Teleport => "teleport",
            PowerUpKind::MultiCollect => "multiCollect",
            PowerUpKind::Invincibility => "invincibility",
            PowerUpKind::WallJump => "wallJump",
            PowerUpKind::Dash => "dash",
            PowerUpKind::Bounce => "bounce",
            PowerUpKind::PhaseThrough => "phaseThrough",
            PowerUpKind::CarrotRain => "carrotRain",
            PowerUpKind::TimeFreeze => "timeFreeze",
            PowerUpKind::GhostMode => "ghostMode",
            PowerUpKind::SuperJump => "superJump",
        }
    }
}

/// Rarity tiers, ordered from most to least frequent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Opacity multiplier for the outer glow drawn around a spawned power-up.
    pub fn glow(self) -> f32 {
        match self {
            Rarity::Common => 0.5,
            Rarity::Uncommon => 0.7,
            Rarity::Rare => 0.9,
            Rarity::Epic => 1.0,
            Rarity::Legendary => 1.2,
        }
    }

    /// Border and glow color as `0xRRGGBB`.
    pub fn color(self) -> u32 {
        match self {
            Rarity::Common => 0xFF_FF_FF,
            Rarity::Uncommon => 0x00_FF_00,
            Rarity::Rare => 0x00_80_FF,
            Rarity::Epic => 0xFF_00_FF,
            Rarity::Legendary => 0xFF_D7_00,
        }
    }

    /// Half-period of the pulsing scale animation in milliseconds.
    pub fn pulse_ms(self) -> u64 {
        match self {
            Rarity::Common => 800,
            Rarity::Uncommon => 600,
            Rarity::Rare => 400,
            Rarity::Epic => 300,
            Rarity::Legendary => 200,
        }
    }

    /// Time for one full spin in milliseconds.
    pub fn rotation_ms(self) -> u64 {
        match self {
            Rarity::Common => 4000,
            Rarity::Uncommon => 3000,
            Rarity::Rare => 2000,
            Rarity::Epic => 1500,
            Rarity::Legendary => 1000,
        }
    }

    /// Whether collecting this rarity shakes the camera.
    pub fn shakes_camera(self) -> bool {
        self != Rarity::Common
    }
}

/// Immutable catalog entry describing one power-up kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpDefinition {
    pub kind: PowerUpKind,
    pub name: &'static str,
    pub rarity: Rarity,
    /// Relative selection weight. Always positive.
    pub weight: f64,
    /// Active duration in milliseconds. Zero marks an instant power-up.
    pub duration_ms: u64,
    /// Maximum simultaneous stacks. Always at least 1.
    pub max_stacks: u32,
    /// Banner text shown when the power-up activates.
    pub effect: &'static str,
    /// Primary color as `0xRRGGBB`.
    pub color: u32,
    pub icon: &'static str,
    pub description: &'static str,
    pub upgrade_effect: &'static str,
}

impl PowerUpDefinition {
    /// Instant power-ups apply once and never occupy the active registry.
    pub fn is_instant(&self) -> bool {
        self.duration_ms == 0
    }
}
