use bunnyhop_core::powerup::{PowerUpDefinition, PowerUpKind, Rarity};

/// The static table of power-up definitions, indexed by [`PowerUpKind::index`].
#[derive(Debug)]
pub struct Catalog {
    definitions: [PowerUpDefinition; 17],
}

static STANDARD: Catalog = Catalog {
    definitions: [
        PowerUpDefinition {
            kind: PowerUpKind::DoubleJump,
            name: "Double Jump",
            rarity: Rarity::Common,
            weight: 30.0,
            duration_ms: 12_000,
            max_stacks: 3,
            effect: "Double Jump Active!",
            color: 0x00_FF_FF,
            icon: "🔄",
            description: "Jump again in mid-air",
            upgrade_effect: "Increases jump height",
        },
        PowerUpDefinition {
            kind: PowerUpKind::SpeedBoost,
            name: "Speed Boost",
            rarity: Rarity::Common,
            weight: 25.0,
            duration_ms: 8_000,
            max_stacks: 2,
            effect: "Speed Boost!",
            color: 0xFF_6B_35,
            icon: "⚡",
            description: "Move 50% faster",
            upgrade_effect: "Increases speed multiplier",
        },
        PowerUpDefinition {
            kind: PowerUpKind::Shield,
            name: "Shield",
            rarity: Rarity::Uncommon,
            weight: 20.0,
            duration_ms: 15_000,
            max_stacks: 1,
            effect: "Shield Active!",
            color: 0x4E_CD_C4,
            icon: "🛡️",
            description: "Protection from obstacles",
            upgrade_effect: "Longer duration",
        },
        PowerUpDefinition {
            kind: PowerUpKind::Magnet,
            name: "Magnet",
            rarity: Rarity::Uncommon,
            weight: 15.0,
            duration_ms: 10_000,
            max_stacks: 2,
            effect: "Magnet Active!",
            color: 0xFF_D9_3D,
            icon: "🧲",
            description: "Attract carrots and power-ups",
            upgrade_effect: "Increased attraction range",
        },
        PowerUpDefinition {
            kind: PowerUpKind::TimeSlow,
            name: "Time Slow",
            rarity: Rarity::Rare,
            weight: 5.0,
            duration_ms: 6_000,
            max_stacks: 1,
            effect: "Time Slow!",
            color: 0x9B_59_B6,
            icon: "⏰",
            description: "Slow down obstacles",
            upgrade_effect: "Longer slow duration",
        },
        PowerUpDefinition {
            kind: PowerUpKind::GravityReverse,
            name: "Gravity Reverse",
            rarity: Rarity::Rare,
            weight: 3.0,
            duration_ms: 5_000,
            max_stacks: 1,
            effect: "Gravity Reversed!",
            color: 0xE7_4C_3C,
            icon: "🔄",
            description: "Float upward",
            upgrade_effect: "Stronger upward force",
        },
        PowerUpDefinition {
            kind: PowerUpKind::Teleport,
            name: "Teleport",
            rarity: Rarity::Epic,
            weight: 1.0,
            duration_ms: 0,
            max_stacks: 1,
            effect: "Teleport!",
            color: 0x34_98_DB,
            icon: "✨",
            description: "Instantly move forward",
            upgrade_effect: "Longer teleport distance",
        },
        PowerUpDefinition {
            kind: PowerUpKind::MultiCollect,
            name: "Multi Collect",
            rarity: Rarity::Epic,
            weight: 1.0,
            duration_ms: 8_000,
            max_stacks: 1,
            effect: "Multi Collect!",
            color: 0xF3_9C_12,
            icon: "🌟",
            description: "Collect multiple items at once",
            upgrade_effect: "Larger collection radius",
        },
        PowerUpDefinition {
            kind: PowerUpKind::Invincibility,
            name: "Invincibility",
            rarity: Rarity::Rare,
            weight: 4.0,
            duration_ms: 10_000,
            max_stacks: 1,
            effect: "Invincible!",
            color: 0xFF_D7_00,
            icon: "💫",
            description: "Cannot be harmed",
            upgrade_effect: "Longer duration",
        },
        PowerUpDefinition {
            kind: PowerUpKind::WallJump,
            name: "Wall Jump",
            rarity: Rarity::Uncommon,
            weight: 12.0,
            duration_ms: 15_000,
            max_stacks: 2,
            effect: "Wall Jump!",
            color: 0x8E_44_AD,
            icon: "🏃",
            description: "Jump off walls",
            upgrade_effect: "More wall jumps",
        },
        PowerUpDefinition {
            kind: PowerUpKind::Dash,
            name: "Dash",
            rarity: Rarity::Common,
            weight: 18.0,
            duration_ms: 6_000,
            max_stacks: 2,
            effect: "Dash!",
            color: 0xE6_7E_22,
            icon: "💨",
            description: "Quick forward burst",
            upgrade_effect: "Longer dash distance",
        },
        PowerUpDefinition {
            kind: PowerUpKind::Bounce,
            name: "Bounce",
            rarity: Rarity::Uncommon,
            weight: 10.0,
            duration_ms: 12_000,
            max_stacks: 2,
            effect: "Bounce!",
            color: 0x2E_CC_71,
            icon: "⚽",
            description: "Bounce higher off surfaces",
            upgrade_effect: "Higher bounce",
        },
        PowerUpDefinition {
            kind: PowerUpKind::PhaseThrough,
            name: "Phase Through",
            rarity: Rarity::Rare,
            weight: 3.0,
            duration_ms: 8_000,
            max_stacks: 1,
            effect: "Phase Through!",
            color: 0x9B_59_B6,
            icon: "👻",
            description: "Pass through obstacles",
            upgrade_effect: "Longer duration",
        },
        PowerUpDefinition {
            kind: PowerUpKind::CarrotRain,
            name: "Carrot Rain",
            rarity: Rarity::Epic,
            weight: 1.0,
            duration_ms: 0,
            max_stacks: 1,
            effect: "Carrot Rain!",
            color: 0xFF_8C_00,
            icon: "🥕",
            description: "Spawn many carrots",
            upgrade_effect: "More carrots",
        },
        PowerUpDefinition {
            kind: PowerUpKind::TimeFreeze,
            name: "Time Freeze",
            rarity: Rarity::Legendary,
            weight: 0.5,
            duration_ms: 4_000,
            max_stacks: 1,
            effect: "Time Frozen!",
            color: 0x00_CE_D1,
            icon: "❄️",
            description: "Freeze everything",
            upgrade_effect: "Longer freeze",
        },
        PowerUpDefinition {
            kind: PowerUpKind::GhostMode,
            name: "Ghost Mode",
            rarity: Rarity::Rare,
            weight: 2.0,
            duration_ms: 10_000,
            max_stacks: 1,
            effect: "Ghost Mode!",
            color: 0x95_A5_A6,
            icon: "👻",
            description: "Float through everything",
            upgrade_effect: "Longer duration",
        },
        PowerUpDefinition {
            kind: PowerUpKind::SuperJump,
            name: "Super Jump",
            rarity: Rarity::Uncommon,
            weight: 8.0,
            duration_ms: 12_000,
            max_stacks: 2,
            effect: "Super Jump!",
            color: 0xE7_4C_3C,
            icon: "🚀",
            description: "Extremely high jumps",
            upgrade_effect: "Even higher jumps",
        },
    ],
};

impl Catalog {
    /// The process-wide Bunny Hop catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    pub fn lookup(&self, kind: PowerUpKind) -> &PowerUpDefinition {
        &self.definitions[kind.index()]
    }

    /// Definitions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &PowerUpDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.definitions.iter().map(|d| d.weight).sum()
    }

    /// Kind returned when a weighted draw falls off the end of the table:
    /// the first common entry.
    pub fn fallback_kind(&self) -> PowerUpKind {
        self.definitions
            .iter()
            .find(|d| d.rarity == Rarity::Common)
            .map_or(PowerUpKind::DoubleJump, |d| d.kind)
    }
}
