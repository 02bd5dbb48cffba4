//! Per-variant rules and the per-level parameter table.

use bevy_ecs::resource::Resource;
use rand::Rng;
use strum_macros::{AsRefStr, EnumString};

use crate::constants::{ticks, BASE_SPEED, TICKS_PER_SECOND};
use crate::systems::ghost::{ChaseRole, GhostId, HuntingBehavior};
use crate::timer::INDEFINITE;

/// The two arcade games the engine can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum GameVariant {
    #[default]
    PacMan,
    MsPacMan,
}

/// One row of the level parameter table. Speeds are percentages of [`BASE_SPEED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelData {
    pub pac_speed: u8,
    pub ghost_speed: u8,
    pub ghost_speed_tunnel: u8,
    pub elroy1_dots_left: u8,
    pub elroy1_speed: u8,
    pub elroy2_dots_left: u8,
    pub elroy2_speed: u8,
    pub pac_speed_powered: u8,
    pub ghost_speed_frightened: u8,
    pub pac_power_seconds: u8,
    pub num_flashes: u8,
}

const fn row(v: [u8; 11]) -> LevelData {
    LevelData {
        pac_speed: v[0],
        ghost_speed: v[1],
        ghost_speed_tunnel: v[2],
        elroy1_dots_left: v[3],
        elroy1_speed: v[4],
        elroy2_dots_left: v[5],
        elroy2_speed: v[6],
        pac_speed_powered: v[7],
        ghost_speed_frightened: v[8],
        pac_power_seconds: v[9],
        num_flashes: v[10],
    }
}

#[rustfmt::skip]
const LEVEL_DATA: [LevelData; 21] = [
    row([ 80,  75, 40,  20,  80, 10,  85,  90, 50, 6, 5]),
    row([ 90,  85, 45,  30,  90, 15,  95,  95, 55, 5, 5]),
    row([ 90,  85, 45,  40,  90, 20,  95,  95, 55, 4, 5]),
    row([ 90,  85, 45,  40,  90, 20,  95,  95, 55, 3, 5]),
    row([100,  95, 50,  40, 100, 20, 105, 100, 60, 2, 5]),
    row([100,  95, 50,  50, 100, 25, 105, 100, 60, 5, 5]),
    row([100,  95, 50,  50, 100, 25, 105, 100, 60, 2, 5]),
    row([100,  95, 50,  50, 100, 25, 105, 100, 60, 2, 5]),
    row([100,  95, 50,  60, 100, 30, 105, 100, 60, 1, 3]),
    row([100,  95, 50,  60, 100, 30, 105, 100, 60, 5, 5]),
    row([100,  95, 50,  60, 100, 30, 105, 100, 60, 2, 5]),
    row([100,  95, 50,  80, 100, 40, 105, 100, 60, 1, 3]),
    row([100,  95, 50,  80, 100, 40, 105, 100, 60, 1, 3]),
    row([100,  95, 50,  80, 100, 40, 105, 100, 60, 3, 5]),
    row([100,  95, 50, 100, 100, 50, 105, 100, 60, 1, 3]),
    row([100,  95, 50, 100, 100, 50, 105, 100, 60, 1, 3]),
    row([100,  95, 50, 100, 100, 50, 105,   0,  0, 0, 0]),
    row([100,  95, 50, 100, 100, 50, 105, 100, 60, 1, 3]),
    row([100,  95, 50, 120, 100, 60, 105,   0,  0, 0, 0]),
    row([100,  95, 50, 120, 100, 60, 105,   0,  0, 0, 0]),
    row([ 90,  95, 50, 120, 100, 60, 105,   0,  0, 0, 0]),
];

/// Converts a speed percentage into pixels per tick.
pub fn percentage_speed(percentage: u8) -> f32 {
    percentage as f32 * 0.01 * BASE_SPEED
}

impl LevelData {
    /// The parameters of a level; levels beyond the table use its last row.
    pub fn for_level(level_number: u32) -> LevelData {
        let index = (level_number.max(1) as usize - 1).min(LEVEL_DATA.len() - 1);
        LEVEL_DATA[index]
    }

    /// Duration of power mode, zero for levels without it.
    pub fn pac_power_ticks(&self) -> u32 {
        self.pac_power_seconds as u32 * TICKS_PER_SECOND
    }

    /// Length of the fading window at the end of power mode.
    pub fn power_fading_ticks(&self) -> u32 {
        self.num_flashes as u32 * ticks::FLASH_LENGTH
    }

    pub fn pac_normal_speed(&self) -> f32 {
        percentage_speed(self.pac_speed)
    }

    /// Pac-Man's speed in power mode, falling back to the normal speed when the level has none.
    pub fn pac_powered_speed(&self) -> f32 {
        if self.pac_speed_powered > 0 {
            percentage_speed(self.pac_speed_powered)
        } else {
            self.pac_normal_speed()
        }
    }

    pub fn ghost_normal_speed(&self) -> f32 {
        percentage_speed(self.ghost_speed)
    }

    pub fn ghost_tunnel_speed(&self) -> f32 {
        percentage_speed(self.ghost_speed_tunnel)
    }

    /// Frightened ghost speed, falling back to the base speed when the level has no power mode.
    pub fn ghost_frightened_speed(&self) -> f32 {
        if self.ghost_speed_frightened > 0 {
            percentage_speed(self.ghost_speed_frightened)
        } else {
            BASE_SPEED
        }
    }
}

const I: u64 = INDEFINITE;

const PACMAN_HUNTING_LEVEL_1: [u64; 8] = [420, 1200, 420, 1200, 300, 1200, 300, I];
const PACMAN_HUNTING_LEVEL_2_TO_4: [u64; 8] = [420, 1200, 420, 1200, 300, 61980, 1, I];
const PACMAN_HUNTING_LEVEL_5_PLUS: [u64; 8] = [300, 1200, 300, 1200, 300, 62262, 1, I];

const MS_PACMAN_HUNTING_LEVEL_1_TO_4: [u64; 8] = [420, 1200, 1, 62220, 1, 62220, 1, I];
const MS_PACMAN_HUNTING_LEVEL_5_PLUS: [u64; 8] = [300, 1200, 1, 62220, 1, 62220, 1, I];

const PACMAN_BONUS_SYMBOLS: [u8; 13] = [0, 0, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6];
const PACMAN_BONUS_VALUES: [u32; 8] = [100, 300, 500, 700, 1000, 2000, 3000, 5000];
const MS_PACMAN_BONUS_VALUES: [u32; 7] = [100, 200, 500, 700, 1000, 2000, 5000];

/// How a bonus behaves once activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusKind {
    /// Sits below the house for a random duration.
    Static,
    /// Enters through a portal, circles the house and leaves through another portal.
    Moving,
}

/// Behavioral differences between the game variants.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRules {
    pub variant: GameVariant,
    /// Eaten-food counts at which a bonus is activated.
    pub bonus_milestones: [usize; 2],
    pub bonus_kind: BonusKind,
    /// Whether a milestone is skipped while the previous bonus is still around.
    pub bonus_waits_for_previous: bool,
    /// Whether the red ghost speeds up (and always chases) when few pellets remain.
    pub elroy: bool,
    /// Ghosts slow down in tunnels only up to this level.
    pub tunnel_slowdown_max_level: Option<u32>,
    /// Whether the red and pink ghost roam during the first scatter phase.
    pub roaming_first_scatter: bool,
    /// Emulates the arcade's "tiles ahead" error when Pac-Man faces up.
    pub overflow_bug: bool,
}

impl VariantRules {
    pub fn for_variant(variant: GameVariant) -> Self {
        match variant {
            GameVariant::PacMan => VariantRules {
                variant,
                bonus_milestones: [70, 170],
                bonus_kind: BonusKind::Static,
                bonus_waits_for_previous: false,
                elroy: true,
                tunnel_slowdown_max_level: None,
                roaming_first_scatter: false,
                overflow_bug: true,
            },
            GameVariant::MsPacMan => VariantRules {
                variant,
                bonus_milestones: [64, 176],
                bonus_kind: BonusKind::Moving,
                bonus_waits_for_previous: true,
                elroy: true,
                tunnel_slowdown_max_level: Some(3),
                roaming_first_scatter: true,
                overflow_bug: true,
            },
        }
    }

    /// Phase durations of the hunting timer for a level.
    pub fn hunting_ticks(&self, level_number: u32) -> &'static [u64; 8] {
        match (self.variant, level_number) {
            (GameVariant::PacMan, 0..=1) => &PACMAN_HUNTING_LEVEL_1,
            (GameVariant::PacMan, 2..=4) => &PACMAN_HUNTING_LEVEL_2_TO_4,
            (GameVariant::PacMan, _) => &PACMAN_HUNTING_LEVEL_5_PLUS,
            (GameVariant::MsPacMan, 0..=4) => &MS_PACMAN_HUNTING_LEVEL_1_TO_4,
            (GameVariant::MsPacMan, _) => &MS_PACMAN_HUNTING_LEVEL_5_PLUS,
        }
    }

    pub fn is_bonus_milestone(&self, eaten_count: usize) -> bool {
        self.bonus_milestones.contains(&eaten_count)
    }

    /// Whether ghosts in a tunnel use the reduced tunnel speed on this level.
    pub fn tunnel_slowdown(&self, level_number: u32) -> bool {
        self.tunnel_slowdown_max_level.is_none_or(|max| level_number <= max)
    }

    /// The hunting behavior of a ghost in this variant.
    pub fn hunting_behavior(&self, ghost: GhostId) -> HuntingBehavior {
        let role = match ghost {
            GhostId::Red => ChaseRole::DirectPursuer,
            GhostId::Pink => ChaseRole::Ambusher,
            GhostId::Cyan => ChaseRole::Flanker,
            GhostId::Orange => ChaseRole::Opportunist,
        };
        if self.roaming_first_scatter && matches!(ghost, GhostId::Red | GhostId::Pink) {
            HuntingBehavior::CustomRoaming(role)
        } else {
            HuntingBehavior::Standard(role)
        }
    }

    /// Picks a bonus symbol for a level; called once per bonus when the level is built.
    pub fn bonus_symbol<R: Rng>(&self, level_number: u32, rng: &mut R) -> u8 {
        match self.variant {
            GameVariant::PacMan => PACMAN_BONUS_SYMBOLS.get(level_number as usize).copied().unwrap_or(7),
            GameVariant::MsPacMan => {
                if level_number <= 7 {
                    (level_number.max(1) - 1) as u8
                } else {
                    // The first four symbols weigh 5/32 each, the last three 4/32.
                    match rng.random_range(0..320) {
                        0..50 => 0,
                        50..100 => 1,
                        100..150 => 2,
                        150..200 => 3,
                        200..240 => 4,
                        240..280 => 5,
                        _ => 6,
                    }
                }
            }
        }
    }

    pub fn bonus_value(&self, symbol: u8) -> u32 {
        let values: &[u32] = match self.variant {
            GameVariant::PacMan => &PACMAN_BONUS_VALUES,
            GameVariant::MsPacMan => &MS_PACMAN_BONUS_VALUES,
        };
        values[(symbol as usize).min(values.len() - 1)]
    }
}
