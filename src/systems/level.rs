//! Per-level resources shared by the simulation systems.

use bevy_ecs::resource::Resource;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use tracing::debug;

use crate::systems::ghost::GhostId;
use crate::timer::TickTimer;
use crate::variant::LevelData;

/// The red ghost's speed-up when few pellets remain.
///
/// Mode 0 is off; modes 1 and 2 use the level's elroy speeds. Disabling keeps the
/// mode so that re-enabling restores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CruiseElroy {
    pub mode: u8,
    pub enabled: bool,
}

impl Default for CruiseElroy {
    fn default() -> Self {
        Self { mode: 0, enabled: true }
    }
}

impl CruiseElroy {
    pub fn is_active(&self) -> bool {
        self.enabled && self.mode > 0
    }

    /// Switches to a mode; reaching a threshold enables elroy again.
    pub fn set_mode(&mut self, mode: u8) {
        if self.mode != mode {
            debug!(mode, "Cruise elroy mode changed");
            self.mode = mode;
        }
        self.enabled = true;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled && self.mode > 0 {
            debug!(mode = self.mode, enabled, "Cruise elroy toggled");
        }
        self.enabled = enabled;
    }
}

/// State of the level being played.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Level {
    pub number: u32,
    pub demo: bool,
    pub data: LevelData,
    /// Ghosts eaten since the last energizer, in kill order.
    pub victims: SmallVec<[GhostId; 4]>,
    /// Ghosts eaten during the whole level.
    pub killed_ghost_count: u32,
    pub bonus_symbols: [u8; 2],
    /// How many bonuses have been activated so far.
    pub next_bonus_index: usize,
    pub elroy: CruiseElroy,
    /// Hunting ticks since the level started.
    pub ticks: u64,
}

impl Level {
    pub fn new(number: u32, demo: bool, bonus_symbols: [u8; 2]) -> Self {
        Self {
            number,
            demo,
            data: LevelData::for_level(number),
            victims: SmallVec::new(),
            killed_ghost_count: 0,
            bonus_symbols,
            next_bonus_index: 0,
            elroy: CruiseElroy::default(),
            ticks: 0,
        }
    }

    pub fn is_victim(&self, ghost: GhostId) -> bool {
        self.victims.contains(&ghost)
    }

    /// The symbol of the next bonus, `None` once both bonuses have been used.
    pub fn next_bonus_symbol(&self) -> Option<u8> {
        self.bonus_symbols.get(self.next_bonus_index).copied()
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new(1, false, [0, 0])
    }
}

/// Duration of Pac-Man's power mode.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerTimer(pub TickTimer);

/// The simulation's only source of randomness, reseeded on every level build.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    /// Seeds the generator from the game seed and the level number.
    pub fn for_level(seed: u64, level_number: u32) -> Self {
        Self(SmallRng::seed_from_u64(seed ^ (level_number as u64).rotate_left(32)))
    }
}
