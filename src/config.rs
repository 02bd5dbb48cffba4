//! Settings a game is created with.

use crate::map::world::MapDefinition;
use crate::variant::GameVariant;

/// Everything that selects how a [`crate::game::Game`] plays out.
///
/// Two games created from equal configs and fed the same commands produce the same ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub variant: GameVariant,
    /// Seeds the per-level random source (ghost roaming, bonus choices).
    pub seed: u64,
    pub start_lives: u8,
    /// Ghosts cannot kill Pac-Man outside demo levels.
    pub pac_immune: bool,
    /// Overrides the variant's emulation of the arcade's "tiles ahead" error.
    pub overflow_bug: Option<bool>,
    pub map: MapDefinition,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: GameVariant::PacMan,
            seed: 0,
            start_lives: 3,
            pac_immune: false,
            overflow_bug: None,
            map: MapDefinition::arcade(),
        }
    }
}

impl GameConfig {
    pub fn for_variant(variant: GameVariant) -> Self {
        Self {
            variant,
            ..Default::default()
        }
    }
}
