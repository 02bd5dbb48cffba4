use bevy_ecs::prelude::*;
use glam::IVec2;

use crate::systems::ghost::GhostId;
use crate::systems::hunting::HuntingPhase;
use crate::systems::steering::Steering;

/// Discrete requests from outside the simulation, executed synchronously by `Game::execute`.
#[derive(Clone, Debug, PartialEq)]
pub enum GameCommand {
    /// Builds a regular level with the given number.
    BuildLevel(u32),
    BuildDemoLevel,
    /// Builds level 1 with full lives and score and starts it.
    StartGame,
    /// Continues after Pac-Man has lost a life or completed a level.
    ContinueGame,
    SetPacSteering(Option<Steering>),
}

/// Things that happened during a tick, in the order they happened.
#[derive(Event, Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelCreated { level: u32, demo: bool },
    LevelStarted { level: u32 },
    HuntingPhaseStarted { index: usize, phase: HuntingPhase },
    PacFoundFood { tile: IVec2, energizer: bool },
    PacGetsPower,
    PacStartsLosingPower,
    PacLostPower,
    GhostReleased { ghost: GhostId },
    GhostEaten { ghost: GhostId, points: u32 },
    BonusActivated { symbol: u8 },
    BonusEaten { symbol: u8, points: u32 },
    BonusExpired { symbol: u8 },
    ExtraLifeWon,
    StopAllSounds,
    PacDied,
    LevelCompleted { level: u32 },
    GameOver,
}
