//! The game's stage and the per-tick step log.

use bevy_ecs::resource::Resource;
use circular_buffer::CircularBuffer;
use glam::IVec2;
use smallvec::SmallVec;
use tracing::trace;

use crate::systems::gate::ReleaseReason;
use crate::systems::ghost::GhostId;

/// Number of step logs kept for inspection.
pub const STEP_HISTORY_SIZE: usize = 120;

/// A resource to track the overall stage of the game from a high-level perspective.
#[derive(Resource, Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum GameStage {
    /// A level has been built (or not yet) and waits to be started.
    #[default]
    Idle,
    /// The main simulation step is active.
    Hunting,
    /// Short freeze after Pac-Man eats a ghost; only returning ghosts move.
    GhostEatenPause { remaining_ticks: u32 },
    /// Pac-Man has been killed and the death sequence is in progress.
    PacDying { remaining_ticks: u32 },
    /// All food has been eaten.
    LevelComplete,
    /// No lives are left.
    GameOver,
}

impl GameStage {
    pub fn is_hunting(&self) -> bool {
        matches!(self, GameStage::Hunting)
    }
}

/// What happened during one simulation step.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct StepLog {
    pub tick: u64,
    /// The stage at the start of the step; systems run based on this, not on later changes.
    pub stage: GameStage,
    pub hunting_phase_started: Option<usize>,
    pub released_ghost: Option<(GhostId, ReleaseReason)>,
    pub food_found_tile: Option<IVec2>,
    pub energizer_found: bool,
    pub bonus_reached: bool,
    pub bonus_index: Option<usize>,
    pub bonus_eaten: bool,
    pub pac_gets_power: bool,
    pub pac_starts_losing_power: bool,
    pub pac_lost_power: bool,
    pub pac_killed: bool,
    pub killed_ghosts: SmallVec<[GhostId; 4]>,
}

impl StepLog {
    pub fn new(tick: u64, stage: GameStage) -> Self {
        Self {
            tick,
            stage,
            ..Default::default()
        }
    }

    /// Whether anything at all happened in this step.
    pub fn is_empty(&self) -> bool {
        *self == StepLog::new(self.tick, self.stage)
    }
}

/// The most recent step logs, oldest first.
#[derive(Resource, Debug, Default)]
pub struct StepHistory {
    logs: CircularBuffer<STEP_HISTORY_SIZE, StepLog>,
}

impl StepHistory {
    pub fn record(&mut self, log: StepLog) {
        if !log.is_empty() {
            trace!(?log, "Step recorded");
        }
        self.logs.push_back(log);
    }

    pub fn last(&self) -> Option<&StepLog> {
        self.logs.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepLog> {
        self.logs.iter()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }
}
