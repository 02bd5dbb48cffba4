//! The scatter/chase timeline that drives hunting ghosts.

use bevy_ecs::event::EventWriter;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, ResMut};
use strum_macros::AsRefStr;
use tracing::debug;

use crate::events::GameEvent;
use crate::systems::ghost::{Ghost, GhostState};
use crate::systems::movement::Mover;
use crate::systems::state::StepLog;
use crate::timer::{TickTimer, INDEFINITE};
use crate::variant::VariantRules;

/// Number of phases in a hunting timeline.
pub const PHASE_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum HuntingPhase {
    Scattering,
    Chasing,
}

/// Phase index and timer over an eight-phase scatter/chase table.
///
/// Even phases scatter, odd phases chase. The last phase never ends.
/// While paused (power mode, dying) neither the phase timer nor the phase index advance,
/// even if the current phase expired on the tick the pause began.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct HuntingTimer {
    durations: [u64; PHASE_COUNT],
    phase_index: usize,
    timer: TickTimer,
    paused: bool,
}

impl Default for HuntingTimer {
    fn default() -> Self {
        Self {
            durations: [INDEFINITE; PHASE_COUNT],
            phase_index: 0,
            timer: TickTimer::new(INDEFINITE),
            paused: false,
        }
    }
}

impl HuntingTimer {
    /// Goes back to phase 0 without starting.
    pub fn reset(&mut self) {
        self.phase_index = 0;
        self.paused = false;
        self.timer.reset(self.durations[0]);
    }

    /// Loads the table of a level and starts its first phase.
    pub fn start_first_phase(&mut self, rules: &VariantRules, level_number: u32) {
        self.durations = *rules.hunting_ticks(level_number);
        self.start_phase(0);
    }

    fn start_phase(&mut self, index: usize) {
        self.phase_index = index;
        self.paused = false;
        self.timer.restart(self.durations[index]);
        debug!(
            phase = index,
            kind = self.phase().as_ref(),
            ticks = self.durations[index],
            "Hunting phase started"
        );
    }

    /// Starts the next phase if the current one has expired, otherwise ticks.
    ///
    /// Returns `true` when a new phase was started.
    pub fn update(&mut self) -> bool {
        if self.paused {
            return false;
        }
        if self.timer.has_expired() {
            if self.phase_index + 1 < PHASE_COUNT {
                self.start_phase(self.phase_index + 1);
                return true;
            }
            return false;
        }
        self.timer.tick();
        false
    }

    /// Pauses the timeline. A phase that already expired starts its successor only after [`Self::start`].
    pub fn stop(&mut self) {
        if !self.paused {
            debug!(phase = self.phase_index, remaining = self.timer.remaining(), "Hunting timer stopped");
        }
        self.paused = true;
        self.timer.stop();
    }

    pub fn start(&mut self) {
        self.paused = false;
        self.timer.start();
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn phase(&self) -> HuntingPhase {
        if self.phase_index % 2 == 0 {
            HuntingPhase::Scattering
        } else {
            HuntingPhase::Chasing
        }
    }

    pub fn is_running(&self) -> bool {
        !self.paused && self.timer.is_running()
    }

    pub fn is_stopped(&self) -> bool {
        self.paused
    }

    pub fn duration(&self) -> u64 {
        self.timer.duration()
    }

    pub fn tick_count(&self) -> u64 {
        self.timer.tick_count()
    }

    pub fn remaining(&self) -> u64 {
        self.timer.remaining()
    }
}

/// Advances the hunting timer. Ghosts that are hunting or still at home reverse on every phase change.
pub fn hunting_timer_system(
    mut hunting: ResMut<HuntingTimer>,
    mut log: ResMut<StepLog>,
    mut ghosts: Query<(&Ghost, &mut Mover)>,
    mut events: EventWriter<GameEvent>,
) {
    if !hunting.update() {
        return;
    }
    log.hunting_phase_started = Some(hunting.phase_index());
    for (ghost, mut mover) in ghosts.iter_mut() {
        if ghost.in_state(&[GhostState::HuntingPac, GhostState::Locked, GhostState::LeavingHouse]) {
            mover.reverse_asap();
        }
    }
    events.write(GameEvent::HuntingPhaseStarted {
        index: hunting.phase_index(),
        phase: hunting.phase(),
    });
}
