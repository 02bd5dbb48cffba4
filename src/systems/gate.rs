//! Decides when ghosts may leave the house.

use bevy_ecs::event::EventWriter;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, Res, ResMut};
use smallvec::SmallVec;
use strum_macros::AsRefStr;
use tracing::{debug, trace};

use crate::events::GameEvent;
use crate::map::direction::Direction;
use crate::map::world::WorldMap;
use crate::systems::ghost::{Ghost, GhostId, GhostState};
use crate::systems::level::Level;
use crate::systems::movement::Mover;
use crate::systems::player::Pac;
use crate::systems::state::StepLog;

/// Global counter value at which the pink and cyan ghost leave, by ghost id.
const GLOBAL_LIMITS: [Option<u32>; 4] = [None, Some(7), Some(17), None];
/// Global counter value at which the counter switches off while the orange ghost is still locked.
const GLOBAL_COUNTER_OFF: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum ReleaseReason {
    Unconditional,
    GlobalCounter,
    PrivateCounter,
    PacStarving,
}

/// Dot counters and the starving limit that release ghosts from the house.
///
/// Each ghost has a private dot counter. After Pac-Man loses a life, a global
/// counter takes over until the orange ghost has left or the counter reaches 32.
/// If Pac-Man eats nothing for long enough, the next ghost is released anyway.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct GateKeeper {
    private_counters: [u32; 4],
    private_limits: [u32; 4],
    global_counter: u32,
    global_enabled: bool,
    pac_starving_limit: u32,
}

impl Default for GateKeeper {
    fn default() -> Self {
        let mut gate = Self {
            private_counters: [0; 4],
            private_limits: [0; 4],
            global_counter: 0,
            global_enabled: false,
            pac_starving_limit: 0,
        };
        gate.set_level_number(1);
        gate
    }
}

impl GateKeeper {
    /// Loads the limits of a level and clears all counters.
    pub fn set_level_number(&mut self, level_number: u32) {
        self.private_limits = match level_number {
            0 | 1 => [0, 0, 30, 60],
            2 => [0, 0, 0, 50],
            _ => [0, 0, 0, 0],
        };
        self.pac_starving_limit = if level_number < 5 { 240 } else { 180 };
        self.private_counters = [0; 4];
        self.global_counter = 0;
        self.global_enabled = false;
    }

    pub fn reset_global_counter(&mut self, enabled: bool) {
        self.global_counter = 0;
        self.global_enabled = enabled;
        debug!(enabled, "Global dot counter reset");
    }

    pub fn is_global_counter_enabled(&self) -> bool {
        self.global_enabled
    }

    pub fn global_counter(&self) -> u32 {
        self.global_counter
    }

    pub fn private_counter(&self, ghost: GhostId) -> u32 {
        self.private_counters[ghost.index()]
    }

    pub fn pac_starving_limit(&self) -> u32 {
        self.pac_starving_limit
    }

    /// Why a locked ghost may leave now, if at all.
    pub fn check_release(&self, ghost: GhostId, pac_starving_ticks: u32) -> Option<ReleaseReason> {
        let id = ghost.index();
        if self.global_enabled {
            if GLOBAL_LIMITS[id].is_some_and(|limit| self.global_counter == limit) {
                return Some(ReleaseReason::GlobalCounter);
            }
        } else if self.private_counters[id] >= self.private_limits[id] {
            return Some(ReleaseReason::PrivateCounter);
        }
        if pac_starving_ticks >= self.pac_starving_limit {
            return Some(ReleaseReason::PacStarving);
        }
        None
    }

    /// Counts a piece of food towards the active counter.
    ///
    /// `first_locked_inside` is the first ghost (by id) still locked inside the house.
    pub fn register_food_eaten(&mut self, orange_locked: bool, first_locked_inside: Option<GhostId>) {
        if self.global_enabled {
            if orange_locked && self.global_counter == GLOBAL_COUNTER_OFF {
                self.global_enabled = false;
                self.global_counter = 0;
                debug!("Global dot counter disabled");
            } else {
                self.global_counter += 1;
            }
        } else if let Some(ghost) = first_locked_inside {
            self.private_counters[ghost.index()] += 1;
            trace!(ghost = ghost.as_ref(), count = self.private_counters[ghost.index()], "Private dot counter");
        }
    }
}

/// Releases the red ghost at once and at most one other locked ghost per tick.
pub fn ghost_release_system(
    world: Res<WorldMap>,
    gate: Res<GateKeeper>,
    mut level: ResMut<Level>,
    mut log: ResMut<StepLog>,
    mut pacs: Query<&mut Pac>,
    mut ghosts: Query<(&mut Ghost, &mut Mover)>,
    mut events: EventWriter<GameEvent>,
) {
    let mut ordered: SmallVec<[_; 4]> = ghosts.iter_mut().collect();
    ordered.sort_by_key(|(ghost, _)| ghost.id);

    for (ghost, mover) in ordered.iter_mut() {
        if ghost.id == GhostId::Red && ghost.state == GhostState::Locked {
            if world.is_inside_house(mover.tile()) {
                ghost.set_state(GhostState::LeavingHouse);
            } else {
                mover.set_move_and_wish_dir(Direction::Left);
                ghost.set_state(GhostState::HuntingPac);
            }
            debug!(ghost = ghost.id.as_ref(), reason = ReleaseReason::Unconditional.as_ref(), "Ghost released");
            log.released_ghost = Some((ghost.id, ReleaseReason::Unconditional));
            events.write(GameEvent::GhostReleased { ghost: ghost.id });
        }
    }

    let Some((prisoner, _)) = ordered
        .iter_mut()
        .find(|(ghost, _)| ghost.id != GhostId::Red && ghost.state == GhostState::Locked)
    else {
        return;
    };
    let Ok(mut pac) = pacs.single_mut() else {
        return;
    };

    let Some(reason) = gate.check_release(prisoner.id, pac.starving_ticks) else {
        return;
    };
    if reason == ReleaseReason::PacStarving {
        pac.end_starving();
    }
    prisoner.set_state(GhostState::LeavingHouse);
    debug!(ghost = prisoner.id.as_ref(), reason = reason.as_ref(), "Ghost released");
    log.released_ghost = Some((prisoner.id, reason));
    events.write(GameEvent::GhostReleased { ghost: prisoner.id });

    if prisoner.id == GhostId::Orange && !level.elroy.enabled {
        level.elroy.set_enabled(true);
    }
}
