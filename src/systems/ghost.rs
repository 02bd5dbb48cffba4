//! The ghost state machine and its target-tile rules.

use bevy_ecs::component::Component;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res, ResMut};
use glam::{IVec2, Vec2};
use rand::Rng;
use smallvec::SmallVec;
use strum_macros::{AsRefStr, EnumCount, EnumIter};
use tracing::{debug, trace};

use crate::constants::{speed, HALF_TILE, TILE_SIZE};
use crate::error::{GameError, GhostError};
use crate::map::direction::Direction;
use crate::map::tile::{roughly_equals, tile_distance};
use crate::map::world::WorldMap;
use crate::systems::hunting::{HuntingPhase, HuntingTimer};
use crate::systems::level::{Level, PowerTimer, SimRng};
use crate::systems::movement::{Mover, Navigator};
use crate::systems::player::Pac;
use crate::systems::state::{GameStage, StepLog};
use crate::variant::VariantRules;

/// The four ghosts, in update order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum GhostId {
    Red = 0,
    Pink = 1,
    Cyan = 2,
    Orange = 3,
}

impl GhostId {
    pub const ALL: [GhostId; 4] = [GhostId::Red, GhostId::Pink, GhostId::Cyan, GhostId::Orange];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Initial move direction at level start.
    pub const fn start_direction(self) -> Direction {
        match self {
            GhostId::Red => Direction::Left,
            GhostId::Pink => Direction::Down,
            GhostId::Cyan | GhostId::Orange => Direction::Up,
        }
    }
}

impl TryFrom<u8> for GhostId {
    type Error = GhostError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GhostId::Red),
            1 => Ok(GhostId::Pink),
            2 => Ok(GhostId::Cyan),
            3 => Ok(GhostId::Orange),
            _ => Err(GhostError::InvalidId(value)),
        }
    }
}

/// The six states of a ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter, EnumCount)]
#[repr(u8)]
pub enum GhostState {
    #[default]
    Locked = 0,
    LeavingHouse = 1,
    HuntingPac = 2,
    Frightened = 3,
    Eaten = 4,
    ReturningHome = 5,
    EnteringHouse = 6,
}

impl TryFrom<u8> for GhostState {
    type Error = GhostError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use GhostState::*;
        [Locked, LeavingHouse, HuntingPac, Frightened, Eaten, ReturningHome, EnteringHouse]
            .get(value as usize)
            .copied()
            .ok_or(GhostError::InvalidState(value))
    }
}

/// How a ghost picks its chase target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChaseRole {
    /// Targets Pac-Man's tile.
    DirectPursuer,
    /// Targets four tiles ahead of Pac-Man.
    Ambusher,
    /// Targets the point two tiles ahead of Pac-Man, mirrored through the red ghost.
    Flanker,
    /// Chases Pac-Man from afar, retreats to its corner when close.
    Opportunist,
}

impl ChaseRole {
    /// The chase target tile for a ghost standing on `ghost_tile`.
    pub fn target(self, ghost_tile: IVec2, scatter_tile: IVec2, pac: &Mover, red_tile: IVec2, overflow_bug: bool) -> IVec2 {
        match self {
            ChaseRole::DirectPursuer => pac.tile(),
            ChaseRole::Ambusher => pac.tiles_ahead(4, overflow_bug),
            ChaseRole::Flanker => pac.tiles_ahead(2, overflow_bug) * 2 - red_tile,
            ChaseRole::Opportunist => {
                if tile_distance(ghost_tile, pac.tile()) < 8.0 {
                    scatter_tile
                } else {
                    pac.tile()
                }
            }
        }
    }
}

/// A ghost's behavior while hunting Pac-Man, chosen per variant when the level is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HuntingBehavior {
    /// Alternates between its scatter corner and its chase target.
    Standard(ChaseRole),
    /// Roams randomly during the first scatter phase, then behaves like `Standard`.
    CustomRoaming(ChaseRole),
}

impl HuntingBehavior {
    pub fn role(self) -> ChaseRole {
        match self {
            HuntingBehavior::Standard(role) | HuntingBehavior::CustomRoaming(role) => role,
        }
    }
}

/// Everything a ghost reads about the rest of the level during its update.
pub struct GhostContext<'a> {
    pub world: &'a WorldMap,
    pub level: &'a Level,
    pub rules: &'a VariantRules,
    pub hunting: &'a HuntingTimer,
    pub power_running: bool,
    pub pac: &'a Mover,
    pub red_tile: IVec2,
}

/// A ghost actor. Movement state lives in the sibling [`Mover`] component.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Ghost {
    pub id: GhostId,
    pub state: GhostState,
    pub revival_position: Vec2,
    pub behavior: HuntingBehavior,
    /// Whether one-way tiles apply to this ghost.
    pub one_way_restricted: bool,
    /// Position in the kill sequence of the current energizer, while eaten.
    pub killed_index: Option<usize>,
}

impl Navigator for Ghost {
    fn can_access_tile(&self, mover: &Mover, world: &WorldMap, tile: IVec2) -> bool {
        if self.one_way_restricted
            && self.state == GhostState::HuntingPac
            && world.is_one_way_down(tile)
            && mover.tile() == tile + Direction::Down.as_ivec2()
        {
            return false;
        }
        if world.is_door(tile) {
            return matches!(self.state, GhostState::EnteringHouse | GhostState::LeavingHouse);
        }
        if world.is_inside(tile) {
            !world.is_blocked(tile)
        } else {
            world.is_portal(tile)
        }
    }

    fn can_reverse(&self, mover: &Mover) -> bool {
        mover.new_tile_entered && matches!(self.state, GhostState::HuntingPac | GhostState::Frightened)
    }
}

impl Ghost {
    pub fn new(id: GhostId, revival_position: Vec2, behavior: HuntingBehavior) -> Self {
        Self {
            id,
            state: GhostState::Locked,
            revival_position,
            behavior,
            one_way_restricted: true,
            killed_index: None,
        }
    }

    pub fn set_state(&mut self, state: GhostState) {
        if self.state != state {
            debug!(ghost = self.id.as_ref(), from = self.state.as_ref(), to = state.as_ref(), "Ghost state changed");
            self.state = state;
        }
        if state != GhostState::Eaten {
            self.killed_index = None;
        }
    }

    pub fn in_state(&self, states: &[GhostState]) -> bool {
        states.contains(&self.state)
    }

    /// Advances the ghost's state machine by one tick.
    pub fn update<R: Rng>(&mut self, mover: &mut Mover, ctx: &GhostContext, rng: &mut R) {
        match self.state {
            GhostState::Locked => self.update_locked(mover, ctx),
            GhostState::LeavingHouse => self.update_leaving_house(mover, ctx),
            GhostState::HuntingPac => self.update_hunting(mover, ctx, rng),
            GhostState::Frightened => self.update_frightened(mover, ctx, rng),
            GhostState::Eaten => {}
            GhostState::ReturningHome => self.update_returning_home(mover, ctx),
            GhostState::EnteringHouse => self.update_entering_house(mover),
        }
    }

    fn update_locked(&mut self, mover: &mut Mover, ctx: &GhostContext) {
        let house = ctx.world.house();
        if !house.contains(mover.tile()) {
            mover.set_speed(0.0);
            return;
        }
        let min_y = ((house.min_tile.y + 1) * TILE_SIZE + HALF_TILE) as f32;
        let max_y = ((house.max_tile.y - 1) * TILE_SIZE - HALF_TILE) as f32;
        mover.set_speed(speed::GHOST_INSIDE_HOUSE);
        mover.move_by_velocity();
        if mover.position.y <= min_y {
            mover.set_move_and_wish_dir(Direction::Down);
        } else if mover.position.y >= max_y {
            mover.set_move_and_wish_dir(Direction::Up);
        }
        mover.position.y = mover.position.y.clamp(min_y, max_y);
    }

    fn update_leaving_house(&mut self, mover: &mut Mover, ctx: &GhostContext) {
        let house = ctx.world.house();
        let entry = house.entry_position();
        if mover.position.y <= entry.y {
            mover.set_position(entry);
            mover.set_move_and_wish_dir(Direction::Left);
            mover.new_tile_entered = false;
            if ctx.power_running && !ctx.level.is_victim(self.id) {
                self.set_state(GhostState::Frightened);
            } else {
                self.set_state(GhostState::HuntingPac);
            }
            return;
        }

        let speed = speed::GHOST_INSIDE_HOUSE;
        let center_x = mover.position.x + HALF_TILE as f32;
        let house_center_x = house.center().x;
        if (center_x - house_center_x).abs() <= 0.5 * speed {
            mover.position.x = house_center_x - HALF_TILE as f32;
            mover.set_move_and_wish_dir(Direction::Up);
        } else if center_x < house_center_x {
            mover.set_move_and_wish_dir(Direction::Right);
        } else {
            mover.set_move_and_wish_dir(Direction::Left);
        }
        mover.set_speed(speed);
        mover.move_by_velocity();
    }

    fn update_hunting<R: Rng>(&mut self, mover: &mut Mover, ctx: &GhostContext, rng: &mut R) {
        let speed = self.hunting_speed(mover, ctx);

        if let HuntingBehavior::CustomRoaming(_) = self.behavior {
            if ctx.hunting.phase_index() == 0 {
                self.roam(mover, ctx.world, speed, rng);
                return;
            }
        }

        let chasing = ctx.hunting.phase() == HuntingPhase::Chasing || (self.id == GhostId::Red && ctx.level.elroy.is_active());
        let scatter_tile = ctx.world.scatter_tile(self.id.index());
        let target = if chasing {
            self.behavior
                .role()
                .target(mover.tile(), scatter_tile, ctx.pac, ctx.red_tile, ctx.rules.overflow_bug)
        } else {
            scatter_tile
        };
        mover.follow_target(target, speed, ctx.world, self);
    }

    /// Speed while hunting: tunnel slowdown first, then the red ghost's elroy speed.
    fn hunting_speed(&self, mover: &Mover, ctx: &GhostContext) -> f32 {
        let data = &ctx.level.data;
        if ctx.rules.tunnel_slowdown(ctx.level.number) && ctx.world.is_tunnel(mover.tile()) {
            return data.ghost_tunnel_speed();
        }
        if self.id == GhostId::Red && ctx.level.elroy.is_active() {
            return match ctx.level.elroy.mode {
                1 => crate::variant::percentage_speed(data.elroy1_speed),
                _ => crate::variant::percentage_speed(data.elroy2_speed),
            };
        }
        data.ghost_normal_speed()
    }

    fn update_frightened<R: Rng>(&mut self, mover: &mut Mover, ctx: &GhostContext, rng: &mut R) {
        let data = &ctx.level.data;
        let speed = if ctx.world.is_tunnel(mover.tile()) {
            data.ghost_tunnel_speed()
        } else {
            data.ghost_frightened_speed()
        };
        self.roam(mover, ctx.world, speed, rng);
    }

    fn update_returning_home(&mut self, mover: &mut Mover, ctx: &GhostContext) {
        let house = ctx.world.house();
        let entry = house.entry_position();
        if roughly_equals(mover.position, entry, 0.5 * speed::GHOST_RETURNING_HOME, 0.0) {
            mover.set_position(entry);
            mover.set_move_and_wish_dir(Direction::Down);
            self.set_state(GhostState::EnteringHouse);
        } else {
            mover.follow_target(house.left_door_tile(), speed::GHOST_RETURNING_HOME, ctx.world, self);
        }
    }

    fn update_entering_house(&mut self, mover: &mut Mover) {
        let speed = speed::GHOST_RETURNING_HOME;
        let revival = self.revival_position;
        if roughly_equals(mover.position, revival, 0.5 * speed, 0.5 * speed) {
            mover.set_position(revival);
            mover.set_move_and_wish_dir(Direction::Up);
            self.set_state(GhostState::Locked);
            return;
        }
        if mover.position.y < revival.y {
            mover.set_move_and_wish_dir(Direction::Down);
        } else if mover.position.x > revival.x {
            mover.set_move_and_wish_dir(Direction::Left);
        } else if mover.position.x < revival.x {
            mover.set_move_and_wish_dir(Direction::Right);
        }
        mover.set_speed(speed);
        mover.move_by_velocity();
    }

    /// Random walk used while frightened (and by roaming hunters).
    pub fn roam<R: Rng>(&mut self, mover: &mut Mover, world: &WorldMap, speed: f32, rng: &mut R) {
        mover.set_speed(speed);
        let stuck = !mover.move_info.contains(crate::systems::movement::MoveInfo::MOVED);
        if !world.is_portal(mover.tile()) && (mover.new_tile_entered || stuck) {
            let dir = self.roaming_direction(mover, world, rng);
            mover.set_wish_dir(dir);
        }
        mover.set_target_tile(None);
        mover.try_moving(world, self);
    }

    /// Weighted random direction, turned clockwise until it is neither the reverse nor blocked.
    fn roaming_direction<R: Rng>(&self, mover: &Mover, world: &WorldMap, rng: &mut R) -> Direction {
        let mut dir = match rng.random_range(0..1000) {
            0..163 => Direction::Up,
            163..415 => Direction::Right,
            415..700 => Direction::Down,
            _ => Direction::Left,
        };
        let reverse = mover.move_dir.opposite();
        let mut turns = 0;
        while dir == reverse || !self.can_access_tile(mover, world, mover.tile() + dir.as_ivec2()) {
            dir = dir.next_clockwise();
            turns += 1;
            if turns > 4 {
                trace!(ghost = self.id.as_ref(), "No roaming direction, reversing");
                return reverse;
            }
        }
        dir
    }
}

/// Advances every ghost by one tick, in id order.
///
/// The cyan ghost's chase target reads the red ghost's tile after the red ghost has moved.
/// During the pause after a ghost was eaten only the eyes returning home keep moving.
#[allow(clippy::too_many_arguments)]
pub fn ghost_system(
    world: Res<WorldMap>,
    level: Res<Level>,
    rules: Res<VariantRules>,
    hunting: Res<HuntingTimer>,
    power: Res<PowerTimer>,
    log: Res<StepLog>,
    mut rng: ResMut<SimRng>,
    pac: Query<&Mover, (With<Pac>, Without<Ghost>)>,
    mut ghosts: Query<(&mut Ghost, &mut Mover), Without<Pac>>,
    mut errors: EventWriter<GameError>,
) {
    let Ok(pac) = pac.single() else {
        errors.write(GameError::InvalidState("ghost update without Pac-Man".into()));
        return;
    };

    let mut ordered: SmallVec<[_; 4]> = ghosts.iter_mut().collect();
    ordered.sort_by_key(|(ghost, _)| ghost.id);

    let mut red_tile = ordered
        .iter()
        .find(|(ghost, _)| ghost.id == GhostId::Red)
        .map(|(_, mover)| mover.tile())
        .unwrap_or_else(|| pac.tile());

    let paused = matches!(log.stage, GameStage::GhostEatenPause { .. });
    for (ghost, mover) in ordered.iter_mut() {
        if paused && !ghost.in_state(&[GhostState::ReturningHome, GhostState::EnteringHouse]) {
            continue;
        }
        let ctx = GhostContext {
            world: &world,
            level: &level,
            rules: &rules,
            hunting: &hunting,
            power_running: power.0.is_running(),
            pac,
            red_tile,
        };
        ghost.update(mover, &ctx, &mut rng.0);
        if ghost.id == GhostId::Red {
            red_tile = mover.tile();
        }
    }
}
