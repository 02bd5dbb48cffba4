//! Strategies that choose an actor's wish direction without player input.

use glam::IVec2;
use pathfinding::prelude::bfs;
use tracing::trace;

use crate::map::direction::Direction;
use crate::map::food::FoodStore;
use crate::map::tile::tile_distance;
use crate::map::world::WorldMap;
use crate::systems::ghost::GhostState;
use crate::systems::movement::{MoveInfo, Mover, Navigator};

/// Tiles Pac-Man follows in the Pac-Man demo level.
#[rustfmt::skip]
pub const PACMAN_DEMO_ROUTE: &[(i32, i32)] = &[
    (9, 26), (9, 29), (12, 29), (12, 32), (26, 32),
    (26, 29), (24, 29), (24, 26), (26, 26), (26, 23),
    (21, 23), (18, 23), (18, 14), (9, 14), (9, 17),
    (6, 17), (6, 4), (1, 4), (1, 8), (12, 8),
    (12, 4), (6, 4), (6, 11), (1, 11), (1, 8),
    (9, 8), (9, 11), (12, 11), (12, 14), (9, 14),
    (9, 17), (0, 17), (21, 17), (21, 29),
    (26, 29), (26, 32), (1, 32), (1, 29), (3, 29),
    (3, 26), (1, 26), (1, 23), (12, 23), (12, 26),
    (15, 26), (15, 23), (26, 23), (26, 26), (24, 26),
    (24, 29), (26, 29), (26, 32), (1, 32),
    (1, 29), (3, 29), (3, 26), (1, 26), (1, 23),
    (6, 23),
];

/// What a steering strategy may look at besides its own actor.
pub struct SteeringContext<'a> {
    pub world: &'a WorldMap,
    pub food: &'a FoodStore,
    /// State and tile of every ghost.
    pub ghosts: &'a [(GhostState, IVec2)],
    /// Ticks of power mode left, zero when not powered.
    pub power_remaining: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Steering {
    Route(RouteSteering),
    Autopilot(Autopilot),
}

impl Steering {
    /// The demo route of the Pac-Man variant.
    pub fn pacman_demo_route() -> Self {
        let route = PACMAN_DEMO_ROUTE.iter().map(|&(x, y)| IVec2::new(x, y)).collect();
        Steering::Route(RouteSteering::new(route))
    }

    pub fn steer<N: Navigator + ?Sized>(&mut self, mover: &mut Mover, navigator: &N, ctx: &SteeringContext) {
        match self {
            Steering::Route(route) => route.steer(mover, ctx.world, navigator),
            Steering::Autopilot(autopilot) => autopilot.steer(mover, navigator, ctx),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Steering::Route(route) => route.is_complete(),
            Steering::Autopilot(_) => false,
        }
    }
}

/// Visits a list of waypoint tiles in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteSteering {
    route: Vec<IVec2>,
    index: usize,
    complete: bool,
}

impl RouteSteering {
    pub fn new(route: Vec<IVec2>) -> Self {
        Self {
            route,
            index: 0,
            complete: false,
        }
    }

    /// Starts the route over.
    pub fn init(&mut self) {
        self.index = 0;
        self.complete = false;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current_target(&self) -> Option<IVec2> {
        self.route.get(self.index).copied()
    }

    pub fn steer<N: Navigator + ?Sized>(&mut self, mover: &mut Mover, world: &WorldMap, navigator: &N) {
        mover.navigate_towards_target(world, navigator);
        let Some(waypoint) = self.current_target() else {
            self.complete = true;
            return;
        };
        if mover.target_tile.is_none() {
            mover.set_target_tile(Some(waypoint));
            mover.navigate_towards_target(world, navigator);
        } else if mover.tile() == waypoint {
            self.index += 1;
            trace!(waypoint = ?waypoint, index = self.index, "Waypoint reached");
            if let Some(next) = self.current_target() {
                mover.set_target_tile(Some(next));
            }
        }
    }
}

/// Rule-based steering used for the Ms. Pac-Man demo level and the headless runner.
///
/// Flees from a hunting ghost that comes too close, chases a frightened ghost while
/// enough power is left, and otherwise walks the shortest path to the nearest food.
#[derive(Debug, Clone, PartialEq)]
pub struct Autopilot {
    /// Hunting ghosts closer than this (in tiles) are avoided.
    pub danger_distance: f32,
    /// Frightened ghosts closer than this (in tiles) are chased.
    pub chase_distance: f32,
    /// Frightened ghosts are only chased while at least this much power is left.
    pub min_chase_power: u64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            danger_distance: 4.0,
            chase_distance: 8.0,
            min_chase_power: 60,
        }
    }
}

impl Autopilot {
    pub fn steer<N: Navigator + ?Sized>(&mut self, mover: &mut Mover, navigator: &N, ctx: &SteeringContext) {
        if !mover.new_tile_entered && mover.move_info.contains(MoveInfo::MOVED) {
            return;
        }
        let tile = mover.tile();
        if ctx.world.is_portal(tile) {
            return;
        }

        if let Some(hunter) = Self::nearest(tile, ctx.ghosts, GhostState::HuntingPac, self.danger_distance) {
            if let Some(dir) = self.flee_direction(mover, navigator, ctx.world, hunter) {
                trace!(?hunter, ?dir, "Autopilot fleeing");
                mover.set_wish_dir(dir);
                return;
            }
        }

        if ctx.power_remaining >= self.min_chase_power {
            if let Some(prey) = Self::nearest(tile, ctx.ghosts, GhostState::Frightened, self.chase_distance) {
                mover.set_target_tile(Some(prey));
                if let Some(dir) = mover.compute_target_direction(ctx.world, navigator) {
                    mover.set_wish_dir(dir);
                }
                return;
            }
        }

        if let Some(dir) = self.direction_to_food(tile, navigator, mover, ctx) {
            mover.set_wish_dir(dir);
        }
    }

    fn nearest(tile: IVec2, ghosts: &[(GhostState, IVec2)], state: GhostState, max_distance: f32) -> Option<IVec2> {
        ghosts
            .iter()
            .filter(|(ghost_state, _)| *ghost_state == state)
            .map(|&(_, ghost_tile)| (ghost_tile, tile_distance(tile, ghost_tile)))
            .filter(|&(_, distance)| distance < max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(ghost_tile, _)| ghost_tile)
    }

    /// The accessible direction whose neighbor tile lies farthest from the hunter.
    fn flee_direction<N: Navigator + ?Sized>(
        &self,
        mover: &Mover,
        navigator: &N,
        world: &WorldMap,
        hunter: IVec2,
    ) -> Option<Direction> {
        let tile = mover.tile();
        Direction::PRIORITY
            .into_iter()
            .filter(|dir| navigator.can_access_tile(mover, world, tile + dir.as_ivec2()))
            .max_by(|a, b| {
                let da = tile_distance(tile + a.as_ivec2(), hunter);
                let db = tile_distance(tile + b.as_ivec2(), hunter);
                da.total_cmp(&db)
            })
    }

    /// First step of a breadth-first path to the nearest tile with food.
    fn direction_to_food<N: Navigator + ?Sized>(
        &self,
        start: IVec2,
        navigator: &N,
        mover: &Mover,
        ctx: &SteeringContext,
    ) -> Option<Direction> {
        let path = bfs(
            &start,
            |&tile| {
                Direction::PRIORITY
                    .into_iter()
                    .map(move |dir| tile + dir.as_ivec2())
                    .filter(|&next| ctx.world.is_inside(next) && navigator.can_access_tile(mover, ctx.world, next))
                    .collect::<Vec<_>>()
            },
            |&tile| ctx.food.has_food_at(tile),
        )?;
        let next = *path.get(1)?;
        Direction::from_step(next - start)
    }
}
