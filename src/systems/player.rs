use bevy_ecs::component::Component;
use bevy_ecs::query::Without;
use bevy_ecs::system::{Query, Res};
use glam::IVec2;
use smallvec::SmallVec;
use tracing::debug;

use crate::map::food::FoodStore;
use crate::map::world::WorldMap;
use crate::systems::ghost::{Ghost, GhostState};
use crate::systems::level::{Level, PowerTimer};
use crate::systems::movement::{Mover, Navigator};
use crate::systems::steering::{Steering, SteeringContext};

/// Pac-Man. Movement state lives in the sibling [`Mover`] component.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct Pac {
    /// Ticks Pac-Man stands still after eating.
    pub resting_ticks: u32,
    /// Ticks since Pac-Man last ate something.
    pub starving_ticks: u32,
    /// Ghosts cannot kill an immune Pac-Man outside demo levels.
    pub immune: bool,
    pub dead: bool,
    /// Chooses the wish direction when set; otherwise it comes from outside.
    pub steering: Option<Steering>,
}

impl Navigator for Pac {
    fn can_access_tile(&self, _mover: &Mover, world: &WorldMap, tile: IVec2) -> bool {
        if world.is_inside_house(tile) {
            return false;
        }
        if world.is_inside(tile) {
            !world.is_blocked(tile)
        } else {
            world.is_portal(tile)
        }
    }

    fn can_reverse(&self, mover: &Mover) -> bool {
        mover.new_tile_entered
    }
}

impl Pac {
    pub fn new(immune: bool) -> Self {
        Self {
            immune,
            ..Default::default()
        }
    }

    /// Clears the per-round state, keeping immunity and steering.
    pub fn reset(&mut self) {
        self.resting_ticks = 0;
        self.starving_ticks = 0;
        self.dead = false;
    }

    pub fn rest(&mut self, ticks: u32) {
        self.resting_ticks = ticks;
    }

    pub fn starve(&mut self) {
        self.starving_ticks += 1;
    }

    pub fn end_starving(&mut self) {
        self.starving_ticks = 0;
    }

    pub fn die(&mut self) {
        debug!(starving = self.starving_ticks, "Pac-Man died");
        self.dead = true;
    }
}

/// Moves Pac-Man one tick: rests after eating, otherwise steers and moves at the
/// normal or powered speed.
pub fn pac_system(
    world: Res<WorldMap>,
    food: Res<FoodStore>,
    level: Res<Level>,
    power: Res<PowerTimer>,
    mut pacs: Query<(&mut Pac, &mut Mover), Without<Ghost>>,
    ghosts: Query<(&Ghost, &Mover), Without<Pac>>,
) {
    for (mut pac, mut mover) in pacs.iter_mut() {
        if pac.dead {
            continue;
        }
        if pac.resting_ticks > 0 {
            pac.resting_ticks -= 1;
            continue;
        }

        let speed = if power.0.is_running() {
            level.data.pac_powered_speed()
        } else {
            level.data.pac_normal_speed()
        };
        mover.set_speed(speed);

        let mut steering = pac.steering.take();
        if let Some(steering) = steering.as_mut() {
            let ghost_tiles: SmallVec<[(GhostState, IVec2); 4]> =
                ghosts.iter().map(|(ghost, ghost_mover)| (ghost.state, ghost_mover.tile())).collect();
            let ctx = SteeringContext {
                world: &world,
                food: &food,
                ghosts: &ghost_tiles,
                power_remaining: if power.0.is_running() { power.0.remaining() } else { 0 },
            };
            steering.steer(&mut mover, &*pac, &ctx);
        }
        pac.steering = steering;

        mover.try_moving(&world, &*pac);
    }
}
