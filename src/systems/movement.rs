//! The movement model shared by every mobile actor.
//!
//! Positions are continuous (pixels) while the maze is discrete (tiles). An actor
//! moves along its move direction, turns into its wish direction once it is close
//! enough to a tile center, and teleports when it passes a portal.

use bevy_ecs::component::Component;
use bitflags::bitflags;
use glam::{IVec2, Vec2};
use tracing::trace;

use crate::constants::{HALF_TILE, TILE_SIZE};
use crate::map::direction::Direction;
use crate::map::tile::{tile_at, tile_distance, tile_origin};
use crate::map::world::WorldMap;

bitflags! {
    /// What happened to an actor during its last movement attempt.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveInfo: u8 {
        const MOVED = 1 << 0;
        const TELEPORTED = 1 << 1;
        const NEW_TILE = 1 << 2;
        const TUNNEL_ENTERED = 1 << 3;
        const TUNNEL_LEFT = 1 << 4;
    }
}

/// Decides which tiles an actor may enter and when it may reverse.
///
/// Implemented by the actor kinds (Pac-Man, ghosts, bonus) so that the movement
/// model can be shared while access rules differ.
pub trait Navigator {
    fn can_access_tile(&self, mover: &Mover, world: &WorldMap, tile: IVec2) -> bool;

    fn can_reverse(&self, mover: &Mover) -> bool;
}

/// Position, velocity and steering state of a mobile actor.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Mover {
    /// Top-left corner of the actor's one-tile box, in pixels.
    pub position: Vec2,
    pub velocity: Vec2,
    pub move_dir: Direction,
    pub wish_dir: Direction,
    pub target_tile: Option<IVec2>,
    pub visible: bool,
    pub new_tile_entered: bool,
    pub reverse_requested: bool,
    pub can_teleport: bool,
    /// Speed change applied for exactly one tick when taking a corner.
    pub cornering_speed_up: f32,
    pub move_info: MoveInfo,
}

impl Mover {
    pub fn new(position: Vec2, direction: Direction, cornering_speed_up: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            move_dir: direction,
            wish_dir: direction,
            target_tile: None,
            visible: true,
            new_tile_entered: true,
            reverse_requested: false,
            can_teleport: true,
            cornering_speed_up,
            move_info: MoveInfo::empty(),
        }
    }

    /// Puts the actor back into its initial movement state at a position.
    pub fn reset(&mut self, position: Vec2, direction: Direction) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.move_dir = direction;
        self.wish_dir = direction;
        self.target_tile = None;
        self.new_tile_entered = true;
        self.reverse_requested = false;
        self.move_info = MoveInfo::empty();
    }

    /// The tile containing the center of the actor's box.
    pub fn tile(&self) -> IVec2 {
        tile_at(self.position + Vec2::splat(HALF_TILE as f32))
    }

    /// Offset of the actor's box from its tile's origin, in `[-4, 4)` per axis.
    pub fn offset(&self) -> Vec2 {
        self.position - tile_origin(self.tile())
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Sets the speed along the current move direction.
    pub fn set_speed(&mut self, speed: f32) {
        self.velocity = self.move_dir.as_vec2() * speed;
    }

    pub fn set_move_dir(&mut self, dir: Direction) {
        if self.move_dir != dir {
            self.move_dir = dir;
            self.velocity = dir.as_vec2() * self.speed();
        }
    }

    pub fn set_wish_dir(&mut self, dir: Direction) {
        self.wish_dir = dir;
    }

    pub fn set_move_and_wish_dir(&mut self, dir: Direction) {
        self.set_wish_dir(dir);
        self.set_move_dir(dir);
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Places the actor on a tile with a pixel offset and records whether that changed its tile.
    pub fn place_at_tile(&mut self, tile: IVec2, offset: Vec2) {
        let previous = self.tile();
        self.position = tile_origin(tile) + offset;
        self.new_tile_entered = previous != self.tile();
    }

    pub fn center_over_tile(&mut self, tile: IVec2) {
        self.place_at_tile(tile, Vec2::ZERO);
    }

    /// The tile `n` tiles ahead along the move direction.
    ///
    /// With `overflow_bug`, looking up also shifts the result `n` tiles left, like the arcade does.
    pub fn tiles_ahead(&self, n: i32, overflow_bug: bool) -> IVec2 {
        let ahead = self.tile() + self.move_dir.as_ivec2() * n;
        if overflow_bug && self.move_dir == Direction::Up {
            ahead - IVec2::new(n, 0)
        } else {
            ahead
        }
    }

    /// Requests a reversal, honored by the next `try_moving` that allows it.
    pub fn reverse_asap(&mut self) {
        self.reverse_requested = true;
    }

    /// Moves by the current velocity, ignoring the terrain.
    pub fn move_by_velocity(&mut self) {
        self.position += self.velocity;
    }

    pub fn set_target_tile(&mut self, tile: Option<IVec2>) {
        self.target_tile = tile;
    }

    /// Relocates the actor to the mirrored tunnel mouth if it has passed a portal.
    pub fn try_teleport(&mut self, world: &WorldMap) {
        if !self.can_teleport {
            return;
        }
        let tile = self.tile();
        for portal in world.portals() {
            let left_threshold = ((portal.left_end.x - portal.depth) * TILE_SIZE) as f32;
            if tile.y == portal.left_end.y && self.position.x < left_threshold {
                self.center_over_tile(portal.right_end);
            } else if tile == portal.right_end + IVec2::new(portal.depth, 0) {
                self.center_over_tile(portal.left_end - IVec2::new(portal.depth, 0));
            } else {
                continue;
            }
            self.move_info |= MoveInfo::TELEPORTED;
            trace!(from = ?tile, to = ?self.tile(), "Teleported");
            return;
        }
    }

    /// Advances the actor by one tick.
    ///
    /// Teleports if a portal was passed; otherwise honors a pending reversal, tries
    /// the wish direction and falls back to the move direction.
    pub fn try_moving<N: Navigator + ?Sized>(&mut self, world: &WorldMap, navigator: &N) {
        self.move_info = MoveInfo::empty();
        self.try_teleport(world);
        if self.move_info.contains(MoveInfo::TELEPORTED) {
            return;
        }

        if self.reverse_requested && navigator.can_reverse(self) {
            self.set_wish_dir(self.move_dir.opposite());
            self.reverse_requested = false;
            trace!(dir = ?self.wish_dir, "Reversed");
        }

        self.try_moving_towards(self.wish_dir, world, navigator);
        if self.move_info.contains(MoveInfo::MOVED) {
            self.set_move_dir(self.wish_dir);
        } else {
            self.try_moving_towards(self.move_dir, world, navigator);
        }
    }

    fn try_moving_towards<N: Navigator + ?Sized>(&mut self, dir: Direction, world: &WorldMap, navigator: &N) {
        let is_turn = !dir.same_orientation(self.move_dir);
        let tile_before = self.tile();
        let speed = self.speed();
        let new_velocity = dir.as_vec2() * speed;

        let touch_position = self.position + Vec2::splat(HALF_TILE as f32) + dir.as_vec2() * HALF_TILE as f32 + new_velocity;
        let touched_tile = tile_at(touch_position);

        if !navigator.can_access_tile(self, world, touched_tile) {
            if !is_turn {
                self.center_over_tile(tile_before);
            }
            return;
        }

        if is_turn {
            let offset = self.offset();
            let perpendicular = if dir.is_horizontal() { offset.y } else { offset.x };
            if perpendicular.abs() > 1.0 {
                return;
            }
            self.center_over_tile(tile_before);
        }

        if is_turn && self.cornering_speed_up != 0.0 {
            self.velocity = new_velocity + dir.as_vec2() * self.cornering_speed_up;
            self.move_by_velocity();
            self.velocity = new_velocity;
        } else {
            self.velocity = new_velocity;
            self.move_by_velocity();
        }

        let tile_after = self.tile();
        self.new_tile_entered = tile_before != tile_after;
        self.move_info |= MoveInfo::MOVED;
        if self.new_tile_entered {
            self.move_info |= MoveInfo::NEW_TILE;
        }

        let in_tunnel = |tile: IVec2| world.is_tunnel(tile) || world.is_portal(tile);
        match (in_tunnel(tile_before), in_tunnel(tile_after)) {
            (false, true) => self.move_info |= MoveInfo::TUNNEL_ENTERED,
            (true, false) => self.move_info |= MoveInfo::TUNNEL_LEFT,
            _ => {}
        }
    }

    /// The best direction towards the target tile, or `None` without a target.
    ///
    /// Scans directions in priority order, skipping the reverse of the move
    /// direction; the first accessible neighbor with the smallest distance wins.
    /// Reverses when no other direction is accessible.
    pub fn compute_target_direction<N: Navigator + ?Sized>(&self, world: &WorldMap, navigator: &N) -> Option<Direction> {
        let target = self.target_tile?;
        let current = self.tile();
        let mut best: Option<(Direction, f32)> = None;

        for dir in Direction::PRIORITY {
            if dir == self.move_dir.opposite() {
                continue;
            }
            let neighbor = current + dir.as_ivec2();
            if !navigator.can_access_tile(self, world, neighbor) {
                continue;
            }
            let distance = tile_distance(neighbor, target);
            if best.is_none_or(|(_, min)| distance < min) {
                best = Some((dir, distance));
            }
        }

        Some(best.map_or(self.move_dir.opposite(), |(dir, _)| dir))
    }

    /// Points the wish direction towards the target tile.
    ///
    /// Only decides when a new tile was entered (or the actor is stuck) and never on portal tiles.
    pub fn navigate_towards_target<N: Navigator + ?Sized>(&mut self, world: &WorldMap, navigator: &N) {
        if !self.new_tile_entered && self.move_info.contains(MoveInfo::MOVED) {
            return;
        }
        if world.is_portal(self.tile()) {
            return;
        }
        if let Some(dir) = self.compute_target_direction(world, navigator) {
            self.set_wish_dir(dir);
        }
    }

    /// Sets speed and target, steers towards it and moves one tick.
    pub fn follow_target<N: Navigator + ?Sized>(&mut self, target: IVec2, speed: f32, world: &WorldMap, navigator: &N) {
        self.set_speed(speed);
        self.set_target_tile(Some(target));
        self.navigate_towards_target(world, navigator);
        self.try_moving(world, navigator);
    }
}
