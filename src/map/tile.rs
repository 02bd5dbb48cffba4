//! Conversions between pixel positions and tile coordinates.

use glam::{IVec2, Vec2};

use crate::constants::{HALF_TILE, TILE_SIZE};

/// Returns the tile containing the given pixel coordinate.
///
/// Truncates toward zero like the arcade's coordinate math, so the half tile left
/// of the board still maps to column 0. Portal teleportation relies on this.
pub fn tile_at(pixel: Vec2) -> IVec2 {
    (pixel / TILE_SIZE as f32).as_ivec2()
}

/// Returns the pixel position of a tile's top-left corner.
pub fn tile_origin(tile: IVec2) -> Vec2 {
    (tile * TILE_SIZE).as_vec2()
}

/// Returns the pixel position of a tile's center.
pub fn tile_center(tile: IVec2) -> Vec2 {
    tile_origin(tile) + Vec2::splat(HALF_TILE as f32)
}

/// Euclidean distance between two tiles, in tiles.
pub fn tile_distance(a: IVec2, b: IVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

/// Whether two positions are equal within the given per-axis tolerances.
pub fn roughly_equals(a: Vec2, b: Vec2, dx: f32, dy: f32) -> bool {
    (a.x - b.x).abs() <= dx && (a.y - b.y).abs() <= dy
}
