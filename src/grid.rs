//! Conversions between continuous pixel positions and tile coordinates.

use crate::constants::{TILE_SIZE, TILE_SIZE_F};
use crate::types::{Direction, Position, TilePos};

/// Tile containing `pos`, by truncating integer division.
pub fn tile_of(pos: Position) -> TilePos {
    TilePos {
        x: (pos.x as i32) / TILE_SIZE,
        y: (pos.y as i32) / TILE_SIZE,
    }
}

pub fn tile_origin(tile: TilePos) -> Position {
    Position {
        x: (tile.x * TILE_SIZE) as f32,
        y: (tile.y * TILE_SIZE) as f32,
    }
}

pub fn is_tile_aligned(pos: Position) -> bool {
    pos.x % TILE_SIZE_F == 0.0 && pos.y % TILE_SIZE_F == 0.0
}

pub fn extent(tiles: i32) -> f32 {
    (tiles * TILE_SIZE) as f32
}

/// Folds `value` back into `[0, extent)`.
pub fn wrap_axis(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

pub fn wrap_position(pos: Position, width: i32, height: i32) -> Position {
    Position {
        x: wrap_axis(pos.x, extent(width)),
        y: wrap_axis(pos.y, extent(height)),
    }
}

pub fn wrap_tile(tile: TilePos, width: i32, height: i32) -> TilePos {
    if width <= 0 || height <= 0 {
        return tile;
    }
    TilePos {
        x: tile.x.rem_euclid(width),
        y: tile.y.rem_euclid(height),
    }
}

pub fn in_bounds(tile: TilePos, width: i32, height: i32) -> bool {
    tile.x >= 0 && tile.y >= 0 && tile.x < width && tile.y < height
}

pub fn offset(tile: TilePos, dir: Direction) -> TilePos {
    match dir {
        Direction::Up => TilePos::new(tile.x, tile.y - 1),
        Direction::Down => TilePos::new(tile.x, tile.y + 1),
        Direction::Left => TilePos::new(tile.x - 1, tile.y),
        Direction::Right => TilePos::new(tile.x + 1, tile.y),
    }
}

pub fn manhattan(a: TilePos, b: TilePos) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// First tile boundary strictly ahead of `value` in the direction of travel.
pub fn next_boundary(value: f32, forward: bool) -> f32 {
    if forward {
        ((value / TILE_SIZE_F).floor() + 1.0) * TILE_SIZE_F
    } else {
        ((value / TILE_SIZE_F).ceil() - 1.0) * TILE_SIZE_F
    }
}
