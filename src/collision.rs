use crate::board::{Board, StaticOccupant};
use crate::constants::TILE_SIZE_F;
use crate::grid::{tile_of, tile_origin, wrap_tile};
use crate::movement::Entity;
use crate::types::{Direction, Position, TilePos};

/// Tile about to be entered, with the static occupant found there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub tile: TilePos,
    pub occupant: StaticOccupant,
}

/// Chebyshev-style closeness: strictly less than one tile apart on both axes.
pub fn within_one_tile(a: Position, b: Position) -> bool {
    (a.x - b.x).abs() < TILE_SIZE_F && (a.y - b.y).abs() < TILE_SIZE_F
}

pub fn entities_touch(a: &Entity, b: &Entity) -> bool {
    within_one_tile(a.position(), b.position())
}

/// Looks one tile ahead of `entity` and reports what is there, but only once
/// the entity has started moving toward it.
///
/// Truncation already maps an entity heading up or left onto the tile it is
/// about to enter, so only down and right add a one-tile offset.
pub fn probe_next_tile(entity: &Entity, board: &Board) -> Option<Contact> {
    let pos = entity.position();
    let here = tile_of(pos);
    let ahead = match entity.current_direction() {
        Direction::Down => TilePos::new(here.x, here.y + 1),
        Direction::Right => TilePos::new(here.x + 1, here.y),
        Direction::Up | Direction::Left => here,
    };
    if !within_one_tile(pos, tile_origin(ahead)) {
        return None;
    }
    let tile = wrap_tile(ahead, board.width(), board.height());
    board
        .occupant_at(tile)
        .map(|occupant| Contact { tile, occupant })
}

/// Snaps `entity` back onto the tile boundary it was leaving.
pub fn resolve_wall_contact(entity: &mut Entity) {
    let mut tile = entity.tile();
    match entity.current_direction() {
        Direction::Up => tile.y += 1,
        Direction::Left => tile.x += 1,
        Direction::Down | Direction::Right => {}
    }
    entity.place_at(tile_origin(tile));
}
