//! Flood-fill distance field used by ghosts to step toward a target tile.
//!
//! The field is rebuilt from scratch for every decision and dropped
//! afterwards; targets move at most one tile per tick so an approximate,
//! non-incremental search is enough.

use std::collections::VecDeque;

use crate::board::Board;
use crate::grid::{in_bounds, offset};
use crate::types::{Direction, TilePos};

const WALL: i32 = -1;
const SELF: i32 = -2;
const UNVISITED: i32 = 0;

/// Neighbour order used for expansion and for tie-breaking.
pub const NEIGHBOR_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Per-tile marks: `-1` wall, `0` unvisited, otherwise `distance + 1` so the
/// target itself is the smallest positive value.
#[derive(Clone, Debug)]
pub struct DistanceField {
    width: i32,
    height: i32,
    cells: Vec<i32>,
}

impl DistanceField {
    /// Breadth-first fill from `target` over non-wall tiles. The `origin` tile
    /// (the ghost) is excluded from expansion and reset to unvisited
    /// afterwards so its neighbours can be compared.
    pub fn build(board: &Board, origin: TilePos, target: TilePos) -> Self {
        let width = board.width();
        let height = board.height();
        let mut cells = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(if board.is_wall(TilePos::new(x, y)) {
                    WALL
                } else {
                    UNVISITED
                });
            }
        }
        let mut field = Self {
            width,
            height,
            cells,
        };
        if !field.contains(origin) || !field.contains(target) {
            return field;
        }

        field.set(origin, SELF);
        if origin != target {
            field.set(target, 1);
            let mut queue = VecDeque::from([target]);
            while let Some(tile) = queue.pop_front() {
                let next = field.get(tile).unwrap_or(WALL) + 1;
                for dir in NEIGHBOR_ORDER {
                    let neighbor = offset(tile, dir);
                    if field.get(neighbor) == Some(UNVISITED) {
                        field.set(neighbor, next);
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        field.set(origin, UNVISITED);
        field
    }

    pub fn contains(&self, tile: TilePos) -> bool {
        in_bounds(tile, self.width, self.height)
    }

    fn index(&self, tile: TilePos) -> Option<usize> {
        self.contains(tile)
            .then(|| (tile.y * self.width + tile.x) as usize)
    }

    fn get(&self, tile: TilePos) -> Option<i32> {
        self.index(tile).map(|index| self.cells[index])
    }

    fn set(&mut self, tile: TilePos, value: i32) {
        if let Some(index) = self.index(tile) {
            self.cells[index] = value;
        }
    }

    /// Steps from `tile` to the target, or `None` for walls, unreachable and
    /// out-of-range tiles.
    pub fn distance_at(&self, tile: TilePos) -> Option<u32> {
        match self.get(tile) {
            Some(value) if value > 0 => Some((value - 1) as u32),
            _ => None,
        }
    }

    pub fn is_wall(&self, tile: TilePos) -> bool {
        self.get(tile) == Some(WALL)
    }

    /// Neighbour of `from` with the smallest recorded distance. Ties go to the
    /// first neighbour in `NEIGHBOR_ORDER`.
    pub fn choose_direction(&self, from: TilePos) -> Option<Direction> {
        let mut best: Option<(i32, Direction)> = None;
        for dir in NEIGHBOR_ORDER {
            let Some(value) = self.get(offset(from, dir)) else {
                continue;
            };
            if value <= 0 {
                continue;
            }
            if best.map_or(true, |(min, _)| value < min) {
                best = Some((value, dir));
            }
        }
        best.map(|(_, dir)| dir)
    }
}

/// Builds a fresh field toward `target` and picks the next step from `origin`.
pub fn next_step_toward(board: &Board, origin: TilePos, target: TilePos) -> Option<Direction> {
    DistanceField::build(board, origin, target).choose_direction(origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::StaticOccupant;
    use crate::grid::manhattan;

    fn walled_board(width: i32, height: i32, walls: &[(i32, i32)]) -> Board {
        let mut board = Board::new(width, height);
        for &(x, y) in walls {
            board.insert(TilePos::new(x, y), StaticOccupant::Wall);
        }
        board
    }

    #[test]
    fn open_board_distances_are_manhattan() {
        let board = walled_board(9, 7, &[]);
        let target = TilePos::new(6, 2);
        let origin = TilePos::new(0, 0);
        let field = DistanceField::build(&board, origin, target);
        for y in 0..7 {
            for x in 0..9 {
                let tile = TilePos::new(x, y);
                if tile == origin {
                    assert_eq!(field.distance_at(tile), None);
                    continue;
                }
                assert_eq!(
                    field.distance_at(tile),
                    Some(manhattan(tile, target) as u32),
                    "tile {tile:?}"
                );
            }
        }
    }

    #[test]
    fn origin_outside_the_board_leaves_field_empty_of_moves() {
        let board = walled_board(4, 4, &[]);
        let field = DistanceField::build(&board, TilePos::new(-1, 0), TilePos::new(2, 2));
        assert_eq!(field.distance_at(TilePos::new(2, 2)), None);
        assert_eq!(field.choose_direction(TilePos::new(-1, 0)), None);
    }

    #[test]
    fn chooses_the_neighbour_closest_to_target() {
        let board = walled_board(7, 3, &[]);
        assert_eq!(
            next_step_toward(&board, TilePos::new(1, 1), TilePos::new(5, 1)),
            Some(Direction::Right)
        );
        assert_eq!(
            next_step_toward(&board, TilePos::new(5, 1), TilePos::new(1, 1)),
            Some(Direction::Left)
        );
        assert_eq!(
            next_step_toward(&board, TilePos::new(3, 2), TilePos::new(3, 0)),
            Some(Direction::Up)
        );
    }

    #[test]
    fn ties_prefer_left_then_right_then_up_then_down() {
        let board = walled_board(5, 5, &[]);
        // Target diagonal up-left: Left and Up are equally close.
        assert_eq!(
            next_step_toward(&board, TilePos::new(2, 2), TilePos::new(0, 0)),
            Some(Direction::Left)
        );
        // Target diagonal down-right: Right and Down are equally close.
        assert_eq!(
            next_step_toward(&board, TilePos::new(2, 2), TilePos::new(4, 4)),
            Some(Direction::Right)
        );
    }

    #[test]
    fn ghost_on_target_gets_no_move() {
        let board = walled_board(5, 5, &[]);
        assert_eq!(
            next_step_toward(&board, TilePos::new(2, 2), TilePos::new(2, 2)),
            None
        );
    }

    #[test]
    fn routes_around_walls_and_never_into_them() {
        // Ring of walls with the ghost inside and a single gap on the right.
        let mut walls = Vec::new();
        for i in 0..7 {
            walls.push((i, 0));
            walls.push((i, 6));
            walls.push((0, i));
            if i != 3 {
                walls.push((6, i));
            }
        }
        walls.push((3, 2));
        let board = walled_board(9, 7, &walls);
        let target = TilePos::new(8, 3);

        for y in 1..6 {
            for x in 1..6 {
                let origin = TilePos::new(x, y);
                if board.is_wall(origin) {
                    continue;
                }
                let field = DistanceField::build(&board, origin, target);
                let dir = field
                    .choose_direction(origin)
                    .unwrap_or_else(|| panic!("no move from {origin:?}"));
                assert!(!field.is_wall(offset(origin, dir)), "wall chosen from {origin:?}");
            }
        }
    }

    #[test]
    fn sealed_ghost_keeps_no_direction() {
        let board = walled_board(3, 3, &[(0, 1), (2, 1), (1, 0), (1, 2)]);
        assert_eq!(
            next_step_toward(&board, TilePos::new(1, 1), TilePos::new(0, 0)),
            None
        );
    }

    #[test]
    fn unreachable_target_yields_no_distances() {
        let board = walled_board(5, 3, &[(2, 0), (2, 1), (2, 2)]);
        let field = DistanceField::build(&board, TilePos::new(0, 1), TilePos::new(4, 1));
        assert_eq!(field.choose_direction(TilePos::new(0, 1)), None);
        assert_eq!(field.distance_at(TilePos::new(3, 1)), Some(1));
    }
}
