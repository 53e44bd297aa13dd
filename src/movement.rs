use crate::grid::{
    is_tile_aligned, next_boundary, tile_of, tile_origin, wrap_position, wrap_tile,
};
use crate::types::{Direction, EntityView, Position, TilePos};

/// A player or ghost body moving continuously over the tile grid.
///
/// Direction changes are committed only while the position is exactly
/// tile-aligned. `advance` walks the step boundary by boundary, so a turn
/// queued mid-tile is taken on the next boundary and the rest of the step is
/// spent in the new direction.
#[derive(Clone, Debug)]
pub struct Entity {
    position: Position,
    current_dir: Direction,
    queued_dir: Direction,
    speed: f32,
    spawn: TilePos,
    initial_dir: Direction,
    level_width: i32,
    level_height: i32,
}

impl Entity {
    pub fn new(
        spawn: TilePos,
        initial_dir: Direction,
        speed: f32,
        level_width: i32,
        level_height: i32,
    ) -> Self {
        Self {
            position: tile_origin(spawn),
            current_dir: initial_dir,
            queued_dir: initial_dir,
            speed,
            spawn,
            initial_dir,
            level_width,
            level_height,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn tile(&self) -> TilePos {
        tile_of(self.position)
    }

    pub fn current_direction(&self) -> Direction {
        self.current_dir
    }

    pub fn queued_direction(&self) -> Direction {
        self.queued_dir
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn spawn(&self) -> TilePos {
        self.spawn
    }

    pub fn level_size(&self) -> (i32, i32) {
        (self.level_width, self.level_height)
    }

    pub fn is_aligned(&self) -> bool {
        is_tile_aligned(self.position)
    }

    /// Reachability is not checked here; a turn into a wall is undone by
    /// the collision resolver.
    pub fn set_queued_direction(&mut self, dir: Direction) {
        self.queued_dir = dir;
    }

    /// Tile whose origin is the next alignment point along the current
    /// direction. Equal to `tile()` while aligned. Route planning happens
    /// from here since that is where a queued turn will be committed.
    pub fn upcoming_tile(&self) -> TilePos {
        let here = self.tile();
        if self.is_aligned() {
            return here;
        }
        let ahead = match self.current_dir {
            Direction::Right => TilePos::new(here.x + 1, here.y),
            Direction::Down => TilePos::new(here.x, here.y + 1),
            Direction::Up | Direction::Left => here,
        };
        wrap_tile(ahead, self.level_width, self.level_height)
    }

    /// Moves `speed * dt` along the current direction.
    pub fn advance(&mut self, dt: f32) {
        self.travel(self.speed * dt, None);
    }

    /// Like `advance`, but comes to rest once aligned on `stop`.
    pub fn advance_to(&mut self, dt: f32, stop: TilePos) {
        self.travel(self.speed * dt, Some(stop));
    }

    fn travel(&mut self, distance: f32, stop: Option<TilePos>) {
        if !distance.is_finite() {
            return;
        }
        let mut remaining = distance;
        while remaining > 0.0 {
            if self.is_aligned() {
                if stop == Some(self.tile()) {
                    return;
                }
                self.current_dir = self.queued_dir;
            }

            let forward = matches!(self.current_dir, Direction::Down | Direction::Right);
            let mut next = self.position;
            let axis = if self.current_dir.is_vertical() {
                &mut next.y
            } else {
                &mut next.x
            };
            let boundary = next_boundary(*axis, forward);
            let gap = (boundary - *axis).abs();
            if remaining >= gap {
                *axis = boundary;
                remaining -= gap;
            } else {
                *axis += if forward { remaining } else { -remaining };
                remaining = 0.0;
            }
            self.position = wrap_position(next, self.level_width, self.level_height);
        }
    }

    pub fn reset(&mut self) {
        self.position = tile_origin(self.spawn);
        self.current_dir = self.initial_dir;
        self.queued_dir = self.initial_dir;
    }

    pub(crate) fn place_at(&mut self, position: Position) {
        self.position = wrap_position(position, self.level_width, self.level_height);
    }

    pub fn view(&self) -> EntityView {
        let tile = self.tile();
        EntityView {
            x: self.position.x,
            y: self.position.y,
            tile_x: tile.x,
            tile_y: tile.y,
            dir: self.current_dir,
        }
    }
}
