//! Per-variant routing policies. Each policy yields an intended direction;
//! the ghost queues it and the movement controller commits it on alignment.

use crate::board::Board;
use crate::constants::{
    MOSTLY_HEURISTIC_SPLIT, MOSTLY_PURSUIT_SPLIT, RANDOMIZED_DRAW_INTERVAL_SEC,
};
use crate::pathfinding::next_step_toward;
use crate::rng::Rng;
use crate::types::{Direction, GhostVariant, TilePos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behaviour {
    DistanceField,
    /// Close the larger axis delta first.
    DominantAxis,
    /// Close the smaller non-zero axis delta first.
    MinorAxis,
    /// Keep going; pick a random perpendicular direction on wall contact.
    WallBounce,
}

/// Timed switch between distance-field pursuit and one heuristic.
#[derive(Clone, Debug, PartialEq)]
pub struct Alternation {
    pursuit_sec: f32,
    heuristic_sec: f32,
    heuristic: Behaviour,
    pursuing: bool,
    elapsed: f32,
}

impl Alternation {
    pub fn new(split: (f32, f32), heuristic: Behaviour) -> Self {
        Self {
            pursuit_sec: split.0,
            heuristic_sec: split.1,
            heuristic,
            pursuing: true,
            elapsed: 0.0,
        }
    }

    pub fn behaviour(&self) -> Behaviour {
        if self.pursuing {
            Behaviour::DistanceField
        } else {
            self.heuristic
        }
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        let limit = if self.pursuing {
            self.pursuit_sec
        } else {
            self.heuristic_sec
        };
        if self.elapsed > limit {
            self.pursuing = !self.pursuing;
            self.elapsed = 0.0;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Strategy {
    Reactive,
    MostlyPursuit(Alternation),
    MostlyHeuristic(Alternation),
    Randomized { behaviour: Behaviour, elapsed: f32 },
}

impl Strategy {
    pub fn for_variant(variant: GhostVariant) -> Self {
        match variant {
            GhostVariant::Yellow => Self::Reactive,
            GhostVariant::Blue => Self::MostlyPursuit(Alternation::new(
                MOSTLY_PURSUIT_SPLIT,
                Behaviour::DominantAxis,
            )),
            GhostVariant::Red => Self::MostlyHeuristic(Alternation::new(
                MOSTLY_HEURISTIC_SPLIT,
                Behaviour::MinorAxis,
            )),
            GhostVariant::Green => Self::Randomized {
                behaviour: Behaviour::DominantAxis,
                elapsed: 0.0,
            },
        }
    }

    pub fn behaviour(&self) -> Behaviour {
        match self {
            Self::Reactive => Behaviour::WallBounce,
            Self::MostlyPursuit(alternation) | Self::MostlyHeuristic(alternation) => {
                alternation.behaviour()
            }
            Self::Randomized { behaviour, .. } => *behaviour,
        }
    }

    /// Wall-bounce only reacts to walls; every other behaviour re-routes each
    /// tick.
    pub fn steers_every_tick(&self) -> bool {
        self.behaviour() != Behaviour::WallBounce
    }

    pub fn advance(&mut self, dt: f32, rng: &mut Rng) {
        match self {
            Self::Reactive => {}
            Self::MostlyPursuit(alternation) | Self::MostlyHeuristic(alternation) => {
                alternation.advance(dt)
            }
            Self::Randomized { behaviour, elapsed } => {
                *elapsed += dt;
                if *elapsed > RANDOMIZED_DRAW_INTERVAL_SEC {
                    *behaviour = draw_behaviour(rng);
                    *elapsed = 0.0;
                }
            }
        }
    }

    pub fn route(
        &self,
        board: &Board,
        from: TilePos,
        target: TilePos,
        heading: Direction,
        rng: &mut Rng,
    ) -> Option<Direction> {
        match self.behaviour() {
            Behaviour::DistanceField => next_step_toward(board, from, target),
            Behaviour::DominantAxis => dominant_axis(from, target),
            Behaviour::MinorAxis => minor_axis(from, target),
            Behaviour::WallBounce => Some(wall_bounce(heading, rng)),
        }
    }
}

/// Half of all draws fall back to wall-bounce.
fn draw_behaviour(rng: &mut Rng) -> Behaviour {
    match rng.int(0, 5) {
        1 => Behaviour::DistanceField,
        2 => Behaviour::DominantAxis,
        3 => Behaviour::MinorAxis,
        _ => Behaviour::WallBounce,
    }
}

fn horizontal(dx: i32) -> Direction {
    if dx > 0 {
        Direction::Right
    } else {
        Direction::Left
    }
}

fn vertical(dy: i32) -> Direction {
    if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

pub fn dominant_axis(from: TilePos, target: TilePos) -> Option<Direction> {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx.abs() >= dy.abs() {
        Some(horizontal(dx))
    } else {
        Some(vertical(dy))
    }
}

pub fn minor_axis(from: TilePos, target: TilePos) -> Option<Direction> {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    match (dx, dy) {
        (0, 0) => None,
        (0, _) => Some(vertical(dy)),
        (_, 0) => Some(horizontal(dx)),
        _ if dx.abs() < dy.abs() => Some(horizontal(dx)),
        _ => Some(vertical(dy)),
    }
}

pub fn wall_bounce(heading: Direction, rng: &mut Rng) -> Direction {
    let flip = rng.bool(0.5);
    match (heading.is_vertical(), flip) {
        (true, true) => Direction::Left,
        (true, false) => Direction::Right,
        (false, true) => Direction::Up,
        (false, false) => Direction::Down,
    }
}
