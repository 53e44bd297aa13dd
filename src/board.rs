use std::collections::{BTreeMap, BTreeSet};

use crate::constants::{CHAIN_DOT_ONE_PROBABILITY, DOT_VALUE};
use crate::grid::in_bounds;
use crate::level::LevelLayout;
use crate::rng::Rng;
use crate::types::{OccupantKind, ScoringMode, TilePos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaticOccupant {
    Wall,
    Dot { value: i32 },
    PowerUp,
}

impl StaticOccupant {
    pub fn kind(self) -> OccupantKind {
        match self {
            Self::Wall => OccupantKind::Wall,
            Self::Dot { .. } => OccupantKind::Dot,
            Self::PowerUp => OccupantKind::PowerUp,
        }
    }
}

/// Static occupancy of a level: at most one wall, dot or power-up per tile.
/// Dynamic entities live on the session, not here.
#[derive(Clone, Debug)]
pub struct Board {
    width: i32,
    height: i32,
    occupants: BTreeMap<TilePos, StaticOccupant>,
    consumed: BTreeSet<TilePos>,
    dots: usize,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            occupants: BTreeMap::new(),
            consumed: BTreeSet::new(),
            dots: 0,
        }
    }

    /// Classic dots are worth a fixed amount; chain dots carry a random bit
    /// drawn from the session generator.
    pub fn from_layout(layout: &LevelLayout, scoring: ScoringMode, rng: &mut Rng) -> Self {
        let mut board = Self::new(layout.width(), layout.height());
        for (tile, kind) in layout.tiles() {
            let occupant = match kind {
                OccupantKind::Wall => StaticOccupant::Wall,
                OccupantKind::PowerUp => StaticOccupant::PowerUp,
                OccupantKind::Dot => StaticOccupant::Dot {
                    value: match scoring {
                        ScoringMode::Classic => DOT_VALUE,
                        ScoringMode::Chain => i32::from(rng.bool(CHAIN_DOT_ONE_PROBABILITY)),
                    },
                },
                _ => continue,
            };
            board.insert(tile, occupant);
        }
        board
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, tile: TilePos) -> bool {
        in_bounds(tile, self.width, self.height)
    }

    /// Places an occupant on an empty, in-bounds tile. Tiles whose dot or
    /// power-up was already consumed stay empty for the rest of the session.
    pub fn insert(&mut self, tile: TilePos, occupant: StaticOccupant) -> bool {
        if !self.in_bounds(tile)
            || self.occupants.contains_key(&tile)
            || self.consumed.contains(&tile)
        {
            return false;
        }
        if matches!(occupant, StaticOccupant::Dot { .. }) {
            self.dots += 1;
        }
        self.occupants.insert(tile, occupant);
        true
    }

    /// Removes a dot or power-up. Walls are fixed and are left in place.
    pub fn remove_occupant(&mut self, tile: TilePos) -> Option<StaticOccupant> {
        match self.occupants.get(&tile) {
            Some(StaticOccupant::Wall) | None => return None,
            Some(_) => {}
        }
        let removed = self.occupants.remove(&tile)?;
        if matches!(removed, StaticOccupant::Dot { .. }) {
            self.dots = self.dots.saturating_sub(1);
        }
        self.consumed.insert(tile);
        Some(removed)
    }

    pub fn occupant_at(&self, tile: TilePos) -> Option<StaticOccupant> {
        self.occupants.get(&tile).copied()
    }

    pub fn static_occupant_at(&self, tile: TilePos) -> Option<OccupantKind> {
        self.occupant_at(tile).map(StaticOccupant::kind)
    }

    pub fn is_wall(&self, tile: TilePos) -> bool {
        matches!(self.occupants.get(&tile), Some(StaticOccupant::Wall))
    }

    pub fn remaining_dot_count(&self) -> usize {
        self.dots
    }

    /// Occupants in row-major tile order.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, StaticOccupant)> + '_ {
        self.occupants.iter().map(|(tile, occupant)| (*tile, *occupant))
    }

    pub fn dot_tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.iter()
            .filter(|(_, occupant)| matches!(occupant, StaticOccupant::Dot { .. }))
            .map(|(tile, _)| tile)
    }
}
