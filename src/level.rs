use crate::error::ConfigurationError;
use crate::grid::in_bounds;
use crate::types::{GhostVariant, OccupantKind, TilePos};

const BUILTIN_LEVELS: &str = "\
################
#o.....##.....o#
#.###.#..#.###.#
#..............#
#.##.#.##.#.##.#
#....#.rb.#....#
####.#.##.#.####
....  ....  ....
####.#.##.#.####
#....#.yg.#....#
#.##.#.##.#.##.#
#..............#
#.###.#..#.###.#
#o....#.p.#...o#
################

###########
#o...#...o#
#.#.#.#.#.#
#....r....#
#.#.###.#.#
.....p.....
#.#.###.#.#
#....y....#
#.#.#.#.#.#
#o...#...o#
###########
";

/// Validated level geometry: a rectangular grid of occupant kinds with exactly
/// one player spawn and at least one dot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    width: i32,
    height: i32,
    cells: Vec<OccupantKind>,
    player_spawn: TilePos,
    ghost_spawns: Vec<(GhostVariant, TilePos)>,
    dot_count: usize,
}

impl LevelLayout {
    pub fn new(
        width: usize,
        height: usize,
        cells: Vec<OccupantKind>,
    ) -> Result<Self, ConfigurationError> {
        if width == 0 || height == 0 {
            return Err(ConfigurationError::EmptyGeometry);
        }
        if cells.len() != width * height {
            return Err(ConfigurationError::CellCountMismatch {
                expected: width * height,
                found: cells.len(),
            });
        }

        let mut player_spawns = Vec::new();
        let mut ghost_spawns = Vec::new();
        let mut dot_count = 0;
        // Row-major scan keeps ghost order stable across loads.
        for (index, kind) in cells.iter().enumerate() {
            let tile = TilePos::new((index % width) as i32, (index / width) as i32);
            match kind {
                OccupantKind::Player => player_spawns.push(tile),
                OccupantKind::Ghost(variant) => ghost_spawns.push((*variant, tile)),
                OccupantKind::Dot => dot_count += 1,
                _ => {}
            }
        }
        if player_spawns.len() != 1 {
            return Err(ConfigurationError::PlayerSpawnCount(player_spawns.len()));
        }
        if dot_count == 0 {
            return Err(ConfigurationError::NoDots);
        }

        Ok(Self {
            width: width as i32,
            height: height as i32,
            cells,
            player_spawn: player_spawns[0],
            ghost_spawns,
            dot_count,
        })
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ConfigurationError> {
        let height = rows.len();
        let width = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(ConfigurationError::EmptyGeometry);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(ConfigurationError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let kind = OccupantKind::from_symbol(symbol)
                    .ok_or(ConfigurationError::UnknownSymbol { symbol, x, y })?;
                cells.push(kind);
            }
        }
        Self::new(width, height, cells)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn kind_at(&self, tile: TilePos) -> OccupantKind {
        if !in_bounds(tile, self.width, self.height) {
            return OccupantKind::Empty;
        }
        self.cells[(tile.y * self.width + tile.x) as usize]
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TilePos, OccupantKind)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, kind)| {
                let index = index as i32;
                (TilePos::new(index % width, index / width), *kind)
            })
    }

    pub fn player_spawn(&self) -> TilePos {
        self.player_spawn
    }

    pub fn ghost_spawns(&self) -> &[(GhostVariant, TilePos)] {
        &self.ghost_spawns
    }

    pub fn dot_count(&self) -> usize {
        self.dot_count
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|kind| kind.symbol()).collect())
            .collect()
    }
}

/// Splits a text blob into levels separated by blank lines.
pub fn parse_level_pack(text: &str) -> Result<Vec<LevelLayout>, ConfigurationError> {
    let mut levels = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            if !block.is_empty() {
                levels.push(LevelLayout::from_rows(&block)?);
                block.clear();
            }
            continue;
        }
        block.push(line);
    }
    if !block.is_empty() {
        levels.push(LevelLayout::from_rows(&block)?);
    }
    if levels.is_empty() {
        return Err(ConfigurationError::EmptyLevelPack);
    }
    Ok(levels)
}

pub fn builtin_levels() -> Vec<LevelLayout> {
    parse_level_pack(BUILTIN_LEVELS).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pack_loads_every_level() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 2);
        assert_eq!((levels[0].width(), levels[0].height()), (16, 15));
        assert_eq!(levels[0].ghost_spawns().len(), 4);
        assert_eq!((levels[1].width(), levels[1].height()), (11, 11));
        assert_eq!(levels[1].player_spawn(), TilePos::new(5, 5));
    }

    #[test]
    fn ghost_spawns_follow_row_major_order() {
        let layout = LevelLayout::from_rows(&["#####", "#g.r#", "#bpy#", "#####"])
            .expect("valid level");
        let variants: Vec<GhostVariant> = layout.ghost_spawns().iter().map(|(v, _)| *v).collect();
        assert_eq!(
            variants,
            vec![
                GhostVariant::Green,
                GhostVariant::Red,
                GhostVariant::Blue,
                GhostVariant::Yellow
            ]
        );
        assert_eq!(layout.ghost_spawns()[3].1, TilePos::new(3, 2));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = LevelLayout::from_rows(&["####", "#p.", "####"]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::RaggedRow {
                row: 1,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let rows: [&str; 0] = [];
        assert_eq!(
            LevelLayout::from_rows(&rows).unwrap_err(),
            ConfigurationError::EmptyGeometry
        );
        assert_eq!(
            LevelLayout::new(0, 3, Vec::new()).unwrap_err(),
            ConfigurationError::EmptyGeometry
        );
    }

    #[test]
    fn player_spawn_must_be_unique() {
        assert_eq!(
            LevelLayout::from_rows(&["#####", "#p.p#", "#####"]).unwrap_err(),
            ConfigurationError::PlayerSpawnCount(2)
        );
        assert_eq!(
            LevelLayout::from_rows(&["#####", "#...#", "#####"]).unwrap_err(),
            ConfigurationError::PlayerSpawnCount(0)
        );
    }

    #[test]
    fn level_without_dots_is_rejected() {
        assert_eq!(
            LevelLayout::from_rows(&["#####", "#p o#", "#####"]).unwrap_err(),
            ConfigurationError::NoDots
        );
    }

    #[test]
    fn unknown_symbols_report_their_location() {
        assert_eq!(
            LevelLayout::from_rows(&["#####", "#p.x#", "#####"]).unwrap_err(),
            ConfigurationError::UnknownSymbol {
                symbol: 'x',
                x: 3,
                y: 1
            }
        );
    }

    #[test]
    fn cell_count_must_match_geometry() {
        let err = LevelLayout::new(2, 2, vec![OccupantKind::Player, OccupantKind::Dot]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::CellCountMismatch {
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn level_pack_splits_on_blank_lines_and_rejects_empty_input() {
        let pack = "###\n#p#\n#.#\n###\n\n\n#####\n#p..#\n#####\n";
        let levels = parse_level_pack(pack).expect("two levels");
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].dot_count(), 2);
        assert_eq!(levels[1].to_rows()[1], "#p..#");

        assert_eq!(
            parse_level_pack("\n\n").unwrap_err(),
            ConfigurationError::EmptyLevelPack
        );
    }

    #[test]
    fn kind_at_outside_bounds_is_empty() {
        let layout = LevelLayout::from_rows(&["###", "#p#", "#.#", "###"]).expect("valid level");
        assert_eq!(layout.kind_at(TilePos::new(1, 2)), OccupantKind::Dot);
        assert_eq!(layout.kind_at(TilePos::new(-1, 0)), OccupantKind::Empty);
        assert_eq!(layout.kind_at(TilePos::new(3, 0)), OccupantKind::Empty);
    }
}
