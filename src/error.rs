use thiserror::Error;

/// Malformed level data. Detected before a session exists, so the simulation
/// never starts from an invalid board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("level has zero width or height")]
    EmptyGeometry,
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("level expects {expected} cells but {found} were supplied")]
    CellCountMismatch { expected: usize, found: usize },
    #[error("unknown level symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol { symbol: char, x: usize, y: usize },
    #[error("level must contain exactly one player spawn, found {0}")]
    PlayerSpawnCount(usize),
    #[error("level contains no dots and could never be cleared")]
    NoDots,
    #[error("level pack contains no levels")]
    EmptyLevelPack,
    #[error("level index {index} is out of range for {count} levels")]
    LevelIndexOutOfRange { index: usize, count: usize },
}
