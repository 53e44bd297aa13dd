use std::cmp::Ordering;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Tile coordinate. Ordered row-major: `y` first, then `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Ord for TilePos {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for TilePos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Continuous position in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostVariant {
    Red,
    Blue,
    Yellow,
    Green,
}

impl GhostVariant {
    pub fn initial_direction(self) -> Direction {
        match self {
            Self::Yellow | Self::Blue => Direction::Down,
            Self::Red | Self::Green => Direction::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "variant", rename_all = "snake_case")]
pub enum OccupantKind {
    Empty,
    Wall,
    Dot,
    PowerUp,
    Player,
    Ghost(GhostVariant),
}

impl OccupantKind {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            ' ' => Some(Self::Empty),
            '#' | '$' => Some(Self::Wall),
            '.' => Some(Self::Dot),
            'o' => Some(Self::PowerUp),
            'p' => Some(Self::Player),
            'r' => Some(Self::Ghost(GhostVariant::Red)),
            'b' => Some(Self::Ghost(GhostVariant::Blue)),
            'y' => Some(Self::Ghost(GhostVariant::Yellow)),
            'g' => Some(Self::Ghost(GhostVariant::Green)),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall => '#',
            Self::Dot => '.',
            Self::PowerUp => 'o',
            Self::Player => 'p',
            Self::Ghost(GhostVariant::Red) => 'r',
            Self::Ghost(GhostVariant::Blue) => 'b',
            Self::Ghost(GhostVariant::Yellow) => 'y',
            Self::Ghost(GhostVariant::Green) => 'g',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Strong,
    Weak,
    Eaten,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    Classic,
    Chain,
}

impl ScoringMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "classic" => Some(Self::Classic),
            "chain" => Some(Self::Chain),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Cleared,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    DotEaten {
        x: i32,
        y: i32,
        value: i32,
    },
    PowerUpEaten {
        x: i32,
        y: i32,
    },
    GhostStateChanged {
        ghost: usize,
        from: LifecycleState,
        to: LifecycleState,
    },
    /// The ghost was WEAK and is now EATEN.
    GhostEaten {
        ghost: usize,
        score: i32,
    },
    PlayerCaught {
        ghost: usize,
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    ChainCashed {
        amount: i32,
    },
    LevelCleared,
    GameOver,
    LevelStarted {
        level: usize,
    },
    RoundStarted,
}

#[derive(Clone, Debug, Serialize)]
pub struct EntityView {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "tileX")]
    pub tile_x: i32,
    #[serde(rename = "tileY")]
    pub tile_y: i32,
    pub dir: Direction,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub id: usize,
    pub variant: GhostVariant,
    pub state: LifecycleState,
    #[serde(flatten)]
    pub body: EntityView,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    #[serde(rename = "elapsedSec")]
    pub elapsed_sec: f32,
    pub score: i32,
    pub lives: u32,
    pub chain: i32,
    #[serde(rename = "remainingDots")]
    pub remaining_dots: usize,
    pub outcome: Option<SessionOutcome>,
    pub player: EntityView,
    pub ghosts: Vec<GhostView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TimelineEvent {
    #[serde(rename = "atMs")]
    pub at_ms: u64,
    pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum EnginePhase {
    Countdown {
        #[serde(rename = "remainingSec")]
        remaining_sec: f32,
    },
    Playing,
    Paused,
    Over,
}

#[derive(Clone, Debug, Serialize)]
pub struct EngineSnapshot {
    pub phase: EnginePhase,
    pub level: usize,
    pub tick: u64,
    pub events: Vec<SessionEvent>,
    pub timeline: Vec<TimelineEvent>,
    pub session: SessionSnapshot,
}

#[derive(Clone, Debug, Serialize)]
pub struct CampaignSummary {
    #[serde(rename = "levelsCleared")]
    pub levels_cleared: usize,
    #[serde(rename = "finalLevel")]
    pub final_level: usize,
    pub score: i32,
    pub lives: u32,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    pub timeline: Vec<TimelineEvent>,
}
