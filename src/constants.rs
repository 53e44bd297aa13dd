pub const TILE_SIZE: i32 = 8;
pub const TILE_SIZE_F: f32 = TILE_SIZE as f32;

pub const TICK_RATE: u32 = 60;
pub const TICK_SEC: f32 = 1.0 / TICK_RATE as f32;

pub const PLAYER_SPEED: f32 = 28.0;
pub const GHOST_SPEED: f32 = 20.0;

pub const DOT_VALUE: i32 = 10;
pub const POWER_UP_SCORE: i32 = 50;
pub const GHOST_EATEN_SCORE: i32 = 200;

pub const DEFAULT_LIVES: u32 = 3;
pub const COUNTDOWN_SEC: f32 = 3.0;
/// Shared by the WEAK and EATEN phases.
pub const WEAK_DURATION_SEC: f32 = 6.0;

pub const CHAIN_LENGTH: u32 = 8;
pub const CHAIN_WINDOW_SEC: f32 = 1.0;
pub const CHAIN_DOT_ONE_PROBABILITY: f32 = 0.6;

/// (pursuit seconds, heuristic seconds)
pub const MOSTLY_PURSUIT_SPLIT: (f32, f32) = (6.0, 3.0);
pub const MOSTLY_HEURISTIC_SPLIT: (f32, f32) = (3.0, 5.0);
pub const RANDOMIZED_DRAW_INTERVAL_SEC: f32 = 5.0;

pub fn chain_mask() -> i32 {
    (1i32 << CHAIN_LENGTH) - 1
}

pub fn chain_ghost_score() -> i32 {
    1i32 << (CHAIN_LENGTH - 1)
}
