pub mod board;
pub mod collision;
pub mod constants;
pub mod engine;
pub mod error;
pub mod ghost;
pub mod grid;
pub mod level;
pub mod movement;
pub mod pathfinding;
pub mod rng;
pub mod types;
