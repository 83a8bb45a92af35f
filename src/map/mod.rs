//! The tile grid that ghosts and the player move over.

pub mod direction;
pub mod grid;
pub mod parser;

pub use grid::{Grid, TileKind};
pub use parser::{HouseLayout, Maze};
