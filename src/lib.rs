//! Ghost AI and pathfinding core for a cursed-spirit themed Pac-Man.

pub mod constants;
pub mod error;
pub mod formatter;
pub mod ghost;
pub mod map;
pub mod path;
pub mod session;
pub mod state;
