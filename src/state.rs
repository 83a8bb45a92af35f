use glam::{IVec2, Vec2};

use crate::constants::PLAYER_SIZE;
use crate::ghost::mode::Countdown;
use crate::map::direction::Direction;
use crate::map::grid::Grid;
use crate::map::parser::{HouseLayout, Maze};

/// The world as the ghosts see it during one tick.
///
/// Owned by the [`GhostManager`](crate::ghost::manager::GhostManager); ghosts only ever
/// receive it by shared reference.
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: Grid,
    pub house: HouseLayout,
    /// Top-left pixel of the player.
    pub player_position: Vec2,
    pub player_direction: Direction,
    pub dots_remaining: u32,
    /// Set while a power pellet's fright window is running.
    pub fright_active: bool,
    /// Ticks left in the current fright window.
    pub fright_remaining: Countdown,
    /// 1-based.
    pub level: u32,
}

impl GameState {
    pub fn new(maze: Maze) -> Self {
        let dots_remaining = maze.grid.count_dots();
        Self {
            player_position: Grid::tile_origin(maze.player_start),
            player_direction: Direction::Left,
            dots_remaining,
            fright_active: false,
            fright_remaining: Countdown::default(),
            level: 1,
            house: maze.house,
            grid: maze.grid,
        }
    }

    /// The tile under the player's center.
    pub fn player_tile(&self) -> IVec2 {
        Grid::tile_at(self.player_position + Vec2::splat(PLAYER_SIZE / 2.0))
    }
}
