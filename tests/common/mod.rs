#![allow(dead_code)]

use glam::IVec2;
use jujutsu_pacman::{
    ghost::{mode::GhostMode, mode::Countdown, personality::Personality, Ghost},
    map::{parser::MazeParser, Grid, Maze},
    state::GameState,
};
use rand::{rngs::SmallRng, SeedableRng};

/// An open room with the house in the middle of the bottom row and the player top-left.
pub const OPEN_ROOM: [&str; 9] = [
    "###########",
    "#P........#",
    "#.........#",
    "#.........#",
    "#.........#",
    "#.........#",
    "#....E....#",
    "#....H....#",
    "###########",
];

/// Builds a bare grid from a layout, ignoring markers.
pub fn grid(rows: &[&str]) -> Grid {
    let tiles = rows
        .iter()
        .map(|row| row.chars().map(|c| MazeParser::parse_character(c).unwrap().0).collect())
        .collect();
    Grid::new(tiles).unwrap()
}

/// A `width` x `height` grid of empty tiles surrounded by walls.
pub fn bordered(width: usize, height: usize) -> Grid {
    let rows: Vec<String> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| if x == 0 || y == 0 || x == width - 1 || y == height - 1 { '#' } else { ' ' })
                .collect()
        })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    grid(&rows)
}

pub fn maze(rows: &[&str]) -> Maze {
    Maze::parse(rows).unwrap()
}

pub fn state(rows: &[&str]) -> GameState {
    GameState::new(maze(rows))
}

pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(0x5EED)
}

/// A ghost on `state`'s grid, already in `mode` and standing on `tile`.
pub fn ghost_at(state: &GameState, personality: Personality, tile: IVec2, mode: GhostMode, countdown: Countdown) -> Ghost {
    let mut ghost = Ghost::new(personality, &state.grid, state.house);
    ghost.set_position(Grid::tile_origin(tile));
    ghost.force_mode(mode, countdown);
    ghost
}

/// Moves the player so that it stands on `tile`.
pub fn place_player(state: &mut GameState, tile: IVec2) {
    state.player_position = Grid::tile_origin(tile);
}
