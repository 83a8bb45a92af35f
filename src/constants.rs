//! This module contains all the constants used by the ghost AI core.

use std::time::Duration;

use crate::ghost::mode::GhostMode;

/// Simulation rate; every timer in the crate is expressed in ticks at this rate.
pub const TICKS_PER_SECOND: u32 = 60;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / TICKS_PER_SECOND as f64) as u64);

/// The size of each tile, in pixels.
pub const TILE_SIZE: f32 = 16.0;

/// Ghost sprites are a single tile across.
pub const GHOST_SIZE: f32 = TILE_SIZE;
/// The player occupies a single tile as well.
pub const PLAYER_SIZE: f32 = TILE_SIZE;

/// Ghost speed at level 1, in pixels per tick.
pub const GHOST_BASE_SPEED: f32 = 0.8;
/// Player speed, in pixels per tick.
pub const PLAYER_SPEED: f32 = 1.0;

/// Each level past the first adds this fraction of the base speed.
pub const LEVEL_SPEED_STEP: f32 = 0.1;

pub const FRIGHTENED_SPEED_MULTIPLIER: f32 = 0.5;
pub const DEAD_SPEED_MULTIPLIER: f32 = 2.0;

/// Cruise Elroy thresholds for the direct chaser: (dots remaining below, speed multiplier).
pub const ELROY_STAGES: [(u32, f32); 2] = [(10, 1.1), (20, 1.05)];

/// Duration of a fright window, in ticks.
pub const FRIGHT_DURATION: u32 = 600;
/// Each level past the first shortens the fright window by this many ticks.
pub const FRIGHT_LEVEL_REDUCTION: u32 = 30;
/// The fright window never drops below this many ticks.
pub const MIN_FRIGHT_DURATION: u32 = 120;
/// A frightened ghost stops being edible once this few ticks remain.
pub const FRIGHT_WARNING_TICKS: u32 = 60;

/// Default scatter countdown after release or fright.
pub const SCATTER_DURATION: u32 = 420;
/// Default chase countdown.
pub const CHASE_DURATION: u32 = 1200;

/// The global scatter/chase wave table. `None` means the wave never ends.
pub const WAVE_SCHEDULE: [(Option<u32>, GhostMode); 8] = [
    (Some(420), GhostMode::Scatter),
    (Some(1200), GhostMode::Chase),
    (Some(420), GhostMode::Scatter),
    (Some(1200), GhostMode::Chase),
    (Some(300), GhostMode::Scatter),
    (Some(1200), GhostMode::Chase),
    (Some(300), GhostMode::Scatter),
    (None, GhostMode::Chase),
];

/// Ghosts re-evaluate their target this often, in ticks.
pub const RETARGET_INTERVAL: u32 = 8;
/// A ghost whose tile has not changed for more than this many ticks is considered stuck.
pub const STUCK_TICKS: u32 = 30;
/// A ghost within this many pixels of its target stops moving.
pub const ARRIVAL_TOLERANCE: f32 = 4.0;
/// Inset used for the bounding-box corner checks.
pub const COLLISION_MARGIN: f32 = 1.0;
/// Micro-step fallback size, as a fraction of speed.
pub const MICRO_STEP_FRACTION: f32 = 0.1;

/// Tiles ahead of the player that the ambusher aims for.
pub const AMBUSH_LOOKAHEAD: i32 = 4;
/// Tiles ahead of the player used as the flanker's pivot.
pub const FLANK_PIVOT_LOOKAHEAD: i32 = 2;
/// The distance-based ghost only chases when farther than this many tiles away.
pub const SHY_DISTANCE: f32 = 8.0;

/// Pathfinder pop budget, as a multiple of the grid area.
pub const SEARCH_BUDGET_FACTOR: usize = 2;

pub const PELLET_SCORE: u32 = 10;
pub const POWER_PELLET_SCORE: u32 = 50;
pub const GHOST_SCORE: u32 = 200;
pub const STARTING_LIVES: u32 = 3;

/// The default maze.
///
/// `#` wall, `.` pellet, `o` power pellet, space empty, `H` ghost house interior,
/// `E` ghost house exit, `P` player start.
pub const RAW_MAZE: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##    E     ##.#     ",
    "     #.## ###  ### ##.#     ",
    "######.## #  H   # ##.######",
    "      .   #      #   .      ",
    "######.## ######## ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......P .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
