//! A single play session: the player, the ghosts, score, lives and level progression.
//!
//! The session is the only writer of the grid; ghosts read it through the manager's
//! [`GameState`] once per tick.

use glam::{IVec2, Vec2};
use pathfinding::prelude::bfs;
use tracing::{debug, info};

use crate::constants::{GHOST_SCORE, PELLET_SCORE, PLAYER_SIZE, PLAYER_SPEED, POWER_PELLET_SCORE, STARTING_LIVES, TILE_SIZE};
use crate::formatter;
use crate::ghost::manager::GhostManager;
use crate::ghost::mode::GhostMode;
use crate::ghost::movement::wrap_horizontal;
use crate::ghost::CollisionOutcome;
use crate::map::direction::Direction;
use crate::map::grid::{Grid, TileKind};
use crate::map::parser::Maze;
use crate::state::GameState;

/// Positions closer than this to a tile boundary are snapped onto it.
const ALIGN_EPSILON: f32 = 1e-3;

/// The player, moving tile to tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    position: Vec2,
    direction: Direction,
    speed: f32,
    start: Vec2,
}

impl Player {
    pub fn new(start: IVec2) -> Self {
        let start = Grid::tile_origin(start);
        Self {
            position: start,
            direction: Direction::Left,
            speed: PLAYER_SPEED,
            start,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn tile(&self) -> IVec2 {
        Grid::tile_at(self.position + Vec2::splat(PLAYER_SIZE / 2.0))
    }

    pub fn reset(&mut self) {
        self.position = self.start;
        self.direction = Direction::Left;
    }

    fn aligned(&self) -> bool {
        let offset = self.position / TILE_SIZE;
        (offset - offset.round()).abs().max_element() * TILE_SIZE <= ALIGN_EPSILON
    }

    /// Walls block the player; columns wrap so that tunnels lead off the edge.
    fn can_enter(grid: &Grid, tile: IVec2) -> bool {
        let wrapped = IVec2::new(tile.x.rem_euclid(grid.cols() as i32), tile.y);
        grid.is_walkable(wrapped)
    }

    /// Moves one tick. Turns are only taken on tile boundaries, except reversals which are immediate.
    pub fn advance(&mut self, grid: &Grid, requested: Option<Direction>) {
        if requested == Some(self.direction.opposite()) {
            self.direction = self.direction.opposite();
        }

        let mut budget = self.speed;
        while budget > 0.0 {
            if self.aligned() {
                self.position = (self.position / TILE_SIZE).round() * TILE_SIZE;
                let tile = Grid::tile_at(self.position + Vec2::splat(TILE_SIZE / 2.0));
                if let Some(turn) = requested.filter(|dir| Self::can_enter(grid, tile + dir.as_ivec2())) {
                    self.direction = turn;
                }
                if !Self::can_enter(grid, tile + self.direction.as_ivec2()) {
                    break;
                }
            }

            let along = if self.direction.is_horizontal() { self.position.x } else { self.position.y };
            let cell = along / TILE_SIZE;
            let forward = matches!(self.direction, Direction::Right | Direction::Down);
            let boundary = (if forward { cell.floor() + 1.0 } else { cell.ceil() - 1.0 }) * TILE_SIZE;
            let step = (boundary - along).abs().min(budget);

            self.position += self.direction.as_vec2() * step;
            self.position = wrap_horizontal(self.position, PLAYER_SIZE, grid.pixel_width());
            budget -= step;
        }
    }
}

/// What happened during one session tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub eaten: Option<TileKind>,
    pub collision: CollisionOutcome,
    pub level_cleared: bool,
    pub game_over: bool,
}

pub struct Session {
    manager: GhostManager,
    player: Player,
    maze: Maze,
    score: u32,
    lives: u32,
    ticks: u64,
}

impl Session {
    /// Starts a session on `maze` with four ghosts, seeding the ghosts' random source with `seed`.
    pub fn new(maze: Maze, seed: u64) -> Self {
        let player = Player::new(maze.player_start);
        let manager = GhostManager::with_all_personalities(GameState::new(maze.clone()), seed);
        info!(dots = manager.state().dots_remaining, seed, "Session started");
        Self {
            manager,
            player,
            maze,
            score: 0,
            lives: STARTING_LIVES,
            ticks: 0,
        }
    }

    pub fn manager(&self) -> &GhostManager {
        &self.manager
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.manager.state().level
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_over(&self) -> bool {
        self.lives == 0
    }

    /// Runs one frame with the player steering towards `requested`.
    pub fn tick(&mut self, requested: Option<Direction>) -> TickReport {
        if self.is_over() {
            return TickReport {
                game_over: true,
                ..TickReport::default()
            };
        }
        self.ticks += 1;
        formatter::increment_tick();

        let mut report = TickReport::default();
        self.player.advance(&self.manager.state().grid, requested);
        {
            let state = self.manager.state_mut();
            state.player_position = self.player.position();
            state.player_direction = self.player.direction();
        }

        report.eaten = self.eat();
        self.manager.update_all();

        report.collision = self.manager.check_collisions(self.player.position());
        match report.collision {
            CollisionOutcome::GhostEaten => self.score += GHOST_SCORE,
            CollisionOutcome::PlayerCaught => {
                self.lives = self.lives.saturating_sub(1);
                info!(lives = self.lives, score = self.score, "Player caught");
                if self.is_over() {
                    report.game_over = true;
                    return report;
                }
                self.reset_positions();
            }
            CollisionOutcome::None => {}
        }

        if self.manager.state().dots_remaining == 0 {
            report.level_cleared = true;
            self.next_level();
        }

        report
    }

    fn eat(&mut self) -> Option<TileKind> {
        let tile = self.player.tile();
        let eaten = self.manager.state_mut().grid.consume(tile)?;
        let state = self.manager.state_mut();
        state.dots_remaining = state.dots_remaining.saturating_sub(1);

        match eaten {
            TileKind::PowerPellet => {
                self.score += POWER_PELLET_SCORE;
                self.manager.trigger_fright_mode();
            }
            _ => self.score += PELLET_SCORE,
        }
        Some(eaten)
    }

    fn reset_positions(&mut self) {
        self.player.reset();
        self.manager.reset();
        let state = self.manager.state_mut();
        state.player_position = self.player.position();
        state.player_direction = self.player.direction();
    }

    fn next_level(&mut self) {
        let state = self.manager.state_mut();
        state.level += 1;
        state.grid = self.maze.grid.clone();
        state.dots_remaining = state.grid.count_dots();
        info!(level = state.level, score = self.score, "Level cleared");
        self.reset_positions();
    }

    /// The direction a simple autopilot would take: towards the nearest dot, avoiding dangerous ghosts.
    pub fn autopilot(&self) -> Option<Direction> {
        let state = self.manager.state();
        let threats: Vec<IVec2> = self
            .manager
            .ghosts()
            .iter()
            .filter(|ghost| ghost.mode().is_roaming() || ghost.mode() == GhostMode::InHouse)
            .map(|ghost| ghost.tile())
            .collect();

        let direction = nearest_dot_direction(&state.grid, self.player.tile(), &threats);
        debug!(?direction, "Autopilot");
        direction
    }
}

/// First step of a shortest path from `from` to the closest dot that avoids the `avoid` tiles.
pub fn nearest_dot_direction(grid: &Grid, from: IVec2, avoid: &[IVec2]) -> Option<Direction> {
    let path = bfs(
        &from,
        |tile| grid.neighbors(*tile).filter(|next| !avoid.contains(next)).collect::<Vec<_>>(),
        |tile| grid.get(*tile).is_some_and(TileKind::is_dot),
    )?;
    let next = path.get(1)?;
    Direction::from_offset(*next - from)
}
