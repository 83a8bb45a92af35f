//! Ghost entities and the manager that coordinates them.

pub mod manager;
pub mod mode;
pub mod movement;
pub mod personality;

use glam::{IVec2, Vec2};
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use strum_macros::AsRefStr;
use tracing::{debug, trace, warn};

use crate::constants::{
    ARRIVAL_TOLERANCE, CHASE_DURATION, DEAD_SPEED_MULTIPLIER, ELROY_STAGES, FRIGHTENED_SPEED_MULTIPLIER, FRIGHT_DURATION,
    FRIGHT_LEVEL_REDUCTION, FRIGHT_WARNING_TICKS, GHOST_BASE_SPEED, GHOST_SIZE, LEVEL_SPEED_STEP, MICRO_STEP_FRACTION,
    MIN_FRIGHT_DURATION, PLAYER_SIZE, RETARGET_INTERVAL, SCATTER_DURATION, STUCK_TICKS, TILE_SIZE,
};
use crate::map::direction::Direction;
use crate::map::grid::Grid;
use crate::map::parser::HouseLayout;
use crate::path::find_path;
use crate::state::GameState;

use self::mode::{Countdown, GhostMode};
use self::movement::{is_valid_position, wrap_horizontal};
use self::personality::{select_target, Personality, TargetContext};

/// Positions closer than this are treated as equal while following a path.
const SNAP_DISTANCE: f32 = 1e-3;

/// What happened when the player and a ghost touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CollisionOutcome {
    #[default]
    None,
    GhostEaten,
    PlayerCaught,
}

/// Ghost base speed at a level, in pixels per tick.
pub fn level_speed(level: u32) -> f32 {
    GHOST_BASE_SPEED * (1.0 + LEVEL_SPEED_STEP * level.saturating_sub(1) as f32)
}

/// The longest fright window allowed at a level.
pub fn fright_cap(level: u32) -> u32 {
    FRIGHT_DURATION
        .saturating_sub(FRIGHT_LEVEL_REDUCTION.saturating_mul(level.saturating_sub(1)))
        .max(MIN_FRIGHT_DURATION)
}

/// Cruise Elroy: the direct chaser speeds up as the maze empties.
fn elroy_multiplier(dots_remaining: u32) -> f32 {
    ELROY_STAGES
        .iter()
        .find(|(below, _)| dots_remaining < *below)
        .map_or(1.0, |(_, multiplier)| *multiplier)
}

#[derive(Debug, Clone)]
pub struct Ghost {
    personality: Personality,
    /// Top-left pixel.
    position: Vec2,
    size: f32,
    speed: f32,
    base_speed: f32,
    direction: Direction,
    mode: GhostMode,
    chase: Countdown,
    scatter: Countdown,
    fright: Countdown,
    release: Countdown,
    house: HouseLayout,
    scatter_tile: IVec2,
    target: IVec2,
    path: Vec<IVec2>,
    path_index: usize,
    visible: bool,
    /// Set once this ghost has been frightened by the current fright window.
    fright_served: bool,
    retarget_in: u32,
    last_tile: IVec2,
    stuck_ticks: u32,
}

impl Ghost {
    /// Creates a ghost waiting in the house. The direct chaser waits just outside it.
    pub fn new(personality: Personality, grid: &Grid, house: HouseLayout) -> Self {
        Self::spawn(personality, personality.scatter_tile(grid), house)
    }

    fn spawn(personality: Personality, scatter_tile: IVec2, house: HouseLayout) -> Self {
        let spawn_tile = match personality {
            Personality::DirectChaser => house.exit,
            _ => house.interior,
        };

        Self {
            personality,
            position: Grid::tile_origin(spawn_tile),
            size: GHOST_SIZE,
            speed: GHOST_BASE_SPEED,
            base_speed: GHOST_BASE_SPEED,
            direction: Direction::Up,
            mode: GhostMode::InHouse,
            chase: Countdown::default(),
            scatter: Countdown::default(),
            fright: Countdown::default(),
            release: Countdown::ticks(personality.release_delay()),
            house,
            scatter_tile,
            target: house.interior,
            path: Vec::new(),
            path_index: 0,
            visible: true,
            fright_served: false,
            retarget_in: 0,
            last_tile: spawn_tile,
            stuck_ticks: 0,
        }
    }

    /// Sends the ghost back to the house with its starting timers.
    pub fn reset(&mut self) {
        *self = Self::spawn(self.personality, self.scatter_tile, self.house);
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.last_tile = self.tile();
        self.clear_path();
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size / 2.0)
    }

    /// The tile under the ghost's center.
    pub fn tile(&self) -> IVec2 {
        Grid::tile_at(self.center())
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn target(&self) -> IVec2 {
        self.target
    }

    pub fn scatter_tile(&self) -> IVec2 {
        self.scatter_tile
    }

    /// The current path, including waypoints already passed.
    pub fn path(&self) -> &[IVec2] {
        &self.path
    }

    pub fn chase_countdown(&self) -> Countdown {
        self.chase
    }

    pub fn scatter_countdown(&self) -> Countdown {
        self.scatter
    }

    pub fn fright_countdown(&self) -> Countdown {
        self.fright
    }

    pub fn release_countdown(&self) -> Countdown {
        self.release
    }

    pub fn set_release_ticks(&mut self, ticks: u32) {
        self.release = Countdown::ticks(ticks);
    }

    /// Puts the ghost into `mode` with the given countdown for that mode, discarding its path.
    pub fn force_mode(&mut self, mode: GhostMode, countdown: Countdown) {
        self.enter(mode, countdown);
        self.clear_path();
        self.retarget_in = 0;
    }

    /// Frightens the ghost for `ticks`, reversing it and halving its speed. Dead and in-house ghosts are unaffected.
    pub fn set_frightened(&mut self, ticks: u32) {
        if matches!(self.mode, GhostMode::Dead | GhostMode::InHouse) {
            return;
        }
        self.enter(GhostMode::Frightened, Countdown::ticks(ticks));
        self.fright_served = true;
        self.speed = self.base_speed * FRIGHTENED_SPEED_MULTIPLIER;
        self.reverse_direction();
        self.retarget_in = 0;
    }

    pub fn reverse_direction(&mut self) {
        self.direction = self.direction.opposite();
        self.clear_path();
    }

    /// Frightened ghosts can be eaten until the last stretch of their window.
    pub fn can_be_eaten(&self) -> bool {
        self.mode == GhostMode::Frightened && self.fright.remaining().is_some_and(|ticks| ticks > FRIGHT_WARNING_TICKS)
    }

    /// Resolves contact with a player whose top-left pixel is `player`.
    ///
    /// An edible ghost is killed by the contact; a chasing or scattering ghost catches the player.
    pub fn collide_with_player(&mut self, player: Vec2) -> CollisionOutcome {
        let player_center = player + Vec2::splat(PLAYER_SIZE / 2.0);
        let threshold = self.size / 2.0 + PLAYER_SIZE / 2.0;
        if self.center().distance(player_center) >= threshold {
            return CollisionOutcome::None;
        }

        match self.mode {
            GhostMode::Frightened if self.can_be_eaten() => {
                debug!(ghost = %self.personality, "Ghost eaten");
                self.mode = GhostMode::Dead;
                self.speed = self.base_speed * DEAD_SPEED_MULTIPLIER;
                self.visible = false;
                self.clear_path();
                self.retarget_in = 0;
                CollisionOutcome::GhostEaten
            }
            GhostMode::Chase | GhostMode::Scatter => {
                debug!(ghost = %self.personality, "Player caught");
                CollisionOutcome::PlayerCaught
            }
            _ => CollisionOutcome::None,
        }
    }

    /// Advances the ghost by one tick.
    ///
    /// `partner` is the direct chaser's tile, which the flanker reflects through.
    pub fn update<R: Rng + ?Sized>(&mut self, state: &GameState, partner: Option<IVec2>, rng: &mut R) {
        self.tick_timers();
        if self.mode == GhostMode::Frightened {
            self.fright.cap(fright_cap(state.level));
        }

        let previous = self.mode;
        self.update_mode(state);
        self.apply_speed(state);
        if self.mode != previous {
            debug!(ghost = %self.personality, from = %previous, to = %self.mode, "Ghost changed mode");
            self.clear_path();
            self.retarget_in = 0;
        }

        self.update_target(state, partner, rng);
        let wants_to_move = self.advance(&state.grid);
        self.position = wrap_horizontal(self.position, self.size, state.grid.pixel_width());
        self.detect_stuck(&state.grid, wants_to_move, rng);
    }

    fn tick_timers(&mut self) {
        self.fright.tick();
        self.scatter.tick();
        self.chase.tick();
        self.release.tick();
    }

    fn enter(&mut self, mode: GhostMode, countdown: Countdown) {
        self.mode = mode;
        match mode {
            GhostMode::Scatter => self.scatter = countdown,
            GhostMode::Chase => self.chase = countdown,
            GhostMode::Frightened => self.fright = countdown,
            GhostMode::InHouse => self.release = countdown,
            GhostMode::Dead => {}
        }
    }

    fn update_mode(&mut self, state: &GameState) {
        if !state.fright_active {
            self.fright_served = false;
        } else if !self.fright_served && self.mode.is_roaming() {
            // Joining a running window: only the ticks the manager has left.
            let cap = fright_cap(state.level);
            let remaining = match state.fright_remaining {
                Countdown::Ticks(ticks) if ticks > 0 => ticks.min(cap),
                _ => cap,
            };
            self.set_frightened(remaining);
            return;
        }

        match self.mode {
            GhostMode::InHouse if self.release.expired() => self.enter(GhostMode::Scatter, Countdown::ticks(SCATTER_DURATION)),
            GhostMode::Frightened if self.fright.expired() => self.enter(GhostMode::Scatter, Countdown::ticks(SCATTER_DURATION)),
            GhostMode::Chase if self.chase.expired() => self.enter(GhostMode::Scatter, Countdown::ticks(SCATTER_DURATION)),
            GhostMode::Scatter if self.scatter.expired() => self.enter(GhostMode::Chase, Countdown::ticks(CHASE_DURATION)),
            GhostMode::Dead if self.reached_house() => {
                self.enter(GhostMode::Scatter, Countdown::ticks(SCATTER_DURATION));
                self.visible = true;
            }
            _ => {}
        }
    }

    fn reached_house(&self) -> bool {
        self.position.distance(Grid::tile_origin(self.house.interior)) <= ARRIVAL_TOLERANCE
    }

    fn apply_speed(&mut self, state: &GameState) {
        self.base_speed = level_speed(state.level);
        self.speed = match self.mode {
            GhostMode::Frightened => self.base_speed * FRIGHTENED_SPEED_MULTIPLIER,
            GhostMode::Dead => self.base_speed * DEAD_SPEED_MULTIPLIER,
            mode if mode.is_roaming() && self.personality == Personality::DirectChaser => {
                self.base_speed * elroy_multiplier(state.dots_remaining)
            }
            _ => self.base_speed,
        };
    }

    fn update_target<R: Rng + ?Sized>(&mut self, state: &GameState, partner: Option<IVec2>, rng: &mut R) {
        // Frightened ghosts pick a new neighbor only once they have reached the last one.
        let due = self.retarget_in == 0 && self.mode != GhostMode::Frightened;
        if !due && !self.path_exhausted() {
            self.retarget_in = self.retarget_in.saturating_sub(1);
            return;
        }
        self.retarget_in = RETARGET_INTERVAL;

        let grid = &state.grid;
        let ctx = TargetContext {
            grid,
            house: self.house,
            player_tile: state.player_tile(),
            player_direction: state.player_direction,
            ghost_tile: self.tile(),
            scatter_tile: self.scatter_tile,
            partner,
            current_target: self.target,
            release_pending: !self.release.expired(),
        };
        let mut target = grid.clamp(select_target(self.personality, self.mode, &ctx, rng));
        if !grid.is_walkable(target) {
            target = grid.nearest_walkable(target).unwrap_or(target);
        }

        if target != self.target {
            trace!(ghost = %self.personality, mode = %self.mode, ?target, "Ghost retargeted");
            self.target = target;
            self.clear_path();
        }
    }

    fn path_exhausted(&self) -> bool {
        self.path_index >= self.path.len()
    }

    fn clear_path(&mut self) {
        self.path.clear();
        self.path_index = 0;
    }

    /// Moves one tick towards the target. Returns whether the ghost still had somewhere to go.
    fn advance(&mut self, grid: &Grid) -> bool {
        let goal = Grid::tile_origin(self.target);
        if self.path_exhausted() {
            if self.position.distance(goal) <= ARRIVAL_TOLERANCE {
                return false;
            }
            self.plan_path(grid);
        }

        if self.follow_path(grid) {
            return true;
        }

        self.clear_path();
        self.step_towards(grid, goal);
        true
    }

    fn plan_path(&mut self, grid: &Grid) {
        self.path = find_path(grid, self.tile(), self.target).unwrap_or_default();
        self.path_index = 0;

        // Already partway to the second waypoint; don't walk back to the first.
        if let [first, second, ..] = self.path[..] {
            let (a, b) = (Grid::tile_origin(first), Grid::tile_origin(second));
            if self.position.cmpge(a.min(b)).all() && self.position.cmple(a.max(b)).all() {
                self.path_index = 1;
            }
        }
    }

    /// Follows the path with axis-aligned steps. Returns false if the path is empty or blocked before any progress.
    fn follow_path(&mut self, grid: &Grid) -> bool {
        if self.path_exhausted() {
            return false;
        }

        let mut budget = self.speed;
        let mut moved = false;
        while budget > 0.0 {
            let Some(&waypoint) = self.path.get(self.path_index) else {
                break;
            };
            let origin = Grid::tile_origin(waypoint);
            let delta = origin - self.position;
            if delta.x.abs() <= SNAP_DISTANCE && delta.y.abs() <= SNAP_DISTANCE {
                self.position = origin;
                self.path_index += 1;
                continue;
            }

            let (next, used, direction) = if delta.x.abs() > SNAP_DISTANCE {
                let (x, used) = approach(self.position.x, origin.x, budget);
                let direction = if delta.x > 0.0 { Direction::Right } else { Direction::Left };
                (Vec2::new(x, self.position.y), used, direction)
            } else {
                let (y, used) = approach(self.position.y, origin.y, budget);
                let direction = if delta.y > 0.0 { Direction::Down } else { Direction::Up };
                (Vec2::new(origin.x, y), used, direction)
            };

            if !is_valid_position(grid, next, self.size) {
                return moved;
            }
            self.direction = direction;
            self.position = next;
            budget -= used;
            moved = true;
        }

        true
    }

    /// Direct-distance fallback for when there is no usable path.
    fn step_towards(&mut self, grid: &Grid, goal: Vec2) {
        let delta = goal - self.position;
        if delta.length() <= ARRIVAL_TOLERANCE {
            return;
        }

        let horizontal = (delta.x != 0.0).then_some(if delta.x > 0.0 { Direction::Right } else { Direction::Left });
        let vertical = (delta.y != 0.0).then_some(if delta.y > 0.0 { Direction::Down } else { Direction::Up });
        let (primary, secondary) = if delta.x.abs() > delta.y.abs() {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };

        for direction in primary.into_iter().chain(secondary).chain(Direction::DIRECTIONS) {
            if self.try_step(grid, direction, self.speed) {
                return;
            }
        }
        for direction in Direction::DIRECTIONS {
            if self.try_step(grid, direction, self.speed * MICRO_STEP_FRACTION) {
                return;
            }
        }

        warn!(ghost = %self.personality, position = ?self.position, target = ?self.target, "Ghost is completely stuck");
    }

    fn try_step(&mut self, grid: &Grid, direction: Direction, distance: f32) -> bool {
        let next = self.position + direction.as_vec2() * distance;
        if !is_valid_position(grid, next, self.size) {
            return false;
        }
        self.position = next;
        self.direction = direction;
        true
    }

    /// Ticks a ghost may keep the same tile while moving before it counts as stuck.
    pub fn stuck_threshold(&self) -> u32 {
        STUCK_TICKS + (TILE_SIZE / self.speed.max(f32::EPSILON)).ceil() as u32
    }

    fn detect_stuck<R: Rng + ?Sized>(&mut self, grid: &Grid, wants_to_move: bool, rng: &mut R) {
        let tile = self.tile();
        if !wants_to_move || tile != self.last_tile {
            self.last_tile = tile;
            self.stuck_ticks = 0;
            return;
        }

        self.stuck_ticks += 1;
        if self.stuck_ticks <= self.stuck_threshold() {
            return;
        }
        self.stuck_ticks = 0;

        let exits: SmallVec<[IVec2; 4]> = grid.neighbors(tile).collect();
        match exits.choose(rng) {
            Some(&detour) => {
                debug!(ghost = %self.personality, ?tile, ?detour, "Ghost stuck, taking a detour");
                self.path = vec![tile, detour];
                self.path_index = 0;
                // Hold the detour long enough to cross a couple of tiles.
                self.retarget_in = 2 * (TILE_SIZE / self.speed.max(f32::EPSILON)).ceil() as u32;
            }
            None => {
                let direction = Direction::DIRECTIONS.choose(rng).copied().unwrap_or_default();
                debug!(ghost = %self.personality, ?tile, ?direction, "Ghost stuck with no exits");
                self.clear_path();
                self.direction = direction;
            }
        }
    }
}

/// Moves `from` towards `to` by at most `budget`, returning the new value and the distance covered.
fn approach(from: f32, to: f32, budget: f32) -> (f32, f32) {
    let delta = to - from;
    if delta.abs() <= budget {
        (to, delta.abs())
    } else {
        (from + budget.copysign(delta), budget)
    }
}
