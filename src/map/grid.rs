use glam::{IVec2, Vec2};
use pathfinding::matrix::Matrix;

use crate::constants::TILE_SIZE;
use crate::error::MazeError;
use crate::map::direction::Direction;

/// The kind of a single maze tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileKind {
    #[default]
    Empty,
    Wall,
    Pellet,
    PowerPellet,
}

impl TileKind {
    /// Everything except walls can be walked on.
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    /// Whether the tile carries something for the player to eat.
    pub const fn is_dot(self) -> bool {
        matches!(self, TileKind::Pellet | TileKind::PowerPellet)
    }

    /// Decodes the numeric level encoding: 0 empty, 1 wall, 2 pellet, 3 player marker, 4 power pellet.
    pub fn from_code(code: u8) -> Result<TileKind, MazeError> {
        match code {
            0 | 3 => Ok(TileKind::Empty),
            1 => Ok(TileKind::Wall),
            2 => Ok(TileKind::Pellet),
            4 => Ok(TileKind::PowerPellet),
            _ => Err(MazeError::UnknownCode(code)),
        }
    }
}

/// A rectangular tile grid, origin at the top-left.
///
/// Tiles are addressed as `IVec2 { x: column, y: row }`. Anything outside the grid is
/// reported as non-walkable rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    tiles: Matrix<TileKind>,
}

impl Grid {
    /// Builds a grid from rows of tiles, rejecting empty or ragged input.
    pub fn new(rows: Vec<Vec<TileKind>>) -> Result<Self, MazeError> {
        let expected = rows.first().map(Vec::len).ok_or(MazeError::Empty)?;
        if expected == 0 {
            return Err(MazeError::Empty);
        }
        if let Some((row, found)) = rows.iter().map(Vec::len).enumerate().find(|(_, len)| *len != expected) {
            return Err(MazeError::Ragged { row, expected, found });
        }

        let mut tiles = Matrix::new(rows.len(), expected, TileKind::Empty);
        for (y, row) in rows.into_iter().enumerate() {
            for (x, tile) in row.into_iter().enumerate() {
                tiles[(y, x)] = tile;
            }
        }

        Ok(Self { tiles })
    }

    /// Builds a grid from the numeric level encoding.
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, MazeError> {
        let rows = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|&code| TileKind::from_code(code)).collect())
            .collect::<Result<Vec<Vec<_>>, _>>()?;
        Self::new(rows)
    }

    pub fn rows(&self) -> usize {
        self.tiles.rows
    }

    pub fn cols(&self) -> usize {
        self.tiles.columns
    }

    /// Width of the grid in pixels.
    pub fn pixel_width(&self) -> f32 {
        self.cols() as f32 * TILE_SIZE
    }

    /// Height of the grid in pixels.
    pub fn pixel_height(&self) -> f32 {
        self.rows() as f32 * TILE_SIZE
    }

    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as usize) < self.cols() && (tile.y as usize) < self.rows()
    }

    /// The tile kind at `tile`, or `None` outside the grid.
    pub fn get(&self, tile: IVec2) -> Option<TileKind> {
        if !self.in_bounds(tile) {
            return None;
        }
        self.tiles.get((tile.y as usize, tile.x as usize)).copied()
    }

    /// Out-of-bounds tiles count as walls.
    pub fn is_walkable(&self, tile: IVec2) -> bool {
        self.get(tile).is_some_and(TileKind::is_walkable)
    }

    /// The tile containing a pixel coordinate.
    pub fn tile_at(pixel: Vec2) -> IVec2 {
        (pixel / TILE_SIZE).floor().as_ivec2()
    }

    /// The top-left pixel of a tile.
    pub fn tile_origin(tile: IVec2) -> Vec2 {
        tile.as_vec2() * TILE_SIZE
    }

    /// Clamps a tile coordinate onto the grid.
    pub fn clamp(&self, tile: IVec2) -> IVec2 {
        tile.clamp(IVec2::ZERO, IVec2::new(self.cols() as i32 - 1, self.rows() as i32 - 1))
    }

    /// Walkable neighbors of `tile`, in pathfinder expansion order.
    pub fn neighbors(&self, tile: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        Direction::EXPANSION_ORDER
            .into_iter()
            .map(move |dir| tile + dir.as_ivec2())
            .filter(|next| self.is_walkable(*next))
    }

    /// Number of pellets and power pellets left.
    pub fn count_dots(&self) -> u32 {
        self.iter().filter(|(_, tile)| tile.is_dot()).count() as u32
    }

    /// Clears a pellet or power pellet, returning what was there.
    pub fn consume(&mut self, tile: IVec2) -> Option<TileKind> {
        if !self.in_bounds(tile) {
            return None;
        }
        let cell = self.tiles.get_mut((tile.y as usize, tile.x as usize))?;
        if !cell.is_dot() {
            return None;
        }
        Some(std::mem::take(cell))
    }

    /// The walkable tile closest to `tile` by Manhattan distance, preferring the first in row-major order.
    pub fn nearest_walkable(&self, tile: IVec2) -> Option<IVec2> {
        self.iter()
            .filter(|(_, kind)| kind.is_walkable())
            .map(|(candidate, _)| candidate)
            .min_by_key(|candidate| (*candidate - tile).abs().element_sum())
    }

    /// Iterates every tile with its coordinate, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, TileKind)> + '_ {
        (0..self.rows()).flat_map(move |y| (0..self.cols()).map(move |x| (IVec2::new(x as i32, y as i32), self.tiles[(y, x)])))
    }
}
