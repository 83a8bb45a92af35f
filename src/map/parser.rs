//! Maze parsing functionality for converting raw text layouts into a grid plus its landmarks.

use glam::IVec2;

use crate::constants::RAW_MAZE;
use crate::error::MazeError;
use crate::map::grid::{Grid, TileKind};

/// Special positions that are walkable tiles in the grid but matter to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    HouseInterior,
    HouseExit,
    PlayerStart,
}

impl Marker {
    fn name(self) -> &'static str {
        match self {
            Marker::HouseInterior => "house interior 'H'",
            Marker::HouseExit => "house exit 'E'",
            Marker::PlayerStart => "player start 'P'",
        }
    }
}

/// Where ghosts spawn and how they leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseLayout {
    /// The tile ghosts wait on and return to when eaten.
    pub interior: IVec2,
    /// The corridor tile just outside the house.
    pub exit: IVec2,
}

/// A parsed maze: the grid and its landmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    pub grid: Grid,
    pub house: HouseLayout,
    pub player_start: IVec2,
}

/// Parser for converting raw text layouts into mazes.
pub struct MazeParser;

impl MazeParser {
    /// Parses a single character into a tile kind and an optional marker.
    pub fn parse_character(c: char) -> Result<(TileKind, Option<Marker>), MazeError> {
        match c {
            '#' => Ok((TileKind::Wall, None)),
            '.' => Ok((TileKind::Pellet, None)),
            'o' => Ok((TileKind::PowerPellet, None)),
            ' ' => Ok((TileKind::Empty, None)),
            'H' => Ok((TileKind::Empty, Some(Marker::HouseInterior))),
            'E' => Ok((TileKind::Empty, Some(Marker::HouseExit))),
            'P' => Ok((TileKind::Empty, Some(Marker::PlayerStart))),
            _ => Err(MazeError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw layout into a maze.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is empty or ragged, contains unknown characters,
    /// or does not contain exactly one of each marker.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Maze, MazeError> {
        let mut rows = Vec::with_capacity(raw.len());
        let mut markers: Vec<(Marker, IVec2)> = Vec::new();

        for (y, line) in raw.iter().enumerate() {
            let mut row = Vec::with_capacity(line.as_ref().len());
            for (x, character) in line.as_ref().chars().enumerate() {
                let (tile, marker) = Self::parse_character(character)?;
                if let Some(marker) = marker {
                    markers.push((marker, IVec2::new(x as i32, y as i32)));
                }
                row.push(tile);
            }
            rows.push(row);
        }

        let grid = Grid::new(rows)?;
        let find = |wanted: Marker| -> Result<IVec2, MazeError> {
            let mut found = markers.iter().filter(|(marker, _)| *marker == wanted).map(|(_, tile)| *tile);
            match (found.next(), found.count()) {
                (Some(tile), 0) => Ok(tile),
                (first, rest) => Err(MazeError::MarkerCount {
                    marker: wanted.name(),
                    found: first.map_or(0, |_| 1 + rest),
                }),
            }
        };

        Ok(Maze {
            house: HouseLayout {
                interior: find(Marker::HouseInterior)?,
                exit: find(Marker::HouseExit)?,
            },
            player_start: find(Marker::PlayerStart)?,
            grid,
        })
    }
}

impl Maze {
    /// Parses a layout; see [`MazeParser::parse`].
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Maze, MazeError> {
        MazeParser::parse(raw)
    }

    /// The built-in maze.
    pub fn default_maze() -> Result<Maze, MazeError> {
        MazeParser::parse(&RAW_MAZE)
    }
}
