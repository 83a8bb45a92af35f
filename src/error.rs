//! Centralized error types for the ghost AI core.
//!
//! Nothing on the per-tick path returns these; they are raised while loading a maze and
//! by the binary's setup.

/// Main error type for the crate.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Maze error: {0}")]
    Maze(#[from] MazeError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Error type for maze construction and parsing.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    #[error("Maze has no rows")]
    Empty,
    #[error("Maze rows must all be {expected} tiles wide, row {row} has {found}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("Unknown character in maze: {0:?}")]
    UnknownCharacter(char),
    #[error("Unknown tile code in maze: {0}")]
    UnknownCode(u8),
    #[error("Maze must have exactly one {marker} marker, found {found}")]
    MarkerCount { marker: &'static str, found: usize },
}

pub type GameResult<T> = Result<T, GameError>;
