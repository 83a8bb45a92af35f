use glam::{IVec2, Vec2};
use strum_macros::AsRefStr;

/// The four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four cardinal directions.
    /// This is just a convenience constant for iterating over the directions.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Neighbor expansion order used by the pathfinder: +x, +y, -x, -y.
    pub const EXPANSION_ORDER: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the direction as a unit tile offset.
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }

    /// Returns the direction as a unit pixel offset.
    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Whether this direction moves along the x axis.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// The axis-aligned direction of a non-zero tile offset. Diagonal offsets resolve to their larger component.
    pub fn from_offset(offset: IVec2) -> Option<Direction> {
        if offset == IVec2::ZERO {
            return None;
        }
        Some(if offset.x.abs() >= offset.y.abs() {
            if offset.x > 0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if offset.y > 0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}
