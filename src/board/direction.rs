//! Compass directions on the tile grid.
//!
//! A direction names both a tile edge (the side of a cell a track leaves
//! through) and a direction of travel (the way a streetcar moves). Rotation
//! is clockwise: N -> E -> S -> W -> N.

use serde::{Deserialize, Serialize};

/// Error for malformed direction or orientation input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("invalid direction: '{0}'")]
    Direction(String),

    #[error("invalid orientation: {0} (must be a multiple of 90)")]
    Orientation(i32),

    #[error("unknown tile: '{0}'")]
    UnknownTile(String),

    #[error("invalid die face: '{0}' (expected 1-4 or H)")]
    DieFace(String),
}

/// One of the four compass directions.
///
/// The `#[repr(u8)]` discriminant doubles as an index into per-edge tables
/// and as the number of clockwise quarter turns from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    N = 0,
    E = 1,
    S = 2,
    W = 3,
}

/// All directions in fixed N, E, S, W order.
///
/// Several rules (stop-sign awarding in particular) are order-sensitive and
/// iterate this array.
pub const ALL_DIRECTIONS: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

impl Direction {
    /// Returns the (row, col) delta of one step in this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::N => (-1, 0),
            Direction::E => (0, 1),
            Direction::S => (1, 0),
            Direction::W => (0, -1),
        }
    }

    /// Returns the direction pointing the other way.
    pub const fn opposite(self) -> Direction {
        self.rotated(2)
    }

    /// Rotates clockwise by the given number of quarter turns.
    pub const fn rotated(self, steps: u8) -> Direction {
        ALL_DIRECTIONS[((self as u8 + steps % 4) % 4) as usize]
    }

    /// Returns true for N and S.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::N | Direction::S)
    }

    /// Returns the single-letter abbreviation.
    pub const fn abbr(self) -> char {
        match self {
            Direction::N => 'N',
            Direction::E => 'E',
            Direction::S => 'S',
            Direction::W => 'W',
        }
    }

    /// Parses a direction letter, case-insensitively.
    pub fn from_char(c: char) -> Option<Direction> {
        match c.to_ascii_uppercase() {
            'N' => Some(Direction::N),
            'E' => Some(Direction::E),
            'S' => Some(Direction::S),
            'W' => Some(Direction::W),
            _ => None,
        }
    }

    /// Returns the direction that leads from `from` to an adjacent `to`.
    pub fn between(from: (i32, i32), to: (i32, i32)) -> Option<Direction> {
        let delta = (to.0 - from.0, to.1 - from.1);
        ALL_DIRECTIONS.into_iter().find(|d| d.delta() == delta)
    }
}

impl std::str::FromStr for Direction {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Direction::from_char(c).ok_or_else(|| InvalidInput::Direction(s.to_string()))
            }
            _ => Err(InvalidInput::Direction(s.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbr())
    }
}
