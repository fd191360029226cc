//! Grid coordinates and compass directions.

use std::{fmt, ops::Add, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A cell on the grid, or a relative offset between cells.
///
/// Ordering is lexicographic on `(x, y)`, which gives sets of positions a
/// stable iteration order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell reached by stepping once in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        self + direction.offset()
    }

    /// Chebyshev distance between two cells.
    pub fn chebyshev(self, other: Position) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    /// Parse a position rendered as `(x, y)`.
    ///
    /// Whitespace around either component is ignored, and integral real
    /// values such as `3.0` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] if the text is not a parenthesized
    /// pair of integral numbers.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidPosition {
            input: input.to_string(),
        };

        let inner = input
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let (x, y) = inner.split_once(',').ok_or_else(invalid)?;

        Ok(Self {
            x: parse_coordinate(x).ok_or_else(invalid)?,
            y: parse_coordinate(y).ok_or_else(invalid)?,
        })
    }
}

fn parse_coordinate(text: &str) -> Option<i32> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i32>() {
        return Some(value);
    }
    let value = text.parse::<f64>().ok()?;
    let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
    (value.fract() == 0.0 && in_range).then_some(value as i32)
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight compass moves available to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl Direction {
    /// All directions in the order used for action enumeration and tie-breaks.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::Northeast,
        Direction::East,
        Direction::Southeast,
        Direction::South,
        Direction::Southwest,
        Direction::West,
        Direction::Northwest,
    ];

    /// Relative offset of the move. North is `+y`, east is `+x`.
    pub const fn offset(self) -> Position {
        match self {
            Direction::North => Position::new(0, 1),
            Direction::Northeast => Position::new(1, 1),
            Direction::East => Position::new(1, 0),
            Direction::Southeast => Position::new(1, -1),
            Direction::South => Position::new(0, -1),
            Direction::Southwest => Position::new(-1, -1),
            Direction::West => Position::new(-1, 0),
            Direction::Northwest => Position::new(-1, 1),
        }
    }

    /// Candidate destination cells around `origin`, in compass order.
    pub fn neighbors(origin: Position) -> impl Iterator<Item = Position> {
        Self::ALL.into_iter().map(move |direction| origin.step(direction))
    }
}
