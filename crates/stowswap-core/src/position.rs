//! Grid position and the four cardinal directions.
//!
//! Mirrors `sh_core/typing.py`'s `Position` named tuple and `Direction` enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the 4-connected grid, `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance.
    pub fn dist(&self, other: &Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn is_neighbor(&self, other: &Position) -> bool {
        self.dist(other) == 1
    }

    pub fn step(&self, dir: Direction) -> Position {
        let (dr, dc) = dir.offset();
        Position::new(self.row + dr, self.col + dc)
    }

    pub fn neighbors(&self) -> [Position; 4] {
        [
            self.step(Direction::Up),
            self.step(Direction::Down),
            self.step(Direction::Left),
            self.step(Direction::Right),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Facing direction of an agent, derived from its last move. Presentation
/// only — no rendering consumer is carried by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Noop,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Noop => (0, 0),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Direction of travel from `from` to `to`, assuming they are equal or neighbors.
    pub fn between(from: Position, to: Position) -> Direction {
        match (to.row - from.row, to.col - from.col) {
            (0, 0) => Direction::Noop,
            (-1, 0) => Direction::Up,
            (1, 0) => Direction::Down,
            (0, -1) => Direction::Left,
            (0, 1) => Direction::Right,
            _ => Direction::Noop,
        }
    }
}

/// The side of a rack an end point sits on, also used to pick the preferred
/// end-point direction (negative side tried first, per `EndPoints.reset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickDirection {
    Horizontal,
    Vertical,
    On,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert_eq!(a.dist(&b), 7);
    }

    #[test]
    fn direction_between_neighbors() {
        let a = Position::new(2, 2);
        assert_eq!(Direction::between(a, Position::new(1, 2)), Direction::Up);
        assert_eq!(Direction::between(a, Position::new(3, 2)), Direction::Down);
        assert_eq!(Direction::between(a, Position::new(2, 1)), Direction::Left);
        assert_eq!(Direction::between(a, Position::new(2, 3)), Direction::Right);
        assert_eq!(Direction::between(a, a), Direction::Noop);
    }
}
