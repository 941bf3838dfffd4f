//! Grid coordinates, cardinal directions, and wall-following sides.

use std::fmt;

/// A `(row, col)` cell coordinate on the maze grid.
///
/// Coordinates are signed so that neighbour arithmetic can step off the
/// grid and be rejected by a bounds check instead of wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Row index, growing downwards.
    pub row: i32,
    /// Column index, growing rightwards.
    pub col: i32,
}

impl Position {
    /// Create a position from a row and a column.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The orthogonal neighbour one cell away in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.offset();
        Self::new(self.row + dr, self.col + dc)
    }

    /// Manhattan (L1) distance to `other`.
    pub fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Pack into a single `u64` (row in the high half, col in the low half).
    ///
    /// Used to publish positions through an `AtomicU64` without a lock.
    pub fn pack(self) -> u64 {
        ((self.row as u32 as u64) << 32) | (self.col as u32 as u64)
    }

    /// Inverse of [`pack`](Self::pack).
    pub fn unpack(bits: u64) -> Self {
        Self::new((bits >> 32) as u32 as i32, bits as u32 as i32)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// Cardinal direction on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One row up (row - 1).
    Up,
    /// One row down (row + 1).
    Down,
    /// One column left (col - 1).
    Left,
    /// One column right (col + 1).
    Right,
}

impl Direction {
    /// The deterministic neighbour order used by legality queries:
    /// up, down, left, right.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the `(row_offset, col_offset)` for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The direction on the left hand of someone facing `self`.
    pub fn turn_left(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// The direction on the right hand of someone facing `self`.
    pub fn turn_right(self) -> Direction {
        self.turn_left().reverse()
    }

    /// The opposite direction.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Lowercase name, as shown in status views.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which hand a wall follower keeps on the wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Keep the left hand on the wall.
    Left,
    /// Keep the right hand on the wall.
    Right,
}

impl Side {
    /// The facing a follower of this side starts with.
    pub fn initial_facing(self) -> Direction {
        match self {
            Side::Left => Direction::Left,
            Side::Right => Direction::Right,
        }
    }

    /// Lowercase name, as shown in status views.
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
