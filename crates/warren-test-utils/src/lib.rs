//! Test utilities for Warren development.
//!
//! Provides hand-drawn fixture mazes with known shapes, a seeded maze
//! generator shortcut, and (in [`fixtures`]) step logics that misbehave
//! in controlled ways: failing, panicking, sleeping, or trapping a worker.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{FailingLogic, FirstUnvisited, PanickingLogic, PocketLogic, SlowLogic};

use warren_core::Position;
use warren_maze::{Maze, MazeGenerator, Placement, Symbols};

/// 3×3 logical maze without cycles. Start `(1,1)`, end `(5,5)`.
///
/// A single DFS worker reaches the end in 12 ticks.
pub const TREE: &str = "\
#######
#S#...#
#.#.#.#
#...#.#
###.#.#
#...#E#
#######";

/// A ring around a central wall block. Start `(1,1)`, end `(5,5)`.
pub const LOOP: &str = "\
#######
#S....#
#.###.#
#.#.#.#
#.###.#
#....E#
#######";

/// A corridor from start to end plus a walled-in pocket at
/// [`POCKET_CELL`] that no legal move leads into or out of.
pub const POCKET: &str = "\
#######
#S....#
#####.#
#.#...#
#####.#
#....E#
#######";

/// The isolated cell of [`POCKET`].
pub const POCKET_CELL: Position = Position { row: 3, col: 1 };

/// Parse a fixture with the default glyphs.
///
/// # Panics
///
/// If `text` is not a valid maze.
pub fn parse(text: &str) -> Maze {
    match Maze::parse(text, &Symbols::default()) {
        Ok(maze) => maze,
        Err(e) => panic!("invalid fixture maze: {e}"),
    }
}

pub fn tree_maze() -> Maze {
    parse(TREE)
}

pub fn loop_maze() -> Maze {
    parse(LOOP)
}

pub fn pocket_maze() -> Maze {
    parse(POCKET)
}

/// A generated perfect maze of logical `size`, start top-left, end
/// bottom-right.
///
/// # Panics
///
/// If `size` is zero.
pub fn generated(size: u32, seed: u64) -> Maze {
    match MazeGenerator::new(seed).generate_maze(size, Placement::TopLeft, Placement::BottomRight)
    {
        Ok(maze) => maze,
        Err(e) => panic!("generator failed: {e}"),
    }
}
