//! Maze model for Warren explorations.
//!
//! A [`Maze`] is an immutable square grid of [`Cell`]s with a start and an
//! end position. It answers the legality queries every step logic relies
//! on. Mazes are produced by [`MazeGenerator`], parsed from text with
//! explicit [`Symbols`], or assembled from a [`Grid`] and two
//! [`Placement`] anchors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod generator;
pub mod grid;
pub mod maze;
pub mod placement;
pub mod text;

pub use generator::MazeGenerator;
pub use grid::{Cell, Grid, MAX_SIZE, MAX_SIZE_MATRIX};
pub use maze::{LegalMoves, Maze};
pub use placement::Placement;
pub use text::Symbols;
