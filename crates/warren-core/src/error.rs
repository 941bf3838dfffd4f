//! Error types for the Warren maze exploration engine.
//!
//! Only two conditions are ever surfaced as `Err`: an invalid setup
//! ([`ConfigError`]) and a failing step computation inside a worker
//! ([`LogicError`]). Timeouts, stalls, and workers with no legal move
//! are ordinary outcomes of a tick, reported by the engine's tick
//! outcome and metrics rather than through this module.

use std::error::Error;
use std::fmt;

use crate::position::Position;

/// Which of the two maze goals an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The start position.
    Start,
    /// The end (goal) position.
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Errors detected while validating a maze or an engine configuration.
///
/// Fatal to setup: no partially constructed coordinator is left running
/// when one of these is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Start and end were both requested as the same fixed anchor, or
    /// resolved to the same cell.
    StartEqualsEnd {
        /// The shared coordinate.
        pos: Position,
    },
    /// A goal position lies outside the grid.
    OutOfBounds {
        /// Which goal is out of bounds.
        endpoint: Endpoint,
        /// The offending coordinate.
        pos: Position,
        /// The grid dimension.
        size_matrix: u32,
    },
    /// A goal position is a wall cell.
    NotAPath {
        /// Which goal sits on a wall.
        endpoint: Endpoint,
        /// The offending coordinate.
        pos: Position,
    },
    /// The grid has no cells.
    EmptyMaze,
    /// The grid is not square.
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Length of the first row that differs from the row count.
        cols: usize,
    },
    /// The grid dimension is even; it must be `2 * size + 1`.
    EvenDimension {
        /// The configured dimension.
        size_matrix: usize,
    },
    /// The grid dimension exceeds the supported maximum.
    MazeTooLarge {
        /// The requested dimension, `2 * size + 1`.
        size_matrix: u64,
        /// The largest supported dimension.
        max: u32,
    },
    /// A random placement pool was empty after excluding the other goal.
    NoPlacementCandidates {
        /// Which goal could not be placed.
        endpoint: Endpoint,
    },
    /// Worker count is zero or exceeds the supported maximum.
    InvalidWorkerCount {
        /// The configured count.
        count: usize,
    },
    /// A tick deadline is zero or the deadline cap is below the initial value.
    InvalidDeadline {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// The deadline backoff factor is not a finite value of at least 1.
    InvalidBackoff {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
    /// A textual maze could not be parsed.
    Parse {
        /// 1-based line number of the offending row.
        line: usize,
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartEqualsEnd { pos } => {
                write!(f, "start and end positions cannot be the same ({pos})")
            }
            Self::OutOfBounds {
                endpoint,
                pos,
                size_matrix,
            } => write!(
                f,
                "{endpoint} position {pos} is outside the {size_matrix}x{size_matrix} grid"
            ),
            Self::NotAPath { endpoint, pos } => {
                write!(f, "{endpoint} position {pos} is a wall")
            }
            Self::EmptyMaze => write!(f, "maze has no cells"),
            Self::NotSquare { rows, cols } => {
                write!(f, "maze must be square, got {rows} rows and a row of {cols}")
            }
            Self::EvenDimension { size_matrix } => {
                write!(f, "maze dimension {size_matrix} must be odd (2 * size + 1)")
            }
            Self::MazeTooLarge { size_matrix, max } => {
                write!(f, "maze dimension {size_matrix} exceeds the limit of {max}")
            }
            Self::NoPlacementCandidates { endpoint } => {
                write!(f, "no candidate cells left to place the {endpoint} position")
            }
            Self::InvalidWorkerCount { count } => {
                write!(f, "worker count {count} must be between 1 and 64")
            }
            Self::InvalidDeadline { reason } => write!(f, "invalid tick deadline: {reason}"),
            Self::InvalidBackoff { reason } => write!(f, "invalid deadline backoff: {reason}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
            Self::Parse { line, reason } => write!(f, "maze text line {line}: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Errors raised by a step logic while computing a worker's next move.
///
/// A `LogicError` is a worker fault: the coordinator treats the worker as
/// not having responded this tick and signals it again on the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogicError {
    /// The decision function failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// Algorithm state no longer matches the worker's position.
    InvariantViolated {
        /// Description of the broken invariant.
        invariant: String,
    },
    /// The decision function panicked; the payload message if it had one.
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl fmt::Display for LogicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "step failed: {reason}"),
            Self::InvariantViolated { invariant } => {
                write!(f, "invariant violated: {invariant}")
            }
            Self::Panicked { message } => write!(f, "step logic panicked: {message}"),
        }
    }
}

impl Error for LogicError {}
