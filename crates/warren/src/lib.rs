//! Warren: a lock-step engine for exploring mazes with a pool of workers.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Warren sub-crates. For most users, adding `warren` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use warren::prelude::*;
//!
//! // A 4×4 logical maze, start top-left, end bottom-right.
//! let maze = MazeGenerator::new(7)
//!     .generate_maze(4, Placement::TopLeft, Placement::BottomRight)
//!     .unwrap();
//!
//! let config = CoordinatorConfig {
//!     worker_count: Some(2),
//!     mode: ExecutionMode::Inline,
//!     ..Default::default()
//! };
//! let budget = SessionConfig {
//!     budget: StepBudget::Unlimited,
//!     ..Default::default()
//! };
//! let mut session = Session::setup(maze, Strategy::Dfs, config, budget).unwrap();
//! let report = session.run();
//! assert!(report.reached_end);
//! assert_eq!(report.stop, StopReason::ReachedEnd);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `warren-core` | Positions, directions, IDs, error types |
//! | [`maze`] | `warren-maze` | Maze grids, placement anchors, generator, text I/O |
//! | [`logic`] | `warren-logic` | `StepLogic` trait and the built-in explorers |
//! | [`engine`] | `warren-engine` | Coordinator, worker pool, sessions and reports |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`warren-core`).
///
/// Contains [`types::Position`], [`types::WorkerId`], [`types::TickId`] and
/// the error taxonomy ([`types::ConfigError`], [`types::LogicError`]).
pub use warren_core as types;

/// Maze model (`warren-maze`).
///
/// [`maze::Maze`] answers legality queries; [`maze::MazeGenerator`] builds
/// perfect mazes from a seed; [`maze::Symbols`] drives text parse/render.
pub use warren_maze as maze;

/// Move-selection strategies (`warren-logic`).
///
/// The [`logic::StepLogic`] trait is the extension point for custom
/// explorers. Built in: [`logic::Dfs`], [`logic::Bfs`], [`logic::Wanderer`]
/// and [`logic::WallHugger`].
pub use warren_logic as logic;

/// Coordination engine (`warren-engine`).
///
/// [`engine::Coordinator`] runs a worker pool in lock-step,
/// [`engine::Session`] drives one to completion under a step budget.
pub use warren_engine as engine;

/// Common imports for typical Warren usage.
///
/// ```rust
/// use warren::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use warren_core::{Direction, Position, Side, TickId, WorkerId};

    // Errors
    pub use warren_core::{ConfigError, LogicError};

    // Maze
    pub use warren_maze::{Maze, MazeGenerator, Placement, Symbols};

    // Logic
    pub use warren_logic::{
        Bfs, Decision, Dfs, StatusEntry, StepContext, StepLogic, WallHugger, WanderPolicy,
        Wanderer,
    };

    // Engine
    pub use warren_engine::{
        Coordinator, CoordinatorConfig, ExecutionMode, Explorer, RunReport, RunSummary,
        Session, SessionConfig, StepBudget, StopReason, Strategy, TickOutcome,
    };
}
