//! Object-safe driver surface over [`Coordinator`].
//!
//! [`StepLogic`] has associated types, so `Coordinator<L>` is generic.
//! [`Explorer`] erases `L` for callers that pick the strategy at runtime,
//! such as [`Session`](crate::Session) and the CLI.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use warren_core::{ConfigError, Position, Side};
use warren_logic::{Bfs, Dfs, StatusEntry, StepLogic, WallHugger, WanderPolicy, Wanderer};
use warren_maze::Maze;

use crate::config::CoordinatorConfig;
use crate::coordinator::{CleanupReport, Coordinator, TickOutcome};
use crate::metrics::TickMetrics;

/// A running exploration, whatever its step logic.
pub trait Explorer: Send {
    /// Step logic name.
    fn name(&self) -> &str;
    /// Advance every ready worker by one move.
    fn tick(&mut self) -> TickOutcome;
    /// Run one tick and return `(positions, reached_end)`.
    fn step(&mut self) -> (Option<Vec<Position>>, bool) {
        self.tick().into_step()
    }
    /// Every worker's position, indexed by worker id.
    fn current_positions(&self) -> Vec<Position>;
    /// The worker position closest to the end.
    fn best_position(&self) -> Position;
    /// Snapshot of every visited position.
    fn visited(&self) -> IndexSet<Position>;
    /// Ordered status view.
    fn status(&self) -> Vec<StatusEntry>;
    /// Whether any worker has reached the end.
    fn reached_end(&self) -> bool;
    /// Metrics for the most recent tick.
    fn metrics(&self) -> &TickMetrics;
    /// Number of workers in the pool.
    fn worker_count(&self) -> usize;
    /// The maze being explored.
    fn maze(&self) -> &Maze;
    /// Stop and join every worker. Idempotent.
    fn cleanup(&mut self) -> CleanupReport;
}

impl<L: StepLogic> Explorer for Coordinator<L> {
    fn name(&self) -> &str {
        self.logic().name()
    }

    fn tick(&mut self) -> TickOutcome {
        Coordinator::tick(self)
    }

    fn current_positions(&self) -> Vec<Position> {
        Coordinator::current_positions(self)
    }

    fn best_position(&self) -> Position {
        Coordinator::best_position(self)
    }

    fn visited(&self) -> IndexSet<Position> {
        Coordinator::visited(self)
    }

    fn status(&self) -> Vec<StatusEntry> {
        Coordinator::status(self)
    }

    fn reached_end(&self) -> bool {
        Coordinator::reached_end(self)
    }

    fn metrics(&self) -> &TickMetrics {
        Coordinator::metrics(self)
    }

    fn worker_count(&self) -> usize {
        Coordinator::worker_count(self)
    }

    fn maze(&self) -> &Maze {
        Coordinator::maze(self)
    }

    fn cleanup(&mut self) -> CleanupReport {
        Coordinator::cleanup(self)
    }
}

// ── Strategy ───────────────────────────────────────────────────────

/// The built-in step logics, selectable at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Depth-first search.
    Dfs,
    /// Breadth-first search over a shared frontier.
    Bfs,
    /// Random walk with the given fallback policy.
    Wanderer(WanderPolicy),
    /// Wall following; `None` alternates sides by worker parity.
    WallHugger(Option<Side>),
}

impl Strategy {
    /// Start a coordinator running this strategy on `maze`.
    pub fn launch(
        self,
        maze: impl Into<Arc<Maze>>,
        config: CoordinatorConfig,
    ) -> Result<Box<dyn Explorer>, ConfigError> {
        let explorer: Box<dyn Explorer> = match self {
            Self::Dfs => Box::new(Coordinator::new(Dfs, maze, config)?),
            Self::Bfs => Box::new(Coordinator::new(Bfs, maze, config)?),
            Self::Wanderer(policy) => {
                Box::new(Coordinator::new(Wanderer::new(policy), maze, config)?)
            }
            Self::WallHugger(Some(side)) => {
                Box::new(Coordinator::new(WallHugger::new(side), maze, config)?)
            }
            Self::WallHugger(None) => {
                Box::new(Coordinator::new(WallHugger::alternating(), maze, config)?)
            }
        };
        Ok(explorer)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dfs => f.write_str("DFS"),
            Self::Bfs => f.write_str("BFS"),
            Self::Wanderer(policy) => write!(f, "Wanderer ({policy})"),
            Self::WallHugger(Some(side)) => write!(f, "Wall Hugger ({side})"),
            Self::WallHugger(None) => f.write_str("Wall Hugger (alternating)"),
        }
    }
}
