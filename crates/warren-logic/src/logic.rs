//! The [`StepLogic`] trait, [`Decision`], and [`StatusEntry`].

use std::fmt;

use warren_core::{LogicError, Position, WorkerId};
use warren_maze::Maze;

use crate::context::StepContext;
use crate::shared::SharedState;

/// What a worker does this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Move to the given path cell.
    Move(Position),
    /// Remain in place this tick; the worker stays active.
    Stay,
    /// Nothing left to explore; the worker becomes inactive.
    Exhausted,
}

/// One `(label, value)` line of a status view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusEntry {
    /// Left-hand label.
    pub label: String,
    /// Rendered value.
    pub value: String,
}

impl StatusEntry {
    /// Build an entry from any displayable value.
    pub fn new(label: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// A move-selection strategy executed by every worker of a session.
///
/// # Contract
///
/// - `&self` is shared by all workers. Mutable state is either
///   algorithm-wide (`Shared`, reached through the [`SharedState`] lock)
///   or per-worker (`Local`, owned by exactly one worker).
/// - [`decide`](Self::decide) is only called when
///   [`can_step`](Self::can_step) returned `true` for the worker's
///   position at the start of the tick.
/// - A returned [`Decision::Move`] must name an in-bounds path cell. The
///   engine rejects anything else as a
///   [`LogicError::InvariantViolated`] fault.
/// - `local_status` and `shared_status` are informational and never feed
///   back into control flow.
///
/// The trait is not object-safe because of its associated types; the
/// engine is generic over it and exposes an object-safe driver surface
/// on top.
pub trait StepLogic: Send + Sync + 'static {
    /// Algorithm-wide state, guarded by the shared lock.
    type Shared: Send + 'static;

    /// Per-worker state.
    type Local: Send + 'static;

    /// Human-readable name for status views and logs.
    fn name(&self) -> &str;

    /// Build the algorithm-wide state for a fresh session.
    fn init_shared(&self, maze: &Maze) -> Self::Shared;

    /// Build one worker's state. `seed` is the session seed; logics that
    /// draw random numbers derive their stream from it and `worker`.
    fn init_local(&self, worker: WorkerId, maze: &Maze, seed: u64) -> Self::Local;

    /// Whether a worker standing on `pos` should be signalled this tick.
    ///
    /// Default: the position has at least one legal move. A worker for
    /// which this returns `false` is deactivated.
    fn can_step(&self, maze: &Maze, pos: Position, shared: &SharedState<Self::Shared>) -> bool {
        let _ = shared;
        !maze.legal_moves(pos).is_empty()
    }

    /// Decide this worker's move for the current tick.
    fn decide(
        &self,
        ctx: &mut StepContext<'_, Self::Shared, Self::Local>,
    ) -> Result<Decision, LogicError>;

    /// Per-worker status lines.
    fn local_status(&self, local: &Self::Local) -> Vec<StatusEntry> {
        let _ = local;
        Vec::new()
    }

    /// Algorithm-wide status lines.
    fn shared_status(&self, shared: &Self::Shared) -> Vec<StatusEntry> {
        let _ = shared;
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_entry_display() {
        let e = StatusEntry::new("Queued Spaces", 3);
        assert_eq!(e.to_string(), "Queued Spaces: 3");
        assert_eq!(e.value, "3");
    }
}
