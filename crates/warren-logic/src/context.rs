//! Execution context passed to step logics.

use warren_core::{Position, TickId, WorkerId};
use warren_maze::{LegalMoves, Maze};

use crate::shared::SharedState;

/// Everything a [`StepLogic`](crate::StepLogic) may look at while
/// deciding one worker's move.
///
/// The shared state is reached through [`shared`](Self::shared), which
/// hands out the lock rather than a held guard: a logic takes the lock
/// only for as long as it needs it.
pub struct StepContext<'a, S, L> {
    worker: WorkerId,
    tick: TickId,
    maze: &'a Maze,
    current: Position,
    shared: &'a SharedState<S>,
    local: &'a mut L,
    peers: &'a [Position],
}

impl<'a, S, L> StepContext<'a, S, L> {
    /// Construct a step context.
    ///
    /// Called by the engine. `peers` holds every worker's position at the
    /// start of the tick, indexed by worker id, this worker included.
    pub fn new(
        worker: WorkerId,
        tick: TickId,
        maze: &'a Maze,
        current: Position,
        shared: &'a SharedState<S>,
        local: &'a mut L,
        peers: &'a [Position],
    ) -> Self {
        Self {
            worker,
            tick,
            maze,
            current,
            shared,
            local,
            peers,
        }
    }

    /// The deciding worker.
    pub fn worker(&self) -> WorkerId {
        self.worker
    }

    /// The tick being computed.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// The maze being explored.
    pub fn maze(&self) -> &'a Maze {
        self.maze
    }

    /// The worker's position before this move.
    pub fn current(&self) -> Position {
        self.current
    }

    /// Legal moves from the current position.
    pub fn legal_moves(&self) -> LegalMoves {
        self.maze.legal_moves(self.current)
    }

    /// The session-wide state.
    pub fn shared(&self) -> &'a SharedState<S> {
        self.shared
    }

    /// This worker's own state.
    pub fn local(&mut self) -> &mut L {
        self.local
    }

    /// Positions of every worker at the start of the tick.
    pub fn peers(&self) -> &'a [Position] {
        self.peers
    }
}
