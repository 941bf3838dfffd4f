//! Breadth-first exploration over one shared frontier.

use std::collections::{HashSet, VecDeque};

use warren_core::{LogicError, Position, WorkerId};
use warren_maze::Maze;

use crate::context::StepContext;
use crate::logic::{Decision, StatusEntry, StepLogic};
use crate::shared::SharedState;

/// Breadth-first search.
///
/// All workers share one FIFO queue seeded with the start. A call pops
/// the head, enqueues each of its legal neighbours that has been neither
/// visited nor queued before, and moves the worker onto the popped cell.
/// Pop and enqueue happen under one lock, so a cell is dequeued at most
/// once no matter how many workers draw from the queue.
///
/// Workers jump between frontier cells; successive positions of one
/// worker are generally not adjacent.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bfs;

/// The shared BFS frontier.
#[derive(Clone, Debug, Default)]
pub struct BfsFrontier {
    queue: VecDeque<Position>,
    seen: HashSet<Position>,
}

impl BfsFrontier {
    /// Cells waiting to be dequeued.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Whether the frontier is drained.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl StepLogic for Bfs {
    type Shared = BfsFrontier;
    type Local = ();

    fn name(&self) -> &str {
        "BFS"
    }

    fn init_shared(&self, maze: &Maze) -> BfsFrontier {
        BfsFrontier {
            queue: VecDeque::from([maze.start_pos()]),
            seen: HashSet::from([maze.start_pos()]),
        }
    }

    fn init_local(&self, _worker: WorkerId, _maze: &Maze, _seed: u64) {}

    /// A BFS worker is ready while the frontier has cells, regardless of
    /// where it stands.
    fn can_step(&self, _maze: &Maze, _pos: Position, shared: &SharedState<BfsFrontier>) -> bool {
        !shared.lock().state().is_empty()
    }

    fn decide(&self, ctx: &mut StepContext<'_, BfsFrontier, ()>) -> Result<Decision, LogicError> {
        let maze = ctx.maze();
        let mut exploration = ctx.shared().lock();
        let (visited, frontier) = exploration.parts();
        // Another worker may have drained the queue since the readiness
        // check; the next tick deactivates this one.
        let Some(pos) = frontier.queue.pop_front() else {
            return Ok(Decision::Stay);
        };
        for next in maze.legal_moves(pos) {
            if !visited.contains(&next) && frontier.seen.insert(next) {
                frontier.queue.push_back(next);
            }
        }
        Ok(Decision::Move(pos))
    }

    fn shared_status(&self, shared: &BfsFrontier) -> Vec<StatusEntry> {
        vec![StatusEntry::new("Queued Spaces", shared.queued())]
    }
}
