//! Depth-first exploration with an explicit per-worker stack.

use warren_core::{LogicError, Position, WorkerId};
use warren_maze::Maze;

use crate::context::StepContext;
use crate::logic::{Decision, StatusEntry, StepLogic};

/// Depth-first search.
///
/// Each worker keeps its own stack, seeded with the start position. On
/// every call the first unvisited legal move (in up, down, left, right
/// order) is pushed and taken; with none left the worker pops and steps
/// back to the new top. An emptied stack exhausts the worker.
///
/// The visited set is shared, so several DFS workers naturally fan out
/// into different branches.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dfs;

/// A DFS worker's stack. The top always equals the worker's position.
#[derive(Clone, Debug)]
pub struct DfsStack {
    stack: Vec<Position>,
}

impl DfsStack {
    /// Current stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl StepLogic for Dfs {
    type Shared = ();
    type Local = DfsStack;

    fn name(&self) -> &str {
        "DFS"
    }

    fn init_shared(&self, _maze: &Maze) {}

    fn init_local(&self, _worker: WorkerId, maze: &Maze, _seed: u64) -> DfsStack {
        DfsStack {
            stack: vec![maze.start_pos()],
        }
    }

    fn decide(&self, ctx: &mut StepContext<'_, (), DfsStack>) -> Result<Decision, LogicError> {
        let current = ctx.current();
        let tick = ctx.tick();
        let legal = ctx.legal_moves();
        let next = {
            let exploration = ctx.shared().lock();
            legal
                .into_iter()
                .find(|&p| !exploration.is_visited(p))
        };

        let local = ctx.local();
        if local.stack.last() != Some(&current) {
            return Err(LogicError::InvariantViolated {
                invariant: format!(
                    "tick {tick}: dfs stack top is not the worker position {current}"
                ),
            });
        }
        if let Some(next) = next {
            local.stack.push(next);
            return Ok(Decision::Move(next));
        }
        local.stack.pop();
        Ok(match local.stack.last() {
            Some(&top) => Decision::Move(top),
            None => Decision::Exhausted,
        })
    }

    fn local_status(&self, local: &DfsStack) -> Vec<StatusEntry> {
        vec![StatusEntry::new("Stacked Spaces", local.depth())]
    }
}
