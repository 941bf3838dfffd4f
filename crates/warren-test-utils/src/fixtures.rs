//! Reusable step logic fixtures.
//!
//! - [`FirstUnvisited`]: greedy walker; the well-behaved baseline.
//! - [`PocketLogic`]: teleports one worker into a walled-in cell.
//! - [`FailingLogic`]: returns an error for chosen workers.
//! - [`PanickingLogic`]: panics for chosen workers.
//! - [`SlowLogic`]: sleeps before deciding.
//!
//! Every fixture except the greedy walker falls back to it for the
//! workers it does not target, so the rest of the pool keeps moving.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use warren_core::{LogicError, Position, WorkerId};
use warren_logic::{Decision, StepContext, StepLogic};
use warren_maze::Maze;

/// Take the first unvisited legal move, else the first legal move.
fn greedy(ctx: &StepContext<'_, (), ()>) -> Decision {
    let legal = ctx.legal_moves();
    let exploration = ctx.shared().lock();
    legal
        .iter()
        .copied()
        .find(|&p| !exploration.is_visited(p))
        .or_else(|| legal.first().copied())
        .map_or(Decision::Exhausted, Decision::Move)
}

fn targets(filter: Option<WorkerId>, worker: WorkerId) -> bool {
    filter.is_none_or(|w| w == worker)
}

/// Greedy walker: first unvisited legal move, else the first legal one.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstUnvisited;

impl StepLogic for FirstUnvisited {
    type Shared = ();
    type Local = ();

    fn name(&self) -> &str {
        "First Unvisited"
    }

    fn init_shared(&self, _maze: &Maze) {}

    fn init_local(&self, _worker: WorkerId, _maze: &Maze, _seed: u64) {}

    fn decide(&self, ctx: &mut StepContext<'_, (), ()>) -> Result<Decision, LogicError> {
        Ok(greedy(ctx))
    }
}

/// Moves worker `trapped` straight into `pocket` on its first step.
///
/// The jump is not to a neighbour; the engine only requires a path
/// cell. Once there, the worker has no legal moves.
#[derive(Clone, Copy, Debug)]
pub struct PocketLogic {
    pub trapped: WorkerId,
    pub pocket: Position,
}

impl StepLogic for PocketLogic {
    type Shared = ();
    type Local = ();

    fn name(&self) -> &str {
        "Pocket"
    }

    fn init_shared(&self, _maze: &Maze) {}

    fn init_local(&self, _worker: WorkerId, _maze: &Maze, _seed: u64) {}

    fn decide(&self, ctx: &mut StepContext<'_, (), ()>) -> Result<Decision, LogicError> {
        if ctx.worker() == self.trapped {
            return Ok(Decision::Move(self.pocket));
        }
        Ok(greedy(ctx))
    }
}

/// Fails with [`LogicError::ExecutionFailed`] for `worker` (every worker
/// when `None`). Counts its failures.
#[derive(Debug, Default)]
pub struct FailingLogic {
    pub worker: Option<WorkerId>,
    failures: AtomicUsize,
}

impl FailingLogic {
    pub fn new(worker: Option<WorkerId>) -> Self {
        Self {
            worker,
            failures: AtomicUsize::new(0),
        }
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl StepLogic for FailingLogic {
    type Shared = ();
    type Local = ();

    fn name(&self) -> &str {
        "Failing"
    }

    fn init_shared(&self, _maze: &Maze) {}

    fn init_local(&self, _worker: WorkerId, _maze: &Maze, _seed: u64) {}

    fn decide(&self, ctx: &mut StepContext<'_, (), ()>) -> Result<Decision, LogicError> {
        if targets(self.worker, ctx.worker()) {
            let n = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
            return Err(LogicError::ExecutionFailed {
                reason: format!("deliberate failure #{n}"),
            });
        }
        Ok(greedy(ctx))
    }
}

/// Panics for `worker` (every worker when `None`).
#[derive(Clone, Copy, Debug, Default)]
pub struct PanickingLogic {
    pub worker: Option<WorkerId>,
}

impl StepLogic for PanickingLogic {
    type Shared = ();
    type Local = ();

    fn name(&self) -> &str {
        "Panicking"
    }

    fn init_shared(&self, _maze: &Maze) {}

    fn init_local(&self, _worker: WorkerId, _maze: &Maze, _seed: u64) {}

    fn decide(&self, ctx: &mut StepContext<'_, (), ()>) -> Result<Decision, LogicError> {
        if targets(self.worker, ctx.worker()) {
            panic!("deliberate panic in worker {}", ctx.worker());
        }
        Ok(greedy(ctx))
    }
}

/// Sleeps for `delay` before deciding, for `worker` (every worker when
/// `None`). The sleep happens before the shared lock is taken.
#[derive(Clone, Copy, Debug)]
pub struct SlowLogic {
    pub worker: Option<WorkerId>,
    pub delay: Duration,
}

impl StepLogic for SlowLogic {
    type Shared = ();
    type Local = ();

    fn name(&self) -> &str {
        "Slow"
    }

    fn init_shared(&self, _maze: &Maze) {}

    fn init_local(&self, _worker: WorkerId, _maze: &Maze, _seed: u64) {}

    fn decide(&self, ctx: &mut StepContext<'_, (), ()>) -> Result<Decision, LogicError> {
        if targets(self.worker, ctx.worker()) {
            thread::sleep(self.delay);
        }
        Ok(greedy(ctx))
    }
}
