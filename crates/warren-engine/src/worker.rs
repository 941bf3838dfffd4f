//! Worker step execution and the threaded worker loop.
//!
//! [`execute`] computes one step for one worker and commits it. Inline
//! mode calls it directly from the coordinator; threaded mode calls it
//! from [`worker_loop`] on the worker's own thread. Both paths go
//! through the same function, so the mode never changes what a worker
//! computes.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::trace;
use warren_core::{LogicError, Position, TickId, WorkerId};
use warren_logic::{Decision, SharedState, StepContext, StepLogic};
use warren_maze::Maze;

use crate::slot::{Response, WorkerSlot};

// ── Messages ───────────────────────────────────────────────────────

/// Coordinator → worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Compute one step for `tick`.
    Step { tick: TickId },
    /// Exit the loop.
    Stop,
}

/// What one step produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    /// The worker moved to this position.
    Moved(Position),
    /// The worker stayed where it was.
    Stayed(Position),
    /// The worker ran out of moves at this position.
    Exhausted(Position),
    /// The step logic failed; the worker keeps its position.
    Faulted(LogicError),
}

/// Worker → coordinator.
#[derive(Clone, Debug)]
pub(crate) struct StepReport {
    pub worker: WorkerId,
    pub tick: TickId,
    pub outcome: StepOutcome,
}

// ── Shared handles ─────────────────────────────────────────────────

/// Everything a worker needs besides its own local state.
pub(crate) struct WorkerShared<L: StepLogic> {
    pub logic: Arc<L>,
    pub maze: Arc<Maze>,
    pub state: Arc<SharedState<L::Shared>>,
    pub slots: Arc<[WorkerSlot]>,
}

impl<L: StepLogic> Clone for WorkerShared<L> {
    fn clone(&self) -> Self {
        Self {
            logic: Arc::clone(&self.logic),
            maze: Arc::clone(&self.maze),
            state: Arc::clone(&self.state),
            slots: Arc::clone(&self.slots),
        }
    }
}

// ── Step execution ─────────────────────────────────────────────────

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Compute and commit one step for `worker`.
///
/// The worker's slot is updated in place (position, response, step
/// count, status lines) and the move is committed to the shared state.
/// A failing or panicking step logic leaves the position untouched.
pub(crate) fn execute<L: StepLogic>(
    shared: &WorkerShared<L>,
    worker: WorkerId,
    tick: TickId,
    local: &mut L::Local,
) -> StepOutcome {
    let slot = &shared.slots[worker.index()];
    slot.set_response(Response::Stepping);
    let current = slot.current_pos();
    let peers: Vec<Position> = shared.slots.iter().map(WorkerSlot::current_pos).collect();

    let decided = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut ctx = StepContext::new(
            worker,
            tick,
            &shared.maze,
            current,
            &shared.state,
            &mut *local,
            &peers,
        );
        shared.logic.decide(&mut ctx)
    }));
    let decision = match decided {
        Ok(result) => result,
        Err(payload) => Err(LogicError::Panicked {
            message: panic_message(payload.as_ref()),
        }),
    };

    let outcome = match decision {
        Ok(Decision::Move(next)) if shared.maze.is_path(next) => {
            slot.set_current_pos(next);
            shared.state.commit(next, shared.maze.is_end(next));
            slot.record_step();
            StepOutcome::Moved(next)
        }
        Ok(Decision::Move(next)) => StepOutcome::Faulted(LogicError::InvariantViolated {
            invariant: format!("move to {next} is not an in-bounds path cell"),
        }),
        Ok(Decision::Stay) => StepOutcome::Stayed(current),
        Ok(Decision::Exhausted) => StepOutcome::Exhausted(current),
        Err(e) => StepOutcome::Faulted(e),
    };

    slot.publish_status(shared.logic.local_status(local));
    slot.set_response(match &outcome {
        StepOutcome::Moved(_) | StepOutcome::Stayed(_) => Response::Stepped,
        StepOutcome::Exhausted(_) => Response::Inactive,
        StepOutcome::Faulted(_) => Response::Faulted,
    });
    trace!(worker = worker.0, tick = tick.0, ?outcome, "worker step");
    outcome
}

// ── Threaded loop ──────────────────────────────────────────────────

/// Body of a threaded worker.
///
/// Blocks on its command channel for at most `idle_poll` at a time. On
/// timeout it re-checks its stop conditions: its slot was deactivated or
/// some worker reached the end. Exits on `Stop`, on a disconnected
/// channel, or when the report channel is gone.
pub(crate) fn worker_loop<L: StepLogic>(
    shared: WorkerShared<L>,
    worker: WorkerId,
    mut local: L::Local,
    commands: Receiver<Command>,
    reports: Sender<StepReport>,
    idle_poll: Duration,
) {
    let slot = &shared.slots[worker.index()];
    loop {
        match commands.recv_timeout(idle_poll) {
            Ok(Command::Step { tick }) => {
                let outcome = execute(&shared, worker, tick, &mut local);
                let report = StepReport {
                    worker,
                    tick,
                    outcome,
                };
                if reports.send(report).is_err() {
                    break;
                }
            }
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                if !slot.is_active() || shared.state.reached_end() {
                    break;
                }
            }
        }
    }
    if slot.response() != Response::Inactive {
        slot.set_response(Response::Terminated);
    }
    trace!(worker = worker.0, "worker loop exited");
}
