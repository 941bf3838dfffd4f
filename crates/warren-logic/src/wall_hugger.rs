//! Deterministic wall following.

use warren_core::{Direction, LogicError, Side, WorkerId};
use warren_maze::Maze;

use crate::context::StepContext;
use crate::logic::{Decision, StatusEntry, StepLogic};

/// Keeps one hand on the wall.
///
/// A left hugger tries, relative to its facing: turn left, straight on,
/// turn right, turn back. A right hugger mirrors that. The first legal
/// candidate is taken and becomes the new facing. No randomness and no
/// memory beyond `(side, facing)`.
#[derive(Clone, Copy, Debug)]
pub struct WallHugger {
    side: Option<Side>,
}

impl WallHugger {
    /// Every worker hugs the same side.
    pub fn new(side: Side) -> Self {
        Self { side: Some(side) }
    }

    /// Even workers hug the left wall, odd workers the right.
    pub fn alternating() -> Self {
        Self { side: None }
    }

    /// The side worker `worker` hugs.
    pub fn side_for(&self, worker: WorkerId) -> Side {
        match self.side {
            Some(side) => side,
            None if worker.0 % 2 == 0 => Side::Left,
            None => Side::Right,
        }
    }
}

/// A wall hugger worker's hand and heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HuggerState {
    /// Hand kept on the wall.
    pub side: Side,
    /// Direction of the last move (initially the side's own direction).
    pub facing: Direction,
}

impl HuggerState {
    /// Candidate directions in priority order.
    pub fn priorities(&self) -> [Direction; 4] {
        let f = self.facing;
        match self.side {
            Side::Left => [f.turn_left(), f, f.turn_right(), f.reverse()],
            Side::Right => [f.turn_right(), f, f.turn_left(), f.reverse()],
        }
    }
}

impl StepLogic for WallHugger {
    type Shared = ();
    type Local = HuggerState;

    fn name(&self) -> &str {
        "Wall Hugger"
    }

    fn init_shared(&self, _maze: &Maze) {}

    fn init_local(&self, worker: WorkerId, _maze: &Maze, _seed: u64) -> HuggerState {
        let side = self.side_for(worker);
        HuggerState {
            side,
            facing: side.initial_facing(),
        }
    }

    fn decide(&self, ctx: &mut StepContext<'_, (), HuggerState>) -> Result<Decision, LogicError> {
        let current = ctx.current();
        let legal = ctx.legal_moves();
        let state = ctx.local();
        for dir in state.priorities() {
            let next = current.step(dir);
            if legal.contains(&next) {
                state.facing = dir;
                return Ok(Decision::Move(next));
            }
        }
        Ok(Decision::Exhausted)
    }

    fn local_status(&self, local: &HuggerState) -> Vec<StatusEntry> {
        vec![
            StatusEntry::new("Direction", local.side),
            StatusEntry::new("Facing", local.facing),
        ]
    }
}
