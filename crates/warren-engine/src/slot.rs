//! Per-worker slots shared between the coordinator and its workers.
//!
//! Each [`WorkerSlot`] is cache-line aligned to prevent false sharing
//! between workers polling and publishing their state concurrently.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};

use warren_core::{Position, WorkerId};
use warren_logic::StatusEntry;

// ── Response ───────────────────────────────────────────────────────

/// Last observed status of a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Response {
    /// Waiting for a command.
    Idle = 0,
    /// Signalled by the coordinator, not yet picked up.
    Waiting = 1,
    /// Computing its move.
    Stepping = 2,
    /// Finished its move for the current tick.
    Stepped = 3,
    /// Out of moves.
    Inactive = 4,
    /// Worker loop exited.
    Terminated = 5,
    /// Its step logic failed on the last tick.
    Faulted = 6,
}

impl Response {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Idle,
            1 => Self::Waiting,
            2 => Self::Stepping,
            3 => Self::Stepped,
            4 => Self::Inactive,
            5 => Self::Terminated,
            _ => Self::Faulted,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Waiting => "Waiting",
            Self::Stepping => "Stepping",
            Self::Stepped => "Stepped",
            Self::Inactive => "Inactive",
            Self::Terminated => "Terminated",
            Self::Faulted => "Faulted",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── WorkerSlot ─────────────────────────────────────────────────────

/// Shared view of one worker.
///
/// Write discipline: only the owning worker writes `current_pos`,
/// `response`, `steps_taken` and the status lines; only the coordinator
/// writes `step_flag` and `is_active` (workers never reactivate
/// themselves). The coordinator also sets `response` for a worker it
/// deactivates without that worker having stepped.
#[repr(align(128))]
pub struct WorkerSlot {
    worker: WorkerId,
    current_pos: AtomicU64,
    is_active: AtomicBool,
    step_flag: AtomicBool,
    response: AtomicU8,
    steps_taken: AtomicU64,
    status: Mutex<Vec<StatusEntry>>,
}

// Compile-time assertion: WorkerSlot must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<WorkerSlot>();
};

impl WorkerSlot {
    /// A fresh, active slot standing on `start`.
    pub fn new(worker: WorkerId, start: Position) -> Self {
        Self {
            worker,
            current_pos: AtomicU64::new(start.pack()),
            is_active: AtomicBool::new(true),
            step_flag: AtomicBool::new(false),
            response: AtomicU8::new(Response::Idle as u8),
            steps_taken: AtomicU64::new(0),
            status: Mutex::new(Vec::new()),
        }
    }

    /// Owning worker.
    pub fn worker(&self) -> WorkerId {
        self.worker
    }

    /// Where the worker stands.
    pub fn current_pos(&self) -> Position {
        Position::unpack(self.current_pos.load(Ordering::Acquire))
    }

    pub(crate) fn set_current_pos(&self, pos: Position) {
        self.current_pos.store(pos.pack(), Ordering::Release);
    }

    /// Whether the worker still takes part in ticks.
    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Acquire)
    }

    /// Take the worker out of all future ticks. Never undone.
    pub(crate) fn deactivate(&self) {
        self.is_active.store(false, Ordering::Release);
    }

    /// Whether a step command is outstanding.
    pub fn step_flag(&self) -> bool {
        self.step_flag.load(Ordering::Acquire)
    }

    /// Raise the step flag ahead of sending a step command.
    pub(crate) fn signal(&self) {
        self.step_flag.store(true, Ordering::Release);
        self.set_response(Response::Waiting);
    }

    pub(crate) fn clear_flag(&self) {
        self.step_flag.store(false, Ordering::Release);
    }

    /// Last observed status.
    pub fn response(&self) -> Response {
        Response::from_u8(self.response.load(Ordering::Acquire))
    }

    pub(crate) fn set_response(&self, response: Response) {
        self.response.store(response as u8, Ordering::Release);
    }

    /// Number of moves this worker has made.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken.load(Ordering::Relaxed)
    }

    pub(crate) fn record_step(&self) {
        self.steps_taken.fetch_add(1, Ordering::Relaxed);
    }

    /// The step logic's status lines as of the worker's last step.
    pub fn status(&self) -> Vec<StatusEntry> {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn publish_status(&self, lines: Vec<StatusEntry>) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = lines;
    }
}

impl fmt::Debug for WorkerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerSlot")
            .field("worker", &self.worker)
            .field("current_pos", &self.current_pos())
            .field("is_active", &self.is_active())
            .field("step_flag", &self.step_flag())
            .field("response", &self.response())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_idle_and_active() {
        let s = WorkerSlot::new(WorkerId(3), Position::new(1, 1));
        assert_eq!(s.worker(), WorkerId(3));
        assert_eq!(s.current_pos(), Position::new(1, 1));
        assert!(s.is_active());
        assert!(!s.step_flag());
        assert_eq!(s.response(), Response::Idle);
        assert_eq!(s.steps_taken(), 0);
    }

    #[test]
    fn signal_sets_flag_and_waiting() {
        let s = WorkerSlot::new(WorkerId(0), Position::new(1, 1));
        s.signal();
        assert!(s.step_flag());
        assert_eq!(s.response(), Response::Waiting);
        s.clear_flag();
        assert!(!s.step_flag());
    }

    #[test]
    fn response_roundtrips_through_atomic() {
        let s = WorkerSlot::new(WorkerId(0), Position::new(1, 1));
        for r in [
            Response::Idle,
            Response::Waiting,
            Response::Stepping,
            Response::Stepped,
            Response::Inactive,
            Response::Terminated,
            Response::Faulted,
        ] {
            s.set_response(r);
            assert_eq!(s.response(), r);
        }
    }

    #[test]
    fn position_and_steps_update() {
        let s = WorkerSlot::new(WorkerId(0), Position::new(1, 1));
        s.set_current_pos(Position::new(3, 5));
        s.record_step();
        assert_eq!(s.current_pos(), Position::new(3, 5));
        assert_eq!(s.steps_taken(), 1);
    }

    #[test]
    fn status_publish_replaces() {
        let s = WorkerSlot::new(WorkerId(0), Position::new(1, 1));
        s.publish_status(vec![StatusEntry::new("Stacked Spaces", 3)]);
        s.publish_status(vec![StatusEntry::new("Stacked Spaces", 4)]);
        assert_eq!(s.status(), vec![StatusEntry::new("Stacked Spaces", 4)]);
    }

    #[test]
    fn slot_is_cache_line_aligned() {
        assert_eq!(std::mem::align_of::<WorkerSlot>(), 128);
    }
}
