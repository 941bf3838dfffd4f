//! Exploration state shared by every worker of a session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexSet;
use warren_core::Position;

/// Lock-protected exploration state: the visited set plus whatever
/// algorithm-wide state the step logic declared.
///
/// `visited` only grows: nothing here removes a member.
#[derive(Debug)]
pub struct Exploration<S> {
    visited: IndexSet<Position>,
    state: S,
}

impl<S> Exploration<S> {
    /// Every position visited so far, in first-visit order.
    pub fn visited(&self) -> &IndexSet<Position> {
        &self.visited
    }

    /// Whether `pos` has been visited.
    pub fn is_visited(&self, pos: Position) -> bool {
        self.visited.contains(&pos)
    }

    /// Record a visit. Returns `true` if `pos` was new.
    pub fn visit(&mut self, pos: Position) -> bool {
        self.visited.insert(pos)
    }

    /// Algorithm-wide state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable algorithm-wide state.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Borrow the visited set and the algorithm state at the same time.
    pub fn parts(&mut self) -> (&IndexSet<Position>, &mut S) {
        (&self.visited, &mut self.state)
    }
}

/// The session-wide state container.
///
/// Holds the [`Exploration`] behind a mutex and the `reached_end` flag
/// as an atomic so that the coordinator can test for termination without
/// taking the lock. `reached_end` only ever goes from `false` to `true`.
///
/// A poisoned lock is recovered rather than propagated. The visited set
/// is grow-only and stays valid after a panic in another holder.
#[derive(Debug)]
pub struct SharedState<S> {
    exploration: Mutex<Exploration<S>>,
    reached_end: AtomicBool,
}

impl<S> SharedState<S> {
    /// State for a fresh session: `visited = {start}`, `reached_end = false`.
    pub fn new(start: Position, state: S) -> Self {
        let mut visited = IndexSet::new();
        visited.insert(start);
        Self {
            exploration: Mutex::new(Exploration { visited, state }),
            reached_end: AtomicBool::new(false),
        }
    }

    /// Lock the exploration state.
    pub fn lock(&self) -> MutexGuard<'_, Exploration<S>> {
        self.exploration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether any worker has reached the end.
    pub fn reached_end(&self) -> bool {
        self.reached_end.load(Ordering::Acquire)
    }

    /// Set `reached_end`. Returns `true` if this call flipped it.
    pub fn mark_end(&self) -> bool {
        !self.reached_end.swap(true, Ordering::AcqRel)
    }

    /// Record that a worker now stands on `pos`.
    ///
    /// Adds `pos` to `visited` and raises `reached_end` when `is_end`.
    /// Idempotent: committing the same position twice is harmless.
    pub fn commit(&self, pos: Position, is_end: bool) -> bool {
        let fresh = self.lock().visit(pos);
        if is_end {
            self.mark_end();
        }
        fresh
    }

    /// Snapshot of the visited set.
    pub fn visited(&self) -> IndexSet<Position> {
        self.lock().visited.clone()
    }

    /// Number of visited positions.
    pub fn visited_len(&self) -> usize {
        self.lock().visited.len()
    }
}
