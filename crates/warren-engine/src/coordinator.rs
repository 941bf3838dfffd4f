//! The lock-step coordinator.
//!
//! [`Coordinator`] owns a pool of workers, the shared exploration state
//! and the step barrier. Each call to [`tick()`](Coordinator::tick)
//! advances every ready worker by exactly one move, waiting at most the
//! adaptive deadline for their reports.
//!
//! # Tick protocol
//!
//! 1. If the end was reached, return [`TickOutcome::AlreadyEnded`].
//! 2. Apply reports that arrived after the previous tick's deadline.
//! 3. Readiness pass: workers still computing an earlier step stay in
//!    flight and are not signalled again; workers the step logic cannot
//!    advance are deactivated; the rest participate.
//! 4. Signal every participant and wait for reports until all arrived
//!    or the deadline passed.
//! 5. Apply reports. With at least one response the tick advances, with
//!    none it stalls.
//!
//! # Shutdown
//!
//! [`cleanup()`](Coordinator::cleanup) deactivates every worker, stops
//! the threads and joins them within `join_timeout_ms`. Threads still
//! running after that are detached and reported as abandoned. Dropping
//! a coordinator runs cleanup if it has not run yet.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use indexmap::IndexSet;
use tracing::{debug, info, warn};
use warren_core::{ConfigError, Position, TickId, WorkerId};
use warren_logic::{SharedState, StatusEntry, StepLogic};
use warren_maze::Maze;

use crate::config::{CoordinatorConfig, ExecutionMode};
use crate::deadline::AdaptiveDeadline;
use crate::metrics::TickMetrics;
use crate::slot::{Response, WorkerSlot};
use crate::worker::{execute, worker_loop, Command, StepOutcome, StepReport, WorkerShared};

// ── TickOutcome ────────────────────────────────────────────────────

/// Result of one [`Coordinator::tick()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// At least one worker responded.
    Advanced {
        /// Every worker's position after the tick, indexed by worker id.
        positions: Vec<Position>,
        /// Whether the end has been reached.
        reached_end: bool,
        /// Fewer workers responded than were awaited.
        degraded: bool,
    },
    /// The end had already been reached before this tick. Nothing ran.
    AlreadyEnded,
    /// No worker is active or in flight.
    NoActiveWorkers {
        /// Whether the end has been reached.
        reached_end: bool,
    },
    /// Workers were awaited but none responded before the deadline.
    Stalled {
        /// Whether the end has been reached.
        reached_end: bool,
    },
}

impl TickOutcome {
    /// Whether the end has been reached.
    pub fn reached_end(&self) -> bool {
        match self {
            Self::Advanced { reached_end, .. }
            | Self::NoActiveWorkers { reached_end }
            | Self::Stalled { reached_end } => *reached_end,
            Self::AlreadyEnded => true,
        }
    }

    /// Worker positions, if the tick advanced.
    pub fn positions(&self) -> Option<&[Position]> {
        match self {
            Self::Advanced { positions, .. } => Some(positions),
            _ => None,
        }
    }

    /// Collapse into the `(positions, reached_end)` pair of
    /// [`Coordinator::step()`].
    pub fn into_step(self) -> (Option<Vec<Position>>, bool) {
        let reached_end = self.reached_end();
        match self {
            Self::Advanced { positions, .. } => (Some(positions), reached_end),
            _ => (None, reached_end),
        }
    }
}

// ── CleanupReport ──────────────────────────────────────────────────

/// Report from [`Coordinator::cleanup()`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Total time spent in cleanup.
    pub total_ms: u64,
    /// Number of worker threads joined.
    pub workers_joined: usize,
    /// Number of worker threads detached because they missed the join
    /// timeout.
    pub abandoned: usize,
}

// ── Backend ────────────────────────────────────────────────────────

enum Backend<L: StepLogic> {
    Inline {
        locals: Vec<L::Local>,
    },
    Threaded {
        commands: Vec<Sender<Command>>,
        reports: Receiver<StepReport>,
        handles: Vec<Option<JoinHandle<()>>>,
    },
}

#[derive(Default)]
struct Tally {
    responded: u32,
    faulted: u32,
}

// ── Coordinator ────────────────────────────────────────────────────

/// Lock-step driver for a pool of workers sharing one step logic.
pub struct Coordinator<L: StepLogic> {
    workers: WorkerShared<L>,
    config: CoordinatorConfig,
    backend: Backend<L>,
    deadline: AdaptiveDeadline,
    tick: TickId,
    metrics: TickMetrics,
    cleaned: bool,
}

impl<L: StepLogic> Coordinator<L> {
    /// Validate `config`, initialise shared state and slots, and start
    /// the workers.
    ///
    /// Every worker starts on `maze.start_pos()`, active, with
    /// `visited = {start}`. On [`ExecutionMode::Threaded`] one named
    /// thread per worker is spawned; if any spawn fails, the ones already
    /// running are stopped and joined before the error is returned.
    pub fn new(
        logic: L,
        maze: impl Into<Arc<Maze>>,
        config: CoordinatorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let maze: Arc<Maze> = maze.into();
        let n = config.resolved_worker_count();
        let start = maze.start_pos();

        let state = SharedState::new(start, logic.init_shared(&maze));
        let slots: Arc<[WorkerSlot]> = (0..n)
            .map(|i| WorkerSlot::new(WorkerId(i as u32), start))
            .collect();
        let locals: Vec<L::Local> = slots
            .iter()
            .map(|slot| {
                let local = logic.init_local(slot.worker(), &maze, config.seed);
                slot.publish_status(logic.local_status(&local));
                local
            })
            .collect();

        let workers = WorkerShared {
            logic: Arc::new(logic),
            maze,
            state: Arc::new(state),
            slots,
        };

        let backend = match config.mode {
            ExecutionMode::Inline => Backend::Inline { locals },
            ExecutionMode::Threaded => spawn_workers(&workers, locals, config.idle_poll())?,
        };

        info!(
            logic = workers.logic.name(),
            workers = n,
            mode = %config.mode,
            size = workers.maze.size(),
            "coordinator started"
        );

        Ok(Self {
            deadline: AdaptiveDeadline::new(&config.deadline),
            metrics: TickMetrics {
                deadline_ms: config.deadline.initial_ms,
                ..Default::default()
            },
            workers,
            config,
            backend,
            tick: TickId::default(),
            cleaned: false,
        })
    }

    // ── Tick ───────────────────────────────────────────────────────

    /// Advance every ready worker by one move.
    pub fn tick(&mut self) -> TickOutcome {
        if self.workers.state.reached_end() {
            return TickOutcome::AlreadyEnded;
        }
        let started = Instant::now();
        self.tick = self.tick.next();
        let tick = self.tick;
        let mut tally = Tally::default();

        // Late reports from the previous tick's stragglers.
        let late: Vec<StepReport> = match &self.backend {
            Backend::Threaded { reports, .. } => reports.try_iter().collect(),
            Backend::Inline { .. } => Vec::new(),
        };
        for report in late {
            self.metrics.late_reports += 1;
            self.apply(report, &mut Tally::default());
        }

        // Readiness pass.
        let mut participants = Vec::new();
        let mut in_flight = 0u32;
        for slot in self.workers.slots.iter() {
            if !slot.is_active() {
                continue;
            }
            if slot.step_flag() {
                in_flight += 1;
                continue;
            }
            let ready = self.workers.logic.can_step(
                &self.workers.maze,
                slot.current_pos(),
                &self.workers.state,
            );
            if ready {
                participants.push(slot.worker());
            } else {
                slot.set_response(Response::Inactive);
                slot.deactivate();
                debug!(worker = slot.worker().0, pos = %slot.current_pos(), "worker has no moves");
            }
        }

        if participants.is_empty() && in_flight == 0 {
            let reached_end = self.workers.state.reached_end();
            self.finish(started, 0, 0, &tally, false);
            return TickOutcome::NoActiveWorkers { reached_end };
        }

        let (reports, awaited) = self.dispatch(tick, &participants, in_flight);
        for report in reports {
            if report.tick != tick {
                self.metrics.late_reports += 1;
            }
            self.apply(report, &mut tally);
        }

        let reached_end = self.workers.state.reached_end();
        let participants = participants.len() as u32;
        if tally.responded == 0 {
            self.finish(started, participants, in_flight, &tally, true);
            self.metrics.stalled_ticks += 1;
            warn!(
                tick = tick.0,
                awaited,
                deadline_ms = self.deadline.current_ms(),
                "tick stalled: no worker responded"
            );
            return TickOutcome::Stalled { reached_end };
        }

        let degraded = tally.responded < awaited;
        self.finish(started, participants, in_flight, &tally, degraded);
        if degraded {
            self.metrics.degraded_ticks += 1;
            warn!(
                tick = tick.0,
                awaited,
                responded = tally.responded,
                "tick degraded: proceeding with partial results"
            );
        }
        debug!(
            tick = tick.0,
            participants,
            responded = tally.responded,
            reached_end,
            "tick complete"
        );
        TickOutcome::Advanced {
            positions: self.current_positions(),
            reached_end,
            degraded,
        }
    }

    /// Signal `participants` and collect reports.
    ///
    /// Returns the reports and the number of workers that were awaited
    /// (participants plus those already in flight).
    fn dispatch(
        &mut self,
        tick: TickId,
        participants: &[WorkerId],
        in_flight: u32,
    ) -> (Vec<StepReport>, u32) {
        let slots = &self.workers.slots;
        match &mut self.backend {
            Backend::Inline { locals } => {
                let mut out = Vec::with_capacity(participants.len());
                for &worker in participants {
                    slots[worker.index()].signal();
                    let outcome = execute(&self.workers, worker, tick, &mut locals[worker.index()]);
                    out.push(StepReport {
                        worker,
                        tick,
                        outcome,
                    });
                }
                (out, participants.len() as u32)
            }
            Backend::Threaded {
                commands, reports, ..
            } => {
                let mut pending = in_flight;
                for &worker in participants {
                    let slot = &slots[worker.index()];
                    slot.signal();
                    let sent = commands
                        .get(worker.index())
                        .is_some_and(|tx| tx.try_send(Command::Step { tick }).is_ok());
                    if sent {
                        pending += 1;
                    } else {
                        warn!(worker = worker.0, "worker channel closed; deactivating");
                        slot.clear_flag();
                        slot.deactivate();
                        slot.set_response(Response::Terminated);
                    }
                }
                let awaited = pending;
                let deadline = Instant::now() + self.deadline.current();
                let mut out = Vec::with_capacity(pending as usize);
                while pending > 0 {
                    match reports.recv_deadline(deadline) {
                        Ok(report) => {
                            pending -= 1;
                            out.push(report);
                        }
                        Err(_) => break,
                    }
                }
                (out, awaited)
            }
        }
    }

    fn apply(&mut self, report: StepReport, tally: &mut Tally) {
        let Some(slot) = self.workers.slots.get(report.worker.index()) else {
            return;
        };
        slot.clear_flag();
        match report.outcome {
            StepOutcome::Moved(pos) => {
                self.workers
                    .state
                    .commit(pos, self.workers.maze.is_end(pos));
                tally.responded += 1;
            }
            StepOutcome::Stayed(_) => tally.responded += 1,
            StepOutcome::Exhausted(pos) => {
                slot.deactivate();
                tally.responded += 1;
                debug!(worker = report.worker.0, %pos, "worker exhausted");
            }
            StepOutcome::Faulted(err) => {
                tally.faulted += 1;
                self.metrics.worker_faults += 1;
                warn!(worker = report.worker.0, tick = report.tick.0, error = %err, "worker fault");
            }
        }
    }

    fn finish(
        &mut self,
        started: Instant,
        participants: u32,
        in_flight: u32,
        tally: &Tally,
        unhealthy: bool,
    ) {
        let deadline_ms = self.deadline.record_tick(unhealthy);
        let m = &mut self.metrics;
        m.tick = self.tick.0;
        m.total_us = started.elapsed().as_micros() as u64;
        m.participants = participants;
        m.responded = tally.responded;
        m.faulted = tally.faulted;
        m.in_flight = in_flight;
        m.deadline_ms = deadline_ms;
    }

    /// Run one tick and return `(positions, reached_end)`.
    ///
    /// `positions` is `None` when the tick did not advance: the end was
    /// already reached, no worker is active, or the tick stalled.
    pub fn step(&mut self) -> (Option<Vec<Position>>, bool) {
        self.tick().into_step()
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Every worker's position, indexed by worker id.
    pub fn current_positions(&self) -> Vec<Position> {
        self.workers
            .slots
            .iter()
            .map(WorkerSlot::current_pos)
            .collect()
    }

    /// The worker position closest to the end by Manhattan distance.
    /// The lowest worker id wins ties.
    pub fn best_position(&self) -> Position {
        let end = self.workers.maze.end_pos();
        self.workers
            .slots
            .iter()
            .map(WorkerSlot::current_pos)
            .min_by_key(|p| p.manhattan(end))
            .unwrap_or_else(|| self.workers.maze.start_pos())
    }

    /// Snapshot of every visited position, in first-visit order.
    pub fn visited(&self) -> IndexSet<Position> {
        self.workers.state.visited()
    }

    /// Whether any worker has reached the end.
    pub fn reached_end(&self) -> bool {
        self.workers.state.reached_end()
    }

    /// Ordered `(label, value)` status view.
    ///
    /// Per worker: activity, position, step flag, response, step count
    /// and the step logic's own lines, each prefixed with `| `. Then the
    /// session-wide visited count, end flag and shared logic lines.
    pub fn status(&self) -> Vec<StatusEntry> {
        let logic = &self.workers.logic;
        let mut out = vec![StatusEntry::new("Algorithm", logic.name())];
        for slot in self.workers.slots.iter() {
            let activity = if slot.is_active() { "Active" } else { "Inactive" };
            out.push(StatusEntry::new(format!("Worker {}", slot.worker()), activity));
            out.push(StatusEntry::new("| Current Pos", slot.current_pos()));
            let flag = if slot.step_flag() { "Set" } else { "Clear" };
            out.push(StatusEntry::new("| Step Flag", flag));
            out.push(StatusEntry::new("| Response", slot.response()));
            out.push(StatusEntry::new("| Steps Taken", slot.steps_taken()));
            for line in slot.status() {
                out.push(StatusEntry::new(format!("| {}", line.label), line.value));
            }
        }
        let (visited, shared_lines) = {
            let exploration = self.workers.state.lock();
            (
                exploration.visited().len(),
                logic.shared_status(exploration.state()),
            )
        };
        out.push(StatusEntry::new("Visited Pos", visited));
        let end = if self.reached_end() { "Yes" } else { "No" };
        out.push(StatusEntry::new("Reached End", end));
        out.extend(shared_lines);
        out
    }

    /// Metrics for the most recent tick plus session counters.
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    /// Number of workers in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.slots.len()
    }

    /// The per-worker slots.
    pub fn slots(&self) -> &[WorkerSlot] {
        &self.workers.slots
    }

    /// The maze being explored.
    pub fn maze(&self) -> &Maze {
        &self.workers.maze
    }

    /// The step logic.
    pub fn logic(&self) -> &L {
        &self.workers.logic
    }

    /// The last tick run.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    // ── Cleanup ────────────────────────────────────────────────────

    /// Stop every worker and join the threads.
    ///
    /// 1. Deactivate every slot and send `Stop`.
    /// 2. Drop the command channels to unblock idle workers.
    /// 3. Join finished threads until `join_timeout_ms` passes; detach
    ///    the rest.
    ///
    /// Idempotent: later calls return an empty report.
    pub fn cleanup(&mut self) -> CleanupReport {
        if self.cleaned {
            return CleanupReport::default();
        }
        self.cleaned = true;
        let start = Instant::now();

        for slot in self.workers.slots.iter() {
            slot.deactivate();
        }

        let mut report = CleanupReport::default();
        match &mut self.backend {
            Backend::Inline { .. } => {
                for slot in self.workers.slots.iter() {
                    if slot.response() != Response::Inactive {
                        slot.set_response(Response::Terminated);
                    }
                }
            }
            Backend::Threaded {
                commands, handles, ..
            } => {
                for tx in commands.iter() {
                    let _ = tx.try_send(Command::Stop);
                }
                commands.clear();

                let deadline = start + self.config.join_timeout();
                loop {
                    for handle in handles.iter_mut() {
                        if handle.as_ref().is_some_and(JoinHandle::is_finished) {
                            if let Some(h) = handle.take() {
                                if h.join().is_ok() {
                                    report.workers_joined += 1;
                                }
                            }
                        }
                    }
                    if handles.iter().all(Option::is_none) || Instant::now() >= deadline {
                        break;
                    }
                    thread::sleep(Duration::from_millis(1));
                }

                report.abandoned = handles.iter().filter(|h| h.is_some()).count();
                if report.abandoned > 0 {
                    warn!(
                        abandoned = report.abandoned,
                        join_timeout_ms = self.config.join_timeout_ms,
                        "detaching workers that missed the join timeout"
                    );
                }
                handles.clear();
            }
        }

        report.total_ms = start.elapsed().as_millis() as u64;
        info!(
            total_ms = report.total_ms,
            joined = report.workers_joined,
            abandoned = report.abandoned,
            "coordinator cleaned up"
        );
        report
    }
}

impl<L: StepLogic> Drop for Coordinator<L> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn spawn_workers<L: StepLogic>(
    workers: &WorkerShared<L>,
    locals: Vec<L::Local>,
    idle_poll: Duration,
) -> Result<Backend<L>, ConfigError> {
    let n = locals.len();
    let (report_tx, report_rx) = bounded(n.max(1));
    let mut commands = Vec::with_capacity(n);
    let mut handles = Vec::with_capacity(n);

    for (i, local) in locals.into_iter().enumerate() {
        let (cmd_tx, cmd_rx) = bounded(2);
        let shared = workers.clone();
        let reports = report_tx.clone();
        let worker = WorkerId(i as u32);
        let spawned = thread::Builder::new()
            .name(format!("warren-worker-{i}"))
            .spawn(move || worker_loop(shared, worker, local, cmd_rx, reports, idle_poll));
        match spawned {
            Ok(handle) => {
                commands.push(cmd_tx);
                handles.push(Some(handle));
            }
            Err(e) => {
                for slot in workers.slots.iter() {
                    slot.deactivate();
                }
                drop(commands);
                for handle in handles.into_iter().flatten() {
                    let _ = handle.join();
                }
                return Err(ConfigError::ThreadSpawnFailed {
                    reason: format!("worker {i}: {e}"),
                });
            }
        }
    }

    Ok(Backend::Threaded {
        commands,
        reports: report_rx,
        handles,
    })
}
