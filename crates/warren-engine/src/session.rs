//! Session driver: runs an [`Explorer`] until it stops.
//!
//! A [`Session`] calls [`Explorer::tick()`] until the end is reached, no
//! worker is left, the [`StepBudget`](crate::StepBudget) runs out, or too
//! many ticks in a row stall. [`Session::finish()`] tears the workers
//! down and returns a [`RunReport`]. Reports from repeated runs fold
//! into a [`RunSummary`].

use std::fmt;
use std::time::{Duration, Instant};

use tracing::info;
use warren_core::ConfigError;
use warren_maze::Maze;

use crate::config::{CoordinatorConfig, SessionConfig};
use crate::coordinator::{CleanupReport, TickOutcome};
use crate::explorer::{Explorer, Strategy};

/// Why a session stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A worker reached the end.
    ReachedEnd,
    /// Every worker ran out of moves.
    NoActiveWorkers,
    /// The tick budget was used up.
    BudgetExhausted,
    /// Too many consecutive ticks without a single response.
    Stalled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReachedEnd => "reached end",
            Self::NoActiveWorkers => "no active workers",
            Self::BudgetExhausted => "step budget exhausted",
            Self::Stalled => "stalled",
        })
    }
}

/// Summary of a finished session.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Step logic name.
    pub strategy: String,
    /// Number of workers.
    pub workers: usize,
    /// Ticks that ran.
    pub steps_taken: u64,
    /// The resolved tick budget, `None` when unbounded.
    pub budget: Option<u64>,
    /// Whether a worker reached the end.
    pub reached_end: bool,
    /// Number of distinct positions visited.
    pub exploration: usize,
    /// Manhattan distance from the best worker to the end.
    pub distance_from_end: u32,
    /// Time spent inside ticks.
    pub solve_time: Duration,
    /// `solve_time / steps_taken`.
    pub avg_tick_time: Duration,
    /// Ticks that proceeded with partial results.
    pub degraded_ticks: u64,
    /// Ticks in which nobody responded.
    pub stalled_ticks: u64,
    /// Step logic failures.
    pub worker_faults: u64,
    /// Why the run stopped.
    pub stop: StopReason,
    /// Worker teardown.
    pub cleanup: CleanupReport,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy: {} ({} workers)", self.strategy, self.workers)?;
        match self.budget {
            Some(budget) => writeln!(f, "Steps Taken: {} / {}", self.steps_taken, budget)?,
            None => writeln!(f, "Steps Taken: {}", self.steps_taken)?,
        }
        writeln!(
            f,
            "Reached End: {}",
            if self.reached_end { "Yes" } else { "No" }
        )?;
        writeln!(f, "Exploration: {} cells", self.exploration)?;
        writeln!(f, "Distance From End: {}", self.distance_from_end)?;
        writeln!(f, "Solve Time: {:.3?}", self.solve_time)?;
        writeln!(f, "Avg Tick Time: {:.3?}", self.avg_tick_time)?;
        writeln!(f, "Degraded Ticks: {}", self.degraded_ticks)?;
        writeln!(f, "Stalled Ticks: {}", self.stalled_ticks)?;
        writeln!(f, "Worker Faults: {}", self.worker_faults)?;
        write!(f, "Stopped: {}", self.stop)
    }
}

/// Aggregate over the reports of repeated runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Number of runs.
    pub runs: usize,
    /// Runs in which a worker reached the end.
    pub reached_end: usize,
    /// Mean ticks per run.
    pub mean_steps: f64,
    /// Mean visited cells per run.
    pub mean_exploration: f64,
    /// Mean time spent inside ticks per run.
    pub mean_solve_time: Duration,
    /// Time spent inside ticks over every run.
    pub total_solve_time: Duration,
}

impl RunSummary {
    /// Fold `reports` into a summary. No reports give all zeroes.
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a RunReport>,
    {
        let mut summary = Self::default();
        let mut steps = 0u64;
        let mut exploration = 0usize;
        for report in reports {
            summary.runs += 1;
            summary.reached_end += usize::from(report.reached_end);
            steps += report.steps_taken;
            exploration += report.exploration;
            summary.total_solve_time += report.solve_time;
        }
        if summary.runs > 0 {
            let n = summary.runs as f64;
            summary.mean_steps = steps as f64 / n;
            summary.mean_exploration = exploration as f64 / n;
            summary.mean_solve_time = summary.total_solve_time.div_f64(n);
        }
        summary
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Runs: {}", self.runs)?;
        writeln!(f, "Reached End: {} / {}", self.reached_end, self.runs)?;
        writeln!(f, "Mean Steps: {:.1}", self.mean_steps)?;
        writeln!(f, "Mean Exploration: {:.1} cells", self.mean_exploration)?;
        writeln!(f, "Mean Solve Time: {:.3?}", self.mean_solve_time)?;
        write!(f, "Total Solve Time: {:.3?}", self.total_solve_time)
    }
}

/// Drives one exploration to completion.
pub struct Session {
    explorer: Box<dyn Explorer>,
    config: SessionConfig,
    budget: Option<u64>,
    steps_taken: u64,
    consecutive_stalls: u32,
    solve_time: Duration,
    stop: Option<StopReason>,
}

impl Session {
    /// Launch `strategy` on `maze`.
    pub fn setup(
        maze: Maze,
        strategy: Strategy,
        coordinator: CoordinatorConfig,
        config: SessionConfig,
    ) -> Result<Self, ConfigError> {
        let explorer = strategy.launch(maze, coordinator)?;
        Ok(Self::from_explorer(explorer, config))
    }

    /// Drive an explorer that is already running.
    pub fn from_explorer(explorer: Box<dyn Explorer>, config: SessionConfig) -> Self {
        let budget = config.budget.resolve(explorer.maze());
        info!(
            strategy = explorer.name(),
            workers = explorer.worker_count(),
            ?budget,
            "session started"
        );
        Self {
            explorer,
            config,
            budget,
            steps_taken: 0,
            consecutive_stalls: 0,
            solve_time: Duration::ZERO,
            stop: None,
        }
    }

    /// Run one tick. Returns `None` once the session has stopped.
    pub fn advance(&mut self) -> Option<TickOutcome> {
        if self.stop.is_some() {
            return None;
        }
        if self.budget.is_some_and(|limit| self.steps_taken >= limit) {
            self.halt(StopReason::BudgetExhausted);
            return None;
        }

        let started = Instant::now();
        let outcome = self.explorer.tick();
        self.solve_time += started.elapsed();

        match &outcome {
            TickOutcome::AlreadyEnded => {
                self.halt(StopReason::ReachedEnd);
                return None;
            }
            TickOutcome::NoActiveWorkers { reached_end } => {
                self.halt(if *reached_end {
                    StopReason::ReachedEnd
                } else {
                    StopReason::NoActiveWorkers
                });
                return None;
            }
            TickOutcome::Stalled { .. } => {
                self.steps_taken += 1;
                self.consecutive_stalls += 1;
                if self.consecutive_stalls > self.config.max_consecutive_stalls {
                    self.halt(StopReason::Stalled);
                }
            }
            TickOutcome::Advanced { reached_end, .. } => {
                self.steps_taken += 1;
                self.consecutive_stalls = 0;
                if *reached_end {
                    self.halt(StopReason::ReachedEnd);
                }
            }
        }
        Some(outcome)
    }

    fn halt(&mut self, reason: StopReason) {
        info!(reason = %reason, steps = self.steps_taken, "session stopped");
        self.stop = Some(reason);
    }

    /// Run to completion and return the report.
    pub fn run(&mut self) -> RunReport {
        self.run_with(|_, _| {})
    }

    /// Run to completion, calling `observer` after every tick.
    pub fn run_with<F>(&mut self, mut observer: F) -> RunReport
    where
        F: FnMut(&dyn Explorer, &TickOutcome),
    {
        while let Some(outcome) = self.advance() {
            observer(self.explorer.as_ref(), &outcome);
        }
        self.finish()
    }

    /// Tear the workers down and summarise the run.
    ///
    /// Calling this before the session stopped records it as having
    /// exhausted its budget.
    pub fn finish(&mut self) -> RunReport {
        let stop = *self.stop.get_or_insert(StopReason::BudgetExhausted);
        let cleanup = self.explorer.cleanup();
        let metrics = self.explorer.metrics();
        let end = self.explorer.maze().end_pos();
        let avg_tick_time = if self.steps_taken == 0 {
            Duration::ZERO
        } else {
            self.solve_time.div_f64(self.steps_taken as f64)
        };
        RunReport {
            strategy: self.explorer.name().to_string(),
            workers: self.explorer.worker_count(),
            steps_taken: self.steps_taken,
            budget: self.budget,
            reached_end: self.explorer.reached_end(),
            exploration: self.explorer.visited().len(),
            distance_from_end: self.explorer.best_position().manhattan(end),
            solve_time: self.solve_time,
            avg_tick_time,
            degraded_ticks: metrics.degraded_ticks,
            stalled_ticks: metrics.stalled_ticks,
            worker_faults: metrics.worker_faults,
            stop,
            cleanup,
        }
    }

    /// The running explorer.
    pub fn explorer(&self) -> &dyn Explorer {
        self.explorer.as_ref()
    }

    /// Ticks run so far.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Why the session stopped, if it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExecutionMode, StepBudget};
    use warren_test_utils::tree_maze as tree;

    fn inline() -> CoordinatorConfig {
        CoordinatorConfig {
            worker_count: Some(1),
            mode: ExecutionMode::Inline,
            ..Default::default()
        }
    }

    #[test]
    fn dfs_session_reaches_end() {
        let config = SessionConfig {
            budget: StepBudget::Unlimited,
            ..Default::default()
        };
        let mut session = Session::setup(tree(), Strategy::Dfs, inline(), config).unwrap();
        let report = session.run();
        assert_eq!(report.stop, StopReason::ReachedEnd);
        assert!(report.reached_end);
        assert_eq!(report.steps_taken, 12);
        assert_eq!(report.distance_from_end, 0);
        assert_eq!(report.exploration, 13);
    }

    #[test]
    fn budget_caps_the_run() {
        let config = SessionConfig {
            budget: StepBudget::Fixed(3),
            ..Default::default()
        };
        let mut session = Session::setup(tree(), Strategy::Dfs, inline(), config).unwrap();
        let report = session.run();
        assert_eq!(report.stop, StopReason::BudgetExhausted);
        assert_eq!(report.steps_taken, 3);
        assert_eq!(report.budget, Some(3));
        assert!(!report.reached_end);
    }

    #[test]
    fn observer_sees_every_tick() {
        let mut session =
            Session::setup(tree(), Strategy::Dfs, inline(), SessionConfig::default()).unwrap();
        let mut seen = 0;
        let report = session.run_with(|_, outcome| {
            assert!(outcome.positions().is_some());
            seen += 1;
        });
        assert_eq!(seen, report.steps_taken);
    }

    #[test]
    fn advance_after_stop_is_none() {
        let mut session =
            Session::setup(tree(), Strategy::Dfs, inline(), SessionConfig::default()).unwrap();
        session.run();
        assert!(session.advance().is_none());
        assert_eq!(session.stop_reason(), Some(StopReason::ReachedEnd));
    }

    #[test]
    fn report_display_lists_fields() {
        let mut session =
            Session::setup(tree(), Strategy::Bfs, inline(), SessionConfig::default()).unwrap();
        let text = session.run().to_string();
        assert!(text.starts_with("Strategy: BFS (1 workers)"));
        assert!(text.contains("Reached End: Yes"));
        assert!(text.ends_with("Stopped: reached end"));
    }

    #[test]
    fn summary_of_repeated_runs() {
        let reports: Vec<RunReport> = [StepBudget::Unlimited, StepBudget::Fixed(3)]
            .into_iter()
            .map(|budget| {
                let config = SessionConfig {
                    budget,
                    ..Default::default()
                };
                Session::setup(tree(), Strategy::Dfs, inline(), config)
                    .unwrap()
                    .run()
            })
            .collect();
        let summary = RunSummary::from_reports(&reports);
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.reached_end, 1);
        assert_eq!(summary.mean_steps, 7.5);
        assert_eq!(
            summary.total_solve_time,
            reports[0].solve_time + reports[1].solve_time
        );
        let text = summary.to_string();
        assert!(text.starts_with("Runs: 2"));
        assert!(text.contains("Reached End: 1 / 2"));
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let summary = RunSummary::from_reports(&[]);
        assert_eq!(summary, RunSummary::default());
    }
}
