//! Coordinator and session configuration.
//!
//! [`CoordinatorConfig`] is the setup input for a
//! [`Coordinator`](crate::Coordinator). [`validate()`](CoordinatorConfig::validate)
//! checks structural invariants before any worker is spawned.

use std::fmt;
use std::time::Duration;

use warren_core::ConfigError;
use warren_maze::Maze;

/// Upper bound on explicit worker counts.
pub const MAX_WORKERS: usize = 64;

// ── ExecutionMode ──────────────────────────────────────────────────

/// How workers are scheduled. Never changes what they compute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Every worker's step runs on the driver thread, in worker order.
    /// Deterministic for a fixed seed.
    Inline,
    /// One long-lived OS thread per worker, driven over channels.
    #[default]
    Threaded,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => f.write_str("inline"),
            Self::Threaded => f.write_str("threaded"),
        }
    }
}

// ── DeadlineConfig ─────────────────────────────────────────────────

/// Shape of the adaptive tick deadline.
///
/// The driver waits at most the current deadline for worker reports.
/// After a degraded or stalled tick the deadline grows by
/// `backoff_factor`, up to `cap_ms`; after `decay_ticks` healthy ticks
/// in a row it returns to `initial_ms`.
#[derive(Clone, Debug)]
pub struct DeadlineConfig {
    /// Starting deadline in milliseconds. Default: 100.
    pub initial_ms: u64,
    /// Multiplicative growth per unhealthy tick. Default: 1.5.
    pub backoff_factor: f64,
    /// Hard ceiling in milliseconds. Default: 500.
    pub cap_ms: u64,
    /// Healthy ticks before the deadline resets. Default: 20.
    pub decay_ticks: u64,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            initial_ms: 100,
            backoff_factor: 1.5,
            cap_ms: 500,
            decay_ticks: 20,
        }
    }
}

impl DeadlineConfig {
    /// Check the deadline invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_ms == 0 {
            return Err(ConfigError::InvalidDeadline {
                reason: "initial_ms must be at least 1".into(),
            });
        }
        if self.cap_ms < self.initial_ms {
            return Err(ConfigError::InvalidDeadline {
                reason: format!(
                    "cap_ms ({}) is below initial_ms ({})",
                    self.cap_ms, self.initial_ms
                ),
            });
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(ConfigError::InvalidBackoff {
                reason: format!(
                    "backoff_factor must be finite and >= 1.0, got {}",
                    self.backoff_factor
                ),
            });
        }
        if self.decay_ticks == 0 {
            return Err(ConfigError::InvalidBackoff {
                reason: "decay_ticks must be at least 1".into(),
            });
        }
        Ok(())
    }
}

// ── CoordinatorConfig ──────────────────────────────────────────────

/// Configuration for a [`Coordinator`](crate::Coordinator).
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// Number of workers. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 4]`).
    pub worker_count: Option<usize>,
    /// Scheduling mode. Default: [`ExecutionMode::Threaded`].
    pub mode: ExecutionMode,
    /// Adaptive tick deadline.
    pub deadline: DeadlineConfig,
    /// How long an idle worker blocks on its command channel before
    /// re-checking its stop conditions. Default: 30.
    pub idle_poll_ms: u64,
    /// Total budget for joining worker threads at cleanup. Default: 500.
    pub join_timeout_ms: u64,
    /// Session seed handed to every worker's step logic. Default: 0.
    pub seed: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            mode: ExecutionMode::default(),
            deadline: DeadlineConfig::default(),
            idle_poll_ms: 30,
            join_timeout_ms: 500,
            seed: 0,
        }
    }
}

impl CoordinatorConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.worker_count {
            if n == 0 || n > MAX_WORKERS {
                return Err(ConfigError::InvalidWorkerCount { count: n });
            }
        }
        if self.idle_poll_ms == 0 {
            return Err(ConfigError::InvalidDeadline {
                reason: "idle_poll_ms must be at least 1".into(),
            });
        }
        self.deadline.validate()
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, MAX_WORKERS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 4),
        }
    }

    pub(crate) fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    pub(crate) fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }
}

// ── StepBudget ─────────────────────────────────────────────────────

/// Upper bound on the number of ticks a session runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepBudget {
    /// `2 · size²` ticks.
    #[default]
    Auto,
    /// `⌊12.3 · manhattan(start, end)⌋` ticks.
    Fewest,
    /// No bound.
    Unlimited,
    /// Exactly this many ticks.
    Fixed(u64),
}

impl StepBudget {
    /// The tick limit for `maze`, or `None` when unbounded.
    pub fn resolve(self, maze: &Maze) -> Option<u64> {
        match self {
            Self::Auto => Some(2 * u64::from(maze.size()).pow(2)),
            Self::Fewest => {
                let d = maze.start_pos().manhattan(maze.end_pos());
                Some((12.3 * f64::from(d)) as u64)
            }
            Self::Unlimited => None,
            Self::Fixed(n) => Some(n),
        }
    }
}

// ── SessionConfig ──────────────────────────────────────────────────

/// Configuration for a [`Session`](crate::Session) run.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Tick limit.
    pub budget: StepBudget,
    /// Consecutive stalled ticks after which the run gives up.
    /// Default: 20.
    pub max_consecutive_stalls: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            budget: StepBudget::default(),
            max_consecutive_stalls: 20,
        }
    }
}
