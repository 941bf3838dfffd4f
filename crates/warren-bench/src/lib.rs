//! Benchmark profiles for the Warren maze exploration engine.
//!
//! - [`reference_maze`]: 32×32 logical maze (65×65 grid)
//! - [`stress_maze`]: 128×128 logical maze (257×257 grid)
//! - [`bench_config`]: coordinator settings with deadlines loose enough
//!   that a loaded benchmark machine never degrades a tick

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use warren_core::ConfigError;
use warren_engine::{CoordinatorConfig, DeadlineConfig, ExecutionMode};
use warren_maze::{Maze, MazeGenerator, Placement};

/// Logical size of [`reference_maze`].
pub const REFERENCE_SIZE: u32 = 32;

/// Logical size of [`stress_maze`].
pub const STRESS_SIZE: u32 = 128;

/// Build the reference maze: 32×32 cells, start top-left, end bottom-right.
pub fn reference_maze(seed: u64) -> Result<Maze, ConfigError> {
    MazeGenerator::new(seed).generate_maze(
        REFERENCE_SIZE,
        Placement::TopLeft,
        Placement::BottomRight,
    )
}

/// Build the stress maze: 128×128 cells, start in the middle, end in a
/// corner.
pub fn stress_maze(seed: u64) -> Result<Maze, ConfigError> {
    MazeGenerator::new(seed).generate_maze(STRESS_SIZE, Placement::Middle, Placement::BottomRight)
}

/// Coordinator settings for benchmarks.
pub fn bench_config(workers: usize, mode: ExecutionMode, seed: u64) -> CoordinatorConfig {
    CoordinatorConfig {
        worker_count: Some(workers),
        mode,
        seed,
        deadline: DeadlineConfig {
            initial_ms: 1_000,
            cap_ms: 5_000,
            ..Default::default()
        },
        ..Default::default()
    }
}
