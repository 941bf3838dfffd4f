//! Criterion benchmarks for coordinator ticks and full solves.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use warren_engine::{Coordinator, ExecutionMode, Session, SessionConfig, StepBudget, Strategy};
use warren_logic::{Dfs, WanderPolicy};

use warren_bench::{bench_config, reference_maze};

fn unlimited() -> SessionConfig {
    SessionConfig {
        budget: StepBudget::Unlimited,
        ..Default::default()
    }
}

/// Benchmark: 100 inline DFS ticks with 4 workers on the reference maze.
fn bench_inline_ticks(c: &mut Criterion) {
    let maze = reference_maze(7).unwrap();

    c.bench_function("inline_dfs_100_ticks_x4", |b| {
        b.iter_batched(
            || {
                Coordinator::new(Dfs, maze.clone(), bench_config(4, ExecutionMode::Inline, 0))
                    .unwrap()
            },
            |mut coordinator| {
                for _ in 0..100 {
                    black_box(coordinator.tick());
                }
                coordinator
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: 100 threaded DFS ticks with 4 workers. Thread spawn is
/// excluded; the measurement covers signalling and the result barrier.
fn bench_threaded_ticks(c: &mut Criterion) {
    let maze = reference_maze(7).unwrap();

    c.bench_function("threaded_dfs_100_ticks_x4", |b| {
        b.iter_batched(
            || {
                Coordinator::new(Dfs, maze.clone(), bench_config(4, ExecutionMode::Threaded, 0))
                    .unwrap()
            },
            |mut coordinator| {
                for _ in 0..100 {
                    black_box(coordinator.tick());
                }
                coordinator
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: solve the reference maze end to end with each strategy.
fn bench_solve_reference(c: &mut Criterion) {
    let maze = reference_maze(7).unwrap();
    let strategies = [
        ("dfs", Strategy::Dfs),
        ("bfs", Strategy::Bfs),
        ("weighted", Strategy::Wanderer(WanderPolicy::Weighted)),
        ("alternating_hugger", Strategy::WallHugger(None)),
    ];

    let mut group = c.benchmark_group("solve_reference_x4");
    for (name, strategy) in strategies {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut session = Session::setup(
                    maze.clone(),
                    strategy,
                    bench_config(4, ExecutionMode::Inline, 3),
                    unlimited(),
                )
                .unwrap();
                black_box(session.run())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_inline_ticks,
    bench_threaded_ticks,
    bench_solve_reference
);
criterion_main!(benches);
