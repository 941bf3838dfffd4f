//! End-to-end coordinator scenarios on hand-drawn mazes.
//!
//! Each scenario runs in both execution modes: the mode changes only how
//! workers are scheduled, never the outcome.

use warren_core::{Position, Side, WorkerId};
use warren_engine::{
    Coordinator, CoordinatorConfig, DeadlineConfig, ExecutionMode, Explorer, Response, Strategy,
    TickOutcome,
};
use warren_logic::{Dfs, WallHugger};
use warren_test_utils::{pocket_maze, tree_maze, PocketLogic, POCKET_CELL};

const MODES: [ExecutionMode; 2] = [ExecutionMode::Inline, ExecutionMode::Threaded];

/// Generous deadlines so that a loaded machine does not turn a healthy
/// tick into a degraded one.
fn config(workers: usize, mode: ExecutionMode) -> CoordinatorConfig {
    CoordinatorConfig {
        worker_count: Some(workers),
        mode,
        deadline: DeadlineConfig {
            initial_ms: 2_000,
            cap_ms: 5_000,
            ..Default::default()
        },
        ..Default::default()
    }
}

// ── Scenario 1: single DFS worker ──────────────────────────────────

#[test]
fn single_dfs_worker_reaches_end_within_grid_area() {
    for mode in MODES {
        let maze = tree_maze();
        let limit = maze.size_matrix().pow(2);
        let mut c = Coordinator::new(Dfs, maze, config(1, mode)).unwrap();
        let mut calls = 0;
        let mut reached = false;
        while calls < limit && !reached {
            calls += 1;
            reached = c.step().1;
        }
        assert!(reached, "{mode}: no end after {calls} calls");
        assert_eq!(calls, 12, "{mode}");
        assert_eq!(c.best_position(), Position::new(5, 5));
    }
}

#[test]
fn visited_never_shrinks() {
    for mode in MODES {
        let mut c = Coordinator::new(Dfs, tree_maze(), config(2, mode)).unwrap();
        let mut prev = c.visited();
        for _ in 0..49 {
            let outcome = c.tick();
            let now = c.visited();
            assert!(prev.iter().all(|p| now.contains(p)), "{mode}");
            prev = now;
            if matches!(outcome, TickOutcome::AlreadyEnded) {
                break;
            }
        }
    }
}

// ── Scenario 2: two wall huggers ───────────────────────────────────

#[test]
fn left_and_right_huggers_finish() {
    for mode in MODES {
        let mut c = Coordinator::new(WallHugger::alternating(), tree_maze(), config(2, mode))
            .unwrap();
        for _ in 0..49 {
            if c.step().1 {
                break;
            }
        }
        c.cleanup();
        let status = c.status();
        let inactive = status
            .iter()
            .filter(|e| e.label.starts_with("Worker ") && e.value == "Inactive")
            .count();
        let reached = status
            .iter()
            .any(|e| e.label == "Reached End" && e.value == "Yes");
        assert!(inactive == 2 || reached, "{mode}: {status:?}");
        let sides: Vec<_> = status
            .iter()
            .filter(|e| e.label == "| Direction")
            .map(|e| e.value.clone())
            .collect();
        assert_eq!(sides, vec![Side::Left.to_string(), Side::Right.to_string()]);
    }
}

#[test]
fn wall_hugger_paths_are_mode_independent() {
    let trace = |mode| {
        let mut c =
            Coordinator::new(WallHugger::new(Side::Right), tree_maze(), config(1, mode)).unwrap();
        let mut path = Vec::new();
        while let (Some(positions), _) = c.step() {
            path.push(positions[0]);
        }
        path
    };
    assert_eq!(trace(ExecutionMode::Inline), trace(ExecutionMode::Threaded));
}

// ── Scenario 3: idempotence after the end ──────────────────────────

#[test]
fn step_after_end_is_a_no_op() {
    for mode in MODES {
        let mut explorer = Strategy::Bfs.launch(tree_maze(), config(2, mode)).unwrap();
        while !explorer.step().1 {}
        let visited = explorer.visited();
        let positions = explorer.current_positions();
        for _ in 0..5 {
            assert_eq!(explorer.step(), (None, true));
            assert_eq!(explorer.tick(), TickOutcome::AlreadyEnded);
        }
        assert_eq!(explorer.visited(), visited);
        assert_eq!(explorer.current_positions(), positions);
        assert!(explorer.reached_end());
    }
}

// ── Scenario 4: boxed-in worker ────────────────────────────────────

#[test]
fn boxed_in_worker_is_deactivated_and_skipped() {
    for mode in MODES {
        let logic = PocketLogic {
            trapped: WorkerId(0),
            pocket: POCKET_CELL,
        };
        let mut c = Coordinator::new(logic, pocket_maze(), config(2, mode)).unwrap();

        let first = c.tick();
        assert_eq!(
            first.positions().map(<[Position]>::to_vec),
            Some(vec![POCKET_CELL, Position::new(1, 2)]),
            "{mode}"
        );

        let second = c.tick();
        assert!(matches!(second, TickOutcome::Advanced { degraded: false, .. }));
        assert_eq!(c.metrics().participants, 1, "{mode}");
        assert!(!c.slots()[0].is_active());
        assert_eq!(c.slots()[0].response(), Response::Inactive);
        assert_eq!(c.slots()[0].steps_taken(), 1);
        assert_eq!(c.current_positions()[1], Position::new(1, 3));

        while !c.step().1 {}
        assert_eq!(c.current_positions()[0], POCKET_CELL);
        assert_eq!(c.best_position(), Position::new(5, 5));
    }
}

#[test]
fn all_workers_out_of_moves_reports_no_active_workers() {
    let logic = PocketLogic {
        trapped: WorkerId(0),
        pocket: POCKET_CELL,
    };
    let mut c = Coordinator::new(logic, pocket_maze(), config(1, ExecutionMode::Inline)).unwrap();
    assert!(c.step().0.is_some());
    assert_eq!(
        c.tick(),
        TickOutcome::NoActiveWorkers { reached_end: false }
    );
    assert_eq!(c.step(), (None, false));
}
