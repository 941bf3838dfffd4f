//! Single-threaded driver for exercising logics without the engine.

use warren_core::{Position, TickId, WorkerId};
use warren_maze::{Maze, Symbols};

use crate::context::StepContext;
use crate::logic::{Decision, StepLogic};
use crate::shared::SharedState;

// 3x3 perfect maze, S=(1,1), E=(5,5).
pub(crate) const TREE: &str = "\
#######
#S#...#
#.#.#.#
#...#.#
###.#.#
#...#E#
#######";

// Open 3x3 room with a loop around the centre pillar.
pub(crate) const LOOP: &str = "\
#######
#S....#
#.###.#
#.#.#.#
#.###.#
#....E#
#######";

pub(crate) fn maze(text: &str) -> Maze {
    Maze::parse(text, &Symbols::default()).unwrap()
}

pub(crate) struct Harness<L: StepLogic> {
    pub logic: L,
    pub maze: Maze,
    pub shared: SharedState<L::Shared>,
    pub locals: Vec<L::Local>,
    pub positions: Vec<Position>,
    pub active: Vec<bool>,
    tick: TickId,
}

impl<L: StepLogic> Harness<L> {
    pub fn new(logic: L, maze: Maze, workers: u32, seed: u64) -> Self {
        let shared = SharedState::new(maze.start_pos(), logic.init_shared(&maze));
        let locals = (0..workers)
            .map(|w| logic.init_local(WorkerId(w), &maze, seed))
            .collect();
        Self {
            positions: vec![maze.start_pos(); workers as usize],
            active: vec![true; workers as usize],
            logic,
            maze,
            shared,
            locals,
            tick: TickId(0),
        }
    }

    /// Run one tick over every active worker in id order.
    pub fn tick(&mut self) -> Vec<Option<Decision>> {
        self.tick = self.tick.next();
        let peers = self.positions.clone();
        let mut out = Vec::with_capacity(self.locals.len());
        for (i, local) in self.locals.iter_mut().enumerate() {
            if !self.active[i] || self.shared.reached_end() {
                out.push(None);
                continue;
            }
            if !self
                .logic
                .can_step(&self.maze, self.positions[i], &self.shared)
            {
                self.active[i] = false;
                out.push(None);
                continue;
            }
            let mut ctx = StepContext::new(
                WorkerId(i as u32),
                self.tick,
                &self.maze,
                self.positions[i],
                &self.shared,
                local,
                &peers,
            );
            let decision = self.logic.decide(&mut ctx).unwrap();
            match decision {
                Decision::Move(p) => {
                    assert!(self.maze.is_path(p), "{} moved onto {p}", self.logic.name());
                    self.positions[i] = p;
                    self.shared.commit(p, self.maze.is_end(p));
                }
                Decision::Stay => {}
                Decision::Exhausted => self.active[i] = false,
            }
            out.push(Some(decision));
        }
        out
    }

    /// Tick until the end is reached or every worker is inactive.
    /// Returns the number of ticks run.
    pub fn run(&mut self, limit: usize) -> usize {
        for n in 1..=limit {
            self.tick();
            if self.shared.reached_end() || !self.active.iter().any(|a| *a) {
                return n;
            }
        }
        limit
    }
}
