//! Random walkers with four dead-end policies.

use std::collections::HashMap;
use std::fmt;

use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use warren_core::{LogicError, Position, WorkerId};
use warren_maze::{LegalMoves, Maze};

use crate::context::StepContext;
use crate::logic::{Decision, StatusEntry, StepLogic};

/// What a wanderer does once every legal neighbour has been visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WanderPolicy {
    /// Pop the breadcrumb trail and return to the previous cell. With the
    /// trail down to its root, take any legal move.
    Backtrack,
    /// As [`Backtrack`](Self::Backtrack), but with the trail down to its
    /// root jump onto a random peer's position instead.
    JumpToPeer,
    /// Take the legal neighbour with the lowest visit weight and bump
    /// that weight. Ties are broken at random.
    Weighted,
    /// Ignore the visited set altogether; every move is uniform over the
    /// legal moves. May cycle forever.
    Confused,
}

impl WanderPolicy {
    /// Lowercase name, as shown in status views.
    pub fn name(self) -> &'static str {
        match self {
            WanderPolicy::Backtrack => "backtrack",
            WanderPolicy::JumpToPeer => "jump-to-peer",
            WanderPolicy::Weighted => "weighted",
            WanderPolicy::Confused => "confused",
        }
    }
}

impl fmt::Display for WanderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Random exploration preferring unvisited cells.
///
/// Each worker draws from its own `ChaCha8Rng` seeded with
/// `seed ^ worker_id`, so an inline run is reproducible for a given
/// session seed.
#[derive(Clone, Copy, Debug)]
pub struct Wanderer {
    policy: WanderPolicy,
}

impl Wanderer {
    /// A wanderer with the given dead-end policy.
    pub fn new(policy: WanderPolicy) -> Self {
        Self { policy }
    }
}

/// A wanderer worker's RNG and breadcrumb trail.
#[derive(Clone, Debug)]
pub struct WandererTrail {
    rng: ChaCha8Rng,
    breadcrumbs: Vec<Position>,
}

impl WandererTrail {
    /// Length of the breadcrumb trail, its root included.
    pub fn breadcrumbs(&self) -> usize {
        self.breadcrumbs.len()
    }
}

/// Per-cell visit weights, used by [`WanderPolicy::Weighted`].
#[derive(Clone, Debug, Default)]
pub struct VisitWeights {
    weights: HashMap<Position, u32>,
}

impl VisitWeights {
    /// Weight of `pos` (zero if never chosen).
    pub fn weight(&self, pos: Position) -> u32 {
        self.weights.get(&pos).copied().unwrap_or(0)
    }

    fn bump(&mut self, pos: Position) {
        *self.weights.entry(pos).or_insert(0) += 1;
    }
}

impl StepLogic for Wanderer {
    type Shared = VisitWeights;
    type Local = WandererTrail;

    fn name(&self) -> &str {
        "Wanderer"
    }

    fn init_shared(&self, _maze: &Maze) -> VisitWeights {
        VisitWeights::default()
    }

    fn init_local(&self, worker: WorkerId, maze: &Maze, seed: u64) -> WandererTrail {
        WandererTrail {
            rng: ChaCha8Rng::seed_from_u64(seed ^ u64::from(worker.0)),
            breadcrumbs: vec![maze.start_pos()],
        }
    }

    fn decide(
        &self,
        ctx: &mut StepContext<'_, VisitWeights, WandererTrail>,
    ) -> Result<Decision, LogicError> {
        let legal = ctx.legal_moves();
        if legal.is_empty() {
            return Ok(Decision::Exhausted);
        }
        match self.policy {
            WanderPolicy::Confused => {
                let trail = ctx.local();
                Ok(pick(&legal, &mut trail.rng))
            }
            WanderPolicy::Weighted => Ok(self.weighted(ctx, &legal)),
            WanderPolicy::Backtrack | WanderPolicy::JumpToPeer => Ok(self.trail(ctx, &legal)),
        }
    }

    fn local_status(&self, local: &WandererTrail) -> Vec<StatusEntry> {
        vec![StatusEntry::new("Breadcrumbs", local.breadcrumbs())]
    }

    fn shared_status(&self, _shared: &VisitWeights) -> Vec<StatusEntry> {
        vec![
            StatusEntry::new("Policy", self.policy),
            StatusEntry::new(
                "Confused",
                if self.policy == WanderPolicy::Confused {
                    "Yes"
                } else {
                    "No"
                },
            ),
        ]
    }
}

impl Wanderer {
    fn weighted(
        &self,
        ctx: &mut StepContext<'_, VisitWeights, WandererTrail>,
        legal: &LegalMoves,
    ) -> Decision {
        let shared = ctx.shared();
        let trail = ctx.local();
        let mut exploration = shared.lock();
        let unvisited: LegalMoves = legal
            .iter()
            .copied()
            .filter(|&p| !exploration.is_visited(p))
            .collect();
        let weights = exploration.state_mut();
        let candidates: LegalMoves = if unvisited.is_empty() {
            let least = legal.iter().map(|&p| weights.weight(p)).min().unwrap_or(0);
            legal
                .iter()
                .copied()
                .filter(|&p| weights.weight(p) == least)
                .collect()
        } else {
            unvisited
        };
        let decision = pick(&candidates, &mut trail.rng);
        if let Decision::Move(p) = decision {
            weights.bump(p);
        }
        decision
    }

    fn trail(
        &self,
        ctx: &mut StepContext<'_, VisitWeights, WandererTrail>,
        legal: &LegalMoves,
    ) -> Decision {
        let unvisited: LegalMoves = {
            let exploration = ctx.shared().lock();
            legal
                .iter()
                .copied()
                .filter(|&p| !exploration.is_visited(p))
                .collect()
        };
        let me = ctx.worker().index();
        let peers: SmallVec<[Position; 8]> = ctx
            .peers()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != me)
            .map(|(_, &p)| p)
            .collect();
        let policy = self.policy;
        let trail = ctx.local();

        if let Some(&next) = unvisited.choose(&mut trail.rng) {
            trail.breadcrumbs.push(next);
            return Decision::Move(next);
        }
        if trail.breadcrumbs.len() <= 1 {
            if policy == WanderPolicy::JumpToPeer {
                if let Some(&peer) = peers.choose(&mut trail.rng) {
                    trail.breadcrumbs.clear();
                    trail.breadcrumbs.push(peer);
                    return Decision::Move(peer);
                }
            }
            let decision = pick(legal, &mut trail.rng);
            if let Decision::Move(p) = decision {
                trail.breadcrumbs.push(p);
            }
            return decision;
        }
        trail.breadcrumbs.pop();
        match trail.breadcrumbs.last() {
            Some(&prev) => Decision::Move(prev),
            None => Decision::Exhausted,
        }
    }
}

fn pick(moves: &[Position], rng: &mut ChaCha8Rng) -> Decision {
    moves
        .choose(rng)
        .map_or(Decision::Exhausted, |&p| Decision::Move(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{maze, Harness, LOOP, TREE};
    use proptest::prelude::*;
    use crate::SharedState;
    use warren_core::TickId;
    use warren_maze::{MazeGenerator, Placement};

    fn trajectory(policy: WanderPolicy, seed: u64) -> Vec<Position> {
        let mut h = Harness::new(Wanderer::new(policy), maze(LOOP), 2, seed);
        let mut out = Vec::new();
        for _ in 0..15 {
            h.tick();
            out.extend(h.positions.iter().copied());
        }
        out
    }

    #[test]
    fn same_seed_same_walk() {
        for policy in [
            WanderPolicy::Backtrack,
            WanderPolicy::JumpToPeer,
            WanderPolicy::Weighted,
            WanderPolicy::Confused,
        ] {
            assert_eq!(trajectory(policy, 11), trajectory(policy, 11), "{policy}");
        }
    }

    #[test]
    fn workers_get_distinct_streams() {
        let logic = Wanderer::new(WanderPolicy::Confused);
        let m = maze(LOOP);
        let a = logic.init_local(WorkerId(0), &m, 5);
        let b = logic.init_local(WorkerId(1), &m, 5);
        assert_ne!(a.rng, b.rng);
    }

    #[test]
    fn backtrack_reaches_the_end_of_a_tree() {
        let mut h = Harness::new(Wanderer::new(WanderPolicy::Backtrack), maze(TREE), 1, 3);
        h.run(200);
        assert!(h.shared.reached_end());
    }

    #[test]
    fn backtrack_steps_back_along_the_trail() {
        // Corridor with a dead end: S(1,1) -> (1,2) -> (1,3), end below S.
        let text = "\
#####
#S..#
#.###
#..E#
#####";
        let mut h = Harness::new(Wanderer::new(WanderPolicy::Backtrack), maze(text), 1, 0);
        h.shared.commit(Position::new(2, 1), false);
        h.tick();
        h.tick();
        assert_eq!(h.positions[0], Position::new(1, 3));
        assert_eq!(h.locals[0].breadcrumbs(), 3);
        assert_eq!(h.tick(), vec![Some(Decision::Move(Position::new(1, 2)))]);
        assert_eq!(h.locals[0].breadcrumbs(), 2);
    }

    #[test]
    fn jump_to_peer_lands_on_another_worker() {
        let m = maze(TREE);
        let logic = Wanderer::new(WanderPolicy::JumpToPeer);
        let shared = SharedState::new(m.start_pos(), logic.init_shared(&m));
        // Every neighbour of the start already visited, trail at its root.
        shared.commit(Position::new(2, 1), false);
        let mut local = logic.init_local(WorkerId(0), &m, 0);
        let peers = [m.start_pos(), Position::new(3, 3)];
        let mut ctx = StepContext::new(
            WorkerId(0),
            TickId(1),
            &m,
            m.start_pos(),
            &shared,
            &mut local,
            &peers,
        );
        assert_eq!(
            logic.decide(&mut ctx).unwrap(),
            Decision::Move(Position::new(3, 3))
        );
        assert_eq!(local.breadcrumbs, vec![Position::new(3, 3)]);
    }

    #[test]
    fn weighted_prefers_least_visited() {
        let m = maze(LOOP);
        let logic = Wanderer::new(WanderPolicy::Weighted);
        let shared = SharedState::new(m.start_pos(), logic.init_shared(&m));
        shared.commit(Position::new(1, 2), false);
        shared.commit(Position::new(2, 1), false);
        shared.lock().state_mut().bump(Position::new(1, 2));
        let mut local = logic.init_local(WorkerId(0), &m, 0);
        let peers = [m.start_pos()];
        let mut ctx = StepContext::new(
            WorkerId(0),
            TickId(1),
            &m,
            m.start_pos(),
            &shared,
            &mut local,
            &peers,
        );
        assert_eq!(
            logic.decide(&mut ctx).unwrap(),
            Decision::Move(Position::new(2, 1))
        );
        assert_eq!(shared.lock().state().weight(Position::new(2, 1)), 1);
    }

    #[test]
    fn confused_status_flag() {
        let logic = Wanderer::new(WanderPolicy::Confused);
        let status = logic.shared_status(&VisitWeights::default());
        assert!(status.contains(&StatusEntry::new("Confused", "Yes")));
    }

    proptest! {
        #[test]
        fn every_move_is_a_path_cell(seed in any::<u64>(), policy in 0usize..4) {
            let policy = [
                WanderPolicy::Backtrack,
                WanderPolicy::JumpToPeer,
                WanderPolicy::Weighted,
                WanderPolicy::Confused,
            ][policy];
            let m = MazeGenerator::new(seed)
                .generate_maze(4, Placement::TopLeft, Placement::BottomRight)
                .unwrap();
            // The harness asserts legality of every move it applies.
            let mut h = Harness::new(Wanderer::new(policy), m, 3, seed);
            h.run(64);
            let visited = h.shared.visited();
            prop_assert!(visited.iter().all(|&p| h.maze.is_path(p)));
        }
    }
}
