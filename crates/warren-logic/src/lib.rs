//! Step logics for Warren maze explorers.
//!
//! A [`StepLogic`] decides one move for one worker. The engine owns all
//! storage: algorithm-wide state lives in a [`SharedState`] behind the
//! coordinator's lock, and per-worker state is an opaque value handed
//! back to the logic on every call through a [`StepContext`].
//!
//! Four families are provided: [`Dfs`], [`Bfs`], [`Wanderer`] (with its
//! [`WanderPolicy`] variants) and [`WallHugger`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bfs;
pub mod context;
pub mod dfs;
pub mod logic;
pub mod shared;
pub mod wall_hugger;
pub mod wanderer;

pub use bfs::{Bfs, BfsFrontier};
pub use context::StepContext;
pub use dfs::{Dfs, DfsStack};
pub use logic::{Decision, StatusEntry, StepLogic};
pub use shared::{Exploration, SharedState};
pub use wall_hugger::{HuggerState, WallHugger};
pub use wanderer::{VisitWeights, WanderPolicy, Wanderer, WandererTrail};

#[cfg(test)]
mod testing;
