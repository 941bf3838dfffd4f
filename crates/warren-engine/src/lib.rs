//! Lock-step coordination engine for Warren maze explorers.
//!
//! A [`Coordinator`] keeps a pool of workers in step: every
//! [`tick()`](Coordinator::tick) advances each ready worker by exactly
//! one move of its [`StepLogic`](warren_logic::StepLogic), with a
//! bounded, adaptive wait for slow workers. Workers run inline on the
//! driver thread or on their own threads ([`ExecutionMode`]); the mode
//! never changes what they compute.
//!
//! [`Explorer`] erases the step logic type, [`Strategy`] picks one of
//! the built-in logics at runtime, and [`Session`] runs an explorer to
//! completion under a [`StepBudget`], producing a [`RunReport`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
mod deadline;
pub mod explorer;
pub mod metrics;
pub mod session;
pub mod slot;
mod worker;

pub use config::{
    CoordinatorConfig, DeadlineConfig, ExecutionMode, SessionConfig, StepBudget, MAX_WORKERS,
};
pub use coordinator::{CleanupReport, Coordinator, TickOutcome};
pub use explorer::{Explorer, Strategy};
pub use metrics::TickMetrics;
pub use session::{RunReport, RunSummary, Session, StopReason};
pub use slot::{Response, WorkerSlot};
