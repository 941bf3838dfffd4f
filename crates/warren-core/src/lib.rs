//! Core types and traits for the Warren maze exploration engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the grid coordinate and direction types, worker and tick identifiers,
//! and the error taxonomy shared by every other Warren crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod position;

pub use error::{ConfigError, Endpoint, LogicError};
pub use id::{TickId, WorkerId};
pub use position::{Direction, Position, Side};
