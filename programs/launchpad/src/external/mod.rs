//! Collaborators outside the launchpad's own state
//!
//! Each seam is a trait so the engine can be driven against in-memory
//! doubles (tests, keeper replay) or real chain adapters.

pub mod ledger;
pub mod pool;
pub mod bank;

pub use ledger::*;
pub use pool::*;
pub use bank::*;
