//! Shared types for the launchpad engine crates
//!
//! Identifiers, amount units, 256-bit intermediate math and the error
//! taxonomy used by the curve engine and the launchpad.

pub mod types;
pub mod units;
pub mod math;
pub mod error;

pub use types::*;
pub use units::{format_units, parse_units};
pub use math::*;
pub use error::*;
