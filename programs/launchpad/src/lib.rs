//! Launchpad engine
//!
//! Token creation, curve trading, fee accounting and graduation behind a
//! single-writer [`Launchpad`]. Every state-changing call takes `&mut self`,
//! computes new state from the committed one and commits it whole, or
//! returns an error and leaves everything untouched.
//!
//! Chain-side effects go through four collaborator traits:
//! [`TokenLedger`], [`PoolFactory`], [`NativeBank`] and [`EventSink`].

pub mod config;
pub mod events;
pub mod external;
pub mod state;
pub mod launchpad;
pub mod instructions;
pub mod graduation;

// Always expose the dispatcher; the keeper replays instructions through it
pub mod entrypoint;

pub use config::*;
pub use events::*;
pub use external::*;
pub use state::*;
pub use launchpad::*;
pub use instructions::*;
pub use graduation::*;
pub use entrypoint::*;
