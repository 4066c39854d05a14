//! Launchpad bonding curve - virtual constant product (x·y=k)
//!
//! Pure pricing and state-transition logic. Every function takes the current
//! committed `CurveState` by reference and returns a new value; nothing here
//! mutates shared state, so a caller either commits the whole result or
//! nothing.
//!
//! ```text
//!   ┌────────┐  okb_collected >= threshold  ┌────────────┐   pool created   ┌───────────┐
//!   │ Active │ ───────────────────────────▶ │ Graduating │ ───────────────▶ │ Graduated │
//!   └────────┘                              └────────────┘                  └───────────┘
//!                                             │      ▲
//!                                             └──────┘ pool creation failed (retry)
//! ```

pub mod state;
pub mod fees;
pub mod math;
pub mod graduation;

pub use state::*;
pub use fees::*;
pub use math::*;
pub use graduation::*;
