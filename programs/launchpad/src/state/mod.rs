pub mod registry;
pub mod fees;

pub use registry::*;
pub use fees::*;
