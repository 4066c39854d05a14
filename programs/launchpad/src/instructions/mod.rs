/// Launchpad instruction handlers

pub mod create_token;
pub mod buy;
pub mod sell;
pub mod claim;
pub mod admin;

pub use create_token::*;
pub use buy::*;
pub use sell::*;
