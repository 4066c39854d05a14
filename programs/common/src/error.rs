//! Launchpad error taxonomy
//!
//! Every error is terminal for the operation that raised it: no state is
//! committed and nothing is retried internally.

use crate::types::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchpadError {
    /// Zero or otherwise malformed trade size
    #[error("invalid amount")]
    InvalidAmount,

    /// Trade against a curve that is graduating or graduated
    #[error("bonding curve is not active")]
    CurveInactive,

    /// Sell larger than the tokens ever issued by the curve
    #[error("insufficient curve reserve: {requested} requested, {available} sold")]
    InsufficientReserve { requested: u128, available: u128 },

    #[error("unknown token {0}")]
    UnknownToken(Address),

    #[error("token has already graduated")]
    AlreadyGraduated,

    #[error("insufficient creation fee: required {required}, provided {provided}")]
    InsufficientFee { required: u128, provided: u128 },

    #[error("graduation threshold not met: {collected} of {threshold} collected")]
    ThresholdNotMet { collected: u128, threshold: u128 },

    /// Completing graduation on a token that never started it
    #[error("token is not graduating")]
    NotGraduating,

    /// DEX pool creation failed; the token stays in the graduating phase
    #[error("pool creation failed: {0}")]
    PoolCreationFailed(String),

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },

    #[error("insufficient allowance: approved {allowance}, need {need}")]
    InsufficientAllowance { allowance: u128, need: u128 },

    #[error("slippage exceeded: minimum {minimum}, actual {actual}")]
    SlippageExceeded { minimum: u128, actual: u128 },

    #[error("nothing to claim for {0}")]
    NothingToClaim(Address),

    #[error("transfer failed: {0}")]
    TransferFailed(String),

    #[error("unauthorized caller {0}")]
    Unauthorized(Address),

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("arithmetic overflow")]
    Overflow,
}

impl LaunchpadError {
    /// Whether resubmitting the same operation later can succeed without any
    /// other state changing first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LaunchpadError::PoolCreationFailed(_) | LaunchpadError::TransferFailed(_)
        )
    }
}

pub type LaunchpadResult<T> = Result<T, LaunchpadError>;
