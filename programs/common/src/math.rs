//! Fixed-point helpers with 256-bit intermediates
//!
//! Reserve products (`1e27 * 3e19`) overflow `u128`, so every
//! multiply-then-divide goes through `U256` and is narrowed back with a
//! checked conversion.

use crate::error::LaunchpadError;
use crate::types::BPS_SCALE;

#[allow(clippy::all)]
mod wide {
    uint::construct_uint! {
        /// 256-bit unsigned integer for intermediate products.
        pub struct U256(4);
    }
}

pub use wide::U256;

/// Narrow a `U256` to `u128`, failing on overflow
pub fn narrow(value: U256) -> Result<u128, LaunchpadError> {
    if value > U256::from(u128::MAX) {
        return Err(LaunchpadError::Overflow);
    }
    Ok(value.low_u128())
}

/// `floor(a * b / d)`
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Result<u128, LaunchpadError> {
    if d == 0 {
        return Err(LaunchpadError::Overflow);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(LaunchpadError::Overflow)?;
    narrow(product / U256::from(d))
}

/// `ceil(a * b / d)`
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Result<u128, LaunchpadError> {
    if d == 0 {
        return Err(LaunchpadError::Overflow);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(LaunchpadError::Overflow)?;
    let divisor = U256::from(d);
    let mut quotient = product / divisor;
    if !(product % divisor).is_zero() {
        quotient = quotient + U256::one();
    }
    narrow(quotient)
}

/// `floor(amount * bps / 10_000)`
pub fn bps_of(amount: u128, bps: u16) -> Result<u128, LaunchpadError> {
    mul_div_floor(amount, bps as u128, BPS_SCALE)
}

pub fn checked_add(a: u128, b: u128) -> Result<u128, LaunchpadError> {
    a.checked_add(b).ok_or(LaunchpadError::Overflow)
}

pub fn checked_sub(a: u128, b: u128) -> Result<u128, LaunchpadError> {
    a.checked_sub(b).ok_or(LaunchpadError::Overflow)
}
