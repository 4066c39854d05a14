//! Graduation phase transitions (pure)
//!
//! `begin_graduation` freezes the curve and the liquidity amounts;
//! `complete_graduation` records the pool once it exists. A failed pool
//! creation simply never calls `complete_graduation`, leaving the token in
//! `Graduating` with the same frozen lock for the next attempt.

use crate::state::{CurveState, LiquidityLock, Phase};
use launchpad_common::{bps_of, mul_div_floor, Address, LaunchpadError, LaunchpadResult};

/// `(can_graduate, okb_collected)`
///
/// True once the threshold is reached and the token has not graduated yet.
/// A token stuck in `Graduating` still reports true so the transition can be
/// retried.
pub fn check_graduation(curve: &CurveState, threshold: u128) -> (bool, u128) {
    let collected = curve.okb_collected();
    (collected >= threshold && !curve.graduated(), collected)
}

/// Liquidity for the DEX pool: `lock_bps` of the collected OKB plus the
/// tokens that keep the pool's opening price equal to the curve's final spot
/// price (`okb * y / x`).
pub fn compute_liquidity_lock(curve: &CurveState, lock_bps: u16) -> LaunchpadResult<LiquidityLock> {
    let okb_amount = bps_of(curve.okb_collected(), lock_bps)?;
    let token_amount = mul_div_floor(
        okb_amount,
        curve.virtual_token_reserve(),
        curve.virtual_okb_reserve(),
    )?;
    Ok(LiquidityLock {
        okb_amount,
        token_amount,
    })
}

/// Phase 1: `Active -> Graduating`
///
/// Returns the lock to hand to the pool factory and the frozen curve. On a
/// curve that is already `Graduating` the stored lock is returned unchanged.
pub fn begin_graduation(
    curve: &CurveState,
    threshold: u128,
    lock_bps: u16,
) -> LaunchpadResult<(LiquidityLock, CurveState)> {
    match curve.phase() {
        Phase::Graduated => Err(LaunchpadError::AlreadyGraduated),
        Phase::Graduating => {
            let lock = curve.liquidity_lock().ok_or(LaunchpadError::NotGraduating)?;
            Ok((lock, curve.clone()))
        }
        Phase::Active => {
            let (can_graduate, collected) = check_graduation(curve, threshold);
            if !can_graduate {
                return Err(LaunchpadError::ThresholdNotMet {
                    collected,
                    threshold,
                });
            }
            let lock = compute_liquidity_lock(curve, lock_bps)?;
            let frozen = curve.with_phase(Phase::Graduating, Some(lock), None);
            Ok((lock, frozen))
        }
    }
}

/// Phase 2: `Graduating -> Graduated`
pub fn complete_graduation(curve: &CurveState, pool: Address) -> LaunchpadResult<CurveState> {
    match curve.phase() {
        Phase::Graduated => Err(LaunchpadError::AlreadyGraduated),
        Phase::Active => Err(LaunchpadError::NotGraduating),
        Phase::Graduating => Ok(curve.with_phase(
            Phase::Graduated,
            curve.liquidity_lock(),
            Some(pool),
        )),
    }
}
