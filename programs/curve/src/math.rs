//! Virtual-reserve constant product math (x·y=k)
//!
//! x = virtual OKB reserve, y = virtual token reserve. The `k / (reserve + in)`
//! term is always rounded up so the curve never pays out more than the
//! invariant allows and `x·y` can only grow.

use crate::fees::{FeeSchedule, FeeSplit};
use crate::state::CurveState;
use launchpad_common::{
    checked_add, checked_sub, mul_div_ceil, mul_div_floor, LaunchpadError, LaunchpadResult,
    BPS_SCALE, PRICE_SCALE,
};
use serde::{Deserialize, Serialize};

/// Result of applying a buy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyOutcome {
    /// Tokens issued to the buyer
    pub tokens_out: u128,

    /// Curve after the trade
    pub curve: CurveState,

    /// Spot price after the trade (scaled by PRICE_SCALE)
    pub price: u128,
}

/// Result of applying a sell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellOutcome {
    /// OKB released by the curve before fees
    pub gross_okb_out: u128,

    /// Fee taken from the gross payout
    pub fee: FeeSplit,

    /// OKB paid to the seller (gross - fee)
    pub net_okb_out: u128,

    /// Curve after the trade
    pub curve: CurveState,

    /// Spot price after the trade (scaled by PRICE_SCALE)
    pub price: u128,
}

/// Calculate tokens out for `okb_in` entering the curve
///
/// - x1 = x0 + Δx_in
/// - y1 = ceil(x0·y0 / x1)
/// - Δy_out = y0 - y1
///
/// y1 >= 1, so Δy_out < y0 strictly.
pub fn quote_buy(curve: &CurveState, okb_in: u128) -> LaunchpadResult<u128> {
    if !curve.active() {
        return Err(LaunchpadError::CurveInactive);
    }
    if okb_in == 0 {
        return Err(LaunchpadError::InvalidAmount);
    }

    let x0 = curve.virtual_okb_reserve();
    let y0 = curve.virtual_token_reserve();

    let x1 = checked_add(x0, okb_in)?;
    let y1 = mul_div_ceil(x0, y0, x1)?;

    let tokens_out = checked_sub(y0, y1)?;
    if tokens_out == 0 {
        // Dust input below one token unit
        return Err(LaunchpadError::InvalidAmount);
    }

    Ok(tokens_out)
}

/// Calculate OKB out (before fees) for `tokens_in` returned to the curve
///
/// - y1 = y0 + Δy_in
/// - x1 = ceil(x0·y0 / y1)
/// - Δx_out = x0 - x1
pub fn quote_sell(curve: &CurveState, tokens_in: u128) -> LaunchpadResult<u128> {
    if !curve.active() {
        return Err(LaunchpadError::CurveInactive);
    }
    if tokens_in == 0 {
        return Err(LaunchpadError::InvalidAmount);
    }
    if tokens_in > curve.tokens_sold() {
        return Err(LaunchpadError::InsufficientReserve {
            requested: tokens_in,
            available: curve.tokens_sold(),
        });
    }

    let x0 = curve.virtual_okb_reserve();
    let y0 = curve.virtual_token_reserve();

    let y1 = checked_add(y0, tokens_in)?;
    let x1 = mul_div_ceil(x0, y0, y1)?;

    let okb_out = checked_sub(x0, x1)?;
    if okb_out == 0 {
        return Err(LaunchpadError::InvalidAmount);
    }

    Ok(okb_out)
}

/// Apply a buy of `okb_in` (already net of any fee)
pub fn apply_buy(curve: &CurveState, okb_in: u128) -> LaunchpadResult<BuyOutcome> {
    let tokens_out = quote_buy(curve, okb_in)?;

    let next = curve.with_reserves(
        checked_add(curve.virtual_okb_reserve(), okb_in)?,
        checked_sub(curve.virtual_token_reserve(), tokens_out)?,
        checked_add(curve.okb_collected(), okb_in)?,
        checked_add(curve.tokens_sold(), tokens_out)?,
    );
    let price = current_price(&next)?;

    log::debug!(
        "curve buy: okb_in={} tokens_out={} price={}",
        okb_in,
        tokens_out,
        price
    );

    Ok(BuyOutcome {
        tokens_out,
        curve: next,
        price,
    })
}

/// Apply a sell of `tokens_in`
///
/// Reserves move by the gross payout; the fee is carved out of it and never
/// re-enters the reserves.
pub fn apply_sell(
    curve: &CurveState,
    tokens_in: u128,
    fees: &FeeSchedule,
) -> LaunchpadResult<SellOutcome> {
    let gross_okb_out = quote_sell(curve, tokens_in)?;
    let fee = fees.split(gross_okb_out)?;
    let net_okb_out = checked_sub(gross_okb_out, fee.total())?;

    let next = curve.with_reserves(
        checked_sub(curve.virtual_okb_reserve(), gross_okb_out)?,
        checked_add(curve.virtual_token_reserve(), tokens_in)?,
        checked_sub(curve.okb_collected(), gross_okb_out)?,
        checked_sub(curve.tokens_sold(), tokens_in)?,
    );
    let price = current_price(&next)?;

    log::debug!(
        "curve sell: tokens_in={} gross={} net={} price={}",
        tokens_in,
        gross_okb_out,
        net_okb_out,
        price
    );

    Ok(SellOutcome {
        gross_okb_out,
        fee,
        net_okb_out,
        curve: next,
        price,
    })
}

/// Spot price: x / y, in wei per whole token (scaled by PRICE_SCALE)
pub fn current_price(curve: &CurveState) -> LaunchpadResult<u128> {
    mul_div_floor(
        curve.virtual_okb_reserve(),
        PRICE_SCALE,
        curve.virtual_token_reserve(),
    )
}

/// Fully diluted market cap at spot price (wei)
pub fn market_cap(curve: &CurveState, total_supply: u128) -> LaunchpadResult<u128> {
    mul_div_floor(current_price(curve)?, total_supply, PRICE_SCALE)
}

/// OKB still to collect before graduation is possible
pub fn okb_to_graduation(curve: &CurveState, threshold: u128) -> u128 {
    threshold.saturating_sub(curve.okb_collected())
}

/// Progress toward the graduation threshold, capped at 10,000 bps
pub fn graduation_progress_bps(curve: &CurveState, threshold: u128) -> u16 {
    if threshold == 0 {
        return BPS_SCALE as u16;
    }
    let progress = mul_div_floor(curve.okb_collected(), BPS_SCALE, threshold)
        .unwrap_or(BPS_SCALE)
        .min(BPS_SCALE);
    progress as u16
}

/// One sample of the price curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub okb_collected: u128,
    pub tokens_sold: u128,
    pub price: u128,
}

/// Sample the curve forward from its current state in `steps` buys of
/// `okb_step` each. Stops early if a step cannot be quoted.
pub fn sample_curve(curve: &CurveState, okb_step: u128, steps: usize) -> Vec<CurvePoint> {
    let mut points = Vec::with_capacity(steps + 1);
    let mut cursor = curve.clone();

    if let Ok(price) = current_price(&cursor) {
        points.push(CurvePoint {
            okb_collected: cursor.okb_collected(),
            tokens_sold: cursor.tokens_sold(),
            price,
        });
    }

    for _ in 0..steps {
        match apply_buy(&cursor, okb_step) {
            Ok(outcome) => {
                points.push(CurvePoint {
                    okb_collected: outcome.curve.okb_collected(),
                    tokens_sold: outcome.curve.tokens_sold(),
                    price: outcome.price,
                });
                cursor = outcome.curve;
            }
            Err(_) => break,
        }
    }

    points
}
