//! Buy tokens from the curve

use crate::events::{EventSink, LaunchpadEvent};
use crate::external::{NativeBank, PoolFactory, TokenLedger};
use crate::launchpad::{Launchpad, TxContext};
use launchpad_common::{checked_add, checked_sub, Address, LaunchpadError, LaunchpadResult};
use launchpad_curve::{apply_buy, check_graduation, FeeSplit};
use serde::{Deserialize, Serialize};

/// Where the token stands after a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GraduationStatus {
    /// Threshold not reached
    NotReady,
    /// Threshold reached but the pool does not exist yet; retry `graduate`
    Pending,
    Graduated { pool: Address },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyReceipt {
    pub token: Address,
    /// Gross payment
    pub okb_in: u128,
    pub fee: FeeSplit,
    pub tokens_out: u128,
    /// Spot price after the trade
    pub price: u128,
    pub graduation: GraduationStatus,
}

impl<L, P, B, E> Launchpad<L, P, B, E>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    /// Buy with `ctx.value`; the trade fee is split off before the curve
    ///
    /// Graduation is attempted right after the trade commits. A failing pool
    /// factory does not undo the buy: the receipt reports `Pending`.
    pub fn buy(&mut self, ctx: &TxContext, token: &Address, min_tokens_out: u128) -> LaunchpadResult<BuyReceipt> {
        let curve = self.registry.resolve(token)?;
        if !curve.active() {
            return Err(LaunchpadError::CurveInactive);
        }

        let fee = self.config.fees.split(ctx.value)?;
        let net = checked_sub(ctx.value, fee.total())?;
        let outcome = apply_buy(curve, net)?;

        if outcome.tokens_out < min_tokens_out {
            return Err(LaunchpadError::SlippageExceeded {
                minimum: min_tokens_out,
                actual: outcome.tokens_out,
            });
        }

        let creator = self.registry.token_info(token)?.creator;
        let treasury = checked_add(self.treasury, ctx.value)?;
        let launchpad_address = self.config.launchpad_address;

        self.ledger
            .transfer(token, &launchpad_address, &ctx.sender, outcome.tokens_out)?;
        self.registry.commit_curve(token, outcome.curve.clone())?;
        self.fees.accrue_trade(token, &creator, &fee)?;
        self.treasury = treasury;

        self.emit(LaunchpadEvent::TokensPurchased {
            token: *token,
            buyer: ctx.sender,
            okb_in: ctx.value,
            tokens_out: outcome.tokens_out,
            fee: fee.total(),
            price: outcome.price,
            timestamp: ctx.timestamp,
        });

        let graduation = self.graduate_after_trade(token, &outcome.curve, ctx.timestamp);

        Ok(BuyReceipt {
            token: *token,
            okb_in: ctx.value,
            fee,
            tokens_out: outcome.tokens_out,
            price: outcome.price,
            graduation,
        })
    }

    fn graduate_after_trade(
        &mut self,
        token: &Address,
        committed: &launchpad_curve::CurveState,
        timestamp: u64,
    ) -> GraduationStatus {
        if !check_graduation(committed, self.config.graduation_threshold).0 {
            return GraduationStatus::NotReady;
        }
        match self.graduate(token, timestamp) {
            Ok(outcome) => GraduationStatus::Graduated { pool: outcome.pool },
            Err(e) => {
                log::warn!("graduation of {} deferred: {}", token, e);
                GraduationStatus::Pending
            }
        }
    }
}
