//! Sell tokens back to the curve

use crate::events::{EventSink, LaunchpadEvent};
use crate::external::{NativeBank, PoolFactory, TokenLedger};
use crate::launchpad::{Launchpad, TxContext};
use launchpad_common::{checked_sub, Address, LaunchpadError, LaunchpadResult};
use launchpad_curve::{apply_sell, FeeSplit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellReceipt {
    pub token: Address,
    pub tokens_in: u128,
    /// Curve payout before fees
    pub gross_okb_out: u128,
    pub fee: FeeSplit,
    /// Paid to the seller
    pub net_okb_out: u128,
    pub price: u128,
}

impl<L, P, B, E> Launchpad<L, P, B, E>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    /// Let the launchpad pull up to `amount` of the sender's tokens
    pub fn approve(&mut self, ctx: &TxContext, token: &Address, amount: u128) -> LaunchpadResult<()> {
        if !self.registry.is_valid_token(token) {
            return Err(LaunchpadError::UnknownToken(*token));
        }
        let spender = self.config.launchpad_address;
        self.ledger.approve(token, &ctx.sender, &spender, amount);
        Ok(())
    }

    /// Sell `tokens_in`; requires a prior `approve` covering the amount
    pub fn sell(
        &mut self,
        ctx: &TxContext,
        token: &Address,
        tokens_in: u128,
        min_okb_out: u128,
    ) -> LaunchpadResult<SellReceipt> {
        let curve = self.registry.resolve(token)?;
        let outcome = apply_sell(curve, tokens_in, &self.config.fees)?;

        if outcome.net_okb_out < min_okb_out {
            return Err(LaunchpadError::SlippageExceeded {
                minimum: min_okb_out,
                actual: outcome.net_okb_out,
            });
        }

        let launchpad_address = self.config.launchpad_address;
        let have = self.ledger.balance_of(token, &ctx.sender);
        if have < tokens_in {
            return Err(LaunchpadError::InsufficientBalance { have, need: tokens_in });
        }
        let allowance = self.ledger.allowance(token, &ctx.sender, &launchpad_address);
        if allowance < tokens_in {
            return Err(LaunchpadError::InsufficientAllowance {
                allowance,
                need: tokens_in,
            });
        }

        let creator = self.registry.token_info(token)?.creator;
        let treasury = checked_sub(self.treasury, outcome.net_okb_out)?;

        self.ledger
            .transfer_from(token, &launchpad_address, &ctx.sender, &launchpad_address, tokens_in)?;

        if outcome.net_okb_out > 0 {
            if let Err(e) = self.bank.send(&ctx.sender, outcome.net_okb_out) {
                log::warn!("sell payout to {} failed, returning tokens: {}", ctx.sender, e);
                self.ledger
                    .transfer(token, &launchpad_address, &ctx.sender, tokens_in)?;
                self.ledger
                    .approve(token, &ctx.sender, &launchpad_address, allowance);
                return Err(e);
            }
        }

        self.registry.commit_curve(token, outcome.curve)?;
        self.fees.accrue_trade(token, &creator, &outcome.fee)?;
        self.treasury = treasury;

        self.emit(LaunchpadEvent::TokensSold {
            token: *token,
            seller: ctx.sender,
            tokens_in,
            okb_out: outcome.net_okb_out,
            fee: outcome.fee.total(),
            price: outcome.price,
            timestamp: ctx.timestamp,
        });

        Ok(SellReceipt {
            token: *token,
            tokens_in,
            gross_okb_out: outcome.gross_okb_out,
            fee: outcome.fee,
            net_okb_out: outcome.net_okb_out,
            price: outcome.price,
        })
    }
}
