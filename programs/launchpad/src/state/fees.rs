//! Fee accrual and payout

use crate::external::NativeBank;
use launchpad_common::{checked_add, Address, LaunchpadError, LaunchpadResult};
use launchpad_curve::FeeSplit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifetime fees generated by one token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFeeTotals {
    pub platform: u128,
    pub creator: u128,
    pub trades: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FeeLedger {
    creator_rewards: HashMap<Address, u128>,
    platform_accrued: u128,
    per_token: HashMap<Address, TokenFeeTotals>,
}

impl FeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one trade's fee split
    pub fn accrue_trade(
        &mut self,
        token: &Address,
        creator: &Address,
        split: &FeeSplit,
    ) -> LaunchpadResult<()> {
        let reward = self.creator_rewards.get(creator).copied().unwrap_or(0);
        let reward = checked_add(reward, split.creator)?;
        let platform = checked_add(self.platform_accrued, split.platform)?;

        let mut totals = self.per_token.get(token).copied().unwrap_or_default();
        totals.platform = checked_add(totals.platform, split.platform)?;
        totals.creator = checked_add(totals.creator, split.creator)?;
        totals.trades += 1;

        self.creator_rewards.insert(*creator, reward);
        self.platform_accrued = platform;
        self.per_token.insert(*token, totals);
        Ok(())
    }

    /// Creation fees and graduation residue go to the platform
    pub fn accrue_platform(&mut self, amount: u128) -> LaunchpadResult<()> {
        self.platform_accrued = checked_add(self.platform_accrued, amount)?;
        Ok(())
    }

    /// Store a platform total computed with `checked_add` beforehand
    pub(crate) fn commit_platform(&mut self, total: u128) {
        self.platform_accrued = total;
    }

    pub fn accrue_creation_fee(&mut self, amount: u128) -> LaunchpadResult<()> {
        self.accrue_platform(amount)
    }

    pub fn pending_rewards(&self, creator: &Address) -> u128 {
        self.creator_rewards.get(creator).copied().unwrap_or(0)
    }

    pub fn platform_fees(&self) -> u128 {
        self.platform_accrued
    }

    pub fn token_fees(&self, token: &Address) -> TokenFeeTotals {
        self.per_token.get(token).copied().unwrap_or_default()
    }

    /// Sum of all creator balances not yet claimed
    pub fn total_pending_rewards(&self) -> u128 {
        self.creator_rewards.values().sum()
    }

    /// Pay out `creator`'s whole balance
    ///
    /// The balance is zeroed before the transfer and restored if the
    /// transfer fails.
    pub fn claim<B: NativeBank>(&mut self, creator: &Address, bank: &mut B) -> LaunchpadResult<u128> {
        let amount = self.creator_rewards.remove(creator).unwrap_or(0);
        if amount == 0 {
            return Err(LaunchpadError::NothingToClaim(*creator));
        }

        if let Err(e) = bank.send(creator, amount) {
            log::warn!("reward claim by {} failed, balance restored: {}", creator, e);
            self.creator_rewards.insert(*creator, amount);
            return Err(e);
        }
        Ok(amount)
    }

    /// Pay the whole platform bucket to `recipient`
    pub fn withdraw_platform<B: NativeBank>(
        &mut self,
        recipient: &Address,
        bank: &mut B,
    ) -> LaunchpadResult<u128> {
        let amount = std::mem::take(&mut self.platform_accrued);
        if amount == 0 {
            return Err(LaunchpadError::NothingToClaim(*recipient));
        }

        if let Err(e) = bank.send(recipient, amount) {
            log::warn!("platform withdrawal to {} failed: {}", recipient, e);
            self.platform_accrued = amount;
            return Err(e);
        }
        Ok(amount)
    }
}
