//! Native currency (OKB) payouts from the launchpad

use launchpad_common::{checked_add, Address, LaunchpadError, LaunchpadResult};
use std::collections::HashMap;

pub trait NativeBank {
    /// Pay `amount` wei from the launchpad to `to`
    fn send(&mut self, to: &Address, amount: u128) -> LaunchpadResult<()>;
}

/// Records payouts per recipient
#[derive(Debug, Clone, Default)]
pub struct InMemoryBank {
    balances: HashMap<Address, u128>,
    fail_next: u32,
    /// Recipients whose transfers always fail (e.g. reverting contracts)
    rejecting: Vec<Address>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, who: &Address) -> u128 {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn fail_next(&mut self, count: u32) {
        self.fail_next = count;
    }

    pub fn reject_payments_to(&mut self, who: Address) {
        self.rejecting.push(who);
    }

    pub fn accept_payments_to(&mut self, who: &Address) {
        self.rejecting.retain(|r| r != who);
    }

    /// Total paid out across all recipients
    pub fn total_paid(&self) -> u128 {
        self.balances.values().sum()
    }
}

impl NativeBank for InMemoryBank {
    fn send(&mut self, to: &Address, amount: u128) -> LaunchpadResult<()> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(LaunchpadError::TransferFailed(format!(
                "send of {} to {} failed",
                amount, to
            )));
        }
        if self.rejecting.contains(to) {
            return Err(LaunchpadError::TransferFailed(format!("{} rejected payment", to)));
        }
        let balance = self.balances.entry(*to).or_insert(0);
        *balance = checked_add(*balance, amount)?;
        Ok(())
    }
}
