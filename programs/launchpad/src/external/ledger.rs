//! Fungible token ledger (ERC-20 style balances and allowances)

use launchpad_common::{checked_add, Address, LaunchpadError, LaunchpadResult};
use std::collections::HashMap;

pub trait TokenLedger {
    /// Create `amount` new units of `token` owned by `to`
    fn mint(&mut self, token: &Address, to: &Address, amount: u128) -> LaunchpadResult<()>;

    fn balance_of(&self, token: &Address, holder: &Address) -> u128;

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()>;

    /// Set (not add to) the allowance of `spender` over `owner`'s balance
    fn approve(&mut self, token: &Address, owner: &Address, spender: &Address, amount: u128);

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> u128;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// allowance
    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()>;

    fn total_supply(&self, token: &Address) -> u128;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenLedger {
    balances: HashMap<(Address, Address), u128>,
    allowances: HashMap<(Address, Address, Address), u128>,
    supply: HashMap<Address, u128>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn mint(&mut self, token: &Address, to: &Address, amount: u128) -> LaunchpadResult<()> {
        let supply = self.supply.entry(*token).or_insert(0);
        *supply = checked_add(*supply, amount)?;
        let balance = self.balances.entry((*token, *to)).or_insert(0);
        *balance = checked_add(*balance, amount)?;
        Ok(())
    }

    fn balance_of(&self, token: &Address, holder: &Address) -> u128 {
        self.balances.get(&(*token, *holder)).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        let have = self.balance_of(token, from);
        if have < amount {
            return Err(LaunchpadError::InsufficientBalance { have, need: amount });
        }
        if from == to {
            return Ok(());
        }
        let credited = checked_add(self.balance_of(token, to), amount)?;
        self.balances.insert((*token, *from), have - amount);
        self.balances.insert((*token, *to), credited);
        Ok(())
    }

    fn approve(&mut self, token: &Address, owner: &Address, spender: &Address, amount: u128) {
        self.allowances.insert((*token, *owner, *spender), amount);
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        let allowance = self.allowance(token, from, spender);
        if allowance < amount {
            return Err(LaunchpadError::InsufficientAllowance {
                allowance,
                need: amount,
            });
        }
        self.transfer(token, from, to, amount)?;
        self.approve(token, from, spender, allowance - amount);
        Ok(())
    }

    fn total_supply(&self, token: &Address) -> u128 {
        self.supply.get(token).copied().unwrap_or(0)
    }
}
