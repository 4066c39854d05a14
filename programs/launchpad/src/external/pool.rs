//! DEX pool factory

use launchpad_common::Address;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("pool already exists for token {0}")]
    AlreadyExists(Address),
    #[error("zero liquidity")]
    ZeroLiquidity,
    #[error("factory unavailable: {0}")]
    Unavailable(String),
}

pub trait PoolFactory {
    /// Create a token/OKB pool seeded with the given liquidity
    fn create_pool(
        &mut self,
        token: &Address,
        okb_amount: u128,
        token_amount: u128,
    ) -> Result<Address, PoolError>;
}

/// Liquidity a pool was created with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolRecord {
    pub pool: Address,
    pub okb_amount: u128,
    pub token_amount: u128,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPoolFactory {
    /// Address pools are derived from
    pub factory_address: Address,
    pools: HashMap<Address, PoolRecord>,
    fail_next: u32,
    nonce: u64,
}

impl InMemoryPoolFactory {
    pub fn new(factory_address: Address) -> Self {
        Self {
            factory_address,
            ..Self::default()
        }
    }

    /// Make the next `count` calls fail with `Unavailable`
    pub fn fail_next(&mut self, count: u32) {
        self.fail_next = count;
    }

    pub fn pool_for(&self, token: &Address) -> Option<&PoolRecord> {
        self.pools.get(token)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }
}

impl PoolFactory for InMemoryPoolFactory {
    fn create_pool(
        &mut self,
        token: &Address,
        okb_amount: u128,
        token_amount: u128,
    ) -> Result<Address, PoolError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(PoolError::Unavailable("injected failure".into()));
        }
        if okb_amount == 0 || token_amount == 0 {
            return Err(PoolError::ZeroLiquidity);
        }
        if self.pools.contains_key(token) {
            return Err(PoolError::AlreadyExists(*token));
        }

        let pool = Address::derive(&self.factory_address, self.nonce);
        self.nonce += 1;
        self.pools.insert(
            *token,
            PoolRecord {
                pool,
                okb_amount,
                token_amount,
            },
        );
        Ok(pool)
    }
}
