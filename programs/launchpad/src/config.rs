//! Launchpad parameters

use launchpad_common::units::serde_units;
use launchpad_common::{okb, tokens, Address, LaunchpadError, LaunchpadResult, BPS_SCALE};
use launchpad_curve::FeeSchedule;
use serde::{Deserialize, Serialize};

/// Default owner / fee recipient used by `LaunchpadConfig::default()`
pub const DEFAULT_OWNER: Address = Address([0x0a; 20]);

/// Ledger account that holds unsold supply for every token
pub const DEFAULT_LAUNCHPAD_ADDRESS: Address = Address([0x1a; 20]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    /// Admin allowed to withdraw platform fees and change the recipient
    pub owner: Address,

    /// Receives platform fees on withdrawal
    pub fee_recipient: Address,

    /// The launchpad's own account on the token ledger
    pub launchpad_address: Address,

    /// Initial virtual OKB reserve of every curve
    #[serde(with = "serde_units")]
    pub initial_virtual_okb: u128,

    /// Initial virtual token reserve of every curve
    #[serde(with = "serde_units")]
    pub initial_virtual_tokens: u128,

    /// Supply minted when the creator does not pick one
    #[serde(with = "serde_units")]
    pub default_total_supply: u128,

    /// OKB that must be collected before graduation
    #[serde(with = "serde_units")]
    pub graduation_threshold: u128,

    /// Share of collected OKB locked into the DEX pool (bps)
    pub liquidity_lock_bps: u16,

    /// Trade fees
    pub fees: FeeSchedule,

    /// Minimum `value` attached to `create_token`
    #[serde(with = "serde_units")]
    pub creation_fee: u128,

    pub max_symbol_len: usize,
    pub max_description_len: usize,
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER,
            fee_recipient: DEFAULT_OWNER,
            launchpad_address: DEFAULT_LAUNCHPAD_ADDRESS,
            initial_virtual_okb: okb(30),
            initial_virtual_tokens: tokens(1_000_000_000),
            default_total_supply: tokens(1_000_000_000),
            graduation_threshold: okb(80),
            liquidity_lock_bps: 4_500, // 45%
            fees: FeeSchedule::default(),
            creation_fee: okb(1) / 1_000, // 0.001 OKB
            max_symbol_len: 6,
            max_description_len: 280,
        }
    }
}

impl LaunchpadConfig {
    /// Reject parameter sets the curve cannot run with
    pub fn validate(&self) -> LaunchpadResult<()> {
        if self.initial_virtual_okb == 0 || self.initial_virtual_tokens == 0 {
            return Err(LaunchpadError::InvalidAmount);
        }
        if self.default_total_supply < self.initial_virtual_tokens {
            return Err(LaunchpadError::InvalidAmount);
        }
        // Graduation needs a non-zero OKB lock
        if self.liquidity_lock_bps == 0 || self.liquidity_lock_bps as u128 > BPS_SCALE {
            return Err(LaunchpadError::InvalidAmount);
        }
        self.fees.validate()
    }
}
