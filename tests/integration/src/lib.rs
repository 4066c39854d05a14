//! Launchpad integration tests
//!
//! Scenario tests drive the full engine (registry, curve, fees, graduation)
//! through its public surface against the in-memory collaborators. This
//! crate only holds shared fixtures; the tests live under `tests/`.

pub use launchpad_common;
pub use launchpad_core;
pub use launchpad_curve;

use launchpad_common::{okb, Address};
use launchpad_core::{CreateTokenParams, InMemoryLaunchpad, LaunchpadConfig, TxContext};

pub const CREATOR: Address = Address([0xc0; 20]);
pub const ALICE: Address = Address([0xa1; 20]);
pub const BOB: Address = Address([0xb0; 20]);

/// Creation fee of the default config
pub const CREATION_FEE: u128 = okb(1) / 1_000;

pub fn launchpad() -> InMemoryLaunchpad {
    launchpad_with(LaunchpadConfig::default())
}

pub fn launchpad_with(config: LaunchpadConfig) -> InMemoryLaunchpad {
    InMemoryLaunchpad::in_memory(config).expect("valid config")
}

/// Same as the default config but with no trade fees
pub fn fee_free_config() -> LaunchpadConfig {
    LaunchpadConfig {
        fees: launchpad_curve::FeeSchedule::ZERO,
        ..LaunchpadConfig::default()
    }
}

pub fn ctx(sender: Address, value: u128) -> TxContext {
    TxContext::new(sender, value, 1_700_000_000)
}

/// Launch a token from `CREATOR`
pub fn launch(lp: &mut InMemoryLaunchpad, symbol: &str) -> Address {
    lp.create_token(
        &ctx(CREATOR, CREATION_FEE),
        CreateTokenParams {
            name: format!("{} token", symbol),
            symbol: symbol.to_string(),
            image_uri: format!("ipfs://{}", symbol.to_lowercase()),
            description: "integration fixture".into(),
            total_supply: None,
        },
    )
    .expect("token creation")
}

/// Sell `amount` of `token` held by `seller`, approving first
pub fn approve_and_sell(
    lp: &mut InMemoryLaunchpad,
    seller: Address,
    token: &Address,
    amount: u128,
) -> launchpad_common::LaunchpadResult<launchpad_core::SellReceipt> {
    lp.approve(&ctx(seller, 0), token, amount)?;
    lp.sell(&ctx(seller, 0), token, amount, 0)
}
