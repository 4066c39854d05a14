//! Launchpad facade: registry, fee ledger and collaborators behind one
//! single-writer owner

use crate::config::LaunchpadConfig;
use crate::events::{EventSink, InMemoryEventLog, LaunchpadEvent};
use crate::external::{InMemoryBank, InMemoryPoolFactory, InMemoryTokenLedger, NativeBank, PoolFactory, TokenLedger};
use crate::state::{FeeLedger, RegistryStats, TokenInfo, TokenRegistry};
use launchpad_common::{checked_sub, Address, LaunchpadResult};
use launchpad_curve::{
    current_price, graduation_progress_bps, market_cap, okb_to_graduation, quote_buy, quote_sell,
    CurveInfo, CurvePoint, Phase,
};
use serde::{Deserialize, Serialize};

/// Caller context of a state-changing call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxContext {
    pub sender: Address,
    /// Native currency attached to the call (wei)
    #[serde(default, with = "launchpad_common::units::serde_units")]
    pub value: u128,
    /// Unix seconds
    #[serde(default)]
    pub timestamp: u64,
}

impl TxContext {
    pub fn new(sender: Address, value: u128, timestamp: u64) -> Self {
        Self {
            sender,
            value,
            timestamp,
        }
    }
}

pub struct Launchpad<L, P, B, E> {
    pub(crate) config: LaunchpadConfig,
    pub(crate) registry: TokenRegistry,
    pub(crate) fees: FeeLedger,
    pub(crate) ledger: L,
    pub(crate) pools: P,
    pub(crate) bank: B,
    pub(crate) events: E,
    /// Tokens created so far, feeds id derivation
    pub(crate) nonce: u64,
    /// Native currency held by the launchpad
    pub(crate) treasury: u128,
}

pub type InMemoryLaunchpad =
    Launchpad<InMemoryTokenLedger, InMemoryPoolFactory, InMemoryBank, InMemoryEventLog>;

impl InMemoryLaunchpad {
    /// Launchpad backed by in-memory collaborators
    pub fn in_memory(config: LaunchpadConfig) -> LaunchpadResult<Self> {
        let factory = InMemoryPoolFactory::new(Address::derive(&config.launchpad_address, u64::MAX));
        Launchpad::new(
            config,
            InMemoryTokenLedger::new(),
            factory,
            InMemoryBank::new(),
            InMemoryEventLog::new(),
        )
    }
}

impl<L, P, B, E> Launchpad<L, P, B, E>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    pub fn new(config: LaunchpadConfig, ledger: L, pools: P, bank: B, events: E) -> LaunchpadResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: TokenRegistry::new(),
            fees: FeeLedger::new(),
            ledger,
            pools,
            bank,
            events,
            nonce: 0,
            treasury: 0,
        })
    }

    pub(crate) fn emit(&mut self, event: LaunchpadEvent) {
        self.events.emit(event);
    }

    pub fn config(&self) -> &LaunchpadConfig {
        &self.config
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub fn fee_ledger(&self) -> &FeeLedger {
        &self.fees
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn pools(&self) -> &P {
        &self.pools
    }

    pub fn pools_mut(&mut self) -> &mut P {
        &mut self.pools
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Native currency currently held
    pub fn treasury(&self) -> u128 {
        self.treasury
    }

    /// What the treasury must cover: OKB still backing curves plus every
    /// unpaid fee balance. Equal to `treasury()` at all times.
    pub fn accounted_okb(&self) -> u128 {
        let backing: u128 = self
            .registry
            .all_tokens()
            .iter()
            .filter_map(|id| self.registry.resolve(id).ok())
            .filter(|c| !c.graduated())
            .map(|c| c.okb_collected())
            .sum();
        backing + self.fees.platform_fees() + self.fees.total_pending_rewards()
    }

    // ---- reads ----

    pub fn get_token_info(&self, token: &Address) -> LaunchpadResult<&TokenInfo> {
        self.registry.token_info(token)
    }

    pub fn get_curve_info(&self, token: &Address) -> LaunchpadResult<CurveInfo> {
        self.registry.resolve(token).map(CurveInfo::from)
    }

    pub fn get_current_price(&self, token: &Address) -> LaunchpadResult<u128> {
        current_price(self.registry.resolve(token)?)
    }

    pub fn get_market_cap(&self, token: &Address) -> LaunchpadResult<u128> {
        let info = self.registry.token_info(token)?;
        market_cap(self.registry.resolve(token)?, info.total_supply)
    }

    /// Tokens a buyer receives for a gross payment, fees included
    pub fn calculate_tokens_out(&self, token: &Address, gross_okb: u128) -> LaunchpadResult<u128> {
        let curve = self.registry.resolve(token)?;
        let fee = self.config.fees.split(gross_okb)?;
        quote_buy(curve, checked_sub(gross_okb, fee.total())?)
    }

    /// Net OKB a seller receives for `tokens_in`, fees deducted
    pub fn calculate_okb_out(&self, token: &Address, tokens_in: u128) -> LaunchpadResult<u128> {
        let curve = self.registry.resolve(token)?;
        let gross = quote_sell(curve, tokens_in)?;
        let fee = self.config.fees.split(gross)?;
        checked_sub(gross, fee.total())
    }

    /// OKB still needed before `token` can graduate
    pub fn okb_to_graduation(&self, token: &Address) -> LaunchpadResult<u128> {
        let curve = self.registry.resolve(token)?;
        Ok(okb_to_graduation(curve, self.config.graduation_threshold))
    }

    pub fn graduation_progress_bps(&self, token: &Address) -> LaunchpadResult<u16> {
        let curve = self.registry.resolve(token)?;
        Ok(graduation_progress_bps(curve, self.config.graduation_threshold))
    }

    /// Price points from the current state toward graduation (chart data)
    pub fn curve_points(&self, token: &Address, steps: usize) -> LaunchpadResult<Vec<CurvePoint>> {
        let curve = self.registry.resolve(token)?;
        let remaining = okb_to_graduation(curve, self.config.graduation_threshold);
        let step = (remaining / steps.max(1) as u128).max(1);
        Ok(launchpad_curve::sample_curve(curve, step, steps))
    }

    pub fn get_pending_rewards(&self, creator: &Address) -> u128 {
        self.fees.pending_rewards(creator)
    }

    pub fn get_platform_fees(&self) -> u128 {
        self.fees.platform_fees()
    }

    pub fn get_all_tokens(&self) -> Vec<Address> {
        self.registry.all_tokens()
    }

    pub fn tokens_in_phase(&self, phase: Phase) -> Vec<Address> {
        self.registry.tokens_in_phase(phase)
    }

    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    /// Token balance of `holder` on the ledger
    pub fn balance_of(&self, token: &Address, holder: &Address) -> u128 {
        self.ledger.balance_of(token, holder)
    }
}
