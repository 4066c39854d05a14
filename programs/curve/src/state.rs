//! Bonding curve state

use core::fmt;
use launchpad_common::{Address, LaunchpadError, LaunchpadResult};
use serde::{Deserialize, Serialize};

/// Token lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Curve trading enabled
    Active,
    /// Threshold met, trading frozen, pool creation pending
    Graduating,
    /// Liquidity migrated to the DEX pool (terminal)
    Graduated,
}

impl Phase {
    pub fn can_trade(&self) -> bool {
        matches!(self, Phase::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Graduated)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Active => write!(f, "active"),
            Phase::Graduating => write!(f, "graduating"),
            Phase::Graduated => write!(f, "graduated"),
        }
    }
}

/// Liquidity handed to the DEX pool factory at graduation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityLock {
    /// OKB locked into the pool (wei)
    pub okb_amount: u128,
    /// Tokens locked into the pool (base units)
    pub token_amount: u128,
}

/// Per-token curve state
///
/// Fields are private: reserves only change through `apply_buy`,
/// `apply_sell` and the graduation transitions. Deserialization goes
/// through the same checks as `CurveState::new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CurveStateRecord")]
pub struct CurveState {
    virtual_okb_reserve: u128,
    virtual_token_reserve: u128,
    okb_collected: u128,
    tokens_sold: u128,
    phase: Phase,
    liquidity_lock: Option<LiquidityLock>,
    pool: Option<Address>,
}

impl CurveState {
    /// Seed a fresh curve. Both virtual reserves must be non-zero.
    pub fn new(virtual_okb_reserve: u128, virtual_token_reserve: u128) -> LaunchpadResult<Self> {
        if virtual_okb_reserve == 0 || virtual_token_reserve == 0 {
            return Err(LaunchpadError::InvalidAmount);
        }
        Ok(Self {
            virtual_okb_reserve,
            virtual_token_reserve,
            okb_collected: 0,
            tokens_sold: 0,
            phase: Phase::Active,
            liquidity_lock: None,
            pool: None,
        })
    }

    pub fn virtual_okb_reserve(&self) -> u128 {
        self.virtual_okb_reserve
    }

    pub fn virtual_token_reserve(&self) -> u128 {
        self.virtual_token_reserve
    }

    pub fn okb_collected(&self) -> u128 {
        self.okb_collected
    }

    pub fn tokens_sold(&self) -> u128 {
        self.tokens_sold
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Trading permitted
    pub fn active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn graduated(&self) -> bool {
        self.phase == Phase::Graduated
    }

    /// Frozen at graduation start, kept after completion
    pub fn liquidity_lock(&self) -> Option<LiquidityLock> {
        self.liquidity_lock
    }

    pub fn pool(&self) -> Option<Address> {
        self.pool
    }

    /// Constant product of the virtual reserves (wide)
    pub fn k(&self) -> launchpad_common::U256 {
        launchpad_common::U256::from(self.virtual_okb_reserve)
            * launchpad_common::U256::from(self.virtual_token_reserve)
    }

    pub(crate) fn with_reserves(
        &self,
        virtual_okb_reserve: u128,
        virtual_token_reserve: u128,
        okb_collected: u128,
        tokens_sold: u128,
    ) -> Self {
        Self {
            virtual_okb_reserve,
            virtual_token_reserve,
            okb_collected,
            tokens_sold,
            ..self.clone()
        }
    }

    pub(crate) fn with_phase(
        &self,
        phase: Phase,
        liquidity_lock: Option<LiquidityLock>,
        pool: Option<Address>,
    ) -> Self {
        Self {
            phase,
            liquidity_lock,
            pool,
            ..self.clone()
        }
    }
}

/// Serialized form of `CurveState`, validated on the way in
#[derive(Deserialize)]
struct CurveStateRecord {
    virtual_okb_reserve: u128,
    virtual_token_reserve: u128,
    okb_collected: u128,
    tokens_sold: u128,
    phase: Phase,
    liquidity_lock: Option<LiquidityLock>,
    pool: Option<Address>,
}

impl TryFrom<CurveStateRecord> for CurveState {
    type Error = LaunchpadError;

    fn try_from(record: CurveStateRecord) -> LaunchpadResult<Self> {
        let curve = CurveState::new(record.virtual_okb_reserve, record.virtual_token_reserve)?;
        // Lock exists from Graduating on, pool only once Graduated
        let consistent = match record.phase {
            Phase::Active => record.liquidity_lock.is_none() && record.pool.is_none(),
            Phase::Graduating => record.liquidity_lock.is_some() && record.pool.is_none(),
            Phase::Graduated => record.liquidity_lock.is_some() && record.pool.is_some(),
        };
        if !consistent {
            return Err(LaunchpadError::InvalidAmount);
        }
        Ok(curve
            .with_reserves(
                record.virtual_okb_reserve,
                record.virtual_token_reserve,
                record.okb_collected,
                record.tokens_sold,
            )
            .with_phase(record.phase, record.liquidity_lock, record.pool))
    }
}

/// Read-only snapshot mirroring the contract's `getCurveInfo`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveInfo {
    pub virtual_okb: u128,
    pub virtual_tokens: u128,
    pub okb_collected: u128,
    pub tokens_sold: u128,
    pub active: bool,
    pub graduated: bool,
}

impl From<&CurveState> for CurveInfo {
    fn from(curve: &CurveState) -> Self {
        Self {
            virtual_okb: curve.virtual_okb_reserve(),
            virtual_tokens: curve.virtual_token_reserve(),
            okb_collected: curve.okb_collected(),
            tokens_sold: curve.tokens_sold(),
            active: curve.active(),
            graduated: curve.graduated(),
        }
    }
}
