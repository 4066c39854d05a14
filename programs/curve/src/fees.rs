//! Trade fee schedule

use launchpad_common::{bps_of, checked_add, LaunchpadError, LaunchpadResult, BPS_SCALE};
use serde::{Deserialize, Serialize};

/// Platform and creator cut of every trade, in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub platform_bps: u16,
    pub creator_bps: u16,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            platform_bps: 100, // 1%
            creator_bps: 100,  // 1%
        }
    }
}

/// Fee amounts taken from one trade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub platform: u128,
    pub creator: u128,
}

impl FeeSplit {
    pub fn total(&self) -> u128 {
        self.platform.saturating_add(self.creator)
    }
}

impl FeeSchedule {
    /// No fees (pure curve math)
    pub const ZERO: FeeSchedule = FeeSchedule {
        platform_bps: 0,
        creator_bps: 0,
    };

    pub fn total_bps(&self) -> u16 {
        self.platform_bps.saturating_add(self.creator_bps)
    }

    /// Combined fee must stay below 100%
    pub fn validate(&self) -> LaunchpadResult<()> {
        if self.total_bps() as u128 >= BPS_SCALE {
            return Err(LaunchpadError::InvalidAmount);
        }
        Ok(())
    }

    /// Split `amount` into platform and creator shares (each rounded down)
    pub fn split(&self, amount: u128) -> LaunchpadResult<FeeSplit> {
        let split = FeeSplit {
            platform: bps_of(amount, self.platform_bps)?,
            creator: bps_of(amount, self.creator_bps)?,
        };
        // total never exceeds amount while validate() holds
        checked_add(split.platform, split.creator)?;
        Ok(split)
    }
}
