//! Launchpad events

use launchpad_common::units::serde_units;
use launchpad_common::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LaunchpadEvent {
    TokenCreated {
        token: Address,
        creator: Address,
        name: String,
        symbol: String,
        #[serde(with = "serde_units")]
        total_supply: u128,
        timestamp: u64,
    },
    TokensPurchased {
        token: Address,
        buyer: Address,
        /// Gross payment, fees included
        #[serde(with = "serde_units")]
        okb_in: u128,
        #[serde(with = "serde_units")]
        tokens_out: u128,
        #[serde(with = "serde_units")]
        fee: u128,
        /// Spot price after the trade (wei per whole token)
        price: u128,
        timestamp: u64,
    },
    TokensSold {
        token: Address,
        seller: Address,
        #[serde(with = "serde_units")]
        tokens_in: u128,
        /// Net payout, fees excluded
        #[serde(with = "serde_units")]
        okb_out: u128,
        #[serde(with = "serde_units")]
        fee: u128,
        price: u128,
        timestamp: u64,
    },
    GraduationStarted {
        token: Address,
        #[serde(with = "serde_units")]
        okb_collected: u128,
        #[serde(with = "serde_units")]
        okb_locked: u128,
        #[serde(with = "serde_units")]
        tokens_locked: u128,
        timestamp: u64,
    },
    TokenGraduated {
        token: Address,
        pool: Address,
        #[serde(with = "serde_units")]
        okb_locked: u128,
        #[serde(with = "serde_units")]
        tokens_locked: u128,
        timestamp: u64,
    },
    RewardsClaimed {
        creator: Address,
        #[serde(with = "serde_units")]
        amount: u128,
        timestamp: u64,
    },
    PlatformFeesWithdrawn {
        recipient: Address,
        #[serde(with = "serde_units")]
        amount: u128,
        timestamp: u64,
    },
    FeeRecipientUpdated {
        previous: Address,
        new: Address,
        timestamp: u64,
    },
}

impl LaunchpadEvent {
    /// Token the event concerns, if any
    pub fn token(&self) -> Option<Address> {
        match self {
            LaunchpadEvent::TokenCreated { token, .. }
            | LaunchpadEvent::TokensPurchased { token, .. }
            | LaunchpadEvent::TokensSold { token, .. }
            | LaunchpadEvent::GraduationStarted { token, .. }
            | LaunchpadEvent::TokenGraduated { token, .. } => Some(*token),
            LaunchpadEvent::RewardsClaimed { .. }
            | LaunchpadEvent::PlatformFeesWithdrawn { .. }
            | LaunchpadEvent::FeeRecipientUpdated { .. } => None,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            LaunchpadEvent::TokenCreated { timestamp, .. }
            | LaunchpadEvent::TokensPurchased { timestamp, .. }
            | LaunchpadEvent::TokensSold { timestamp, .. }
            | LaunchpadEvent::GraduationStarted { timestamp, .. }
            | LaunchpadEvent::TokenGraduated { timestamp, .. }
            | LaunchpadEvent::RewardsClaimed { timestamp, .. }
            | LaunchpadEvent::PlatformFeesWithdrawn { timestamp, .. }
            | LaunchpadEvent::FeeRecipientUpdated { timestamp, .. } => *timestamp,
        }
    }
}

pub trait EventSink {
    fn emit(&mut self, event: LaunchpadEvent);
}

/// Append-only event log
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    events: Vec<LaunchpadEvent>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LaunchpadEvent] {
        &self.events
    }

    pub fn for_token(&self, token: &Address) -> Vec<&LaunchpadEvent> {
        self.events
            .iter()
            .filter(|e| e.token().as_ref() == Some(token))
            .collect()
    }

    /// Take every event recorded so far
    pub fn drain(&mut self) -> Vec<LaunchpadEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for InMemoryEventLog {
    fn emit(&mut self, event: LaunchpadEvent) {
        log::trace!("event: {:?}", event);
        self.events.push(event);
    }
}
