//! Token registry: the single authoritative map of launched tokens

use launchpad_common::{Address, LaunchpadError, LaunchpadResult};
use launchpad_curve::{CurveState, Phase};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Creator-supplied descriptive fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image_uri: String,
    #[serde(default)]
    pub description: String,
}

/// Immutable token record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub token_id: Address,
    pub creator: Address,
    /// Unix seconds
    pub created_at: u64,
    /// Fixed at creation
    pub total_supply: u128,
    pub metadata: TokenMetadata,
}

#[derive(Debug, Clone)]
struct TokenEntry {
    info: TokenInfo,
    curve: CurveState,
}

/// Counts per phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total: usize,
    pub active: usize,
    pub graduating: usize,
    pub graduated: usize,
}

/// `token_id -> (TokenInfo, CurveState)`
///
/// Curves are only replaced wholesale through `commit_curve`, so every
/// reader sees either the previous committed state or the next one.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    entries: HashMap<Address, TokenEntry>,
    /// Creation order
    order: Vec<Address>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly created token. Ids are unique by construction; a
    /// duplicate is rejected rather than overwritten.
    pub fn register(&mut self, info: TokenInfo, curve: CurveState) -> LaunchpadResult<()> {
        if self.entries.contains_key(&info.token_id) {
            return Err(LaunchpadError::InvalidMetadata(format!(
                "token {} already registered",
                info.token_id
            )));
        }
        let token_id = info.token_id;
        self.order.push(token_id);
        self.entries.insert(token_id, TokenEntry { info, curve });
        Ok(())
    }

    pub fn is_valid_token(&self, token: &Address) -> bool {
        self.entries.contains_key(token)
    }

    /// Committed curve state of `token`
    pub fn resolve(&self, token: &Address) -> LaunchpadResult<&CurveState> {
        self.entries
            .get(token)
            .map(|e| &e.curve)
            .ok_or(LaunchpadError::UnknownToken(*token))
    }

    pub fn token_info(&self, token: &Address) -> LaunchpadResult<&TokenInfo> {
        self.entries
            .get(token)
            .map(|e| &e.info)
            .ok_or(LaunchpadError::UnknownToken(*token))
    }

    /// Replace the curve of `token` with a newly computed state
    pub(crate) fn commit_curve(&mut self, token: &Address, curve: CurveState) -> LaunchpadResult<()> {
        let entry = self
            .entries
            .get_mut(token)
            .ok_or(LaunchpadError::UnknownToken(*token))?;
        entry.curve = curve;
        Ok(())
    }

    /// All token ids in creation order
    pub fn all_tokens(&self) -> Vec<Address> {
        self.order.clone()
    }

    pub fn tokens_in_phase(&self, phase: Phase) -> Vec<Address> {
        self.order
            .iter()
            .filter(|id| self.entries.get(id).map(|e| e.curve.phase()) == Some(phase))
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            total: self.order.len(),
            ..RegistryStats::default()
        };
        for entry in self.entries.values() {
            match entry.curve.phase() {
                Phase::Active => stats.active += 1,
                Phase::Graduating => stats.graduating += 1,
                Phase::Graduated => stats.graduated += 1,
            }
        }
        stats
    }
}
