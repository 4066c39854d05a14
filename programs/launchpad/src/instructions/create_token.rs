//! Token creation

use crate::events::{EventSink, LaunchpadEvent};
use crate::external::{NativeBank, PoolFactory, TokenLedger};
use crate::launchpad::{Launchpad, TxContext};
use crate::state::{TokenInfo, TokenMetadata};
use launchpad_common::units::serde_units_opt;
use launchpad_common::{checked_add, Address, LaunchpadError, LaunchpadResult};
use launchpad_curve::CurveState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateTokenParams {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image_uri: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to the configured supply
    #[serde(default, with = "serde_units_opt")]
    pub total_supply: Option<u128>,
}

impl<L, P, B, E> Launchpad<L, P, B, E>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    /// Launch a token on a fresh bonding curve
    ///
    /// The whole supply is minted to the launchpad's ledger account; the
    /// attached value (at least the creation fee) accrues to the platform.
    pub fn create_token(&mut self, ctx: &TxContext, params: CreateTokenParams) -> LaunchpadResult<Address> {
        if ctx.value < self.config.creation_fee {
            return Err(LaunchpadError::InsufficientFee {
                required: self.config.creation_fee,
                provided: ctx.value,
            });
        }

        let metadata = self.validate_metadata(params.name, params.symbol, params.image_uri, params.description)?;

        let total_supply = params.total_supply.unwrap_or(self.config.default_total_supply);
        if total_supply < self.config.initial_virtual_tokens {
            return Err(LaunchpadError::InvalidAmount);
        }

        let curve = CurveState::new(self.config.initial_virtual_okb, self.config.initial_virtual_tokens)?;
        let treasury = checked_add(self.treasury, ctx.value)?;
        let token_id = Address::derive(&self.config.launchpad_address, self.nonce);

        let info = TokenInfo {
            token_id,
            creator: ctx.sender,
            created_at: ctx.timestamp,
            total_supply,
            metadata,
        };
        self.registry.register(info.clone(), curve)?;
        self.ledger.mint(&token_id, &self.config.launchpad_address, total_supply)?;
        self.fees.accrue_creation_fee(ctx.value)?;
        self.treasury = treasury;
        self.nonce += 1;

        log::info!(
            "token created: {} ({}) by {}",
            token_id,
            info.metadata.symbol,
            ctx.sender
        );
        self.emit(LaunchpadEvent::TokenCreated {
            token: token_id,
            creator: ctx.sender,
            name: info.metadata.name,
            symbol: info.metadata.symbol,
            total_supply,
            timestamp: ctx.timestamp,
        });

        Ok(token_id)
    }

    fn validate_metadata(
        &self,
        name: String,
        symbol: String,
        image_uri: String,
        description: String,
    ) -> LaunchpadResult<TokenMetadata> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(LaunchpadError::InvalidMetadata("name is empty".into()));
        }

        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(LaunchpadError::InvalidMetadata("symbol is empty".into()));
        }
        if symbol.chars().count() > self.config.max_symbol_len {
            return Err(LaunchpadError::InvalidMetadata(format!(
                "symbol longer than {} characters",
                self.config.max_symbol_len
            )));
        }

        if description.chars().count() > self.config.max_description_len {
            return Err(LaunchpadError::InvalidMetadata(format!(
                "description longer than {} characters",
                self.config.max_description_len
            )));
        }

        Ok(TokenMetadata {
            name,
            symbol,
            image_uri: image_uri.trim().to_string(),
            description,
        })
    }
}
