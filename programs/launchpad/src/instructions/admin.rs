//! Owner-only operations

use crate::events::{EventSink, LaunchpadEvent};
use crate::external::{NativeBank, PoolFactory, TokenLedger};
use crate::launchpad::{Launchpad, TxContext};
use launchpad_common::{checked_sub, Address, LaunchpadError, LaunchpadResult};

impl<L, P, B, E> Launchpad<L, P, B, E>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    fn require_owner(&self, ctx: &TxContext) -> LaunchpadResult<()> {
        if ctx.sender != self.config.owner {
            return Err(LaunchpadError::Unauthorized(ctx.sender));
        }
        Ok(())
    }

    /// Pay the platform bucket to the current fee recipient
    pub fn withdraw_platform_fees(&mut self, ctx: &TxContext) -> LaunchpadResult<u128> {
        self.require_owner(ctx)?;

        let recipient = self.config.fee_recipient;
        let treasury = checked_sub(self.treasury, self.fees.platform_fees())?;
        let amount = self.fees.withdraw_platform(&recipient, &mut self.bank)?;
        self.treasury = treasury;

        log::info!("platform fees withdrawn: {} to {}", amount, recipient);
        self.emit(LaunchpadEvent::PlatformFeesWithdrawn {
            recipient,
            amount,
            timestamp: ctx.timestamp,
        });
        Ok(amount)
    }

    pub fn set_fee_recipient(&mut self, ctx: &TxContext, new_recipient: Address) -> LaunchpadResult<()> {
        self.require_owner(ctx)?;
        if new_recipient.is_zero() {
            return Err(LaunchpadError::InvalidMetadata("fee recipient is the zero address".into()));
        }

        let previous = std::mem::replace(&mut self.config.fee_recipient, new_recipient);
        log::info!("fee recipient updated: {} -> {}", previous, new_recipient);
        self.emit(LaunchpadEvent::FeeRecipientUpdated {
            previous,
            new: new_recipient,
            timestamp: ctx.timestamp,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LaunchpadConfig, DEFAULT_OWNER};
    use crate::instructions::CreateTokenParams;
    use crate::launchpad::InMemoryLaunchpad;
    use launchpad_common::okb;

    const STRANGER: Address = Address([0x55; 20]);

    fn with_fees() -> InMemoryLaunchpad {
        let mut lp = InMemoryLaunchpad::in_memory(LaunchpadConfig::default()).unwrap();
        let token = lp
            .create_token(
                &TxContext::new(STRANGER, okb(1) / 1_000, 0),
                CreateTokenParams {
                    name: "Admin".into(),
                    symbol: "ADM".into(),
                    ..CreateTokenParams::default()
                },
            )
            .unwrap();
        lp.buy(&TxContext::new(STRANGER, okb(10), 0), &token, 0).unwrap();
        lp
    }

    #[test]
    fn test_withdraw_owner_only() {
        let mut lp = with_fees();
        assert_eq!(
            lp.withdraw_platform_fees(&TxContext::new(STRANGER, 0, 0)),
            Err(LaunchpadError::Unauthorized(STRANGER))
        );

        let expected = okb(1) / 1_000 + okb(1) / 10;
        let owner = TxContext::new(DEFAULT_OWNER, 0, 0);
        assert_eq!(lp.withdraw_platform_fees(&owner).unwrap(), expected);
        assert_eq!(lp.bank().balance_of(&DEFAULT_OWNER), expected);
        assert_eq!(lp.get_platform_fees(), 0);
        assert_eq!(lp.treasury(), lp.accounted_okb());
    }

    #[test]
    fn test_set_fee_recipient_redirects_withdrawals() {
        let mut lp = with_fees();
        let owner = TxContext::new(DEFAULT_OWNER, 0, 0);
        let new_recipient = Address::repeat_byte(0xee);

        assert_eq!(
            lp.set_fee_recipient(&TxContext::new(STRANGER, 0, 0), new_recipient),
            Err(LaunchpadError::Unauthorized(STRANGER))
        );
        assert!(lp.set_fee_recipient(&owner, Address::ZERO).is_err());

        lp.set_fee_recipient(&owner, new_recipient).unwrap();
        assert_eq!(lp.config().fee_recipient, new_recipient);

        let amount = lp.withdraw_platform_fees(&owner).unwrap();
        assert_eq!(lp.bank().balance_of(&new_recipient), amount);
        assert_eq!(lp.bank().balance_of(&DEFAULT_OWNER), 0);
    }
}
