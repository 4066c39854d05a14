//! Creator reward claims

use crate::events::{EventSink, LaunchpadEvent};
use crate::external::{NativeBank, PoolFactory, TokenLedger};
use crate::launchpad::{Launchpad, TxContext};
use launchpad_common::{checked_sub, LaunchpadResult};

impl<L, P, B, E> Launchpad<L, P, B, E>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    /// Pay the sender every reward accrued to them as a creator
    pub fn claim_rewards(&mut self, ctx: &TxContext) -> LaunchpadResult<u128> {
        let pending = self.fees.pending_rewards(&ctx.sender);
        let treasury = checked_sub(self.treasury, pending)?;

        let amount = self.fees.claim(&ctx.sender, &mut self.bank)?;
        self.treasury = treasury;

        log::info!("creator {} claimed {}", ctx.sender, amount);
        self.emit(LaunchpadEvent::RewardsClaimed {
            creator: ctx.sender,
            amount,
            timestamp: ctx.timestamp,
        });
        Ok(amount)
    }
}
