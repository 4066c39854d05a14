//! Graduation controller: moves a token from its curve into a DEX pool

use crate::events::{EventSink, LaunchpadEvent};
use crate::external::{NativeBank, PoolFactory, TokenLedger};
use crate::launchpad::Launchpad;
use launchpad_common::{checked_add, checked_sub, Address, LaunchpadError, LaunchpadResult};
use launchpad_curve::{
    begin_graduation, complete_graduation, graduation_progress_bps, LiquidityLock, Phase,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduationOutcome {
    pub token: Address,
    pub pool: Address,
    pub lock: LiquidityLock,
}

impl<L, P, B, E> Launchpad<L, P, B, E>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    /// `(can_graduate, okb_collected)`
    pub fn check_graduation(&self, token: &Address) -> LaunchpadResult<(bool, u128)> {
        let curve = self.registry.resolve(token)?;
        Ok(launchpad_curve::check_graduation(
            curve,
            self.config.graduation_threshold,
        ))
    }

    pub fn is_graduated(&self, token: &Address) -> LaunchpadResult<bool> {
        Ok(self.registry.resolve(token)?.graduated())
    }

    pub fn get_pool_address(&self, token: &Address) -> LaunchpadResult<Option<Address>> {
        Ok(self.registry.resolve(token)?.pool())
    }

    /// Tokens that can graduate right now, paired with their progress
    /// (bps), including those stuck in `Graduating`
    pub fn graduation_candidates(&self) -> Vec<(Address, u16)> {
        let threshold = self.config.graduation_threshold;
        self.registry
            .all_tokens()
            .into_iter()
            .filter_map(|id| {
                let curve = self.registry.resolve(&id).ok()?;
                let (ready, _) = launchpad_curve::check_graduation(curve, threshold);
                ready.then(|| (id, graduation_progress_bps(curve, threshold)))
            })
            .collect()
    }

    /// Graduate `token`
    ///
    /// Phase 1 freezes the curve (`Graduating`) and the liquidity amounts.
    /// Phase 2 creates the pool, seeds it and marks the token `Graduated`.
    /// When the factory fails the token stays `Graduating` and a later call
    /// retries phase 2 with the same frozen amounts.
    pub fn graduate(&mut self, token: &Address, timestamp: u64) -> LaunchpadResult<GraduationOutcome> {
        let curve = self.registry.resolve(token)?.clone();
        let (lock, frozen) = begin_graduation(
            &curve,
            self.config.graduation_threshold,
            self.config.liquidity_lock_bps,
        )?;

        if curve.phase() == Phase::Active {
            self.registry.commit_curve(token, frozen.clone())?;
            log::info!(
                "graduation started: {} collected={} lock_okb={} lock_tokens={}",
                token,
                frozen.okb_collected(),
                lock.okb_amount,
                lock.token_amount
            );
            self.emit(LaunchpadEvent::GraduationStarted {
                token: *token,
                okb_collected: frozen.okb_collected(),
                okb_locked: lock.okb_amount,
                tokens_locked: lock.token_amount,
                timestamp,
            });
        }

        let launchpad_address = self.config.launchpad_address;
        let held = self.ledger.balance_of(token, &launchpad_address);
        if held < lock.token_amount {
            return Err(LaunchpadError::InsufficientBalance {
                have: held,
                need: lock.token_amount,
            });
        }
        // Everything checked up front: nothing may fail once the pool exists
        let treasury = checked_sub(self.treasury, lock.okb_amount)?;
        let residue = checked_sub(frozen.okb_collected(), lock.okb_amount)?;
        let platform = checked_add(self.fees.platform_fees(), residue)?;

        let pool = self
            .pools
            .create_pool(token, lock.okb_amount, lock.token_amount)
            .map_err(|e| {
                log::warn!("pool creation for {} failed: {}", token, e);
                LaunchpadError::PoolCreationFailed(e.to_string())
            })?;
        let graduated = complete_graduation(&frozen, pool)?;

        // The pool takes custody of the locked OKB and tokens
        self.ledger
            .transfer(token, &launchpad_address, &pool, lock.token_amount)?;
        self.treasury = treasury;
        self.fees.commit_platform(platform);
        self.registry.commit_curve(token, graduated)?;

        log::info!("token graduated: {} pool={}", token, pool);
        self.emit(LaunchpadEvent::TokenGraduated {
            token: *token,
            pool,
            okb_locked: lock.okb_amount,
            tokens_locked: lock.token_amount,
            timestamp,
        });

        Ok(GraduationOutcome {
            token: *token,
            pool,
            lock,
        })
    }

    /// Retry every token left in `Graduating`
    pub fn retry_pending_graduations(
        &mut self,
        timestamp: u64,
    ) -> Vec<(Address, LaunchpadResult<GraduationOutcome>)> {
        self.registry
            .tokens_in_phase(Phase::Graduating)
            .into_iter()
            .map(|token| {
                let result = self.graduate(&token, timestamp);
                (token, result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LaunchpadConfig;
    use crate::instructions::{CreateTokenParams, GraduationStatus};
    use crate::launchpad::{InMemoryLaunchpad, TxContext};
    use launchpad_common::okb;

    const CREATOR: Address = Address([0xc0; 20]);
    const WHALE: Address = Address([0xee; 20]);

    fn setup() -> (InMemoryLaunchpad, Address) {
        let mut lp = InMemoryLaunchpad::in_memory(LaunchpadConfig::default()).unwrap();
        let token = lp
            .create_token(
                &TxContext::new(CREATOR, okb(1) / 1_000, 0),
                CreateTokenParams {
                    name: "Grad".into(),
                    symbol: "GRAD".into(),
                    ..CreateTokenParams::default()
                },
            )
            .unwrap();
        (lp, token)
    }

    #[test]
    fn test_graduate_below_threshold() {
        let (mut lp, token) = setup();
        lp.buy(&TxContext::new(WHALE, okb(10), 0), &token, 0).unwrap();

        assert!(matches!(
            lp.graduate(&token, 0),
            Err(LaunchpadError::ThresholdNotMet { .. })
        ));
        assert!(!lp.check_graduation(&token).unwrap().0);
        assert!(lp.graduation_candidates().is_empty());
    }

    #[test]
    fn test_graduation_once() {
        let (mut lp, token) = setup();
        let receipt = lp.buy(&TxContext::new(WHALE, okb(90), 7), &token, 0).unwrap();
        assert!(matches!(receipt.graduation, GraduationStatus::Graduated { .. }));

        assert_eq!(lp.graduate(&token, 8), Err(LaunchpadError::AlreadyGraduated));
        assert!(lp.is_graduated(&token).unwrap());
        assert!(!lp.get_curve_info(&token).unwrap().active);

        let events = lp.events().for_token(&token);
        let graduated = events
            .iter()
            .filter(|e| matches!(e, LaunchpadEvent::TokenGraduated { .. }))
            .count();
        assert_eq!(graduated, 1);
    }

    #[test]
    fn test_pool_seeded_with_lock() {
        let (mut lp, token) = setup();
        lp.buy(&TxContext::new(WHALE, okb(90), 0), &token, 0).unwrap();

        let pool = lp.get_pool_address(&token).unwrap().unwrap();
        let record = *lp.pools().pool_for(&token).unwrap();
        let collected = lp.get_curve_info(&token).unwrap().okb_collected;

        assert_eq!(record.pool, pool);
        assert_eq!(record.okb_amount, collected * 45 / 100);
        assert_eq!(lp.balance_of(&token, &pool), record.token_amount);
        assert_eq!(lp.treasury(), lp.accounted_okb());
    }

    #[test]
    fn test_failed_pool_then_retry() {
        let (mut lp, token) = setup();
        lp.pools_mut().fail_next(2);

        let receipt = lp.buy(&TxContext::new(WHALE, okb(85), 0), &token, 0).unwrap();
        assert_eq!(receipt.graduation, GraduationStatus::Pending);
        let stored = lp.registry().resolve(&token).unwrap().liquidity_lock().unwrap();

        assert!(matches!(
            lp.graduate(&token, 1),
            Err(LaunchpadError::PoolCreationFailed(_))
        ));
        assert_eq!(lp.registry().resolve(&token).unwrap().phase(), Phase::Graduating);
        assert_eq!(lp.graduation_candidates().len(), 1);

        let outcome = lp.graduate(&token, 2).unwrap();
        assert_eq!(outcome.lock, stored);
        assert!(lp.is_graduated(&token).unwrap());

        let started = lp
            .events()
            .for_token(&token)
            .into_iter()
            .filter(|e| matches!(e, LaunchpadEvent::GraduationStarted { .. }))
            .count();
        assert_eq!(started, 1);
    }

    #[test]
    fn test_retry_pending_graduations() {
        let (mut lp, token) = setup();
        lp.pools_mut().fail_next(1);
        lp.buy(&TxContext::new(WHALE, okb(81), 0), &token, 0).unwrap();

        let results = lp.retry_pending_graduations(3);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, token);
        assert!(results[0].1.is_ok());
        assert!(lp.retry_pending_graduations(4).is_empty());
    }

    #[test]
    fn test_unknown_token_reads() {
        let (lp, _) = setup();
        let unknown = Address::repeat_byte(0x31);
        assert_eq!(lp.is_graduated(&unknown), Err(LaunchpadError::UnknownToken(unknown)));
        assert_eq!(
            lp.get_pool_address(&unknown),
            Err(LaunchpadError::UnknownToken(unknown))
        );
    }

    #[test]
    fn test_overflow_rejected_before_pool_creation() {
        let (mut lp, token) = setup();
        lp.pools_mut().fail_next(1);
        let receipt = lp.buy(&TxContext::new(WHALE, okb(90), 0), &token, 0).unwrap();
        assert_eq!(receipt.graduation, GraduationStatus::Pending);

        // Platform bucket one residue away from overflowing
        let headroom = u128::MAX - lp.get_platform_fees();
        lp.fees.accrue_platform(headroom).unwrap();
        let treasury = lp.treasury();
        let held = lp.balance_of(&token, &lp.config().launchpad_address);

        assert_eq!(lp.graduate(&token, 1), Err(LaunchpadError::Overflow));
        assert_eq!(lp.pools().pool_count(), 0);
        assert_eq!(lp.treasury(), treasury);
        assert_eq!(lp.balance_of(&token, &lp.config().launchpad_address), held);
        assert_eq!(lp.registry().resolve(&token).unwrap().phase(), Phase::Graduating);
    }
}
