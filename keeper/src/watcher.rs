//! Graduation watcher: tracks curve progress and drives graduations that a
//! trade could not finish (pool factory down, token left `Graduating`)

use crate::priority_queue::{GraduationQueue, TokenProgress};
use launchpad_common::{format_units, Address};
use launchpad_core::{EventSink, GraduationOutcome, Launchpad, NativeBank, PoolFactory, TokenLedger};
use launchpad_curve::Phase;

/// Rebuild the queue from the registry; graduated tokens drop out
pub fn refresh_queue<L, P, B, E>(
    launchpad: &Launchpad<L, P, B, E>,
    queue: &mut GraduationQueue,
    tick: u64,
) where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    for token in launchpad.get_all_tokens() {
        let Ok(curve) = launchpad.registry().resolve(&token) else {
            continue;
        };
        if curve.phase() == Phase::Graduated {
            queue.remove(&token);
            continue;
        }
        let progress_bps = launchpad.graduation_progress_bps(&token).unwrap_or(0);
        if !queue.contains(&token) {
            log::debug!("Tracking {} ({})", token, curve.phase());
        }
        queue.push(TokenProgress {
            token,
            progress_bps,
            okb_collected: curve.okb_collected(),
            phase: curve.phase(),
            last_update: tick,
        });
    }
}

/// Attempt up to `max` graduations of ready tokens
pub fn process_graduations<L, P, B, E>(
    launchpad: &mut Launchpad<L, P, B, E>,
    queue: &mut GraduationQueue,
    max: usize,
    timestamp: u64,
) -> Vec<GraduationOutcome>
where
    L: TokenLedger,
    P: PoolFactory,
    B: NativeBank,
    E: EventSink,
{
    let ready = queue.ready();
    if ready.is_empty() {
        log::debug!("No tokens ready to graduate");
        return Vec::new();
    }

    log::info!("Found {} tokens ready to graduate", ready.len());

    let mut graduated = Vec::new();
    for progress in ready.iter().take(max) {
        log::debug!(
            "Graduating {}: {} collected, {} as of tick {}",
            progress.token,
            format_units(progress.okb_collected),
            progress.phase,
            progress.last_update
        );
        match launchpad.graduate(&progress.token, timestamp) {
            Ok(outcome) => {
                log::info!("Graduated {} into pool {}", progress.token, outcome.pool);
                queue.remove(&progress.token);
                graduated.push(outcome);
            }
            Err(e) if e.is_retryable() => {
                log::warn!("Graduation of {} will be retried: {}", progress.token, e);
            }
            Err(e) => {
                log::error!("Failed to graduate {}: {}", progress.token, e);
                queue.remove(&progress.token);
            }
        }
    }
    graduated
}

/// Tokens currently stuck mid-graduation
pub fn pending_graduations(queue: &GraduationQueue) -> Vec<Address> {
    if queue.is_empty() {
        return Vec::new();
    }
    queue
        .ready()
        .into_iter()
        .filter(|p| p.phase == Phase::Graduating)
        .map(|p| p.token)
        .collect()
}
