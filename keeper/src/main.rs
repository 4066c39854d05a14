//! Launchpad Keeper
//!
//! Off-chain service that replays a scenario of launchpad instructions
//! against the engine, watches curves approaching graduation and retries
//! graduations left pending by a failed pool creation.

mod config;
mod priority_queue;
mod scenario;
mod watcher;

use anyhow::{Context, Result};
use config::Config;
use launchpad_common::format_units;
use launchpad_core::InMemoryLaunchpad;
use priority_queue::GraduationQueue;
use scenario::{ReplayReport, Replayer, Scenario};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time;

/// Engine shared between the replay and watcher tasks
type SharedLaunchpad = Arc<Mutex<InMemoryLaunchpad>>;

/// Progress toward the threshold (bps) above which tokens are logged
const WATCH_BPS: u16 = 8_000;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // `launchpad-keeper init [path]` writes a config template and exits
    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("init") {
        let path = args.next().unwrap_or_else(|| "keeper-config.toml".to_string());
        return Config::write_default(&path);
    }

    log::info!("Starting Launchpad Keeper");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using local defaults", e);
        Config::default_local()
    });

    let scenario = load_scenario(&config.scenario_path)?;
    log::info!(
        "Loaded {} scenario steps from {}",
        scenario.steps.len(),
        config.scenario_path
    );

    let mut engine = InMemoryLaunchpad::in_memory(config.launchpad.clone())
        .context("Invalid launchpad parameters")?;
    engine.pools_mut().fail_next(config.pool_fail_first_attempts);
    let launchpad: SharedLaunchpad = Arc::new(Mutex::new(engine));

    let events_out = open_events_out(config.events_out.as_deref())?;

    let (done_tx, done_rx) = watch::channel(false);
    let replay = run_replay(launchpad.clone(), scenario, &config, done_tx);
    let watcher = run_watcher(launchpad.clone(), &config, done_rx, events_out);
    let (report, graduated) = futures::future::try_join(replay, watcher).await?;

    let lp = launchpad.lock().await;
    let stats = lp.stats();
    log::info!(
        "Replay finished: {} applied, {} rejected, {} tokens created",
        report.applied,
        report.rejected,
        report.tokens_created
    );
    log::info!(
        "Tokens: {} total, {} active, {} graduating, {} graduated ({} by the watcher)",
        stats.total,
        stats.active,
        stats.graduating,
        stats.graduated,
        graduated
    );
    log::info!(
        "Treasury {} OKB, platform fees {} OKB",
        format_units(lp.treasury()),
        format_units(lp.get_platform_fees())
    );

    Ok(())
}

fn load_scenario(path: &str) -> Result<Scenario> {
    let expanded = shellexpand::tilde(path);
    let json = std::fs::read_to_string(expanded.as_ref())
        .context(format!("Failed to read scenario from {}", path))?;
    Scenario::from_json(&json).context("Failed to parse scenario JSON")
}

fn open_events_out(path: Option<&str>) -> Result<Option<BufWriter<File>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let expanded = shellexpand::tilde(path);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(expanded.as_ref())
        .context(format!("Failed to open events file {}", path))?;
    Ok(Some(BufWriter::new(file)))
}

/// Replay the scenario, `actions_per_tick` steps per tick
async fn run_replay(
    launchpad: SharedLaunchpad,
    scenario: Scenario,
    config: &Config,
    done: watch::Sender<bool>,
) -> Result<ReplayReport> {
    let mut replayer = Replayer::new(scenario);
    let mut interval = time::interval(Duration::from_millis(config.poll_interval_ms));
    let mut ticks = 0u64;

    while !replayer.is_done() {
        interval.tick().await;
        ticks += 1;

        let mut lp = launchpad.lock().await;
        let result = replayer.run_tick(&mut *lp, config.actions_per_tick);
        drop(lp);

        let applied = match result {
            Ok(applied) => applied,
            Err(e) => {
                let _ = done.send(true);
                return Err(e).context("Scenario replay aborted");
            }
        };
        log::debug!(
            "Tick {} at t={}: applied {} steps, {} remaining",
            ticks,
            replayer.now(),
            applied,
            replayer.remaining()
        );

        if config.max_ticks.is_some_and(|max| ticks >= max) {
            log::warn!("Reached max_ticks with {} steps left", replayer.remaining());
            break;
        }
    }

    for (i, token) in replayer.created_tokens().iter().enumerate() {
        log::debug!("@token{} = {}", i, token);
    }

    // Receiver may already be gone when the watcher hit max_ticks
    let _ = done.send(true);
    Ok(replayer.report())
}

/// Watch graduation progress, retry pending graduations and flush events
///
/// Runs until the replay has finished and no token is left `Graduating`.
async fn run_watcher(
    launchpad: SharedLaunchpad,
    config: &Config,
    replay_done: watch::Receiver<bool>,
    mut events_out: Option<BufWriter<File>>,
) -> Result<usize> {
    let mut queue = GraduationQueue::new();
    let mut interval = time::interval(Duration::from_millis(config.poll_interval_ms));
    let mut ticks = 0u64;
    let mut graduated = 0usize;
    let mut now = scenario::SCENARIO_EPOCH;

    loop {
        interval.tick().await;
        ticks += 1;
        // Read before the pass so the last replayed steps are covered
        let replay_finished = *replay_done.borrow();

        let mut lp = launchpad.lock().await;
        watcher::refresh_queue(&*lp, &mut queue, ticks);

        // Graduations are stamped with the latest scenario time seen
        if let Some(last) = lp.events().events().last() {
            now = now.max(last.timestamp());
        }
        let outcomes =
            watcher::process_graduations(&mut *lp, &mut queue, config.max_graduations_per_tick, now);
        graduated += outcomes.len();

        flush_events(&mut *lp, events_out.as_mut())?;
        drop(lp);

        // Log queue status
        if let Some(top) = queue.peek() {
            log::debug!(
                "Graduation queue size: {}, closest {} at {} bps",
                queue.len(),
                top.token,
                top.progress_bps
            );
        }
        for near in queue.near_threshold(WATCH_BPS) {
            log::debug!("{} is {} bps toward graduation", near.token, near.progress_bps);
        }

        let pending = watcher::pending_graduations(&queue);
        if replay_finished && pending.is_empty() {
            break;
        }
        if config.max_ticks.is_some_and(|max| ticks >= max) {
            log::warn!("Stopping with {} graduations still pending", pending.len());
            break;
        }
    }

    Ok(graduated)
}

/// Write drained events as JSON lines, or log them when no file is set
fn flush_events(lp: &mut InMemoryLaunchpad, out: Option<&mut BufWriter<File>>) -> Result<()> {
    let events = lp.events_mut().drain();
    match out {
        Some(writer) => {
            for event in &events {
                serde_json::to_writer(&mut *writer, event).context("Failed to encode event")?;
                writer.write_all(b"\n").context("Failed to write event")?;
            }
            writer.flush().context("Failed to flush events")?;
        }
        None => {
            for event in &events {
                log::info!("event: {}", serde_json::to_string(event)?);
            }
        }
    }
    Ok(())
}
