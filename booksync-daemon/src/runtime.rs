//! Timer loop around [`booksync_sync::pipeline::run_once`].
//!
//! Every tick is an independent run. A run that fails is logged and the
//! loop keeps going; the next tick is only taken once the previous run has
//! returned, so runs never overlap.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use booksync_core::AppConfig;
use booksync_sync::pipeline::run_once;
use booksync_sync::{RunError, RunSummary};

use crate::error::DaemonError;

/// Run the scheduler on a fresh multi-threaded runtime until Ctrl-C.
pub fn start_blocking(config: AppConfig, every: Duration) -> Result<(), DaemonError> {
    init_tracing();
    runtime()?.block_on(run(config, every))
}

/// One sync run on a fresh runtime. Used by `booksync run`.
pub fn run_once_blocking(config: &AppConfig) -> Result<RunSummary, DaemonError> {
    init_tracing();
    Ok(runtime()?.block_on(run_once(config))?)
}

pub async fn run(config: AppConfig, every: Duration) -> Result<(), DaemonError> {
    if every.is_zero() {
        return Err(DaemonError::ZeroInterval);
    }
    info!(interval_secs = every.as_secs(), "booking sync daemon started");
    let runs = schedule(every, shutdown_signal(), || run_once(&config)).await;
    info!(runs, "booking sync daemon stopped");
    Ok(())
}

/// Call `job` every `every` until `shutdown` resolves. Returns the number of
/// runs started.
///
/// The first run starts immediately. A run that outlasts the interval delays
/// the next tick instead of triggering a burst of catch-up runs.
pub async fn schedule<F, Fut, S>(every: Duration, shutdown: S, mut job: F) -> u64
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<RunSummary, RunError>>,
    S: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut runs = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                runs += 1;
                log_outcome(runs, job().await);
            }
        }
    }
    runs
}

fn log_outcome(run: u64, outcome: Result<RunSummary, RunError>) {
    match outcome {
        Ok(summary) => {
            let passes = serde_json::to_string(&summary.passes).unwrap_or_default();
            info!(
                run,
                timestamp = %summary.timestamp,
                synced = summary.total_synced(),
                skipped = summary.total_skipped(),
                passes = %passes,
                "sync run finished"
            );
        }
        Err(err) => error!(run, error = %err, "sync run aborted"),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received ctrl-c, shutting down daemon"),
        Err(err) => {
            error!(error = %err, "failed to listen for ctrl-c; daemon will run until killed");
            std::future::pending::<()>().await;
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, DaemonError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(DaemonError::Runtime)
}

/// Install the global subscriber. `RUST_LOG` filters (default `info`);
/// `LOG_FORMAT=json` switches to JSON lines. Logs go to stderr.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let _ = if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
    };
}
