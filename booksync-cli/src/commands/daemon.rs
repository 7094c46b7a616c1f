//! `booksync daemon`: scheduled sync in the foreground.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use booksync_core::AppConfig;
use booksync_daemon::start_blocking;

/// Arguments for `booksync daemon`.
#[derive(Args, Debug)]
pub struct DaemonArgs {
    /// Seconds between runs. Defaults to `SYNC_INTERVAL_SECS`.
    #[arg(long)]
    pub interval_secs: Option<u64>,
}

impl DaemonArgs {
    pub fn run(self, config: AppConfig) -> Result<()> {
        let every = Duration::from_secs(self.interval_secs.unwrap_or(config.sync_interval_secs));
        start_blocking(config, every).context("daemon exited with error")
    }
}
