//! `booksync config`: show what a run would use.

use anyhow::{Context, Result};
use clap::Args;

use booksync_core::AppConfig;

#[derive(Args, Debug)]
pub struct ConfigArgs {}

impl ConfigArgs {
    pub fn run(self, config: &AppConfig) -> Result<()> {
        let yaml = config
            .to_redacted_yaml()
            .context("failed to render configuration")?;
        print!("{yaml}");
        Ok(())
    }
}
