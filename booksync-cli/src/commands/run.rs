//! `booksync run`: one sync, then exit.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use booksync_core::AppConfig;
use booksync_daemon::run_once_blocking;
use booksync_sync::RunSummary;

/// Arguments for `booksync run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Emit the run summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PassRow {
    #[tabled(rename = "pass")]
    pass: String,
    #[tabled(rename = "fetched")]
    fetched: String,
    #[tabled(rename = "synced")]
    synced: usize,
    #[tabled(rename = "skipped")]
    skipped: usize,
}

impl RunArgs {
    pub fn run(self, config: &AppConfig) -> Result<()> {
        let summary = run_once_blocking(config).context("sync run aborted")?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to render run summary")?
            );
            return Ok(());
        }
        print_summary(&summary);
        Ok(())
    }
}

fn print_summary(summary: &RunSummary) {
    let rows: Vec<PassRow> = summary
        .passes
        .iter()
        .map(|p| PassRow {
            pass: p.pass.as_str().to_string(),
            fetched: if p.fetched_ok {
                p.fetched.to_string()
            } else {
                "failed".to_string()
            },
            synced: p.synced,
            skipped: p.skipped,
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let headline = format!(
        "✓ sync at {}: {} synced, {} skipped",
        summary.timestamp,
        summary.total_synced(),
        summary.total_skipped()
    );
    if summary.total_skipped() == 0 {
        println!("{}", headline.green());
    } else {
        println!("{}", headline.yellow());
    }
}
