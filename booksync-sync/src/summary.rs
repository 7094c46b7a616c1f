//! Per-run counters. Reported, never acted on.

use serde::Serialize;

use booksync_core::SyncTimestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Updated,
    Cancelled,
    New,
}

impl Pass {
    /// Passes in the order a run executes them.
    pub fn all() -> &'static [Pass] {
        &[Pass::Updated, Pass::Cancelled, Pass::New]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pass::Updated => "updated",
            Pass::Cancelled => "cancelled",
            Pass::New => "new",
        }
    }
}

/// Outcome of one booking within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sent downstream (or already there) and marked synced.
    Done,
    /// A swallowed error stopped this booking.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub pass: Pass,
    /// `false` when the fetch failed with a swallowed error.
    pub fetched_ok: bool,
    pub fetched: usize,
    pub synced: usize,
    pub skipped: usize,
}

impl PassSummary {
    pub fn new(pass: Pass, fetched: usize) -> Self {
        Self {
            pass,
            fetched_ok: true,
            fetched,
            synced: 0,
            skipped: 0,
        }
    }

    pub fn fetch_failed(pass: Pass) -> Self {
        Self {
            fetched_ok: false,
            ..Self::new(pass, 0)
        }
    }

    pub fn record(&mut self, step: Step) {
        match step {
            Step::Done => self.synced += 1,
            Step::Skipped => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub timestamp: SyncTimestamp,
    pub passes: Vec<PassSummary>,
}

impl RunSummary {
    pub fn pass(&self, pass: Pass) -> Option<&PassSummary> {
        self.passes.iter().find(|p| p.pass == pass)
    }

    pub fn total_synced(&self) -> usize {
        self.passes.iter().map(|p| p.synced).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.passes.iter().map(|p| p.skipped).sum()
    }
}
