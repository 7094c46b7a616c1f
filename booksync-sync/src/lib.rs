//! # booksync-sync
//!
//! Sync orchestration: the three passes, test-history enrichment and the
//! error policy that decides whether a failure skips a booking or aborts
//! the run.
//!
//! Call [`pipeline::run_once`] to build the CRM and SARAS gateways from
//! configuration and run one sync, or drive a [`Synchroniser`] directly with
//! any [`booksync_core::BookingSource`] / [`booksync_core::BookingTarget`].

pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod summary;
pub mod synchroniser;

pub use enrich::EnrichmentMode;
pub use error::RunError;
pub use summary::{Pass, PassSummary, RunSummary, Step};
pub use synchroniser::Synchroniser;
