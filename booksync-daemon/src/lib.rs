//! Scheduler for the booking sync job: one run per interval until Ctrl-C.

mod error;
mod runtime;

pub use error::DaemonError;
pub use runtime::{init_tracing, run, run_once_blocking, schedule, start_blocking};
