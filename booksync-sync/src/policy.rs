//! Error policy applied at the synchroniser boundary.
//!
//! | Error                         | Outcome                              |
//! |-------------------------------|--------------------------------------|
//! | `AccessDenied`                | fatal                                |
//! | `SourceStore` 400 / 500       | swallowed                            |
//! | `SourceStore` other / none    | fatal                                |
//! | `Downstream` (any kind)       | swallowed                            |
//! | `Unexpected`                  | fatal                                |
//!
//! Duplicate-on-create and not-found-on-delete are not decided here: the
//! synchroniser turns those into a second mark-as-synced call, whose own
//! failure comes back through [`resolve`].

use tracing::{error, warn};

use booksync_core::{ErrorKind, SyncError};

/// What to do with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Log it and carry on with the next booking or pass.
    Swallow,
    /// Abort the run.
    Fatal,
}

pub fn classify(err: &SyncError) -> Disposition {
    match err.kind() {
        ErrorKind::Downstream => Disposition::Swallow,
        ErrorKind::SourceStore => match err.status() {
            Some(400) | Some(500) => Disposition::Swallow,
            _ => Disposition::Fatal,
        },
        ErrorKind::AccessDenied | ErrorKind::Unexpected => Disposition::Fatal,
    }
}

/// Log `err` and hand it back if it must abort the run.
///
/// `context` says what was being attempted; correlation ids come from the
/// enclosing span.
pub fn resolve(err: SyncError, context: &str) -> Result<(), SyncError> {
    match classify(&err) {
        Disposition::Swallow => {
            warn!(
                kind = ?err.kind(),
                status = ?err.status(),
                error = %err,
                "{context} failed, continuing"
            );
            Ok(())
        }
        Disposition::Fatal => {
            error!(
                kind = ?err.kind(),
                status = ?err.status(),
                error = %err,
                "{context} failed, aborting run"
            );
            Err(err)
        }
    }
}
