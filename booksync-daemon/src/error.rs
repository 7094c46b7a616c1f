use thiserror::Error;

/// Error surface for the scheduler runtime.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to start tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("sync interval must be greater than zero")]
    ZeroInterval,

    #[error(transparent)]
    Run(#[from] booksync_sync::RunError),
}
