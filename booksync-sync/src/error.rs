//! Error types for booksync-sync.

use thiserror::Error;

use booksync_core::{AuthError, ConfigError, SyncError};
use booksync_renderer::RenderError;

/// Everything that can stop a run. All of it is fatal.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("query template error: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}
