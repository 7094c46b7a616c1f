//! Error types shared across booksync crates.
//!
//! [`SyncError`] is the taxonomy the synchroniser classifies on. It is only
//! used for control flow and logging, never persisted.

use std::path::PathBuf;

use thiserror::Error;

/// SARAS error code returned when the appointment already exists.
pub const SARAS_DUPLICATE_CODE: i64 = 1025;
/// SARAS error code returned when the appointment does not exist.
pub const SARAS_NOT_FOUND_CODE: i64 = 1029;

/// Discriminant of [`SyncError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AccessDenied,
    SourceStore,
    Downstream,
    Unexpected,
}

/// Specialisation of a downstream (SARAS) failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownstreamKind {
    Duplicate,
    NotFound,
    Generic,
}

/// A failed SARAS call, with whatever the service told us about it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {}, code {}, reason: {})", opt(.status), opt(.code), .reason.as_deref().unwrap_or("none"))]
pub struct DownstreamError {
    pub kind: DownstreamKind,
    pub status: Option<u16>,
    pub code: Option<i64>,
    pub reason: Option<String>,
    pub message: String,
}

impl DownstreamError {
    /// Build an error, picking the kind from the SARAS error code.
    pub fn classify(
        message: impl Into<String>,
        status: Option<u16>,
        code: Option<i64>,
        reason: Option<String>,
    ) -> Self {
        let kind = match code {
            Some(SARAS_DUPLICATE_CODE) => DownstreamKind::Duplicate,
            Some(SARAS_NOT_FOUND_CODE) => DownstreamKind::NotFound,
            _ => DownstreamKind::Generic,
        };
        Self {
            kind,
            status,
            code,
            reason,
            message: message.into(),
        }
    }
}

/// Every error a gateway call can surface to the synchroniser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Outbound call to a host outside the egress allow-list.
    #[error("access denied: call to {host} is not allowed ({message})")]
    AccessDenied { host: String, message: String },

    /// CRM call failed; `status` is `None` when no response was received.
    #[error("CRM request failed with status {}: {message}", opt(.status))]
    SourceStore {
        status: Option<u16>,
        message: String,
    },

    #[error("SARAS request failed: {0}")]
    Downstream(DownstreamError),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::AccessDenied { .. } => ErrorKind::AccessDenied,
            SyncError::SourceStore { .. } => ErrorKind::SourceStore,
            SyncError::Downstream(_) => ErrorKind::Downstream,
            SyncError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// HTTP-like status carried by the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::SourceStore { status, .. } => *status,
            SyncError::Downstream(err) => err.status,
            SyncError::AccessDenied { .. } | SyncError::Unexpected(_) => None,
        }
    }

    pub fn source_store(status: Option<u16>, message: impl Into<String>) -> Self {
        SyncError::SourceStore {
            status,
            message: message.into(),
        }
    }

    /// `Some(kind)` when this is a SARAS failure.
    pub fn downstream_kind(&self) -> Option<DownstreamKind> {
        match self {
            SyncError::Downstream(err) => Some(err.kind),
            _ => None,
        }
    }
}

impl From<DownstreamError> for SyncError {
    fn from(err: DownstreamError) -> Self {
        SyncError::Downstream(err)
    }
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("required setting {0} is not set")]
    Missing(&'static str),

    #[error("setting {key} is not a valid URL: {value}")]
    InvalidUrl { key: &'static str, value: String },
}

/// Errors raised while acquiring a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("token endpoint {endpoint} returned {status}: {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error(transparent)]
    AccessDenied(SyncError),
}
