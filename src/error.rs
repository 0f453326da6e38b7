use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Every failure a sync run can surface. Variants carry the file or stage
/// they concern so the operator can tell what to look at.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed json in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt timeline in {}: {reason}", path.display())]
    CorruptTimeline { path: PathBuf, reason: String },

    #[error("duplicate channel id '{id}' in {origin}")]
    DuplicateChannel { id: String, origin: String },

    #[error("no previous sync found; run 'subsync sync' first")]
    NoState,

    #[error("invalid config in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("missing credential {0}; set it in the environment or pass it as a flag")]
    MissingCredential(&'static str),

    #[error("http request to {stage} failed: {source}")]
    Http {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} returned {status}: {body}")]
    Api {
        stage: &'static str,
        status: u16,
        body: String,
    },
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::Io { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        SyncError::Parse { path: path.into(), source }
    }
}
