//! Error types for upnote2notion
//!
//! Only conditions that abort the whole batch live here. Per-note failures
//! (malformed timestamps, exhausted upload retries, unreadable files) degrade
//! to defaults or land in the batch summary instead.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort the batch.
#[derive(Debug, Error)]
pub enum Error {
    #[error("notes directory does not exist: {0}")]
    NotesDirMissing(PathBuf),

    #[error("no markdown files found in {0}")]
    EmptyBatch(PathBuf),

    #[error("API key and database id are required (pass --api-key/--database-id or --use-config)")]
    MissingCredentials,

    #[error("no platform config directory available")]
    ConfigDirUnavailable,

    #[error("saved config not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid config file {path}: {source}")]
    ConfigFormat {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
