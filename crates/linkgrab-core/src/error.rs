//! Error taxonomy for extraction, probing and downloading.
//!
//! Per-item failures (`MalformedItem`, `Probe`, `Fetch`) are reported and
//! contained by the component that raises them; only `Pattern`,
//! `DirectoryCreate` and `Io` abort a whole step.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The extraction template is unusable for one extension.
    #[error("pattern for extension `{extension}` is invalid: {reason}")]
    Pattern { extension: String, reason: String },

    /// Sanitizing the captured name left nothing usable.
    #[error("item name {raw:?} is empty after sanitization (extension `{extension}`)")]
    MalformedItem { raw: String, extension: String },

    /// HEAD request for one item could not complete.
    #[error("probe #{index} [{name}] failed: {source}")]
    Probe {
        index: usize,
        name: String,
        #[source]
        source: FetchError,
    },

    /// GET for one item failed; the destination file is not considered present.
    #[error("download of [{name}] failed: {source}")]
    Fetch {
        name: String,
        #[source]
        source: FetchError,
    },

    #[error("could not create output directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single HTTP transfer (HEAD or GET).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (DNS, refused connection, timeout, ...).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// The final response was not `200 OK`; nothing was written.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing or renaming the destination file failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    /// The transfer was stopped through the cancel token.
    #[error("cancelled")]
    Cancelled,
}
