//! Error types for the loader runtime.

use std::path::PathBuf;

/// Errors surfaced by the loader runtime.
///
/// Engine and binder operations never return these to the host; they are
/// produced by URL resolution (and handled by the binder) or by settings
/// loading in the CLI.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// A URL could not be parsed or resolved against the current location.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file could not be parsed.
    #[error("failed to parse settings from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, LoaderError>;
