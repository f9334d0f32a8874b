//! Error types for workspace and navigation operations
//!
//! A query that cannot even be attempted (unreadable document, broken
//! configuration) fails with one of these; "nothing found here" is expressed
//! through `Option`/empty results instead and never raises an error.

use thiserror::Error;
use tower_lsp::lsp_types::Url;

/// Main error type for workspace and navigation operations
#[derive(Error, Debug)]
pub enum NavError {
    /// IO errors (document reads, workspace scanning)
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration that could not be decoded
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// The queried document is neither open in the editor nor part of the
    /// scanned workspace
    #[error("document is not tracked: {uri}")]
    UntrackedDocument { uri: Url },

    /// File watcher setup errors
    #[error("watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type alias for workspace and navigation operations
pub type NavResult<T> = Result<T, NavError>;

/// Helper trait for converting IO errors with context
pub trait IoContext<T> {
    fn with_io_context(self, message: &str) -> NavResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_io_context(self, message: &str) -> NavResult<T> {
        self.map_err(|e| NavError::Io {
            message: message.to_string(),
            source: e,
        })
    }
}
