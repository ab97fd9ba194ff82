//! Error types for the git link add-in.

use thiserror::Error;

/// Errors that can occur while creating, inserting or activating links.
///
/// Unresolvable summaries and malformed drop payloads are not errors: they
/// fall back to the raw revision id and to a no-op drop respectively.
#[derive(Error, Debug)]
pub enum Error {
    /// A tag was requested under a name that was never registered.
    #[error("Tag type '{0}' is not registered")]
    UnregisteredTagType(String),

    /// Link target failed validation.
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// Persisted tag attributes are missing or malformed.
    #[error("Invalid link attributes: {0}")]
    InvalidAttributes(String),

    /// The repository browser could not be started.
    #[error("Error running {program}: {source}")]
    Launch {
        /// Executable that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The drop was cancelled before its links were inserted.
    #[error("Drop cancelled before insertion")]
    Cancelled,
}

/// Result type for git link operations.
pub type Result<T> = std::result::Result<T, Error>;
