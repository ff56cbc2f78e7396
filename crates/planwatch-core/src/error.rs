//! Error types for the planwatch client library.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single candidate URL failed.
///
/// These never escape [`crate::fallback::FallbackRequestClient`] on their
/// own; they are collected into [`ClientError::Exhausted`] once every
/// candidate has been tried.
#[derive(Error, Debug)]
pub enum AttemptError {
    /// Connection refused, DNS failure, reset, and similar
    #[error("Network error: {message}")]
    Network { message: String },
    /// The request did not complete within its time bound
    #[error("Request timed out")]
    Timeout,
    /// The server answered with a non-2xx status
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    /// The body was non-empty but not valid JSON
    #[error("Invalid JSON response: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl AttemptError {
    /// HTTP status carried by this failure, if it was an HTTP failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// A failed attempt against one candidate URL.
#[derive(Debug)]
pub struct AttemptFailure {
    pub url: String,
    pub error: AttemptError,
}

/// Comprehensive error type for all client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Every candidate URL failed. The text is stable across repeats so that
    /// identical outages render as one log line.
    #[error("All {} candidate URLs failed", attempts.len())]
    Exhausted { attempts: Vec<AttemptFailure> },
    /// A configured base URL could not be parsed
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ClientError {
    /// Returns true when any attempted candidate answered with `status`.
    pub fn saw_status(&self, status: u16) -> bool {
        match self {
            ClientError::Exhausted { attempts } => attempts
                .iter()
                .any(|attempt| attempt.error.status() == Some(status)),
            _ => false,
        }
    }

    /// Per-candidate failures behind an aggregate error.
    pub fn attempts(&self) -> &[AttemptFailure] {
        match self {
            ClientError::Exhausted { attempts } => attempts,
            _ => &[],
        }
    }

    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        ClientError::Configuration {
            message: message.into(),
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
