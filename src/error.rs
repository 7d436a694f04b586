//! Error taxonomy for the directory, the broker client and the browsing service.
//!
//! The first two enums are what the external collaborators surface. `BrowserError`
//! is what the service hands to callers: every variant names the operation and
//! the queue/path involved so a log line is actionable on its own.

use thiserror::Error;

/// Failures surfaced by a `NamingDirectory`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NamingError {
    #[error("name not found: '{path}'")]
    NameNotFound { path: String },

    #[error("'{path}' is not a naming context")]
    NotAContext { path: String },

    #[error("naming directory unavailable: {0}")]
    Unavailable(String),
}

/// Failures surfaced by the broker client library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrokerError {
    #[error("{what} is closed")]
    Closed { what: &'static str },

    #[error("unknown queue '{name}'")]
    UnknownQueue { name: String },

    #[error("broker refused {operation}: {reason}")]
    Refused { operation: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum BrowserError {
    /// Directory or broker unreachable or misconfigured.
    #[error("connection failed during {operation}: {reason}")]
    Connection { operation: &'static str, reason: String },

    #[error("cannot resolve queue '{queue}': {source}")]
    Resolution {
        queue: String,
        #[source]
        source: BrokerError,
    },

    #[error("cannot browse queue '{queue}': {source}")]
    Browse {
        queue: String,
        #[source]
        source: BrokerError,
    },

    /// The queue exists but the message is not in its current snapshot.
    #[error("message not found: {message_id} in {queue}")]
    NotFound { queue: String, message_id: String },

    #[error("discovery failed at '{path}': {source}")]
    Discovery {
        path: String,
        #[source]
        source: NamingError,
    },

    #[error("discovery exceeded max depth {max_depth} at '{path}'")]
    DepthExceeded { path: String, max_depth: usize },

    #[error("failed to close browse session: {0}")]
    Close(#[source] BrokerError),

    #[error("request worker failed: {0}")]
    Worker(String),
}

impl BrowserError {
    /// True for the conditions a caller should present as "does not exist".
    pub fn is_not_found(&self) -> bool {
        match self {
            BrowserError::NotFound { .. } => true,
            BrowserError::Resolution { source, .. } => {
                matches!(source, BrokerError::UnknownQueue { .. })
            }
            BrowserError::Discovery { source, .. } => {
                matches!(source, NamingError::NameNotFound { .. })
            }
            _ => false,
        }
    }

    /// Short machine-readable tag used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            BrowserError::Connection { .. } => "connection",
            BrowserError::Resolution { .. } => "resolution",
            BrowserError::Browse { .. } => "browse",
            BrowserError::NotFound { .. } => "not_found",
            BrowserError::Discovery { .. } => "discovery",
            BrowserError::DepthExceeded { .. } => "depth_exceeded",
            BrowserError::Close(_) => "close",
            BrowserError::Worker(_) => "worker",
        }
    }
}

pub type Result<T, E = BrowserError> = std::result::Result<T, E>;
