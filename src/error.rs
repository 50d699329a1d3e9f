//! Error types for the mailrulib library.

use std::fmt;

use thiserror::Error;

/// Closed set of domain error kinds a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path (or the item behind it) does not exist in the cloud.
    PathNotExists,
    /// Content exceeds the upload ceiling of the account tier.
    UploadingSizeLimit,
    /// Requested download exceeds the server-side ceiling.
    DownloadingSizeLimit,
    /// Items passed to a batch operation do not share one parent folder.
    DifferentParentPaths,
    /// Requested file revision does not exist.
    HistoryNotExists,
    /// Operation is not available for the current account.
    NotSupportedOperation,
    /// Public link is empty or unknown to the server.
    PublicLinkNotExists,
}

impl ErrorKind {
    /// Get human-readable description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::PathNotExists => "Path does not exist",
            ErrorKind::UploadingSizeLimit => "Upload size limit exceeded",
            ErrorKind::DownloadingSizeLimit => "Download size limit exceeded",
            ErrorKind::DifferentParentPaths => "Items have different parent paths",
            ErrorKind::HistoryNotExists => "History does not exist",
            ErrorKind::NotSupportedOperation => "Operation is not supported",
            ErrorKind::PublicLinkNotExists => "Public link does not exist",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Main error type for mailrulib operations.
#[derive(Error, Debug)]
pub enum CloudError {
    /// Domain error with a kind, message and the offending argument.
    #[error("{}", with_argument(.message, .argument))]
    Client {
        kind: ErrorKind,
        message: String,
        argument: Option<String>,
    },

    /// Session is missing, expired or rejected by the server.
    #[error("Not authorized: {}", with_argument(.message, .argument))]
    NotAuthorized {
        message: String,
        argument: Option<String>,
    },

    /// HTTP request failed with status code.
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Network request error.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Local I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid or unexpected response from server.
    #[error("Invalid response from server")]
    InvalidResponse,

    /// Shard directory has no endpoint for the category.
    #[error("No shard available for category '{0}'")]
    ShardNotFound(String),

    /// Transfer was aborted through the session-wide cancellation signal.
    #[error("Operation cancelled")]
    Cancelled,

    /// Custom error message.
    #[error("{0}")]
    Custom(String),
}

fn with_argument(message: &str, argument: &Option<String>) -> String {
    match argument {
        Some(arg) => format!("{message} (argument: {arg})"),
        None => message.to_string(),
    }
}

impl CloudError {
    /// Build a domain error without an argument name.
    pub fn client(kind: ErrorKind, message: impl Into<String>) -> Self {
        CloudError::Client {
            kind,
            message: message.into(),
            argument: None,
        }
    }

    /// Build a domain error naming the offending argument.
    pub fn client_arg(kind: ErrorKind, message: impl Into<String>, argument: &str) -> Self {
        CloudError::Client {
            kind,
            message: message.into(),
            argument: Some(argument.to_string()),
        }
    }

    /// Build an authorization error.
    pub fn not_authorized(message: impl Into<String>, argument: Option<&str>) -> Self {
        CloudError::NotAuthorized {
            message: message.into(),
            argument: argument.map(str::to_string),
        }
    }

    /// Domain kind of this error, if it is a domain error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CloudError::Client { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Name of the argument that caused the error, if known.
    pub fn argument(&self) -> Option<&str> {
        match self {
            CloudError::Client { argument, .. } | CloudError::NotAuthorized { argument, .. } => {
                argument.as_deref()
            }
            _ => None,
        }
    }

    /// Check whether this is an authorization failure.
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, CloudError::NotAuthorized { .. })
    }

    /// Check whether this error comes from the cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CloudError::Cancelled)
    }
}

/// Result type alias for mailrulib operations.
pub type Result<T> = std::result::Result<T, CloudError>;
