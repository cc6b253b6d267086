//! Error taxonomy for backend calls.

use thiserror::Error;

use crate::core::format::capitalize;

/// Result type alias for backend API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure of a single REST call.
///
/// Every variant is recoverable: the views turn it into a message and stay
/// interactive until the next manual or polled fetch.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response (refused, DNS, timeout).
    #[error("Connection failed: {0}")]
    Connection(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response arrived but its body did not match the expected shape.
    #[error("Invalid response body (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    /// The configured base URL cannot be joined with an endpoint path.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Coarse classification used for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    NotFound,
    ServerFault,
    Other,
}

impl ApiError {
    /// HTTP status of the failure, `0` when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Connection(_) | ApiError::InvalidUrl(_) => 0,
            ApiError::Status { status, .. } | ApiError::Decode { status, .. } => *status,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.status() {
            0 => ErrorKind::Connectivity,
            404 => ErrorKind::NotFound,
            500 => ErrorKind::ServerFault,
            _ => ErrorKind::Other,
        }
    }

    /// Human-readable message for a failed load of `resource` (plural, lowercase).
    pub fn describe(&self, resource: &str) -> String {
        match self.kind() {
            ErrorKind::Connectivity => {
                "Cannot connect to the server. Make sure the Baleen backend is running.".to_string()
            }
            ErrorKind::NotFound => format!(
                "{} endpoint not found. The API might not be deployed correctly.",
                capitalize(resource)
            ),
            ErrorKind::ServerFault => {
                "Server error occurred. Check the backend logs for details.".to_string()
            }
            ErrorKind::Other => format!("Failed to load {resource}: {}", self.detail()),
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Status { message, .. } | ApiError::Decode { message, .. }
                if !message.is_empty() =>
            {
                message.clone()
            }
            ApiError::Status { status, .. } | ApiError::Decode { status, .. } => {
                format!("HTTP {status}")
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if err.is_decode() => ApiError::Decode {
                status: status.as_u16(),
                message: err.to_string(),
            },
            Some(status) => ApiError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None if err.is_decode() || err.is_body() => ApiError::Decode {
                status: 200,
                message: err.to_string(),
            },
            None => ApiError::Connection(err),
        }
    }
}
