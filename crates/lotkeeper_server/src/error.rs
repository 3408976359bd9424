//! Error types for the server.

use lotkeeper_core::CoreError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving a request.
///
/// Business rejections (lot full, already parked, not found) are not errors
/// here; they travel as `{success: false}` replies.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request carried no usable license plate.
    #[error("License plate required")]
    MissingLicensePlate,

    /// The request body is not valid JSON for the endpoint.
    #[error("Invalid JSON body")]
    InvalidJson(#[source] serde_json::Error),

    /// The request could not be parsed as HTTP/1.x.
    #[error("malformed HTTP request: {0}")]
    MalformedHttp(String),

    /// The request body exceeds the configured limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Configured limit.
        limit: usize,
    },

    /// The client did not deliver its request in time.
    #[error("request timed out")]
    Timeout,

    /// The server configuration cannot be served.
    #[error("invalid server configuration: {message}")]
    InvalidConfiguration {
        /// What is wrong.
        message: String,
    },

    /// Core error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// HTTP status code reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::MissingLicensePlate
            | ServerError::InvalidJson(_)
            | ServerError::MalformedHttp(_) => 400,
            ServerError::Timeout => 408,
            ServerError::PayloadTooLarge { .. } => 413,
            ServerError::InvalidConfiguration { .. } | ServerError::Core(_) | ServerError::Io(_) => {
                500
            }
        }
    }
}
