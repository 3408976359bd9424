//! Error types for Lotkeeper core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that prevent a tracker from being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The lot configuration is unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Expected business outcomes that refuse an admit or release.
///
/// These are not faults: the tracker is unchanged when one is returned, and
/// the `Display` text is the message shown to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Rejection {
    /// No free spot is left.
    #[error("Parking lot is full")]
    LotFull,

    /// The vehicle already holds an active record.
    #[error("Vehicle already parked")]
    AlreadyParked,

    /// The vehicle holds no active record.
    #[error("Vehicle not found")]
    NotFound,
}
