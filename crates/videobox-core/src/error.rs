//! Error types for Videobox Core

use thiserror::Error;

/// Result type alias for widget operations
pub type Result<T> = std::result::Result<T, Error>;

/// Widget error types
#[derive(Error, Debug)]
pub enum Error {
    // Animation errors
    #[error("Animation cancelled")]
    AnimationCancelled,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if the widget keeps working after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::AnimationCancelled | Error::InvalidConfig(_))
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::AnimationCancelled => "ANIMATION_CANCELLED",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Json(_) => "JSON",
        }
    }
}
