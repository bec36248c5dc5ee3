//! Error types for the photolabel-core library.
//!
//! This module provides granular error variants for the different failure
//! modes of the annotation pipeline, enabling precise error handling and
//! user-friendly notices.
//!
//! Two situations are deliberately NOT errors:
//! - the user dismissing the picker (modelled as [`crate::source::Selection::Cancelled`])
//! - an annotation response with no labels (a successful empty result)

use thiserror::Error;

/// Errors that can occur within the photolabel-core library.
///
/// Each variant represents a specific failure mode with contextual
/// information to help diagnose and handle errors appropriately.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing keys, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The image source failed to produce a selection (distinct from the
    /// user cancelling, which is not an error).
    #[error("Image selection failed: {0}")]
    SelectionFailed(String),

    /// Reading the bytes behind a selected image failed (missing file,
    /// permission failure, I/O fault). Distinct from network errors.
    #[error("Failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The provider rejected the request's credential.
    #[error("Vision API rejected the credential: {0}")]
    Auth(String),

    /// The provider reported quota exhaustion or rate limiting.
    #[error("Vision API quota exceeded, please retry later")]
    Quota,

    /// The transport failed or the provider returned a non-success status.
    /// Carries the provider's message text when one was present.
    #[error("Network error: {}", .message.as_deref().unwrap_or("request to the Vision API failed"))]
    Network { message: Option<String> },

    /// The provider returned a success status but a body that could not be
    /// interpreted.
    #[error("Malformed response from the Vision API: {0}")]
    MalformedResponse(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a selection-failure error with the given message.
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::SelectionFailed(msg.into())
    }

    /// Creates a read error for the given image path.
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a network error carrying a provider-supplied message.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: Some(msg.into()),
        }
    }

    /// Creates a network error with no provider message.
    pub fn network_generic() -> Self {
        Self::Network { message: None }
    }

    /// Creates a malformed-response error with the given message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
