//! Error types for the media server client.

use thiserror::Error;

/// Errors that can occur when talking to the media server.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered 404 for the requested resource
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The request never produced a response
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The configured base URL cannot be used
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
