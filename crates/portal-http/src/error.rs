//! Error types for request construction and transport.
//!
//! These never leave the crate's public request methods: every failure is
//! folded into an [`Envelope`](portal_model::Envelope) with a negative code.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpError {
    /// Base address and path did not form a valid URL.
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A caller-supplied header name or value was rejected.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    /// Failed to build the underlying client.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// Request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Body(#[from] serde_json::Error),

    /// Connection, TLS or body read failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("request timed out after {ms} ms")]
    Timeout { ms: u128 },
}

impl HttpError {
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Transport(_) | Self::Client(_) => {
                "Could not reach the server. Please check your network connection."
            }
            Self::Timeout { .. } => "The server took too long to respond. Please try again.",
            Self::InvalidUrl { .. } | Self::InvalidHeader(_) | Self::Body(_) => {
                "An unexpected error occurred."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HttpError>;
