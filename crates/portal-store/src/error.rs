//! Store error types.
//!
//! Backends report failures through [`StoreError`]; the [`Store`](crate::Store)
//! facade logs them and falls back to defaults, so callers never see them.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to {operation} store file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file is not a JSON object: {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize value for key '{key}'")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the session file at {}", operation, path.display()),
            Self::Corrupt { path, .. } => format!(
                "The session file at {} is damaged and will be ignored.",
                path.display()
            ),
            Self::Serialize { key, .. } => format!("The value for '{key}' could not be saved."),
            Self::QuotaExceeded { .. } => "Local storage is full.".to_string(),
            Self::Poisoned => "Local storage is unavailable.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
