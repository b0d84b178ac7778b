use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("unknown role: {0}")]
    InvalidRole(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, PortalError>;
