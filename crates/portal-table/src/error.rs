use std::path::PathBuf;

use portal_model::RowId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("row {0} not found")]
    RowNotFound(RowId),

    #[error("row index {index} out of range for {len} rows")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8")]
    Encoding,

    #[error("Failed to write export file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TableError {
    pub fn user_message(&self) -> String {
        match self {
            Self::RowNotFound(_) | Self::IndexOutOfRange { .. } => {
                "The selected row no longer exists.".to_string()
            }
            Self::Csv(_) | Self::Encoding => "The table could not be exported.".to_string(),
            Self::Io { path, .. } => format!(
                "Could not write the export to {}. Please check permissions.",
                path.display()
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
