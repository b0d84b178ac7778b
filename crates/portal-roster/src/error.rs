use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("unknown roster: {0}")]
    UnknownRoster(String),

    #[error("unknown submission status: {0}")]
    UnknownStatus(String),

    #[error("no header matches the roster columns (expected one of: {})", expected.join(", "))]
    NoMatchingColumns { expected: Vec<String> },

    #[error("failed to read roster CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RosterError {
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownRoster(name) => format!("没有名为 {name} 的名单"),
            Self::UnknownStatus(value) => format!("未知的审核状态: {value}"),
            Self::NoMatchingColumns { .. } => "文件表头与名单列不匹配".to_string(),
            Self::Csv(_) => "文件导入失败".to_string(),
            Self::Io { path, .. } => format!("无法读取文件: {}", path.display()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
