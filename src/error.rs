use std::path::PathBuf;
use thiserror::Error;

/// 管线级错误 (行级歧义不会出现在这里, 只计入统计)
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("sheet '{sheet}' not found in {}", path.display())]
    SheetNotFound { sheet: String, path: PathBuf },

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
