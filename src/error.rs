use std::path::PathBuf;
use thiserror::Error;

pub type TirageResult<T> = Result<T, TirageError>;

#[derive(Error, Debug)]
pub enum TirageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook not found: {}", .0.display())]
    WorkbookNotFound(PathBuf),

    #[error("Sheet '{0}' is missing from the workbook")]
    MissingSheet(String),

    #[error("Sheet '{sheet}': {message}")]
    Schema { sheet: String, message: String },

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl TirageError {
    pub fn schema(sheet: &str, message: impl Into<String>) -> Self {
        TirageError::Schema {
            sheet: sheet.to_string(),
            message: message.into(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for TirageError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        TirageError::Export(e.to_string())
    }
}
