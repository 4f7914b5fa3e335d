use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Fatal failures that abort a generation run.
///
/// Problems found in the workbook contents are never reported through this
/// type; they are collected as [`ErrorEntry`](crate::diagnostics::ErrorEntry)
/// values and the run carries on.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a sheet row cannot be decoded into its typed form.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the spreadsheet reader implementation.
    #[error("workbook read error: {0}")]
    WorkbookRead(#[from] calamine::Error),

    /// Raised when a sheet listed by the workbook cannot be loaded.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the output directory cannot be used.
    #[error("output directory unusable: {0}")]
    InvalidOutput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
