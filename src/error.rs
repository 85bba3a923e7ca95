use std::path::PathBuf;

use plan_core::OverrideTableError;
use thiserror::Error;

/// Errors that abort a pass.
///
/// Row-level problems (unreadable dates or numbers, missing columns, unknown
/// labels) are never errors; they are coerced and logged where they occur.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Missing file: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    InvalidOverrides(#[from] OverrideTableError),
}
