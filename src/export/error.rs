use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("CSV is missing the '{0}' column")]
    MissingColumn(String),

    #[error("CSV has an empty '{column}' cell in row {row}")]
    MissingValue { column: String, row: usize },

    #[error("CSV row {row} has an invalid date '{value}'")]
    InvalidDate {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to write CSV file {0}: {1}")]
    FileWrite(PathBuf, #[source] std::io::Error),
}
