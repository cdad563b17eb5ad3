use polars::prelude::PolarsError;
use std::{io, path::PathBuf};
use thiserror::Error;
use tokio::task::JoinError;

/**
Result type to simplify function signatures.

This is a custom result type that uses our custom `SalesViewError` for the error type.

Functions can return `SalesViewResult<T>` and then use `?` to automatically propagate errors.
*/
pub type SalesViewResult<T> = Result<T, SalesViewError>;

/**
Custom error type for Superstore View.

Every variant produced while loading a dataset is terminal for the session:
the caller reports it and keeps no partial table.

We use the `thiserror` crate to derive the `Error` trait and automatically
implement `Display` using the `#[error(...)]` attribute.
*/
#[derive(Error, Debug)]
pub enum SalesViewError {
    // Wrapper for standard IO errors.
    // The #[from] attribute automatically converts io::Error to SalesViewError::Io.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // Wrapper for Polars errors: malformed CSV rows, failed casts, bad lazy plans.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    // Errors reported by calamine while decoding a .xls/.xlsx workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    // Errors encountered while parsing CSV data (e.g., empty input, no header).
    #[error("CSV parsing error: {0}")]
    CsvParsing(String),

    // Indicates that a provided file extension or file type are not supported.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    // Indicates that a specified file could not be found, storing the attempted path.
    #[error("File not found: {0:#?}")]
    FileNotFound(PathBuf),

    // No input was supplied and the designated fallback dataset is missing.
    #[error("Error loading default file: {0:#?} not found")]
    FallbackNotFound(PathBuf),

    // A column the dashboard depends on is absent from the header row.
    #[error("Missing required column: '{0}'")]
    MissingColumn(String),

    /// An `Order Date` cell could not be parsed. `row` is 1-based (header excluded).
    #[error("Invalid date '{value}' in column '{column}' at row {row}")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    // The dataset has a header but no data rows, so no default date range exists.
    #[error("Dataset contains no rows")]
    EmptyDataset,

    #[error("Invalid value for command-line argument '{arg_name}': {reason}")]
    InvalidArgument {
        arg_name: String, // Context about *which* argument failed
        reason: String,   // The specific error reason
    },

    // Wrapper for Tokio JoinErrors, occurring when asynchronous tasks fail.
    #[error("Tokio JoinError: {0}")]
    TokioJoin(#[from] JoinError),

    // Errors occurring when receiving data from asynchronous channels.
    #[error("Channel receive error: {0}")]
    ChannelReceive(String),

    // A catch-all for other, less specific errors not covered by specific variants.
    #[error("Other error: {0}")]
    Other(String),
}

impl From<calamine::Error> for SalesViewError {
    fn from(err: calamine::Error) -> SalesViewError {
        SalesViewError::Spreadsheet(err.to_string())
    }
}

// Implementation of the From trait to convert a String into a SalesViewError.
impl From<String> for SalesViewError {
    fn from(err: String) -> SalesViewError {
        // Prefer using specific error variants when possible, fallback to Other.
        SalesViewError::Other(err)
    }
}
