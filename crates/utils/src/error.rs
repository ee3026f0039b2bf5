//! Error types for utility functions.

use rewind_primitives::InvalidEventKind;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Null in a column that requires a value.
    #[error("null value in column {column} at row {row}")]
    NullValue {
        /// Column name.
        column: String,
        /// Row index.
        row: usize,
    },

    /// Date outside the supported calendar range.
    #[error("date out of range: {0} days since epoch")]
    InvalidDate(i32),

    /// Unrecognised change label.
    #[error(transparent)]
    InvalidEventKind(#[from] InvalidEventKind),
}
