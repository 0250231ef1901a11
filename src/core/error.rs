//! Error types shared by the temporal memory components.

use thiserror::Error;

/// Errors raised by the temporal memory components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HtmError {
    /// A configuration value is out of its valid range.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    /// A column identifier outside the configured topology was passed to `compute`.
    #[error("Column {column} out of bounds (number of columns: {num_columns})")]
    InvalidColumn { column: usize, num_columns: usize },

    /// An external cell identifier that cannot be shifted past the internal cells without overflow.
    #[error("External cell {cell} cannot be reindexed past {number_of_cells} internal cells")]
    InvalidExternalCell { cell: usize, number_of_cells: usize },
}

/// Result type alias using `HtmError`.
pub type Result<T> = std::result::Result<T, HtmError>;
