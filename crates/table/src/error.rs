//! Error types for table loading and grouping.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors raised while loading or grouping annotation tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be read.
    #[error("failed to read table '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line holds a different number of fields than the schema declares.
    #[error("{path}:{line}: expected {expected} fields, found {found}")]
    FieldCount {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A numeric column holds a value that does not parse as a number.
    #[error("{path}:{line}: column '{column}' holds non-numeric value '{value}'")]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    /// The requested column is not part of the schema.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// The requested column holds the other kind of value.
    #[error("column '{column}' is not a {expected} column")]
    ColumnKind {
        column: String,
        expected: &'static str,
    },

    /// No row carried the requested group key.
    #[error("no group for key '{key}'")]
    MissingGroup { key: String },
}
