/// LazyDB Error Module
///
/// This module defines the error types shared by the statement builder, the
/// driver layer and the convenience facade.
use thiserror::Error;

/// Error type for every fallible LazyDB operation.
///
/// Builder errors (`EmptyRow`, `SchemaMismatch`) are raised before any SQL
/// text is produced. An empty batch is deliberately not an error; see
/// [`BatchStatement`](crate::core::statement::BatchStatement).
#[derive(Error, Debug)]
pub enum LazyDbError {
    /// An insert or update was given a row without any columns
    #[error("Empty row: no columns given for table `{table}`")]
    EmptyRow { table: String },

    /// A batch row does not share the column layout of the first row
    #[error("Schema mismatch in batch row {row}: expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Errors reported by the SQLite driver (bad SQL, constraint failures, I/O)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Misuse of a query helper (wrong statement shape, unknown column)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of structured values
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Result to use LazyDbError as the error type.
pub type Result<T> = std::result::Result<T, LazyDbError>;
