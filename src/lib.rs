// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod demo;
pub mod repl;

#[cfg(test)]
mod test_utils;

pub use crate::core::db::{BatchOutcome, Driver, Execution, LazyDb, ResultSet, SqliteDriver};
pub use crate::core::{
    BatchStatement, Dialect, Encoder, LazyDbError, RawExpression, Result, Row, StatementBuilder,
    Value,
};
