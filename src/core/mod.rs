/// Core Module for LazyDB
///
/// The value model, the encoder and statement builder, the driver layer and
/// the error log. Everything else in the crate is built on these.

pub mod db;
pub mod encode;
pub mod error;
pub mod errorlog;
pub mod statement;
pub mod value;

// Re-export commonly used types for convenience
pub use encode::{Dialect, Encoder};
pub use error::{LazyDbError, Result};
pub use statement::{BatchStatement, StatementBuilder};
pub use value::{RawExpression, Row, Value};
