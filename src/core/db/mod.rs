/// Database Module
///
/// The database layer is split into three concerns:
/// - **Driver** (`driver.rs`): the `Driver` trait and its SQLite implementation
/// - **Query Results** (`query.rs`): result sets and value conversion
/// - **Connection Facade** (`connection.rs`): `LazyDb` and its query/insert/update helpers
///
/// ## Error Handling
///
/// All database operations use the standardized `LazyDbError` type for consistent error propagation.
pub mod connection;
pub mod driver;
pub mod query;

pub use connection::*;
pub use driver::*;
pub use query::*;
