/// Driver Module
///
/// The seam between the convenience facade and a concrete database client.
/// A driver runs one SQL statement per call and reports either the number of
/// affected rows or a fully fetched result set.
use crate::core::db::query::{value_from_ref, Execution, ResultSet};
use crate::core::encode::Dialect;
use crate::core::{LazyDbError, Result};
use rusqlite::{Batch, Connection};
use std::path::Path;
use tracing::{debug, info};

/// A synchronous database client.
pub trait Driver {
    /// The escaping and catalog conventions the server expects.
    fn dialect(&self) -> Dialect;

    /// Runs a single SQL statement. Strings holding several statements are
    /// rejected with [`LazyDbError::Query`].
    fn execute(&mut self, sql: &str) -> Result<Execution>;

    /// Id generated by the most recent successful insert.
    fn last_insert_id(&self) -> i64;
}

/// [`Driver`] backed by a `rusqlite` connection.
#[derive(Debug)]
pub struct SqliteDriver {
    connection: Connection,
}

impl SqliteDriver {
    /// Opens (creating if needed) the SQLite database at `path`.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let connection = Connection::open(path)?;
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        info!("opened SQLite database {}", path.display());
        Ok(SqliteDriver { connection })
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        info!("opened in-memory SQLite database");
        Ok(SqliteDriver { connection })
    }

    /// Wraps an already configured connection.
    pub fn from_connection(connection: Connection) -> Self {
        SqliteDriver { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Closes the connection, reporting any error from SQLite.
    pub fn close(self) -> Result<()> {
        self.connection.close().map_err(|(_, e)| e)?;
        Ok(())
    }

    fn total_changes(&self) -> Result<i64> {
        Ok(self
            .connection
            .query_row("SELECT total_changes()", [], |row| row.get(0))?)
    }
}

impl Driver for SqliteDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&mut self, sql: &str) -> Result<Execution> {
        let mut batch = Batch::new(&self.connection, sql);
        let Some(mut stmt) = batch.next()? else {
            return Err(LazyDbError::Query("no SQL statement to run".to_string()));
        };
        if batch.next()?.is_some() {
            return Err(LazyDbError::Query(
                "only one SQL statement can run per query".to_string(),
            ));
        }
        let column_count = stmt.column_count();

        if column_count == 0 {
            // sqlite3_changes() keeps the last DML count across DDL statements
            let before = self.total_changes()?;
            let changed = stmt.execute([])?;
            let affected = if self.total_changes()? == before {
                0
            } else {
                changed
            };
            debug!(affected, "executed statement");
            return Ok(Execution::Affected(affected));
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(value_from_ref(row.get_ref(i)?));
            }
            rows.push(values);
        }
        debug!(rows = rows.len(), "fetched result set");
        Ok(Execution::Rows(ResultSet::new(columns, rows)))
    }

    fn last_insert_id(&self) -> i64 {
        self.connection.last_insert_rowid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;
    use crate::core::LazyDbError;

    #[test]
    fn test_execute_reports_affected_rows() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        driver
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)")
            .unwrap();

        let exec = driver
            .execute("INSERT INTO t (name) VALUES ('a'), ('b')")
            .unwrap();
        assert_eq!(exec, Execution::Affected(2));
        assert_eq!(driver.last_insert_id(), 2);
    }

    #[test]
    fn test_execute_fetches_rows() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        let exec = driver.execute("SELECT 1 AS one, 'x' AS ex, NULL AS nothing").unwrap();

        let rs = exec.into_result_set().unwrap();
        assert_eq!(rs.columns, vec!["one", "ex", "nothing"]);
        assert_eq!(
            rs.rows,
            vec![vec![Value::Integer(1), Value::from("x"), Value::Null]]
        );
    }

    #[test]
    fn test_execute_error() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        match driver.execute("SELECT * FROM nonexistent_table") {
            Err(LazyDbError::Database(e)) => assert!(e.to_string().contains("no such table")),
            other => panic!("Expected Database error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_invalid_path() {
        let result = SqliteDriver::open("/nonexistent/path/database.db");
        assert!(matches!(result, Err(LazyDbError::Database(_))));
    }

    #[test]
    fn test_ddl_reports_no_affected_rows() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        driver.execute("CREATE TABLE t (name TEXT)").unwrap();
        assert_eq!(
            driver.execute("INSERT INTO t (name) VALUES ('a')").unwrap(),
            Execution::Affected(1)
        );

        assert_eq!(
            driver.execute("CREATE TABLE u (x TEXT)").unwrap(),
            Execution::Affected(0)
        );
        assert_eq!(driver.execute("DROP TABLE u").unwrap(), Execution::Affected(0));
        assert_eq!(
            driver.execute("UPDATE t SET name = 'b' WHERE name = 'zzz'").unwrap(),
            Execution::Affected(0)
        );
    }

    #[test]
    fn test_multiple_statements_rejected() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        match driver.execute("CREATE TABLE a (x); CREATE TABLE b (y)") {
            Err(LazyDbError::Query(msg)) => assert!(msg.contains("one SQL statement")),
            other => panic!("Expected Query error, got {:?}", other),
        }

        let tables = driver
            .execute("SELECT name FROM sqlite_master WHERE type = 'table'")
            .unwrap()
            .into_result_set()
            .unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_trailing_semicolon_accepted() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        assert_eq!(
            driver.execute("CREATE TABLE a (x);  ").unwrap(),
            Execution::Affected(0)
        );
        assert!(matches!(
            driver.execute("   "),
            Err(LazyDbError::Query(_))
        ));
    }

    #[test]
    fn test_duplicate_column_names_keep_last() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        let rows = driver
            .execute("SELECT 1 AS a, 2 AS a")
            .unwrap()
            .into_result_set()
            .unwrap()
            .into_rows();
        assert_eq!(rows[0].get("a"), Some(&Value::Integer(2)));
        assert_eq!(rows[0].get_index(0), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_blob_read_back_unchanged() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        let rs = driver
            .execute("SELECT X'00FF80' AS b")
            .unwrap()
            .into_result_set()
            .unwrap();
        assert_eq!(rs.rows[0][0], Value::Blob(vec![0x00, 0xff, 0x80]));
    }

    #[test]
    fn test_backticks_accepted() {
        let mut driver = SqliteDriver::open_in_memory().unwrap();
        driver.execute("CREATE TABLE `quoted` (`col` TEXT)").unwrap();
        assert_eq!(
            driver.execute("INSERT INTO `quoted` (`col`) VALUES ('v')").unwrap(),
            Execution::Affected(1)
        );
    }
}
