/// Connection Facade Module
///
/// `LazyDb` wraps a [`Driver`] with the helpers of a lazy programmer's
/// database class: free-form queries, result-shape helpers, and insert/update
/// helpers built on the [`StatementBuilder`].
use crate::config::Config;
use crate::core::db::driver::{Driver, SqliteDriver};
use crate::core::db::query::{Execution, ResultSet};
use crate::core::errorlog::ErrorLog;
use crate::core::statement::{BatchStatement, StatementBuilder};
use crate::core::value::{Row, Value};
use crate::core::{LazyDbError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{error, info, warn};

/// Outcome of [`LazyDb::insert_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The batch statement ran and changed this many rows
    Inserted(usize),
    /// No rows were given and nothing was executed
    EmptyBatch,
}

pub struct LazyDb<D: Driver = SqliteDriver> {
    driver: D,
    builder: StatementBuilder,
    error_log: Option<ErrorLog>,
    last_query: Option<String>,
    affected_rows: usize,
}

impl LazyDb<SqliteDriver> {
    /// Opens the SQLite database at `path` (`":memory:"` for a private one).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(LazyDb::with_driver(SqliteDriver::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(LazyDb::with_driver(SqliteDriver::open_in_memory()?))
    }

    /// Opens the configured database and error log directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut db = LazyDb::open(&config.database.path)?;
        if let Some(dir) = config.error_log_dir() {
            db = db.with_error_log(ErrorLog::new(dir));
        }
        Ok(db)
    }

    /// Closes the underlying connection.
    pub fn close(self) -> Result<()> {
        info!("closing database connection");
        self.driver.close()
    }
}

impl<D: Driver> LazyDb<D> {
    pub fn with_driver(driver: D) -> Self {
        let builder = StatementBuilder::new(driver.dialect());
        LazyDb {
            driver,
            builder,
            error_log: None,
            last_query: None,
            affected_rows: 0,
        }
    }

    /// Records failed statements to `log` in addition to tracing.
    pub fn with_error_log(mut self, log: ErrorLog) -> Self {
        self.error_log = Some(log);
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn builder(&self) -> &StatementBuilder {
        &self.builder
    }

    /// The most recent SQL sent to the driver, successful or not.
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Rows changed by the most recent statement without a result set.
    pub fn affected_rows(&self) -> usize {
        self.affected_rows
    }

    pub fn last_insert_id(&self) -> i64 {
        self.driver.last_insert_id()
    }

    /// Runs any SQL statement.
    ///
    /// Failures are written to the error log (when configured) and traced
    /// before being returned.
    pub fn query(&mut self, sql: &str) -> Result<Execution> {
        self.last_query = Some(sql.to_string());
        match self.driver.execute(sql) {
            Ok(exec) => {
                if let Execution::Affected(n) = exec {
                    self.affected_rows = n;
                }
                Ok(exec)
            }
            Err(e) => {
                error!(sql, "query failed: {}", e);
                if let Some(log) = &self.error_log {
                    if let Err(log_err) = log.record(&e.to_string(), sql) {
                        warn!("error log cannot be written: {}", log_err);
                    }
                }
                Err(e)
            }
        }
    }

    /// All rows of a query. Statements without a result set yield no rows.
    pub fn query_select(&mut self, sql: &str) -> Result<Vec<Row>> {
        Ok(self.fetch(sql)?.into_rows())
    }

    /// All rows of a query keyed by the text of `key_column`.
    ///
    /// Later rows replace earlier ones sharing the same key.
    pub fn query_select_keyed(
        &mut self,
        sql: &str,
        key_column: &str,
    ) -> Result<BTreeMap<String, Row>> {
        let rs = self.fetch(sql)?;
        if !rs.columns.iter().any(|c| c == key_column) && !rs.is_empty() {
            return Err(LazyDbError::Query(format!(
                "column `{}` not found in result set",
                key_column
            )));
        }

        let mut keyed = BTreeMap::new();
        for row in rs.into_rows() {
            let key = row.get(key_column).map(Value::to_string).unwrap_or_default();
            keyed.insert(key, row);
        }
        Ok(keyed)
    }

    /// The first row of a query, if any.
    pub fn query_row(&mut self, sql: &str) -> Result<Option<Row>> {
        Ok(self.fetch(sql)?.into_rows().into_iter().next())
    }

    /// The first column of the first row, typically for `SELECT COUNT(*)`.
    pub fn query_scalar(&mut self, sql: &str) -> Result<Option<Value>> {
        Ok(self.fetch(sql)?.into_first_column().into_iter().next())
    }

    /// The first column of every row.
    pub fn query_col(&mut self, sql: &str) -> Result<Vec<Value>> {
        Ok(self.fetch(sql)?.into_first_column())
    }

    /// Inserts one row and returns the id generated for it.
    pub fn insert(&mut self, table: &str, row: &Row) -> Result<i64> {
        let sql = self.builder.build_insert(table, row)?;
        self.execute_dml(&sql)?;
        Ok(self.driver.last_insert_id())
    }

    /// Updates rows matching `where_clause` and returns how many changed.
    ///
    /// An empty `where_clause` updates every row in the table.
    pub fn update(&mut self, table: &str, row: &Row, where_clause: &str) -> Result<usize> {
        let sql = self.builder.build_update(table, row, where_clause)?;
        self.execute_dml(&sql)
    }

    /// Inserts all rows in one statement, followed by the raw `suffix_sql`.
    pub fn insert_batch(
        &mut self,
        table: &str,
        rows: &[Row],
        suffix_sql: &str,
    ) -> Result<BatchOutcome> {
        match self.builder.build_insert_batch(table, rows, suffix_sql)? {
            BatchStatement::EmptyBatch => Ok(BatchOutcome::EmptyBatch),
            BatchStatement::Insert(sql) => Ok(BatchOutcome::Inserted(self.execute_dml(&sql)?)),
        }
    }

    /// Names of the tables in the current database.
    pub fn get_tables(&mut self) -> Result<Vec<String>> {
        let sql = self.driver.dialect().tables_query();
        Ok(self.query_col(sql)?.iter().map(Value::to_string).collect())
    }

    /// Names of the databases visible to the connection.
    pub fn get_databases(&mut self) -> Result<Vec<String>> {
        let sql = self.driver.dialect().databases_query();
        Ok(self.query_col(sql)?.iter().map(Value::to_string).collect())
    }

    fn fetch(&mut self, sql: &str) -> Result<ResultSet> {
        Ok(self.query(sql)?.into_result_set().unwrap_or_default())
    }

    fn execute_dml(&mut self, sql: &str) -> Result<usize> {
        self.query(sql)?.affected().ok_or_else(|| {
            LazyDbError::Query("statement unexpectedly returned a result set".to_string())
        })
    }
}
