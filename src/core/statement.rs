/// Statement Builder
///
/// Builds `INSERT`, `UPDATE` and multi-row `INSERT` statements from rows of
/// values. Table and column names are wrapped in backticks but otherwise
/// trusted; only values go through the [`Encoder`].
use crate::core::encode::{Dialect, Encoder};
use crate::core::value::Row;
use crate::core::{LazyDbError, Result};
use tracing::debug;

/// Outcome of building a batch insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatement {
    /// The generated multi-row statement
    Insert(String),
    /// No rows were given; nothing to execute
    EmptyBatch,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementBuilder {
    encoder: Encoder,
}

impl StatementBuilder {
    pub fn new(dialect: Dialect) -> Self {
        StatementBuilder {
            encoder: Encoder::new(dialect),
        }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// `INSERT INTO `table` (`a`,`b`) VALUES (..)` in the row's column order.
    ///
    /// # Errors
    ///
    /// Returns `LazyDbError::EmptyRow` if the row has no columns.
    pub fn build_insert(&self, table: &str, row: &Row) -> Result<String> {
        ensure_columns(table, row)?;

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.encoder.identifier(table),
            self.column_list(row.columns()),
            self.value_list(row),
        );
        debug!(table, "built insert: {}", sql);
        Ok(sql)
    }

    /// `UPDATE `table` SET `a` = .. [WHERE where_clause]`.
    ///
    /// `where_clause` is raw SQL and is appended verbatim. When it is empty or
    /// blank no `WHERE` is emitted and the statement touches every row of the
    /// table; guarding against that is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns `LazyDbError::EmptyRow` if the row has no columns.
    pub fn build_update(&self, table: &str, row: &Row, where_clause: &str) -> Result<String> {
        ensure_columns(table, row)?;

        let assignments = row
            .iter()
            .map(|(column, value)| {
                format!(
                    "{} = {}",
                    self.encoder.identifier(column),
                    self.encoder.encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join(",");

        let mut sql = format!(
            "UPDATE {} SET {}",
            self.encoder.identifier(table),
            assignments
        );
        if !where_clause.trim().is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(where_clause);
        }
        debug!(table, "built update: {}", sql);
        Ok(sql)
    }

    /// Multi-row insert with an optional raw suffix such as
    /// `ON DUPLICATE KEY UPDATE ...`.
    ///
    /// The column list comes from the first row. Every other row must carry
    /// the same column names in the same positions.
    ///
    /// # Errors
    ///
    /// Returns `LazyDbError::EmptyRow` if the first row has no columns and
    /// `LazyDbError::SchemaMismatch` for the first row whose columns differ.
    pub fn build_insert_batch(
        &self,
        table: &str,
        rows: &[Row],
        suffix_sql: &str,
    ) -> Result<BatchStatement> {
        let Some(first) = rows.first() else {
            debug!(table, "empty batch, nothing to build");
            return Ok(BatchStatement::EmptyBatch);
        };
        ensure_columns(table, first)?;

        let expected = first.columns();
        let mut tuples = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            if row.columns() != expected {
                return Err(LazyDbError::SchemaMismatch {
                    row: idx,
                    expected: expected.to_vec(),
                    found: row.columns().to_vec(),
                });
            }
            tuples.push(format!("({})", self.value_list(row)));
        }

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.encoder.identifier(table),
            self.column_list(expected),
            tuples.join(",")
        );
        if !suffix_sql.is_empty() {
            sql.push(' ');
            sql.push_str(suffix_sql);
        }
        debug!(table, rows = rows.len(), "built batch insert");
        Ok(BatchStatement::Insert(sql))
    }

    fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.encoder.identifier(c))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn value_list(&self, row: &Row) -> String {
        row.values()
            .iter()
            .map(|v| self.encoder.encode(v))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn ensure_columns(table: &str, row: &Row) -> Result<()> {
    if row.is_empty() {
        return Err(LazyDbError::EmptyRow {
            table: table.to_string(),
        });
    }
    Ok(())
}
