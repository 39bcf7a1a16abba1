/// Query Result Module
///
/// Result sets returned by a driver and the conversions that turn them into
/// the row shapes offered by the facade.
use crate::core::value::{Row, Value};
use rusqlite::types::ValueRef;

/// What a driver reports after running a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Execution {
    /// A statement without result columns, with the number of rows changed
    Affected(usize),
    /// A statement that produced a result set
    Rows(ResultSet),
}

impl Execution {
    pub fn affected(&self) -> Option<usize> {
        match self {
            Execution::Affected(n) => Some(*n),
            Execution::Rows(_) => None,
        }
    }

    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            Execution::Rows(rs) => Some(rs),
            Execution::Affected(_) => None,
        }
    }
}

/// A fully fetched result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column names from the query result
    pub columns: Vec<String>,
    /// Row data, one value per column
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        ResultSet { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with both by-name and by-position access.
    ///
    /// Repeated column names are all kept; by-name access returns the last.
    pub fn into_rows(self) -> Vec<Row> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|values| Row::from_parts(columns.clone(), values))
            .collect()
    }

    /// The first value of every row.
    pub fn into_first_column(self) -> Vec<Value> {
        self.rows
            .into_iter()
            .filter_map(|values| values.into_iter().next())
            .collect()
    }

    /// Renders the set as a plain text table.
    pub fn render(&self) -> String {
        let header = self.columns.join(" | ");
        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&"-".repeat(header.len()));
        out.push('\n');
        for row in &self.rows {
            let line = row
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&format!("\n({} rows)", self.row_count()));
        out
    }
}

/// Converts a SQLite value into a [`Value`].
///
/// Text stays text, including JSON written from structured values; use
/// [`Value::decode`] to get those back.
pub(crate) fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![Value::Integer(1), Value::from("Alice")],
                vec![Value::Integer(2), Value::Null],
            ],
        )
    }

    #[test]
    fn test_into_rows() {
        let rows = sample().into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some(&Value::from("Alice")));
        assert_eq!(rows[1].get_index(0), Some(&Value::Integer(2)));
        assert!(rows[1].get("name").unwrap().is_null());
    }

    #[test]
    fn test_into_first_column() {
        assert_eq!(
            sample().into_first_column(),
            vec![Value::Integer(1), Value::Integer(2)]
        );
    }

    #[test]
    fn test_render() {
        let rendered = sample().render();
        assert!(rendered.starts_with("id | name\n---------\n"));
        assert!(rendered.contains("1 | Alice"));
        assert!(rendered.contains("2 | NULL"));
        assert!(rendered.ends_with("(2 rows)"));
    }

    #[test]
    fn test_value_from_ref() {
        assert_eq!(value_from_ref(ValueRef::Null), Value::Null);
        assert_eq!(value_from_ref(ValueRef::Integer(5)), Value::Integer(5));
        assert_eq!(value_from_ref(ValueRef::Real(0.5)), Value::Float(0.5));
        assert_eq!(value_from_ref(ValueRef::Text(b"hi")), Value::from("hi"));
        assert_eq!(
            value_from_ref(ValueRef::Blob(&[0xff, 0xfe])),
            Value::Blob(vec![0xff, 0xfe])
        );
    }
}
