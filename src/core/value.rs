/// Value Model
///
/// Column values, raw SQL expressions and ordered rows as consumed by the
/// statement builder and produced by the driver layer.
use crate::core::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Literal SQL that must be emitted exactly as written.
///
/// The encoder never quotes or escapes the wrapped text, so keeping it free of
/// untrusted input is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExpression(String);

impl RawExpression {
    pub fn new(sql: impl Into<String>) -> Self {
        RawExpression(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    /// Raw bytes, encoded as a hex literal
    Blob(Vec<u8>),
    /// Emitted verbatim, see [`RawExpression`]
    Expression(RawExpression),
    /// Lists, maps and nested objects; stored as JSON text
    Structured(serde_json::Value),
}

impl Value {
    /// Shorthand for `Value::Expression(RawExpression::new(sql))`.
    pub fn expression(sql: impl Into<String>) -> Self {
        Value::Expression(RawExpression::new(sql))
    }

    /// Serializes any `Serialize` type into a structured value.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Value::Structured(serde_json::to_value(value)?))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Decodes a value previously stored from [`Value::Structured`].
    ///
    /// Values read back from the database arrive as `Text` holding the JSON
    /// encoding; both that form and an in-memory `Structured` are accepted.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Value::Structured(json) => Ok(serde_json::from_value(json.clone())?),
            Value::Text(text) => Ok(serde_json::from_str(text)?),
            other => Ok(serde_json::from_value(serde_json::Value::from(other))?),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Blob(bytes) => f.write_str(&hex(bytes)),
            Value::Expression(e) => write!(f, "{}", e),
            Value::Structured(json) => write!(f, "{}", json),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(v as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, isize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<RawExpression> for Value {
    fn from(v: RawExpression) -> Self {
        Value::Expression(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::from(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            composite => Value::Structured(composite),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Text(s) => serde_json::Value::from(s.as_str()),
            Value::Blob(bytes) => serde_json::Value::from(bytes.clone()),
            Value::Expression(e) => serde_json::Value::from(e.as_str()),
            Value::Structured(json) => json.clone(),
        }
    }
}

/// Lowercase hex digits of `bytes`.
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// An ordered mapping from column name to value.
///
/// Iteration follows insertion order, which is also the column order of the
/// statements built from the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    /// Builder-style [`Row::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column, replacing the value in place when it already exists.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.position(&column) {
            Some(idx) => self.values[idx] = value,
            None => {
                self.columns.push(column);
                self.values.push(value);
            }
        }
    }

    /// Value of `column`. When a result set repeats a column name, the
    /// rightmost one wins; use [`Row::get_index`] to reach the others.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|idx| &self.values[idx])
    }

    /// Positional access, for rows read back from a result set.
    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Builds a row from already-ordered columns, keeping duplicates as-is.
    pub(crate) fn from_parts(columns: Vec<String>, values: Vec<Value>) -> Self {
        Row { columns, values }
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().rposition(|c| c == column)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_row_preserves_insertion_order() {
        let row = Row::new()
            .with("name", "Johny")
            .with("email", "john@random.email")
            .with("age", 20);

        assert_eq!(row.columns(), &["name", "email", "age"]);
        assert_eq!(row.get("age"), Some(&Value::Integer(20)));
        assert_eq!(row.get_index(1), Some(&Value::from("john@random.email")));
    }

    #[test]
    fn test_row_set_replaces_in_place() {
        let mut row = Row::new().with("name", "Johny").with("email", "a@b.c");
        row.set("name", "Peter O' Really");

        assert_eq!(row.len(), 2);
        assert_eq!(row.columns(), &["name", "email"]);
        assert_eq!(row.get("name"), Some(&Value::from("Peter O' Really")));
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from(7u8), Value::Integer(7));
        assert_eq!(Value::from(1.5f32), Value::Float(1.5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn test_json_conversion() {
        let json = serde_json::json!({"age": 20, "tags": ["a", "b"]});
        match Value::from(json.clone()) {
            Value::Structured(inner) => assert_eq!(inner, json),
            other => panic!("Expected structured value, got {:?}", other),
        }
        assert_eq!(Value::from(serde_json::json!(3)), Value::Integer(3));
        assert_eq!(Value::from(serde_json::json!(2.5)), Value::Float(2.5));
        assert_eq!(Value::from(serde_json::json!(null)), Value::Null);
    }

    #[test]
    fn test_duplicate_columns_resolve_to_last() {
        let row = Row::from_parts(
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)],
        );
        assert_eq!(row.get("a"), Some(&Value::Integer(3)));
        assert_eq!(row.get_index(0), Some(&Value::Integer(1)));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_blob_value() {
        let blob = Value::from(vec![0u8, 0xab, 0x10]);
        assert_eq!(blob, Value::Blob(vec![0, 0xab, 0x10]));
        assert_eq!(blob.to_string(), "00ab10");
        assert_eq!(serde_json::Value::from(&blob), serde_json::json!([0, 171, 16]));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        age: u32,
        gender: String,
    }

    #[test]
    fn test_structured_decode_from_text() {
        let profile = Profile {
            age: 20,
            gender: "male".to_string(),
        };
        let stored = Value::structured(&profile).unwrap();
        let as_text = Value::Text(stored.to_string());

        assert_eq!(stored.decode::<Profile>().unwrap(), profile);
        assert_eq!(as_text.decode::<Profile>().unwrap(), profile);
    }
}
