/// Value Encoder
///
/// Turns [`Value`]s into SQL literal text that can be spliced into a statement.
/// Scalars are stringified, escaped for the target [`Dialect`] and wrapped in
/// single quotes. Structured values are serialized to JSON first, blobs become
/// `X'..'` hex literals. Raw expressions pass through untouched.
use crate::core::value::{hex, Value};

/// Escaping and catalog conventions of the target server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Backslash escapes, as accepted by MySQL and MariaDB
    #[default]
    MySql,
    /// Standard quote doubling; SQLite has no backslash escapes
    Sqlite,
}

impl Dialect {
    /// Quote used around table and column names.
    pub fn identifier_quote(&self) -> char {
        '`'
    }

    /// Query whose first column lists the tables of the current database.
    pub fn tables_query(&self) -> &'static str {
        match self {
            Dialect::MySql => "SHOW TABLES",
            Dialect::Sqlite => {
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
            }
        }
    }

    /// Query whose first column lists the databases visible to the connection.
    pub fn databases_query(&self) -> &'static str {
        match self {
            Dialect::MySql => "SHOW DATABASES",
            Dialect::Sqlite => "SELECT name FROM pragma_database_list ORDER BY seq",
        }
    }
}

/// Encodes values for one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    dialect: Dialect,
}

impl Encoder {
    pub fn new(dialect: Dialect) -> Self {
        Encoder { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Renders a value as SQL literal text.
    ///
    /// The result is safe to splice into a statement for every variant except
    /// [`Value::Expression`], whose text is emitted unchanged.
    pub fn encode(&self, value: &Value) -> String {
        match value {
            Value::Expression(expr) => expr.as_str().to_string(),
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => self.quote(&i.to_string()),
            Value::Float(f) => self.quote(&f.to_string()),
            Value::Text(s) => self.quote(s),
            Value::Blob(bytes) => format!("X'{}'", hex(bytes)),
            Value::Structured(json) => self.quote(&json.to_string()),
        }
    }

    /// Escapes `text` and wraps it in single quotes.
    pub fn quote(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('\'');
        match self.dialect {
            Dialect::MySql => escape_backslash(text, &mut out),
            Dialect::Sqlite => escape_doubling(text, &mut out),
        }
        out.push('\'');
        out
    }

    /// Wraps an identifier in the dialect's identifier quote. No validation.
    pub fn identifier(&self, name: &str) -> String {
        let q = self.dialect.identifier_quote();
        format!("{q}{name}{q}")
    }
}

fn escape_backslash(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
}

fn escape_doubling(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\'' => out.push_str("''"),
            // NUL would terminate the statement text
            '\0' => out.push_str("'||char(0)||'"),
            c => out.push(c),
        }
    }
}
