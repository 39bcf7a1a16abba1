use crate::core::db::{BatchOutcome, Driver, Execution, LazyDb};
use crate::core::{Result, Row, Value};
use crate::demo;
use std::io::{BufRead, Write};

/// Represents a parsed REPL command.
#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Tables,
    Databases,
    Demo,
    Insert {
        table: String,
        row: Row,
    },
    Update {
        table: String,
        row: Row,
        where_clause: String,
    },
    Batch {
        table: String,
        rows: Vec<Row>,
        suffix: String,
    },
    Sql(String),
    Invalid {
        input: String,
        reason: String,
    },
    Unknown(String),
}

/// Parses a user input string into a corresponding `Command`.
///
/// If the input starts with a colon (`:`), it is interpreted as a command.
/// Otherwise, it is treated as a SQL query. Rows are given as JSON objects;
/// `{"$expr": "..."}` marks a raw SQL expression.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let Some(trimmed) = input.strip_prefix(':') else {
        return Command::Sql(input.to_string());
    };
    let (name, rest) = split_word(trimmed);

    let parsed = match name {
        "help" => Ok(Command::Help),
        "quit" => Ok(Command::Quit),
        "tables" => Ok(Command::Tables),
        "databases" => Ok(Command::Databases),
        "demo" => Ok(Command::Demo),
        "insert" => parse_table_and_json(rest).and_then(|(table, json, tail)| {
            if !tail.is_empty() {
                return Err(format!("unexpected trailing input `{}`", tail));
            }
            Ok(Command::Insert {
                table,
                row: row_from_json(json)?,
            })
        }),
        "update" => parse_table_and_json(rest).and_then(|(table, json, tail)| {
            Ok(Command::Update {
                table,
                row: row_from_json(json)?,
                where_clause: tail.to_string(),
            })
        }),
        "batch" => parse_table_and_json(rest).and_then(|(table, json, tail)| {
            let serde_json::Value::Array(items) = json else {
                return Err("expected a JSON array of objects".to_string());
            };
            Ok(Command::Batch {
                table,
                rows: items
                    .into_iter()
                    .map(row_from_json)
                    .collect::<std::result::Result<_, _>>()?,
                suffix: tail.to_string(),
            })
        }),
        _ => return Command::Unknown(input.to_string()),
    };

    parsed.unwrap_or_else(|reason| Command::Invalid {
        input: input.to_string(),
        reason,
    })
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn parse_table_and_json(
    rest: &str,
) -> std::result::Result<(String, serde_json::Value, &str), String> {
    let (table, rest) = split_word(rest);
    if table.is_empty() {
        return Err("missing table name".to_string());
    }

    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<serde_json::Value>();
    match stream.next() {
        Some(Ok(json)) => {
            let offset = stream.byte_offset();
            Ok((table.to_string(), json, rest[offset..].trim()))
        }
        Some(Err(e)) => Err(format!("invalid JSON: {}", e)),
        None => Err("missing JSON row".to_string()),
    }
}

fn row_from_json(json: serde_json::Value) -> std::result::Result<Row, String> {
    let serde_json::Value::Object(map) = json else {
        return Err("expected a JSON object".to_string());
    };

    let mut row = Row::new();
    for (column, value) in map {
        let value = match raw_expression(&value) {
            Some(sql) => Value::expression(sql),
            None => Value::from(value),
        };
        row.set(column, value);
    }
    Ok(row)
}

/// `{"$expr": "NOW()"}` -> `Some("NOW()")`
fn raw_expression(json: &serde_json::Value) -> Option<String> {
    let object = json.as_object().filter(|o| o.len() == 1)?;
    object.get("$expr")?.as_str().map(String::from)
}

/// Runs a line-oriented shell until `:quit` or end of input.
///
/// Errors from individual commands are printed and the loop continues.
pub fn run_repl<D: Driver, R: BufRead, W: Write>(
    db: &mut LazyDb<D>,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Welcome to the lazydb REPL! Type :help for commands, :quit to exit.")?;
    let mut line = String::new();

    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let command = parse_command(trimmed);
        if command == Command::Quit {
            break;
        }
        if let Err(e) = run_command(db, command, out) {
            writeln!(out, "Error: {}", e)?;
        }
    }
    Ok(())
}

fn run_command<D: Driver, W: Write>(db: &mut LazyDb<D>, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Help => {
            writeln!(out, "Available commands:")?;
            writeln!(out, "  :help - List all available commands")?;
            writeln!(out, "  :tables - List tables in the current database")?;
            writeln!(out, "  :databases - List attached databases")?;
            writeln!(out, "  :insert <table> <json-object> - Insert one row")?;
            writeln!(out, "  :update <table> <json-object> [where] - Update rows (all rows without a where clause!)")?;
            writeln!(out, "  :batch <table> <json-array> [suffix] - Insert many rows in one statement")?;
            writeln!(out, "  :demo - Run the students walkthrough")?;
            writeln!(out, "  :quit - Exit")?;
            writeln!(out, "\nUse {{\"$expr\": \"...\"}} for raw SQL values. Anything else is run as SQL.")?;
        }
        Command::Tables => {
            for table in db.get_tables()? {
                writeln!(out, "{}", table)?;
            }
        }
        Command::Databases => {
            for name in db.get_databases()? {
                writeln!(out, "{}", name)?;
            }
        }
        Command::Demo => demo::run(db, out)?,
        Command::Insert { table, row } => {
            let id = db.insert(&table, &row)?;
            writeln!(out, "Inserted row with id {}", id)?;
        }
        Command::Update {
            table,
            row,
            where_clause,
        } => {
            let n = db.update(&table, &row, &where_clause)?;
            writeln!(out, "({} rows affected)", n)?;
        }
        Command::Batch {
            table,
            rows,
            suffix,
        } => match db.insert_batch(&table, &rows, &suffix)? {
            BatchOutcome::Inserted(n) => writeln!(out, "({} rows affected)", n)?,
            BatchOutcome::EmptyBatch => writeln!(out, "Empty batch, nothing inserted")?,
        },
        Command::Sql(sql) => match db.query(&sql)? {
            Execution::Affected(n) => writeln!(out, "({} rows affected)", n)?,
            Execution::Rows(rs) => writeln!(out, "{}", rs.render())?,
        },
        Command::Invalid { input, reason } => writeln!(out, "Invalid command `{}`: {}", input, reason)?,
        Command::Unknown(input) => writeln!(out, "Unknown command: {} (try :help)", input)?,
        Command::Quit => {}
    }
    Ok(())
}
