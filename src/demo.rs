//! The students walkthrough: create a table, insert single and batched rows,
//! update one, then read the data back with each query helper.
use crate::core::db::{Driver, LazyDb};
use crate::core::{Result, Row, Value};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Nested data stored in the `data` column as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentData {
    pub age: u32,
    pub gender: String,
    pub desc: String,
}

pub fn run<D: Driver, W: Write>(db: &mut LazyDb<D>, out: &mut W) -> Result<()> {
    writeln!(out, "1. Creating table `students`...")?;
    db.query("DROP TABLE IF EXISTS `students`")?;
    db.query(
        "CREATE TABLE `students` (
            `id` INTEGER PRIMARY KEY AUTOINCREMENT,
            `name` VARCHAR(55) NOT NULL,
            `email` VARCHAR(55) NOT NULL,
            `created` DATETIME,
            `data` TEXT
        )",
    )?;
    writeln!(out, "..created.")?;

    writeln!(out, "2. Inserting data using insert and insert_batch")?;
    let data = StudentData {
        age: 20,
        gender: "male".to_string(),
        desc: "I love brian o'connell".to_string(),
    };
    let mut student = Row::new()
        .with("name", "Johny")
        .with("email", "john@random.email")
        .with("created", Value::expression("CURRENT_TIMESTAMP"))
        .with("data", Value::structured(&data)?);
    let student_id = db.insert("students", &student)?;

    let students: Vec<Row> = (1..=2)
        .map(|i| {
            Row::new()
                .with("name", format!("Alexander the {}-th", i))
                .with("email", format!("alex_{}@random.email", i))
        })
        .collect();
    db.insert_batch("students", &students, "")?;

    student.set("name", "Peter O' Really");
    student.set("email", "peter@random.email");
    db.update("students", &student, &format!("id = {}", student_id))?;

    writeln!(out, "3. All students using query_select")?;
    for row in db.query_select("SELECT * FROM students")? {
        let line = row
            .iter()
            .map(|(column, value)| format!("{}={}", column, value))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "  {}", line)?;
    }

    writeln!(out, "4. First student using query_row")?;
    if let Some(first) = db.query_row("SELECT * FROM students ORDER BY `id` ASC LIMIT 1")? {
        let name = first.get("name").cloned().unwrap_or(Value::Null);
        writeln!(out, "  name={}", name)?;
        if let Some(stored) = first.get("data").filter(|v| !v.is_null()) {
            let decoded: StudentData = stored.decode()?;
            writeln!(out, "  data={:?}", decoded)?;
        }
    }

    writeln!(out, "5. Student names using query_col")?;
    for name in db.query_col("SELECT name FROM students")? {
        writeln!(out, "  {}", name)?;
    }

    writeln!(out, "6. One random student name using query_scalar")?;
    let random = db
        .query_scalar("SELECT name FROM students ORDER BY RANDOM() LIMIT 1")?
        .unwrap_or(Value::Null);
    writeln!(out, "  Random student name: {}", random)?;
    Ok(())
}
