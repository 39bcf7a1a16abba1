/// # Test Utilities Module
///
/// Fixtures shared by unit tests: an in-memory database with the `students`
/// table used throughout the crate.
use crate::core::db::LazyDb;

/// Schema of the `students` demo table.
pub const STUDENTS_TABLE_SQL: &str = "
CREATE TABLE `students` (
    `id` INTEGER PRIMARY KEY AUTOINCREMENT,
    `name` VARCHAR(55) NOT NULL,
    `email` VARCHAR(55) NOT NULL,
    `created` DATETIME,
    `data` TEXT
)";

/// A fresh in-memory database holding an empty `students` table.
pub fn students_db() -> LazyDb {
    let mut db = LazyDb::open_in_memory().expect("in-memory database");
    db.query(STUDENTS_TABLE_SQL).expect("students table");
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_db_is_empty() {
        let mut db = students_db();
        assert_eq!(db.query_select("SELECT * FROM students").unwrap().len(), 0);
    }
}
