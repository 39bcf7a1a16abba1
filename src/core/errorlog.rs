//! File-based log of failed statements.
//!
//! One file per day, named after the date and the local UTC offset, e.g.
//! `2011_09_24_GMT_07_dberr.log`. Each entry holds the time, the driver error
//! and the SQL that failed.
use crate::core::Result;
use chrono::{DateTime, Local, TimeZone};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const CRLF: &str = "\r\n";

#[derive(Debug, Clone)]
pub struct ErrorLog {
    dir: PathBuf,
}

impl ErrorLog {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        ErrorLog { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Appends an entry stamped with the current local time.
    ///
    /// Returns the path of the file written to.
    pub fn record(&self, error: &str, sql: &str) -> Result<PathBuf> {
        self.record_at(&Local::now(), error, sql)
    }

    pub fn record_at<Tz: TimeZone>(&self, at: &DateTime<Tz>, error: &str, sql: &str) -> Result<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        let path = self.dir.join(file_name(at));
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        let entry = format!(
            "{} GMT {}{CRLF}{}{CRLF}{}{CRLF}{CRLF}{CRLF}",
            at.format("%H:%M:%S"),
            offset_hours(at),
            error,
            sql,
        );
        file.write_all(entry.as_bytes())?;
        Ok(path)
    }
}

fn file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_GMT_{}_dberr.log", at.format("%Y_%m_%d"), offset_hours(at))
}

/// The two hour digits of the UTC offset, sign dropped (`+0700` -> `07`).
fn offset_hours<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%z").to_string().chars().skip(1).take(2).collect()
}
