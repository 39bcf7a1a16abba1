use crate::core::{LazyDbError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub logging: Option<LoggingConfig>,
}

/// Which database to open.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_database_path(),
        }
    }
}

/// Error log configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Directory receiving `*_dberr.log` files; must already exist
    pub error_log_dir: Option<PathBuf>,
}

fn default_database_path() -> String {
    ":memory:".to_string()
}

impl Config {
    pub fn error_log_dir(&self) -> Option<&Path> {
        self.logging.as_ref()?.error_log_dir.as_deref()
    }
}

/// `<config dir>/lazydb/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lazydb").join("config.toml"))
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = lazydb::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| LazyDbError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CONFIG: &str = r#"
[database]
path = "students.db"

[logging]
error_log_dir = "./errorlogs"
"#;

    #[test]
    fn test_load_config_from_str() {
        let config: Config = toml::from_str(SAMPLE_CONFIG).expect("Failed to parse sample config");
        assert_eq!(config.database.path, "students.db");
        assert_eq!(config.error_log_dir(), Some(Path::new("./errorlogs")));
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.error_log_dir(), None);

        let config: Config = toml::from_str("[logging]\n").unwrap();
        assert_eq!(config.error_log_dir(), None);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.database.path, "students.db");
    }

    #[test]
    fn test_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[database]\npath = 42\n").unwrap();

        match load_config(file.path()) {
            Err(LazyDbError::Config(_)) => {}
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            load_config("/nonexistent/lazydb.toml"),
            Err(LazyDbError::Io(_))
        ));
    }
}
