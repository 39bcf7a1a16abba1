use lazydb::config::{self, Config};
use lazydb::{repl, LazyDb};
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Parsed command-line arguments: `lazydb [--config <path>] [<database>]`.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    database: Option<String>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().ok_or("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            _ if parsed.database.is_none() => parsed.database = Some(arg),
            _ => return Err(format!("unexpected argument: {}", arg)),
        }
    }
    Ok(parsed)
}

fn load(args: &Args) -> lazydb::Result<Config> {
    if let Some(path) = &args.config {
        return config::load_config(path);
    }
    match config::default_config_path() {
        Some(path) if path.exists() => config::load_config(path),
        _ => Ok(Config::default()),
    }
}

fn main() {
    // Initialize the logging system using tracing subscriber
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    info!("Starting lazydb...");

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: lazydb [--config <path>] [<database>]");
            std::process::exit(2);
        }
    };

    let mut config = match load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(database) = args.database {
        config.database.path = database;
    }

    println!("Attempting to open database: {}", config.database.path);
    let mut db = match LazyDb::from_config(&config) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = repl::run_repl(&mut db, stdin.lock(), &mut stdout) {
        eprintln!("REPL terminated: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = db.close() {
        eprintln!("Failed to close database: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(args(&[]).unwrap(), Args::default());
        assert_eq!(
            args(&["--config", "lazy.toml", "students.db"]).unwrap(),
            Args {
                config: Some(PathBuf::from("lazy.toml")),
                database: Some("students.db".to_string()),
            }
        );
        assert!(args(&["--config"]).is_err());
        assert!(args(&["a.db", "b.db"]).is_err());
    }
}
