//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_FILE_PATH: when using file mode, the path of the log file
//!   (default "logs/graphene-tx-builder.log"), rolled by UTC date

use chrono::Utc;
use eyre::{Result, WrapErr};
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, File},
    path::Path,
};

use crate::constants::{DEFAULT_LOG_FILE_PATH, DEFAULT_LOG_LEVEL, DEFAULT_LOG_MODE};

fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Appends the date to a log file path, replacing a trailing `.log`.
fn rolled_file_path(base_file_path: &str, date: &str) -> String {
    match base_file_path.strip_suffix(".log") {
        Some(trimmed) => format!("{trimmed}-{date}.log"),
        None => format!("{base_file_path}-{date}.log"),
    }
}

pub fn setup_logging() -> Result<()> {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| DEFAULT_LOG_MODE.to_string());
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let level_filter = parse_level(&log_level);

    if log_mode.to_lowercase() == "file" {
        let base_file_path =
            env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());
        let date_str = Utc::now().format("%Y-%m-%d").to_string();
        let rolled_file_path = rolled_file_path(&base_file_path, &date_str);

        if let Some(parent) = Path::new(&rolled_file_path).parent() {
            create_dir_all(parent).wrap_err("Failed to create log directory")?;
        }
        let log_file = File::create(&rolled_file_path)
            .wrap_err_with(|| format!("Unable to create log file {rolled_file_path}"))?;

        WriteLogger::init(level_filter, Config::default(), log_file)
            .wrap_err("Failed to initialize file logger")?;
    } else {
        SimpleLogger::init(level_filter, Config::default())
            .wrap_err("Failed to initialize simple logger")?;
    }

    info!("Logging is successfully configured (mode: {})", log_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_rolled_file_path() {
        assert_eq!(
            rolled_file_path("logs/graphene-tx-builder.log", "2025-01-01"),
            "logs/graphene-tx-builder-2025-01-01.log"
        );
        assert_eq!(
            rolled_file_path("logs/builder", "2025-01-01"),
            "logs/builder-2025-01-01.log"
        );
    }
}
