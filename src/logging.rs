//! Console logger setup
//!
//! The library only emits through the `log` macros. Binaries call [`init`]
//! once at startup with the level they want.

use chrono::Local;
use log::{Level, LevelFilter};
use std::io::Write;
use std::str::FromStr;

/// Minimum severity printed by the console logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Everything, including operation start/end markers
    Debug,
    /// Normal progress messages
    #[default]
    Info,
    /// Failed detections and recoverable problems
    Warning,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Upper-case name used in log lines
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// Matching `log` filter
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => LogLevel::Error.as_str(),
        Level::Warn => LogLevel::Warning.as_str(),
        Level::Info => LogLevel::Info.as_str(),
        Level::Debug | Level::Trace => LogLevel::Debug.as_str(),
    }
}

/// Install the `[HH:MM:SS] [LEVEL] message` console logger.
///
/// Calling it a second time leaves the first logger in place.
pub fn init(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.filter())
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                Local::now().format("%H:%M:%S"),
                level_name(record.level()),
                record.args()
            )
        })
        .try_init();
    if result.is_ok() {
        log::info!("Log level set to: {}", level.as_str());
    }
}
