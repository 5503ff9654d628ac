use crate::Severity;
use std::path::PathBuf;

/// Minimum severity to write.
pub const LEVEL_VAR: &str = "LOG_LEVEL";
/// File to append records to; unset or empty means standard output.
pub const PATH_VAR: &str = "LOG_PATH";
/// `json` or `console`.
pub const FORMAT_VAR: &str = "LOG_FORMAT";
/// Whether records carry the call site.
pub const CALLER_VAR: &str = "LOG_CALLER";

/// Where rendered records are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    /// The process's standard output stream.
    #[default]
    Stdout,
    /// A file opened read/write, created if absent and appended if present.
    File(PathBuf),
}

/// Line layout of a rendered record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable `time LVL caller > message key=value` lines.
    Console,
}

/// Logger configuration.
///
/// Every field has a default, so a missing or malformed variable never
/// prevents a logger from being built:
/// * `LOG_LEVEL` - `debug`, `info`, `warn`, `error` or `fatal` (default `debug`)
/// * `LOG_PATH` - file to append records to (default standard output)
/// * `LOG_FORMAT` - `json` or `console` (default `json`)
/// * `LOG_CALLER` - attach the call site to each record (default on)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Records below this severity are dropped
    pub level: Severity,
    /// Where records are written
    pub destination: Destination,
    /// Line layout
    pub format: Format,
    /// Attach `file:line` of the emitting call site
    pub caller: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Severity::Debug,
            destination: Destination::Stdout,
            format: Format::Json,
            caller: true,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let level = lookup(LEVEL_VAR)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.level);

        let destination = match lookup(PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Destination::File(PathBuf::from(path)),
            _ => defaults.destination,
        };

        let format = lookup(FORMAT_VAR)
            .and_then(|v| parse_format(&v))
            .unwrap_or(defaults.format);

        let caller = lookup(CALLER_VAR)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.caller);

        Self {
            level,
            destination,
            format,
            caller,
        }
    }
}

fn parse_format(value: &str) -> Option<Format> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" => Some(Format::Json),
        "console" | "pretty" | "text" => Some(Format::Console),
        _ => None,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
