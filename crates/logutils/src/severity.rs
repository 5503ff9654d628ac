use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Ordered severity of a record.
///
/// The derived ordering follows declaration order, so
/// `Debug < Info < Warn < Error < Fatal` and a threshold comparison is a
/// plain `>=`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Every severity, least severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Lower-case name, as written in JSON records and read from `LOG_LEVEL`.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Three-letter tag used by the console format.
    pub fn short(self) -> &'static str {
        match self {
            Severity::Debug => "DBG",
            Severity::Info => "INF",
            Severity::Warn => "WRN",
            Severity::Error => "ERR",
            Severity::Fatal => "FTL",
        }
    }

    /// Maps a tracing level onto a severity. `TRACE` has no counterpart
    /// and is never emitted.
    pub fn from_tracing(level: &tracing::Level) -> Option<Severity> {
        match *level {
            tracing::Level::TRACE => None,
            tracing::Level::DEBUG => Some(Severity::Debug),
            tracing::Level::INFO => Some(Severity::Info),
            tracing::Level::WARN => Some(Severity::Warn),
            tracing::Level::ERROR => Some(Severity::Error),
        }
    }

    /// The most verbose tracing level filter that still lets every record
    /// at or above this severity through. Fatal has no tracing level, so it
    /// filters like Error.
    pub fn level_filter(self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;
        match self {
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warn => LevelFilter::WARN,
            Severity::Error | Severity::Fatal => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a severity. Holds the rejected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity {0:?}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_total_and_ascending() {
        for pair in Severity::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warn));
        assert_eq!(" Info ".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warn));
        assert_eq!("FaTaL".parse::<Severity>(), Ok(Severity::Fatal));
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn tracing_levels_map_down_to_debug() {
        assert_eq!(Severity::from_tracing(&tracing::Level::TRACE), None);
        assert_eq!(
            Severity::from_tracing(&tracing::Level::DEBUG),
            Some(Severity::Debug)
        );
        assert_eq!(
            Severity::from_tracing(&tracing::Level::ERROR),
            Some(Severity::Error)
        );
    }
}
