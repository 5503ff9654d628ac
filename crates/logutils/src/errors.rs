use std::path::PathBuf;
use thiserror::Error;

/// Error types that can occur while setting up a logger.
///
/// Emitting a record never fails from the caller's point of view; these
/// errors only come out of construction and process-wide installation.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured log file could not be opened for appending.
    ///
    /// There is no fallback to standard output: the process-wide
    /// initializer treats this as fatal.
    #[error("failed to open log file {}: {source}", path.display())]
    OpenLogFile {
        /// The configured `LOG_PATH`
        path: PathBuf,
        /// Why the open failed
        #[source]
        source: std::io::Error,
    },

    /// A process-wide logger has already been installed.
    #[error("logger already initialized")]
    AlreadyInitialized,

    /// Another `log` crate logger was installed before ours.
    #[error("failed to set log tracer: {0}")]
    SetLogger(#[from] tracing_log::log::SetLoggerError),

    /// Another global tracing subscriber was installed before ours.
    #[error("failed to set global subscriber: {0}")]
    SetSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Result alias for logger setup.
pub type Result<T> = std::result::Result<T, Error>;
