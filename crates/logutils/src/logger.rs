use crate::record::{Caller, Record};
use crate::{Config, Destination, Error, Fields, Format, Result, Severity};
use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Anything a logger can write rendered lines to.
pub type Sink = Box<dyn Write + Send>;

/// A configured structured logger.
///
/// The handle is cheap to clone and can be shared across threads; clones
/// write to the same sink. Threshold, format and destination are fixed
/// when the logger is built.
///
/// Each emitted record is rendered first and then written with a single
/// `write_all` while holding the sink lock, so records from concurrent
/// callers never interleave.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    level: Severity,
    format: Format,
    caller: bool,
    target: String,
    sink: Mutex<Sink>,
    write_errors: AtomicU64,
}

impl Logger {
    /// Builds a logger from `config`, opening its destination.
    ///
    /// # Errors
    /// Returns [`Error::OpenLogFile`] when the destination is a file that
    /// cannot be opened.
    pub fn new(config: Config) -> Result<Self> {
        Builder::from_config(config).build()
    }

    /// Builds a logger from the `LOG_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    /// Starts a [`Builder`] from the default configuration.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The threshold below which records are dropped.
    pub fn level(&self) -> Severity {
        self.inner.level
    }

    /// The line layout records are rendered in.
    pub fn format(&self) -> Format {
        self.inner.format
    }

    /// Human-readable name of where records go (`stdout`, a file path, or
    /// `writer` for a custom sink).
    pub fn target(&self) -> &str {
        &self.inner.target
    }

    /// Whether a record at `severity` would be written.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.inner.level
    }

    /// Number of records whose write or flush failed. Failures are never
    /// reported to the emitting caller; this counter is the only trace.
    pub fn write_errors(&self) -> u64 {
        self.inner.write_errors.load(Ordering::Relaxed)
    }

    /// Logs at debug severity.
    #[track_caller]
    pub fn debug(&self, message: &str, fields: Fields) {
        self.log(Severity::Debug, message, fields, None);
    }

    /// Logs at info severity.
    #[track_caller]
    pub fn info(&self, message: &str, fields: Fields) {
        self.log(Severity::Info, message, fields, None);
    }

    /// Logs at warn severity.
    #[track_caller]
    pub fn warn(&self, message: &str, fields: Fields) {
        self.log(Severity::Warn, message, fields, None);
    }

    /// Logs at error severity. When `err` is present its text is written
    /// under the `error` key.
    #[track_caller]
    pub fn error(&self, message: &str, fields: Fields, err: Option<&dyn std::error::Error>) {
        self.log(Severity::Error, message, fields, err);
    }

    /// Logs at fatal severity and exits the process with status 1.
    ///
    /// The exit happens after every call, whether or not the record passed
    /// the threshold and whether or not the write succeeded.
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: Fields, err: Option<&dyn std::error::Error>) -> ! {
        self.log(Severity::Fatal, message, fields, err);
        std::process::exit(1)
    }

    /// Builds and writes one record at `severity`. Records below the
    /// threshold are dropped before any formatting or I/O.
    ///
    /// The caller location is that of the code calling the emitter, never
    /// the emitter itself.
    #[track_caller]
    pub fn log(
        &self,
        severity: Severity,
        message: &str,
        fields: Fields,
        err: Option<&dyn std::error::Error>,
    ) {
        if !self.enabled(severity) {
            return;
        }

        let location = Location::caller();
        let mut record = Record::new(severity, message);
        record.fields = fields;
        record.time = Some(Utc::now());
        record.caller = self.inner.caller.then_some(Caller::from(location));
        record.error = err.map(|e| e.to_string());

        self.emit(&record);
    }

    /// Writes an already-built record, applying the threshold.
    pub fn write_record(&self, record: &Record) {
        if self.enabled(record.severity) {
            self.emit(record);
        }
    }

    pub(crate) fn wants_caller(&self) -> bool {
        self.inner.caller
    }

    fn emit(&self, record: &Record) {
        let line = record.render(self.inner.format);

        let mut sink = self
            .inner
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let written = sink
            .write_all(line.as_bytes())
            .and_then(|()| sink.flush());

        if written.is_err() {
            self.inner.write_errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.inner.level)
            .field("format", &self.inner.format)
            .field("caller", &self.inner.caller)
            .field("target", &self.inner.target)
            .finish_non_exhaustive()
    }
}

/// Step-by-step construction of a [`Logger`].
///
/// Starts from [`Config::default`]. Supplying a [`Builder::writer`]
/// replaces the configured destination.
#[derive(Default)]
pub struct Builder {
    config: Config,
    writer: Option<Sink>,
}

impl Builder {
    /// Starts from an existing configuration.
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            writer: None,
        }
    }

    /// Sets the threshold.
    pub fn level(mut self, level: Severity) -> Self {
        self.config.level = level;
        self
    }

    /// Sets the line layout.
    pub fn format(mut self, format: Format) -> Self {
        self.config.format = format;
        self
    }

    /// Turns call-site enrichment on or off.
    pub fn caller(mut self, caller: bool) -> Self {
        self.config.caller = caller;
        self
    }

    /// Sets the destination opened by [`Builder::build`].
    pub fn destination(mut self, destination: Destination) -> Self {
        self.config.destination = destination;
        self
    }

    /// Writes records to `writer` instead of the configured destination.
    pub fn writer<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Opens the destination, unless a writer was supplied, and builds the
    /// logger.
    ///
    /// # Errors
    /// [`Error::OpenLogFile`] when a file destination cannot be opened.
    pub fn build(self) -> Result<Logger> {
        let (sink, target) = match self.writer {
            Some(writer) => (writer, "writer".to_string()),
            None => open_destination(&self.config.destination)?,
        };

        Ok(Logger {
            inner: Arc::new(Inner {
                level: self.config.level,
                format: self.config.format,
                caller: self.config.caller,
                target,
                sink: Mutex::new(sink),
                write_errors: AtomicU64::new(0),
            }),
        })
    }
}

fn open_destination(destination: &Destination) -> Result<(Sink, String)> {
    match destination {
        Destination::Stdout => Ok((Box::new(io::stdout()), "stdout".to_string())),
        Destination::File(path) => {
            let file = OpenOptions::new()
                .read(true)
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| Error::OpenLogFile {
                    path: path.clone(),
                    source,
                })?;
            Ok((Box::new(file), path.display().to_string()))
        }
    }
}
