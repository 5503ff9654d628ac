//! Structured logging setup and leveled emitters.
//!
//! A [`Logger`] writes one record per line to standard output or to an
//! append-only file, dropping records below its threshold. Every record
//! carries an RFC 3339 timestamp and, unless disabled, the file and line of
//! the call site.
//!
//! # Usage
//! Call [`init`] once, early in `main`, then log through the free functions
//! or through the returned handle:
//!
//! ```no_run
//! let err = std::io::Error::other("timeout");
//! logutils::init();
//! logutils::info("user signed in", logutils::fields! { "user" => "abc", "attempt" => 2 });
//! logutils::error("sync failed", logutils::fields! { "user" => "abc" }, Some(&err));
//! ```
//!
//! Configuration comes from the environment:
//! * `LOG_LEVEL=debug|info|warn|error|fatal` - minimum severity (default `debug`)
//! * `LOG_PATH=/var/log/app.log` - append records to a file instead of stdout
//! * `LOG_FORMAT=json|console` - line layout (default `json`)
//! * `LOG_CALLER=false` - leave out the call site

mod bridge;
mod config;
mod errors;
mod fields;
mod global;
mod logger;
mod record;
mod severity;

pub use config::{CALLER_VAR, Config, Destination, FORMAT_VAR, Format, LEVEL_VAR, PATH_VAR};
pub use errors::{Error, Result};
pub use fields::Fields;
pub use global::{debug, error, fatal, info, init, logger, try_init, try_init_with, warn};
pub use logger::{Builder, Logger, Sink};
pub use record::{Caller, RESERVED_KEYS, Record};
pub use severity::{ParseSeverityError, Severity};
