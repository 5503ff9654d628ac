use crate::{Config, Error, Fields, Logger, Result};
use std::sync::OnceLock;
use tracing_log::LogTracer;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Installs the process-wide logger configured from the `LOG_*`
/// environment variables. Installing writes no record of its own.
///
/// Besides storing the logger for the free emitter functions, this makes
/// it the global tracing subscriber and forwards `log` crate records into
/// it, so `tracing::info!` and `log::info!` call sites land in the same
/// destination.
///
/// # Errors
/// * [`Error::OpenLogFile`] if `LOG_PATH` cannot be opened; nothing is
///   installed.
/// * [`Error::AlreadyInitialized`] on any call after the first.
/// * [`Error::SetLogger`] / [`Error::SetSubscriber`] if another logger or
///   subscriber got there first. The process-wide logger is still
///   installed in that case; only the macro bridge is missing.
pub fn try_init() -> Result<&'static Logger> {
    try_init_with(Config::from_env())
}

/// Same as [`try_init`] with an explicit configuration.
pub fn try_init_with(config: Config) -> Result<&'static Logger> {
    if LOGGER.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }

    let logger = Logger::new(config)?;
    let mut installed = false;
    let logger = LOGGER.get_or_init(|| {
        installed = true;
        logger
    });
    if !installed {
        return Err(Error::AlreadyInitialized);
    }

    LogTracer::init()?;
    let subscriber = tracing_subscriber::registry()
        .with(logger.clone().with_filter(logger.level().level_filter()));
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(logger)
}

/// Installs the process-wide logger, exiting the process when it cannot
/// be built.
///
/// If `LOG_PATH` is set but cannot be opened the failure is reported on
/// stderr and the process exits with status 1; output never falls back to
/// standard output. Repeated calls return the logger installed first.
pub fn init() -> &'static Logger {
    match try_init() {
        Ok(logger) => logger,
        Err(err) => {
            if let Some(logger) = LOGGER.get() {
                if !matches!(err, Error::AlreadyInitialized) {
                    eprintln!("logutils: {err}");
                }
                return logger;
            }
            eprintln!("logutils: {err}");
            std::process::exit(1)
        }
    }
}

/// The process-wide logger, initialized from the environment on first use
/// if [`init`] has not run yet.
pub fn logger() -> &'static Logger {
    match LOGGER.get() {
        Some(logger) => logger,
        None => init(),
    }
}

/// Logs at debug severity through the process-wide logger.
#[track_caller]
pub fn debug(message: &str, fields: Fields) {
    logger().debug(message, fields);
}

/// Logs at info severity through the process-wide logger.
#[track_caller]
pub fn info(message: &str, fields: Fields) {
    logger().info(message, fields);
}

/// Logs at warn severity through the process-wide logger.
#[track_caller]
pub fn warn(message: &str, fields: Fields) {
    logger().warn(message, fields);
}

/// Logs at error severity through the process-wide logger, attaching
/// `err` under the `error` key when present.
#[track_caller]
pub fn error(message: &str, fields: Fields, err: Option<&dyn std::error::Error>) {
    logger().error(message, fields, err);
}

/// Logs at fatal severity through the process-wide logger, then exits
/// with status 1.
#[track_caller]
pub fn fatal(message: &str, fields: Fields, err: Option<&dyn std::error::Error>) -> ! {
    logger().fatal(message, fields, err)
}
