use anyhow::{Result, bail};
use clap::Parser;
use logutils::{Fields, Severity};
use serde_json::Value;

/// Writes one structured log record using the `LOG_*` environment
/// configuration, so shell scripts share the format and destination of the
/// services they run alongside.
#[derive(Parser)]
#[command(name = "log-emit")]
#[command(about = "Write one structured log record configured by the LOG_* environment")]
struct Args {
    /// Severity of the record: debug, info, warn, error or fatal
    #[arg(short, long, default_value = "info")]
    level: Severity,

    /// Extra field as KEY=VALUE. VALUE is read as JSON when it parses,
    /// otherwise as plain text. Repeating a key keeps the last value.
    #[arg(short, long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, Value)>,

    /// Error description written under the `error` key
    #[arg(short, long)]
    error: Option<String>,

    /// Record message
    message: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let logger = logutils::init();

    let fields: Fields = args.fields.into_iter().collect();
    let err = args.error.map(anyhow::Error::msg);
    let err = err.as_deref().map(|e| e as &dyn std::error::Error);

    match args.level {
        Severity::Fatal => logger.fatal(&args.message, fields, err),
        level => logger.log(level, &args.message, fields, err),
    }

    if logger.write_errors() > 0 {
        bail!("failed to write record to {}", logger.target());
    }
    Ok(())
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    if key.is_empty() {
        return Err(format!("empty field name in {raw:?}"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_string(), value))
}
