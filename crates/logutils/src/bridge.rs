//! Routes `tracing` events (and `log` records forwarded by `LogTracer`)
//! through a [`Logger`], so macro call sites and the emitter functions
//! share one sink and one line format.

use crate::Logger;
use crate::record::{Caller, Record};
use crate::severity::Severity;
use chrono::Utc;
use serde_json::Value;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_log::NormalizeEvent;
use tracing_subscriber::layer::{Context, Layer};

impl<S: Subscriber> Layer<S> for Logger {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let normalized = event.normalized_metadata();
        let metadata = normalized.as_ref().unwrap_or_else(|| event.metadata());

        let Some(severity) = Severity::from_tracing(metadata.level()) else {
            return;
        };
        if !self.enabled(severity) {
            return;
        }

        let mut visitor = RecordVisitor {
            record: Record::new(severity, String::new()),
        };
        event.record(&mut visitor);

        let mut record = visitor.record;
        record.time = Some(Utc::now());
        if self.wants_caller()
            && let (Some(file), Some(line)) = (metadata.file(), metadata.line())
        {
            record.caller = Some(Caller {
                file: file.to_owned().into(),
                line,
            });
        }

        self.write_record(&record);
    }
}

/// Collects an event's fields into a record. `message` and `error` land in
/// their dedicated slots; `log.*` bookkeeping fields added by `tracing-log`
/// are skipped.
struct RecordVisitor {
    record: Record,
}

impl RecordVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => self.record.message = into_text(value),
            "error" => self.record.error = Some(into_text(value)),
            name if name.starts_with("log.") => {}
            name => {
                self.record.fields.insert(name, value);
            }
        }
    }
}

impl Visit for RecordVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::from(format!("{value:?}")));
    }
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::logger::tests::Buffer;
    use crate::{Logger, Severity};
    use serde_json::json;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(level: Severity, f: impl FnOnce()) -> Buffer {
        let buffer = Buffer::default();
        let logger = Logger::builder()
            .level(level)
            .writer(buffer.clone())
            .build()
            .unwrap();
        let subscriber = tracing_subscriber::registry().with(logger);
        tracing::subscriber::with_default(subscriber, f);
        buffer
    }

    #[test]
    fn macro_fields_keep_their_types() {
        let buffer = capture(Severity::Debug, || {
            tracing::info!(user = "abc", attempt = 3_u64, delta = -2, ok = true, "signed in");
        });

        let records = buffer.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["level"], json!("info"));
        assert_eq!(record["message"], json!("signed in"));
        assert_eq!(record["user"], json!("abc"));
        assert_eq!(record["attempt"], json!(3));
        assert_eq!(record["delta"], json!(-2));
        assert_eq!(record["ok"], json!(true));
        assert!(record["caller"].as_str().unwrap().starts_with(file!()));
    }

    #[test]
    fn error_field_is_distinguished() {
        let buffer = capture(Severity::Debug, || {
            let err = std::io::Error::other("disk full");
            tracing::error!(error = %err, path = "/var/data", "write failed");
        });

        let record = &buffer.records()[0];
        assert_eq!(record["error"], json!("disk full"));
        assert_eq!(record["path"], json!("/var/data"));
        assert!(record.get("fields.error").is_none());
    }

    #[test]
    fn threshold_applies_and_trace_is_dropped() {
        let buffer = capture(Severity::Info, || {
            tracing::trace!("never");
            tracing::debug!("below");
            tracing::warn!("kept");
        });

        let records = buffer.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["message"], json!("kept"));
    }
}
