use crate::{Fields, Format, Severity};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// Keys the logger writes itself. A caller field with one of these names is
/// written as `fields.<name>` instead, with the prefix repeated until the
/// name is not taken by another caller field.
pub const RESERVED_KEYS: [&str; 5] = ["level", "time", "caller", "error", "message"];

/// Source location of the code that emitted a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Source file path, as reported by the compiler
    pub file: Cow<'static, str>,
    /// One-based line number
    pub line: u32,
}

impl From<&'static std::panic::Location<'static>> for Caller {
    fn from(location: &'static std::panic::Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One log record, fully enriched and ready to render.
#[derive(Debug, Clone)]
pub struct Record {
    /// Severity the record was emitted at
    pub severity: Severity,
    /// Free-text message
    pub message: String,
    /// Caller-supplied named values
    pub fields: Fields,
    /// When the record was built; absent records render without `time`
    pub time: Option<DateTime<Utc>>,
    /// Call site, when caller enrichment is on
    pub caller: Option<Caller>,
    /// Description of the error passed to `error` or `fatal`
    pub error: Option<String>,
}

impl Record {
    /// A bare record with no fields and no enrichment.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            fields: Fields::new(),
            time: None,
            caller: None,
            error: None,
        }
    }

    /// Renders the record as a single newline-terminated line.
    pub fn render(&self, format: Format) -> String {
        let mut line = match format {
            Format::Json => self.to_json().to_string(),
            Format::Console => self.to_console(),
        };
        line.push('\n');
        line
    }

    /// The JSON object written for this record. Keys appear in the order
    /// `level`, `time`, `caller`, `error`, caller fields, `message`.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("level".into(), Value::from(self.severity.as_str()));
        if let Some(time) = &self.time {
            obj.insert("time".into(), Value::from(rfc3339(time)));
        }
        if let Some(caller) = &self.caller {
            obj.insert("caller".into(), Value::from(caller.to_string()));
        }
        if let Some(error) = &self.error {
            obj.insert("error".into(), Value::from(error.as_str()));
        }
        for (key, value) in self.fields.iter() {
            obj.insert(self.field_key(key), value.clone());
        }
        obj.insert("message".into(), Value::from(self.message.as_str()));
        Value::Object(obj)
    }

    fn to_console(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.fields.len() + 5);
        if let Some(time) = &self.time {
            parts.push(rfc3339(time));
        }
        parts.push(self.severity.short().to_string());
        if let Some(caller) = &self.caller {
            parts.push(caller.to_string());
        }
        parts.push(">".to_string());
        parts.push(console_message(&self.message));
        for (key, value) in self.fields.iter() {
            parts.push(format!("{}={}", self.field_key(key), console_value(value)));
        }
        if let Some(error) = &self.error {
            parts.push(format!("error={}", console_str(error)));
        }
        parts.join(" ")
    }

    fn field_key(&self, key: &str) -> String {
        if !RESERVED_KEYS.contains(&key) {
            return key.to_string();
        }
        let mut name = format!("fields.{key}");
        while self.fields.get(&name).is_some() {
            name = format!("fields.{name}");
        }
        name
    }
}

fn rfc3339(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn console_value(value: &Value) -> String {
    match value {
        Value::String(s) => console_str(s),
        other => other.to_string(),
    }
}

/// Messages stay bare unless they hold a control character, which would
/// let one record span several lines.
fn console_message(s: &str) -> String {
    if s.chars().any(char::is_control) {
        Value::from(s).to_string()
    } else {
        s.to_string()
    }
}

fn console_str(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"');
    if needs_quotes {
        Value::from(s).to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> Record {
        let mut record = Record::new(Severity::Error, "failed");
        record.fields = crate::fields! { "user" => "abc", "attempt" => 2 };
        record.time = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
        record.caller = Some(Caller {
            file: "src/main.rs".into(),
            line: 42,
        });
        record.error = Some("connection refused".to_string());
        record
    }

    #[test]
    fn json_has_every_part() {
        let value = sample().to_json();
        assert_eq!(
            value,
            json!({
                "level": "error",
                "time": "2024-05-01T12:30:00Z",
                "caller": "src/main.rs:42",
                "error": "connection refused",
                "user": "abc",
                "attempt": 2,
                "message": "failed",
            })
        );
    }

    #[test]
    fn json_line_keeps_key_order() {
        let line = sample().render(Format::Json);
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        let level = line.find("\"level\"").unwrap();
        let time = line.find("\"time\"").unwrap();
        let message = line.find("\"message\"").unwrap();
        assert!(level < time && time < message);
    }

    #[test]
    fn optional_parts_are_omitted() {
        let value = Record::new(Severity::Info, "hello").to_json();
        assert_eq!(value, json!({"level": "info", "message": "hello"}));
    }

    #[test]
    fn reserved_field_names_are_prefixed() {
        let mut record = Record::new(Severity::Info, "real");
        record.fields = crate::fields! { "message" => "fake", "level" => 9 };
        let value = record.to_json();
        assert_eq!(value["message"], json!("real"));
        assert_eq!(value["level"], json!("info"));
        assert_eq!(value["fields.message"], json!("fake"));
        assert_eq!(value["fields.level"], json!(9));
    }

    #[test]
    fn prefixed_names_never_overwrite_caller_fields() {
        let mut record = Record::new(Severity::Info, "real");
        record.fields = crate::fields! {
            "message" => "a",
            "fields.message" => "b",
            "fields.fields.message" => "c",
        };
        let value = record.to_json();
        assert_eq!(value["message"], json!("real"));
        assert_eq!(value["fields.message"], json!("b"));
        assert_eq!(value["fields.fields.message"], json!("c"));
        assert_eq!(value["fields.fields.fields.message"], json!("a"));
        assert_eq!(value.as_object().unwrap().len(), 5);
    }

    #[test]
    fn console_keeps_multiline_text_on_one_line() {
        let mut record = Record::new(Severity::Info, "line one\nINJECTED FTL > forged");
        record.error = Some("first\nsecond".to_string());
        let line = record.render(Format::Console);
        assert_eq!(line.lines().count(), 1);
        assert_eq!(
            line,
            "INF > \"line one\\nINJECTED FTL > forged\" error=\"first\\nsecond\"\n"
        );
    }

    #[test]
    fn console_message_with_spaces_stays_bare() {
        let record = Record::new(Severity::Warn, "almost full");
        assert_eq!(record.render(Format::Console), "WRN > almost full\n");
    }

    #[test]
    fn console_line() {
        let line = sample().render(Format::Console);
        assert_eq!(
            line,
            "2024-05-01T12:30:00Z ERR src/main.rs:42 > failed user=abc attempt=2 \
             error=\"connection refused\"\n"
        );
    }

    #[test]
    fn console_quotes_only_when_needed() {
        let mut record = Record::new(Severity::Debug, "m");
        record.fields = crate::fields! { "a" => "", "b" => "x=y", "c" => "plain", "d" => json!({"k": 1}) };
        assert_eq!(
            record.render(Format::Console),
            "DBG > m a=\"\" b=\"x=y\" c=plain d={\"k\":1}\n"
        );
    }
}
