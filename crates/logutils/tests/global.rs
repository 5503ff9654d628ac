//! The process-wide logger can only be installed once per process, so this
//! file holds a single test walking through the whole global lifecycle.

use logutils::{Config, Destination, Error, Severity, fields};
use serde_json::{Value, json};
use std::fs;

#[test]
fn global_logger_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("global.log");

    let logger = logutils::try_init_with(Config {
        level: Severity::Info,
        destination: Destination::File(path.clone()),
        ..Config::default()
    })
    .unwrap();
    assert_eq!(logger.level(), Severity::Info);

    logutils::debug("dropped", fields! { "n" => 1 });
    let info_line = line!() + 1;
    logutils::info("from free fn", fields! { "n" => 2 });
    let err = std::io::Error::other("boom");
    logutils::error("failed", fields! { "user" => "abc" }, Some(&err));
    tracing::warn!(shard = 7, "from tracing");
    tracing_log::log::error!("from log");

    assert!(matches!(
        logutils::try_init(),
        Err(Error::AlreadyInitialized)
    ));
    assert!(std::ptr::eq(logutils::init(), logger));
    assert!(std::ptr::eq(logutils::logger(), logger));

    let records: Vec<Value> = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let messages: Vec<_> = records.iter().map(|r| r["message"].clone()).collect();
    assert_eq!(
        messages,
        vec![
            json!("from free fn"),
            json!("failed"),
            json!("from tracing"),
            json!("from log"),
        ]
    );

    assert_eq!(records[0]["n"], json!(2));
    assert_eq!(records[0]["caller"].as_str().unwrap(), format!("{}:{info_line}", file!()));
    assert_eq!(records[1]["error"], json!("boom"));
    assert_eq!(records[1]["user"], json!("abc"));
    assert_eq!(records[2]["shard"], json!(7));
    assert_eq!(records[3]["level"], json!("error"));
    assert!(records[3].get("log.target").is_none());
}
