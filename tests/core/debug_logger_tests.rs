use serial_test::serial;
use statusprobe::core::debug_logger::{get_debug_logger, DebugLogger, LogEntry, DEBUG_ENV_VAR};
use std::env;
use std::fs;

#[test]
#[serial]
fn test_debug_logger_disabled_by_default() {
    env::remove_var(DEBUG_ENV_VAR);
    let logger = DebugLogger::new();
    assert!(!logger.is_enabled());
}

#[test]
#[serial]
fn test_debug_logger_env_var_parsing() {
    let test_cases = vec![
        ("true", true),
        ("TRUE", true),
        ("1", true),
        ("yes", true),
        ("on", true),
        ("false", false),
        ("0", false),
        ("invalid", false),
        ("", false),
    ];

    for (value, expected) in test_cases {
        env::set_var(DEBUG_ENV_VAR, value);
        let logger = get_debug_logger();
        assert_eq!(logger.is_enabled(), expected, "Failed for value: {}", value);
    }

    env::remove_var(DEBUG_ENV_VAR);
}

#[test]
fn test_disabled_logger_writes_nothing() {
    let temp_dir = crate::common::create_temp_dir();
    let log_path = temp_dir.path().join("debug.log");
    let logger = DebugLogger::with_path(log_path.clone(), false);

    logger.check_start("bing-maps", "abc");
    logger.debug_sync("Test", "event", "message");

    assert!(!log_path.exists());
}

#[test]
fn test_check_events_written_as_json_lines() {
    let temp_dir = crate::common::create_temp_dir();
    let log_path = temp_dir.path().join("nested").join("debug.log");
    let logger = DebugLogger::with_path(log_path.clone(), true);

    let correlation_id = logger.new_correlation_id();
    logger.check_start("google-maps", &correlation_id);
    logger.relay_attempt("google-maps", "corsproxy", Some("HTTP 403"), &correlation_id);
    logger.check_end("google-maps", "unknown", "Inconclusive", 120, &correlation_id);

    let content = fs::read_to_string(&log_path).unwrap();
    let entries: Vec<LogEntry> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].event, "check_start");
    assert_eq!(entries[1].event, "relay_attempt");
    assert_eq!(entries[1].fields["ok"], serde_json::Value::Bool(false));
    assert_eq!(entries[2].fields["status"], "unknown");
    for entry in &entries {
        assert_eq!(entry.correlation_id.as_deref(), Some(correlation_id.as_str()));
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    }
    assert!(correlation_id.starts_with(logger.get_session_id()));
}

#[test]
fn test_stale_result_event() {
    let temp_dir = crate::common::create_temp_dir();
    let log_path = temp_dir.path().join("debug.log");
    let logger = DebugLogger::with_path(log_path.clone(), true);

    logger.stale_result("bing-maps", 1, 2);

    let content = fs::read_to_string(&log_path).unwrap();
    let entry: LogEntry = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(entry.event, "stale_result");
    assert_eq!(entry.fields["ticket"], 1);
    assert_eq!(entry.fields["latest"], 2);
}

#[test]
fn test_sensitive_data_redacted() {
    let logger = DebugLogger::disabled();

    let redacted = logger.redact_sensitive_data(
        "GET https://relay.example/?url=x&token=abc123&api_key=zzz Bearer sk-123",
    );
    assert!(!redacted.contains("abc123"));
    assert!(!redacted.contains("zzz"));
    assert!(!redacted.contains("sk-123"));
    assert!(redacted.contains("[REDACTED]"));
    assert!(redacted.contains("https://relay.example/"));
}

#[test]
fn test_messages_redacted_in_file() {
    let temp_dir = crate::common::create_temp_dir();
    let log_path = temp_dir.path().join("debug.log");
    let logger = DebugLogger::with_path(log_path.clone(), true);

    logger.error_sync("RelayClient", "relay_error", "failed https://r.example/?sig=deadbeef");

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(!content.contains("deadbeef"));
}
