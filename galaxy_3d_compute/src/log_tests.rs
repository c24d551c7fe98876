//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, and DefaultLogger.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::time::SystemTime;

fn entry(severity: LogSeverity, message: &str) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "galaxy3d::ComputeManager".to_string(),
        message: message.to_string(),
        file: None,
        line: None,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_are_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Info.label(), "INFO ");
    assert_eq!(LogSeverity::Error.label(), "ERROR");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_creation_with_file_line() {
    let entry = LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "galaxy3d::ShaderStorageBuffer".to_string(),
        message: "Mapping failed".to_string(),
        file: Some("shader_storage_buffer.rs"),
        line: Some(42),
    };

    assert_eq!(entry.severity, LogSeverity::Error);
    assert_eq!(entry.file, Some("shader_storage_buffer.rs"));
    assert_eq!(entry.line, Some(42));

    let copy = entry.clone();
    assert_eq!(copy.message, entry.message);
    assert_eq!(copy.source, entry.source);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_threshold_is_info() {
    let logger = DefaultLogger::default();
    assert_eq!(logger.min_severity(), LogSeverity::Info);
    assert!(!logger.accepts(LogSeverity::Trace));
    assert!(!logger.accepts(LogSeverity::Debug));
    assert!(logger.accepts(LogSeverity::Info));
    assert!(logger.accepts(LogSeverity::Error));
}

#[test]
fn test_default_logger_custom_threshold() {
    let logger = DefaultLogger::with_min_severity(LogSeverity::Trace);
    assert!(logger.accepts(LogSeverity::Trace));

    let logger = DefaultLogger::with_min_severity(LogSeverity::Error);
    assert!(!logger.accepts(LogSeverity::Warn));
    assert!(logger.accepts(LogSeverity::Error));
}

#[test]
fn test_default_logger_all_severities() {
    // Prints (or drops) without panicking
    let logger = DefaultLogger::with_min_severity(LogSeverity::Trace);
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&entry(severity, "message"));
        let mut detailed = entry(severity, "message with location");
        detailed.file = Some("compute_manager.rs");
        detailed.line = Some(7);
        logger.log(&detailed);
    }
}

#[test]
fn test_format_plain_without_location() {
    let line = DefaultLogger::format_plain(&entry(LogSeverity::Warn, "cache full"));
    assert!(line.contains("[WARN ]"));
    assert!(line.contains("[galaxy3d::ComputeManager]"));
    assert!(line.ends_with("cache full"));
}

#[test]
fn test_format_plain_with_location() {
    let mut e = entry(LogSeverity::Error, "map failed");
    e.file = Some("shader_storage_buffer.rs");
    e.line = Some(120);
    let line = DefaultLogger::format_plain(&e);
    assert!(line.contains("[ERROR]"));
    assert!(line.ends_with("map failed (shader_storage_buffer.rs:120)"));
}

#[test]
fn test_format_colored_keeps_location() {
    let mut e = entry(LogSeverity::Error, "map failed");
    e.file = Some("shader_storage_buffer.rs");
    e.line = Some(120);
    let line = DefaultLogger::format_colored(&e);
    assert!(line.contains("ERROR"));
    assert!(line.contains("galaxy3d::ComputeManager"));
    assert!(line.ends_with("map failed (shader_storage_buffer.rs:120)"));

    let plain = DefaultLogger::format_colored(&entry(LogSeverity::Info, "compiled"));
    assert!(plain.ends_with("compiled"));
}

// ============================================================================
// LOGGER TRAIT TESTS
// ============================================================================

struct CountingLogger {
    logged_count: std::sync::Mutex<usize>,
}

impl Logger for CountingLogger {
    fn log(&self, _entry: &LogEntry) {
        *self.logged_count.lock().unwrap() += 1;
    }
}

#[test]
fn test_custom_logger_implementation() {
    let logger = CountingLogger { logged_count: std::sync::Mutex::new(0) };
    logger.log(&entry(LogSeverity::Info, "one"));
    logger.log(&entry(LogSeverity::Info, "two"));
    assert_eq!(*logger.logged_count.lock().unwrap(), 2);
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}
