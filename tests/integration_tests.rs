//! Integration tests for the logger
//!
//! These tests verify:
//! - Exact line layout and caller locations
//! - Caller-depth offsets for wrapper functions
//! - Mirroring to an uncolored log file
//! - Error propagation and log file failures
//! - FATAL process termination

use color_logger::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::process::Command;
use tempfile::TempDir;

fn plain_logger() -> (Logger, SharedBuffer) {
    let out = SharedBuffer::new();
    let logger = Logger::builder(out.clone())
        .color(false)
        .timestamp(false)
        .build();
    (logger, out)
}

/// Remove ANSI color sequences of the form `ESC [ ... m`
fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain
}

/// Assert that `output` ends with `function:location message`
///
/// Builds without debug info cannot name every frame, so outside debug
/// builds the placeholder forms are accepted too.
fn assert_caller(output: &str, function: &str, location: &str, message: &str) {
    let exact = format!("{}:{} {}\n", function, location, message);
    if cfg!(debug_assertions) {
        assert!(output.ends_with(&exact), "{}", output);
        return;
    }
    let accepted = [
        exact,
        format!("<unknown function>:{} {}\n", location, message),
        format!("<unknown function>:<unknown file>:0 {}\n", message),
    ];
    assert!(
        accepted.iter().any(|line| output.ends_with(line.as_str())),
        "{}",
        output
    );
}

struct FailingDestination;

impl Write for FailingDestination {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "destination closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Destination for FailingDestination {}

#[test]
fn test_info_line() {
    let (logger, out) = plain_logger();
    logger.info(&[&"hello"]).unwrap();
    assert_eq!(out.contents_string(), "[INFO]  hello\n");
}

#[test]
fn test_error_reports_call_site() {
    let (logger, out) = plain_logger();
    let line = line!() + 1;
    logger.error(&[&"failed:", &42]).unwrap();

    let output = out.contents_string();
    assert!(output.starts_with("[ERROR] "), "{}", output);
    assert_eq!(output.lines().count(), 1);
    assert_caller(
        &output,
        "integration_tests::test_error_reports_call_site",
        &format!("integration_tests.rs:{}", line),
        "failed: 42",
    );
}

#[test]
fn test_every_prefix() {
    let (logger, out) = plain_logger();
    logger.with_debug();
    logger.error(&[&"e"]).unwrap();
    logger.warn(&[&"w"]).unwrap();
    logger.info(&[&"i"]).unwrap();
    logger.debug(&[&"d"]).unwrap();
    logger.trace(&[&"t"]).unwrap();

    let output = out.contents_string();
    let heads: Vec<&str> = output
        .lines()
        .filter(|l| !l.starts_with('\t'))
        .map(|l| &l[..8])
        .collect();
    assert_eq!(heads, ["[ERROR] ", "[WARN]  ", "[INFO]  ", "[DEBUG] ", "[TRACE] "]);
}

/// Log from a wrapper, returning the line of the logging call
#[inline(never)]
fn report_failure(logger: &Logger) -> u32 {
    logger.error(&[&"wrapped"]).unwrap();
    line!() - 1
}

#[test]
fn test_depth_skips_wrapper_frames() {
    let (logger, out) = plain_logger();
    logger.with_depth(1);
    let line = line!() + 1;
    report_failure(&logger);

    assert_caller(
        &out.contents_string(),
        "integration_tests::test_depth_skips_wrapper_frames",
        &format!("integration_tests.rs:{}", line),
        "wrapped",
    );
}

#[test]
fn test_depth_zero_reports_wrapper() {
    let (logger, out) = plain_logger();
    let line = report_failure(&logger);
    assert_caller(
        &out.contents_string(),
        "integration_tests::report_failure",
        &format!("integration_tests.rs:{}", line),
        "wrapped",
    );
}

#[test]
fn test_log_file_is_plain_and_mirrors_primary() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("mirror.log");

    let out = SharedBuffer::new();
    let logger = Logger::builder(out.clone()).color(true).debug(true).build();
    logger.with_log_file(&log_file);
    assert_eq!(logger.log_file_path().as_deref(), Some(log_file.as_path()));

    logger.info(&[&"started"]).unwrap();
    logger.error(&[&"broken", &7]).unwrap();
    logger.warnf(format_args!("{}% full", 90)).unwrap();
    logger.trace(&[&"here"]).unwrap();
    logger.close().unwrap();

    let primary = out.contents_string();
    let file = fs::read_to_string(&log_file).expect("Failed to read log file");

    assert!(primary.contains('\x1b'));
    assert!(!file.contains('\x1b'));
    assert_eq!(strip_ansi(&primary), file);
    assert_eq!(out.write_count(), 4);
}

#[test]
fn test_log_file_parity_without_color() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("parity.log");

    let out = SharedBuffer::new();
    let logger = Logger::builder(out.clone())
        .color(false)
        .debug(true)
        .log_file(&log_file)
        .build();

    for i in 0..20 {
        logger.errorf(format_args!("event {}", i)).unwrap();
        logger.debug(&[&"detail", &i]).unwrap();
    }
    logger.close().unwrap();

    let file = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(out.contents_string(), file);
    assert_eq!(file.lines().count(), 40);
}

#[test]
fn test_log_file_appends() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("append.log");

    for run in 0..2 {
        let (logger, _out) = plain_logger();
        logger.with_log_file(&log_file);
        logger.info(&[&"run", &run]).unwrap();
        logger.close().unwrap();
    }

    let file = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(file, "[INFO]  run 0\n[INFO]  run 1\n");
}

#[test]
fn test_unopenable_log_file_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("missing").join("app.log");

    let (logger, out) = plain_logger();
    logger.with_log_file(&log_file).info(&[&"still running"]).unwrap();

    let output = out.contents_string();
    let mut lines = output.lines();
    let first = lines.next().unwrap();
    assert!(first.starts_with("[ERROR] "), "{}", first);
    assert!(first.contains("could not open log file"), "{}", first);
    if cfg!(debug_assertions) {
        assert!(first.contains("test_unopenable_log_file_is_reported"), "{}", first);
    }
    assert_eq!(lines.next(), Some("[INFO]  still running"));
    assert!(logger.log_file_path().is_none());
}

#[test]
fn test_replacing_log_file_switches_mirror() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = temp_dir.path().join("first.log");
    let second = temp_dir.path().join("second.log");

    let (logger, out) = plain_logger();
    logger.with_log_file(&first);
    logger.info(&[&"one"]).unwrap();
    logger.with_log_file(&second);
    logger.info(&[&"two"]).unwrap();
    logger.close().unwrap();

    assert_eq!(out.contents_string(), "[INFO]  one\n[INFO]  two\n");
    assert_eq!(fs::read_to_string(&first).unwrap(), "[INFO]  one\n");
    assert_eq!(fs::read_to_string(&second).unwrap(), "[INFO]  two\n");
}

/// fsync is not supported on /dev/null, so closing it always fails
#[cfg(target_os = "linux")]
#[test]
fn test_close_failure_of_replaced_file_is_not_an_open_failure() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("replacement.log");

    let (logger, out) = plain_logger();
    logger.with_log_file("/dev/null");
    logger.with_log_file(&log_file);
    logger.info(&[&"mirrored"]).unwrap();

    let output = out.contents_string();
    let mut lines = output.lines();
    let first = lines.next().unwrap();
    assert!(first.starts_with("[ERROR] "), "{}", first);
    assert!(first.contains("could not close previous log file /dev/null"), "{}", first);
    assert!(!output.contains("could not open"), "{}", output);
    assert_eq!(lines.next(), Some("[INFO]  mirrored"));
    assert_eq!(logger.log_file_path().as_deref(), Some(log_file.as_path()));

    // the report is already mirrored to the replacement
    logger.close().unwrap();
    let file = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(file, output);
}

#[test]
fn test_close_releases_log_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("closed.log");

    let (logger, out) = plain_logger();
    logger.with_log_file(&log_file);
    logger.info(&[&"before"]).unwrap();
    logger.close().unwrap();
    logger.info(&[&"after"]).unwrap();
    logger.close().unwrap();

    let file = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(file, "[INFO]  before\n");
    assert_eq!(out.contents_string(), "[INFO]  before\n[INFO]  after\n");
    assert!(logger.log_file_path().is_none());
}

#[test]
fn test_write_failure_is_returned() {
    let logger = Logger::builder(FailingDestination).timestamp(false).build();
    let err = logger.info(&[&"lost"]).unwrap_err();
    assert!(matches!(err, LoggerError::IoError(_)), "{:?}", err);
}

#[test]
fn test_write_failure_still_reaches_log_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fallback.log");

    let logger = Logger::builder(FailingDestination).timestamp(false).build();
    logger.with_log_file(&log_file);
    assert!(logger.warn(&[&"kept"]).is_err());
    logger.close().unwrap();

    let file = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(file, "[WARN]  kept\n");
}

#[test]
fn test_config_from_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("configured.log");
    let json = format!(
        r#"{{ "color": false, "timestamp": false, "debug": true, "log_file": {:?} }}"#,
        log_file.to_str().unwrap()
    );

    let out = SharedBuffer::new();
    let logger = Logger::builder(out.clone())
        .config(LoggerConfig::from_json(&json).unwrap())
        .build();
    logger.debugf(format_args!("configured")).unwrap();
    logger.close().unwrap();

    assert!(out.contents_string().ends_with(" configured\n"));
    let file = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(file, out.contents_string());
}

const CHILD_ENV: &str = "COLOR_LOGGER_FATAL_CHILD";

/// Re-run a single test of this binary as a child process
fn run_child(test_name: &str, log_file: &std::path::Path) -> std::process::ExitStatus {
    Command::new(std::env::current_exe().expect("test binary path"))
        .args(["--exact", test_name, "--test-threads=1"])
        .env(CHILD_ENV, log_file)
        .status()
        .expect("Failed to spawn child test process")
}

#[test]
fn test_fatal_exits_with_status_one() {
    if let Some(path) = std::env::var_os(CHILD_ENV) {
        let (logger, _out) = plain_logger();
        logger.with_log_file(path);
        logger.fatal(&[&"unrecoverable", &"state"]);
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fatal.log");
    let status = run_child("test_fatal_exits_with_status_one", &log_file);
    assert_eq!(status.code(), Some(1));

    let file = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(file.starts_with("[FATAL] "), "{}", file);
    assert!(file.ends_with(" unrecoverable state\n"), "{}", file);
}

#[test]
fn test_fatal_exits_even_when_write_fails() {
    if let Some(path) = std::env::var_os(CHILD_ENV) {
        fs::write(&path, b"child started\n").unwrap();
        let logger = Logger::new(FailingDestination);
        logger.fatalf(format_args!("nobody hears this"));
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let marker = temp_dir.path().join("marker.log");
    let status = run_child("test_fatal_exits_even_when_write_fails", &marker);
    assert_eq!(status.code(), Some(1));
    assert!(marker.exists());
}
