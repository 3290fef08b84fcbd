use std::panic::AssertUnwindSafe;

use chrono::{Local, TimeZone};
use filelog_config::{LogMode, LoggerCfg};
use filelog_core::logger::{CLOSING_LINE, log_path};
use filelog_core::{ErrorReporter, FileLogger, HostLogger, Logger, NoopLogger, logf};
use filelog_traits::clock::test_clock::TestClock;
use regex::Regex;
use tempfile::tempdir;

const TS: &str = r"\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}\]";

fn lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn panicking_reporter() -> ErrorReporter {
    ErrorReporter::new(|msg| panic!("{msg}"))
}

#[test]
fn first_line_announces_start() {
    let dir = tempdir().unwrap();
    let logger = FileLogger::new(dir.path(), "worker1");
    let path = dir.path().join("log-worker1.txt");
    assert_eq!(logger.path(), path);

    let first = Regex::new(&format!(r"^{TS} worker1 started$")).unwrap();
    let got = lines(&path);
    assert_eq!(got.len(), 1);
    assert!(first.is_match(&got[0]), "{:?}", got[0]);
}

#[test]
fn drop_appends_closing_line() {
    let dir = tempdir().unwrap();
    {
        let mut logger = FileLogger::new(dir.path(), "worker1");
        logger.print("working");
    }
    let got = lines(&log_path(dir.path(), "worker1"));
    let last = Regex::new(&format!(r"^{TS} Closing the log\.$")).unwrap();
    assert_eq!(got.len(), 3);
    assert!(got[1].ends_with("] working"));
    assert!(last.is_match(&got[2]), "{:?}", got[2]);
}

#[test]
fn each_line_is_on_disk_before_print_returns() {
    let dir = tempdir().unwrap();
    let mut logger = FileLogger::new(dir.path(), "durable");
    logger.print("one");
    assert!(lines(logger.path()).last().unwrap().ends_with("] one"));
    logf!(logger, "{} plus {} is {}", 1, 1, 2);
    assert!(lines(logger.path()).last().unwrap().ends_with("] 1 plus 1 is 2"));
}

#[test]
fn exact_records_with_test_clock() {
    let dir = tempdir().unwrap();
    let origin = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).single().unwrap();
    let clock = TestClock::at(origin);
    {
        let mut logger =
            FileLogger::with_clock(dir.path(), "svc", "w", clock.clone(), &panicking_reporter());
        clock.advance_ms(105);
        logger.print_fmt("{} {}", &[&5]);
        clock.advance_ms(895);
    }
    let text = std::fs::read_to_string(log_path(dir.path(), "svc")).unwrap();
    assert_eq!(
        text,
        "[2024-03-09 07:05:01.000] svc started\n\
         [2024-03-09 07:05:01.105] 5 {}\n\
         [2024-03-09 07:05:02.000] Closing the log.\n"
    );
}

#[test]
fn truncate_mode_discards_previous_run() {
    let dir = tempdir().unwrap();
    drop(FileLogger::new(dir.path(), "again"));
    drop(FileLogger::new(dir.path(), "again"));
    assert_eq!(lines(&log_path(dir.path(), "again")).len(), 2);
}

#[test]
fn append_mode_keeps_previous_run() {
    let dir = tempdir().unwrap();
    drop(FileLogger::open(dir.path(), "again", "a"));
    drop(FileLogger::open(dir.path(), "again", "a"));
    let got = lines(&log_path(dir.path(), "again"));
    assert_eq!(got.len(), 4);
    assert!(got[2].ends_with("] again started"));
    assert!(got[3].ends_with(CLOSING_LINE));
}

#[test]
fn missing_directory_is_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let reporter = panicking_reporter();
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        FileLogger::open_with(&missing, "x", "w", &reporter);
    }));
    let payload = result.expect_err("open must fail");
    let msg = payload.downcast_ref::<String>().cloned().unwrap_or_default();
    assert!(msg.contains("log-x.txt"), "{msg}");
    assert!(!missing.exists());
}

#[test]
fn noop_logger_never_touches_disk() {
    let dir = tempdir().unwrap();
    let mut logger = NoopLogger;
    logger.print("ignored");
    logf!(logger, "{} {}", "a", "b", "c");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn host_logger_disabled_is_noop() {
    let dir = tempdir().unwrap();
    let mut cfg = LoggerCfg::named("quiet");
    cfg.directory = Some(dir.path().join("never"));
    cfg.enabled = false;
    let mut logger = HostLogger::from_config_with(&cfg, &panicking_reporter());
    assert!(logger.is_noop());
    assert!(logger.path().is_none());
    logger.print("dropped");
    assert!(!dir.path().join("never").exists());
}

#[test]
fn host_logger_creates_nested_directories() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("a").join("b");
    let mut cfg = LoggerCfg::named("svc");
    cfg.directory = Some(target.clone());
    cfg.mode = LogMode::Append;
    {
        let mut logger = HostLogger::from_config_with(&cfg, &panicking_reporter());
        assert!(!logger.is_noop());
        assert_eq!(logger.path(), Some(log_path(&target, "svc").as_path()));
        logf!(logger, "hello {}", "host");
    }
    let got = lines(&log_path(&target, "svc"));
    assert_eq!(got.len(), 3);
    assert!(got[1].ends_with("] hello host"));
}

#[test]
fn host_logger_without_create_dirs_is_fatal_on_missing_directory() {
    let dir = tempdir().unwrap();
    let mut cfg = LoggerCfg::named("svc");
    cfg.directory = Some(dir.path().join("absent"));
    cfg.create_dirs = false;
    let reporter = panicking_reporter();
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        HostLogger::from_config_with(&cfg, &reporter);
    }));
    assert!(result.is_err());
    assert!(!dir.path().join("absent").exists());
}
