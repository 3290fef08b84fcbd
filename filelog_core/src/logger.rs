//! Line loggers.
//!
//! The set of loggers is closed: [`FileLogger`] writes timestamped lines to
//! `<directory>/log-<name>.txt`, [`NoopLogger`] discards everything, and
//! [`HostLogger`] picks one of the two from configuration.
//!
//! File layout, one record per line:
//!
//! ```text
//! [2024-03-09 07:05:01.007] worker1 started
//! [2024-03-09 07:05:01.112] some message
//! [2024-03-09 07:05:02.000] Closing the log.
//! ```

use std::fmt::Display;
use std::path::{Path, PathBuf};

use filelog_config::LoggerCfg;
use filelog_traits::{Clock, LocalClock};

use crate::check::{self, ErrorReporter};
use crate::file::ScopedFile;
use crate::format::str_format;
use crate::fs;

/// Mode used when the caller doesn't pick one: start a fresh file.
pub const DEFAULT_MODE: &str = "w";

/// Last line written by every `FileLogger`.
pub const CLOSING_LINE: &str = "Closing the log.";

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::NoopLogger {}
    impl Sealed for super::HostLogger {}
    impl<C: filelog_traits::Clock> Sealed for super::FileLogger<C> {}
    impl<L: Sealed + ?Sized> Sealed for &mut L {}
    impl<L: Sealed + ?Sized> Sealed for Box<L> {}
}

pub trait Logger: sealed::Sealed {
    /// Append one fully-formed line.
    fn print(&mut self, line: &str);

    /// Substitute `args` into `template` (see [`crate::format`]) and print
    /// the result.
    fn print_fmt(&mut self, template: &str, args: &[&dyn Display]) {
        self.print(&str_format(template, args));
    }
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn print(&mut self, line: &str) {
        (**self).print(line);
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn print(&mut self, line: &str) {
        (**self).print(line);
    }
}

/// `logf!(logger, "{} took {} ms", name, ms)` formats with the `{}` policy
/// of [`crate::format::str_format`] and prints through `logger`.
#[macro_export]
macro_rules! logf {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::logger::Logger as _;
        ($logger).print_fmt($template, &[$(&$arg as &dyn ::std::fmt::Display),*])
    }};
}

/// Path of the log file for `name` under `directory`.
pub fn log_path(directory: impl AsRef<Path>, name: &str) -> PathBuf {
    directory.as_ref().join(format!("log-{name}.txt"))
}

/// Logger backed by an exclusively-owned file. Every line is flushed before
/// `print` returns.
#[derive(Debug)]
pub struct FileLogger<C: Clock = LocalClock> {
    file: ScopedFile,
    name: String,
    clock: C,
}

impl FileLogger {
    /// Truncate-open `<directory>/log-<name>.txt`. Fatal if it cannot be opened.
    #[track_caller]
    pub fn new(directory: impl AsRef<Path>, name: &str) -> Self {
        Self::open(directory, name, DEFAULT_MODE)
    }

    /// Open with an explicit C-style mode (`"w"` or `"a"` in practice).
    #[track_caller]
    pub fn open(directory: impl AsRef<Path>, name: &str, mode: &str) -> Self {
        Self::open_with(directory, name, mode, &check::error_reporter())
    }

    #[track_caller]
    pub fn open_with(
        directory: impl AsRef<Path>,
        name: &str,
        mode: &str,
        reporter: &ErrorReporter,
    ) -> Self {
        FileLogger::with_clock(directory, name, mode, LocalClock::new(), reporter)
    }
}

impl<C: Clock> FileLogger<C> {
    /// Open with a caller-supplied clock for the timestamps.
    #[track_caller]
    pub fn with_clock(
        directory: impl AsRef<Path>,
        name: &str,
        mode: &str,
        clock: C,
        reporter: &ErrorReporter,
    ) -> Self {
        let path = log_path(directory, name);
        let file = ScopedFile::open_with(&path, mode, reporter);
        let mut logger = Self {
            file,
            name: name.to_string(),
            clock,
        };
        logger.print_fmt("{} started", &[&name]);
        logger
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl<C: Clock> Logger for FileLogger<C> {
    fn print(&mut self, line: &str) {
        let record = format!("[{}] {line}\n", self.clock.timestamp());
        let written = self.file.write(record.as_bytes());
        let flushed = self.file.flush();
        if !(written && flushed) {
            tracing::warn!(
                logger = %self.name,
                path = %self.file.path().display(),
                written,
                flushed,
                "log line not fully persisted"
            );
        }
    }
}

impl<C: Clock> Drop for FileLogger<C> {
    fn drop(&mut self) {
        self.print(CLOSING_LINE);
    }
}

/// Logger that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn print(&mut self, _line: &str) {}
}

/// Logger chosen at runtime from `[logger]` configuration.
#[derive(Debug)]
pub enum HostLogger {
    File(FileLogger),
    Noop(NoopLogger),
}

impl HostLogger {
    /// Build the configured logger. With `enabled = false` nothing touches
    /// the filesystem. With `create_dirs` the directory is created first; a
    /// failure there surfaces as the fatal open error that follows.
    #[track_caller]
    pub fn from_config(cfg: &LoggerCfg) -> Self {
        Self::from_config_with(cfg, &check::error_reporter())
    }

    #[track_caller]
    pub fn from_config_with(cfg: &LoggerCfg, reporter: &ErrorReporter) -> Self {
        if !cfg.enabled {
            return HostLogger::Noop(NoopLogger);
        }
        let directory = cfg
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(fs::tmp_dir()));
        if cfg.create_dirs && !fs::mkdirs(&directory.to_string_lossy(), cfg.dir_mode) {
            tracing::warn!(directory = %directory.display(), "could not create log directory");
        }
        HostLogger::File(FileLogger::open_with(
            &directory,
            &cfg.name,
            cfg.mode.as_mode_str(),
            reporter,
        ))
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, HostLogger::Noop(_))
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            HostLogger::File(f) => Some(f.path()),
            HostLogger::Noop(_) => None,
        }
    }
}

impl Logger for HostLogger {
    fn print(&mut self, line: &str) {
        match self {
            HostLogger::File(f) => f.print(line),
            HostLogger::Noop(n) => n.print(line),
        }
    }
}
