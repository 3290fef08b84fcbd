//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Keeps the non-blocking diagnostics writer alive; dropped to flush.
pub static LOG_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> =
    Mutex::new(None);
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Flush pending diagnostics. Called before any `process::exit`.
pub fn flush_diagnostics() {
    let guard = LOG_GUARD
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    drop(guard);
}

pub fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}

#[derive(Parser, Debug)]
#[command(
    name = "filelog",
    version,
    about = "Timestamped line logs and small file helpers"
)]
pub struct Cli {
    /// Path to config TOML ([logger] and [diagnostics] sections)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Diagnostics and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Diagnostics level (error|warn|info|debug|trace); overrides the config
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append messages to <dir>/log-<name>.txt (stdin lines when none are given)
    Write {
        /// Logger name; overrides [logger].name
        #[arg(long)]
        name: Option<String>,
        /// Directory for the log file; overrides [logger].directory
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Keep earlier content instead of truncating
        #[arg(long, action = ArgAction::SetTrue)]
        append: bool,
        /// Do not create the directory first; a missing directory is fatal
        #[arg(long, action = ArgAction::SetTrue)]
        no_create_dirs: bool,
        /// Treat MESSAGES as values for this `{}` template and log one line
        #[arg(long, value_name = "TEMPLATE")]
        template: Option<String>,
        /// Lines to log
        messages: Vec<String>,
    },
    /// Print a file's contents
    Cat { path: PathBuf },
    /// Create a directory and all missing parents
    Mkdirs {
        path: String,
        /// Octal permission bits for created directories
        #[arg(long, value_parser = parse_octal_mode, default_value = "755")]
        mode: u32,
    },
    /// Remove a file or an empty directory
    Rm { path: PathBuf },
    /// Print the canonical absolute path
    Realpath { path: PathBuf },
}

/// Accepts `755` or `0o755`.
pub fn parse_octal_mode(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    u32::from_str_radix(digits, 8)
        .ok()
        .filter(|m| *m <= 0o7777)
        .ok_or_else(|| format!("invalid octal mode {s:?}"))
}
