#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the filelog host.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional except `[logger].name`.
//!
//! Example:
//! ```toml
//! [logger]
//! directory = "/var/tmp/game"
//! name = "worker1"
//! mode = "append"
//!
//! [diagnostics]
//! level = "debug"
//! ```
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use serde::Deserialize;

/// Default permission bits for directories created on behalf of the logger.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// How the backing log file is opened.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Start a fresh file (`"w"`)
    #[default]
    Truncate,
    /// Keep earlier content and add to the end (`"a"`)
    Append,
}

impl LogMode {
    /// The C-style mode string used to open the backing file.
    pub fn as_mode_str(self) -> &'static str {
        match self {
            LogMode::Truncate => "w",
            LogMode::Append => "a",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggerCfg {
    /// Directory holding `log-<name>.txt`; the temp dir when absent.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Logical logger name; also used in the file name.
    pub name: String,
    #[serde(default)]
    pub mode: LogMode,
    /// When false the host gets a logger that discards everything.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Create missing directories before opening the file.
    #[serde(default = "default_true")]
    pub create_dirs: bool,
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,
}

impl LoggerCfg {
    /// Logger config with defaults for everything but the name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            directory: None,
            name: name.into(),
            mode: LogMode::default(),
            enabled: true,
            create_dirs: true,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Diagnostics {
    /// "error" | "warn" | "info" | "debug" | "trace"
    pub level: String,
    /// Emit diagnostics as JSON lines
    pub json: bool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub logger: LoggerCfg,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

fn default_true() -> bool {
    true
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let cfg = load_toml(&text).wrap_err_with(|| format!("invalid TOML in {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        let name = self.logger.name.as_str();
        if name.trim().is_empty() {
            eyre::bail!("logger.name must not be empty");
        }
        if name.contains(['/', '\\']) {
            eyre::bail!("logger.name must not contain path separators");
        }
        if let Some(dir) = &self.logger.directory {
            if dir.as_os_str().is_empty() {
                eyre::bail!("logger.directory must not be empty when set");
            }
        }
        if self.logger.dir_mode > 0o7777 {
            eyre::bail!("logger.dir_mode must be a permission mask <= 0o7777");
        }
        if !LEVELS.contains(&self.diagnostics.level.to_ascii_lowercase().as_str()) {
            eyre::bail!(
                "diagnostics.level must be one of error|warn|info|debug|trace, got {:?}",
                self.diagnostics.level
            );
        }
        Ok(())
    }
}
