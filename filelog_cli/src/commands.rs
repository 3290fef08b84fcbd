//! Subcommand implementations. Each returns the process exit status.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::Path;

use eyre::{Result, WrapErr};
use filelog_config::{Config, LogMode, LoggerCfg};
use filelog_core::{HostLogger, Logger, ScopedFile, fs};

/// Flags of `write` that override the `[logger]` section.
#[derive(Debug, Default)]
pub struct WriteOverrides {
    pub name: Option<String>,
    pub dir: Option<std::path::PathBuf>,
    pub append: bool,
    pub no_create_dirs: bool,
}

/// Merge the config file's `[logger]` section with command-line flags.
pub fn resolve_logger_cfg(base: Option<&Config>, flags: WriteOverrides) -> Result<LoggerCfg> {
    let mut cfg = match (base, flags.name) {
        (_, Some(name)) => {
            let mut cfg = base.map_or_else(|| LoggerCfg::named(""), |c| c.logger.clone());
            cfg.name = name;
            cfg
        }
        (Some(c), None) => c.logger.clone(),
        (None, None) => eyre::bail!("missing --name (or [logger].name in --config)"),
    };
    if flags.dir.is_some() {
        cfg.directory = flags.dir;
    }
    if flags.append {
        cfg.mode = LogMode::Append;
    }
    if flags.no_create_dirs {
        cfg.create_dirs = false;
    }
    let merged = Config {
        logger: cfg,
        diagnostics: base.map(|c| c.diagnostics.clone()).unwrap_or_default(),
    };
    merged.validate()?;
    Ok(merged.logger)
}

pub fn run_write(
    cfg: &LoggerCfg,
    template: Option<&str>,
    messages: &[String],
    input: impl BufRead,
) -> Result<i32> {
    let mut logger = HostLogger::from_config(cfg);
    let mut lines = 0usize;
    if let Some(template) = template {
        let args: Vec<&dyn Display> = messages.iter().map(|m| m as &dyn Display).collect();
        logger.print_fmt(template, &args);
        lines = 1;
    } else if messages.is_empty() {
        for line in input.lines() {
            let line = line.wrap_err("failed to read a line from stdin")?;
            logger.print(&line);
            lines += 1;
        }
    } else {
        for m in messages {
            logger.print(m);
            lines += 1;
        }
    }
    tracing::info!(
        lines,
        path = %logger.path().map(|p| p.display().to_string()).unwrap_or_default(),
        "messages logged"
    );
    Ok(0)
}

pub fn run_cat(path: &Path, out: &mut impl Write) -> Result<i32> {
    let mut file = ScopedFile::try_open(path, "rb")?;
    let bytes = file.read_all();
    out.write_all(&bytes).wrap_err("failed to write to stdout")?;
    out.flush().wrap_err("failed to write to stdout")?;
    Ok(0)
}

pub fn run_mkdirs(path: &str, mode: u32) -> i32 {
    if fs::mkdirs(path, mode) {
        0
    } else {
        tracing::warn!(path, "mkdirs failed");
        1
    }
}

pub fn run_rm(path: &Path) -> i32 {
    if fs::remove(path) {
        0
    } else {
        tracing::warn!(path = %path.display(), "remove failed");
        1
    }
}

pub fn run_realpath(path: &Path, out: &mut impl Write) -> Result<i32> {
    let resolved = fs::real_path(path);
    if resolved.is_empty() {
        tracing::warn!(path = %path.display(), "cannot resolve path");
        return Ok(1);
    }
    writeln!(out, "{resolved}").wrap_err("failed to write to stdout")?;
    Ok(0)
}
