use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error_fmt;

use cli::{Cli, Commands, JSON_MODE, LOG_GUARD, flush_diagnostics, json_mode};
use commands::WriteOverrides;
use filelog_core::check::FATAL_EXIT_CODE;

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    if let Ok(mut slot) = LOG_GUARD.lock() {
        *slot = Some(guard);
    }
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Route fatal-check violations through diagnostics before exiting.
fn install_fatal_handler() {
    filelog_core::set_error_handler(|msg| {
        tracing::error!(error = msg, "fatal error");
        flush_diagnostics();
        if json_mode() {
            println!("{}", error_fmt::format_fatal_json(msg));
        } else {
            eprintln!("Fatal Error: {msg}\n");
        }
        std::process::exit(FATAL_EXIT_CODE);
    });
}

fn run(cli: Cli) -> Result<i32> {
    let config = match cli.config.as_deref().map(filelog_config::load_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            let _ = JSON_MODE.set(cli.json);
            return Err(e);
        }
    };
    let json = cli.json || config.as_ref().is_some_and(|c| c.diagnostics.json);
    let _ = JSON_MODE.set(json);
    let level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.diagnostics.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_tracing(&level, json);
    install_fatal_handler();

    match cli.cmd {
        Commands::Write {
            name,
            dir,
            append,
            no_create_dirs,
            template,
            messages,
        } => {
            let cfg = commands::resolve_logger_cfg(
                config.as_ref(),
                WriteOverrides {
                    name,
                    dir,
                    append,
                    no_create_dirs,
                },
            )?;
            commands::run_write(&cfg, template.as_deref(), &messages, std::io::stdin().lock())
        }
        Commands::Cat { path } => commands::run_cat(&path, &mut std::io::stdout().lock()),
        Commands::Mkdirs { path, mode } => Ok(commands::run_mkdirs(&path, mode)),
        Commands::Rm { path } => Ok(commands::run_rm(&path)),
        Commands::Realpath { path } => commands::run_realpath(&path, &mut std::io::stdout().lock()),
    }
}

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            if json_mode() {
                println!("{}", error_fmt::format_error_json(&err));
            } else {
                eprintln!("{}", error_fmt::humanize(&err));
            }
            error_fmt::ERROR_EXIT_CODE
        }
    };
    flush_diagnostics();
    std::process::exit(code);
}
