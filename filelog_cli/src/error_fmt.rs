//! Human-readable error descriptions and structured JSON error formatting.

use filelog_core::FileError;
use serde_json::json;

/// Exit status for errors that are not fatal-check violations
/// (bad config, unreadable stdin, ...).
pub const ERROR_EXIT_CODE: i32 = 2;

/// Map an eyre::Report to a short explanation with a fix hint.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(fe) = err.downcast_ref::<FileError>() {
        return match fe {
            FileError::InvalidMode(m) => format!(
                "What happened: {m:?} is not a file mode.\nHow to fix: Use r, w or a, optionally followed by + and/or b."
            ),
            FileError::Open { path, .. } => format!(
                "What happened: {fe}.\nHow to fix: Check that {} exists and is writable.",
                path.parent().map_or_else(|| path.display().to_string(), |p| p.display().to_string())
            ),
        };
    }

    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();
    if lower.contains("logger.") || lower.contains("diagnostics.") || lower.contains("toml") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nHow to fix: Edit the TOML config and try again."
        );
    }
    if lower.contains("--name") {
        return format!("What happened: {msg}.\nHow to fix: Pass --name or set [logger].name.");
    }
    format!("Something went wrong: {msg}\nHow to fix: Re-run with --log-level=debug for details.")
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    json!({ "reason": "Error", "message": humanize(err) }).to_string()
}

/// Structured JSON for fatal-check violations when --json is enabled.
pub fn format_fatal_json(msg: &str) -> String {
    json!({ "reason": "Fatal", "message": msg }).to_string()
}
