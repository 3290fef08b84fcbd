//! Filesystem and environment helpers.
//!
//! Each helper maps onto a single OS call and reports failure as `false` or
//! an empty string; none of them panic. Hosts use these to prepare
//! directories before constructing a `FileLogger`.

use std::path::Path;

/// Permission bits used when callers don't pass their own.
pub const DEFAULT_DIR_MODE: u32 = filelog_config::DEFAULT_DIR_MODE;

/// Does the file or directory exist?
pub fn exists(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path).is_ok()
}

/// Is it a directory? Follows symlinks.
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_dir())
}

/// Create a single directory. Fails if the parent is missing or `path` exists.
pub fn mkdir(path: impl AsRef<Path>, mode: u32) -> bool {
    let mut builder = std::fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path).is_ok()
}

/// Create `path` and every missing ancestor, in order.
///
/// The path is split on both `/` and `\`. A prefix that already exists as a
/// directory is accepted; a prefix that exists as anything else fails the
/// call, as does any failed creation. Calling it on an existing directory
/// returns true.
pub fn mkdirs(path: &str, mode: u32) -> bool {
    let boundaries = path
        .char_indices()
        .skip(1)
        .filter(|&(_, c)| c == '/' || c == '\\')
        .map(|(i, _)| i)
        .chain(std::iter::once(path.len()));
    for end in boundaries {
        let prefix = &path[..end];
        match std::fs::metadata(prefix) {
            Ok(m) if m.is_dir() => continue,
            Ok(_) => {
                tracing::debug!(prefix, "mkdirs: prefix exists and is not a directory");
                return false;
            }
            Err(_) => {
                if !mkdir(prefix, mode) {
                    tracing::debug!(prefix, "mkdirs: could not create prefix");
                    return false;
                }
            }
        }
    }
    true
}

/// Remove a file, or an empty directory.
pub fn remove(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if is_directory(path) {
        std::fs::remove_dir(path).is_ok()
    } else {
        std::fs::remove_file(path).is_ok()
    }
}

/// Canonical absolute path, or an empty string if it cannot be resolved.
pub fn real_path(path: impl AsRef<Path>) -> String {
    std::fs::canonicalize(path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Value of the environment variable `key`, or `default_value` when unset
/// or not valid unicode.
pub fn get_env(key: &str, default_value: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default_value.to_string())
}

/// `$TMPDIR`, falling back to `/tmp`.
pub fn tmp_dir() -> String {
    get_env("TMPDIR", "/tmp")
}
