use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("invalid open mode {0:?} (expected r, w or a, optionally followed by + and/or b)")]
    InvalidMode(String),
    #[error("failed to open {} with mode {mode:?}: {source}", .path.display())]
    Open {
        path: PathBuf,
        mode: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FileError>;
