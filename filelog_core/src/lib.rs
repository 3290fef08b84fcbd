#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! File and logging utilities for a host application.
//!
//! ## Modules
//!
//! - **check**: process error reporter and the `check*!`/`dcheck*!` macros
//! - **file**: `ScopedFile`, a move-only buffered file that flushes and
//!   closes on drop; fatal on failed open
//! - **fs**: existence tests, `mkdirs`, removal, `real_path`, env lookup
//! - **format**: runtime `{}` substitution
//! - **logger**: `FileLogger`, `NoopLogger` and the config-driven `HostLogger`
//!
//! Everything is synchronous and single-owner; share an instance across
//! threads only behind an external lock.

pub mod check;
pub mod error;
pub mod file;
pub mod format;
pub mod fs;
pub mod logger;

pub use check::{ErrorReporter, fatal_error, set_error_handler};
pub use error::FileError;
pub use file::{OpenMode, ScopedFile};
pub use logger::{FileLogger, HostLogger, Logger, NoopLogger};
