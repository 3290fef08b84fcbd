//! Scoped file handle with C-style open modes.
//!
//! [`ScopedFile`] owns exactly one open file. It is move-only (no `Clone`),
//! buffers writes, and flushes then closes the file when dropped. Opening is
//! fatal on failure: the error goes to an [`ErrorReporter`]. Callers that
//! need to recover either check beforehand with the `fs` helpers or use
//! [`ScopedFile::try_open`].
//!
//! Read/write/seek report failure as `bool`/`Option` values and never panic.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::check::{self, ErrorReporter};
use crate::error::{FileError, Result};

/// Open mode, parsed from the C mode grammar: `r`, `w` or `a`, optionally
/// followed by `+` (update) and/or `b` (ignored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// `r`: read from an existing file
    Read,
    /// `w`: create or truncate, write only
    #[default]
    Write,
    /// `a`: create if missing, every write goes to the end
    Append,
    /// `r+`: read and write an existing file
    ReadUpdate,
    /// `w+`: create or truncate, read and write
    WriteUpdate,
    /// `a+`: create if missing, read anywhere, write at the end
    AppendUpdate,
}

impl OpenMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OpenMode::Read => "r",
            OpenMode::Write => "w",
            OpenMode::Append => "a",
            OpenMode::ReadUpdate => "r+",
            OpenMode::WriteUpdate => "w+",
            OpenMode::AppendUpdate => "a+",
        }
    }

    pub fn readable(self) -> bool {
        !matches!(self, OpenMode::Write | OpenMode::Append)
    }

    pub fn writable(self) -> bool {
        !matches!(self, OpenMode::Read)
    }

    fn options(self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        match self {
            OpenMode::Read => opts.read(true),
            OpenMode::Write => opts.write(true).create(true).truncate(true),
            OpenMode::Append => opts.append(true).create(true),
            OpenMode::ReadUpdate => opts.read(true).write(true),
            OpenMode::WriteUpdate => opts.read(true).write(true).create(true).truncate(true),
            OpenMode::AppendUpdate => opts.read(true).append(true).create(true),
        };
        opts
    }
}

impl FromStr for OpenMode {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FileError::InvalidMode(s.to_string());
        let mut chars = s.chars();
        let base = chars.next().ok_or_else(invalid)?;
        let (mut update, mut binary) = (false, false);
        for c in chars {
            match c {
                '+' if !update => update = true,
                'b' if !binary => binary = true,
                _ => return Err(invalid()),
            }
        }
        Ok(match (base, update) {
            ('r', false) => OpenMode::Read,
            ('w', false) => OpenMode::Write,
            ('a', false) => OpenMode::Append,
            ('r', true) => OpenMode::ReadUpdate,
            ('w', true) => OpenMode::WriteUpdate,
            ('a', true) => OpenMode::AppendUpdate,
            _ => return Err(invalid()),
        })
    }
}

/// Exclusively-owned open file. Flushed and closed on drop.
#[derive(Debug)]
pub struct ScopedFile {
    // `None` only after the file has been released.
    inner: Option<BufWriter<File>>,
    path: PathBuf,
    mode: OpenMode,
}

impl ScopedFile {
    /// Open `path` with a C-style `mode` string, reporting failure through
    /// the process error reporter. Does not return on failure.
    #[track_caller]
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Self {
        Self::open_with(path, mode, &check::error_reporter())
    }

    /// Same as [`ScopedFile::open`], reporting failure through `reporter`.
    #[track_caller]
    pub fn open_with(path: impl AsRef<Path>, mode: &str, reporter: &ErrorReporter) -> Self {
        match Self::try_open(path, mode) {
            Ok(file) => file,
            Err(e) => reporter.fatal(&format!(
                "{} CHECK_TRUE(file opened): {e}",
                std::panic::Location::caller()
            )),
        }
    }

    /// Fallible open used by [`ScopedFile::open`].
    pub fn try_open(path: impl AsRef<Path>, mode: &str) -> Result<Self> {
        let path = path.as_ref();
        let parsed: OpenMode = mode.parse()?;
        let file = parsed.options().open(path).map_err(|source| FileError::Open {
            path: path.to_path_buf(),
            mode: mode.to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), mode = parsed.as_str(), "file opened");
        Ok(Self {
            inner: Some(BufWriter::new(file)),
            path: path.to_path_buf(),
            mode: parsed,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Read up to `count` bytes from the cursor. Returns fewer at end of
    /// file, or whatever was read before an OS error. Empty on a handle
    /// opened write-only.
    pub fn read(&mut self, count: usize) -> Vec<u8> {
        let mut out = Vec::new();
        if !self.mode.readable() {
            return out;
        }
        let Some(w) = self.inner.as_mut() else {
            return out;
        };
        // Pending writes must reach the file before reading past them.
        if w.flush().is_err() {
            return out;
        }
        let file = w.get_mut();
        if let Err(e) = Read::by_ref(file).take(count as u64).read_to_end(&mut out) {
            tracing::debug!(path = %self.path.display(), error = %e, "short read");
        }
        out
    }

    /// Read the whole file from offset 0.
    pub fn read_all(&mut self) -> Vec<u8> {
        if !self.seek(0) {
            return Vec::new();
        }
        let len = self.length().unwrap_or(0);
        self.read(usize::try_from(len).unwrap_or(usize::MAX))
    }

    /// Write every byte. Returns false unless the full count was accepted.
    pub fn write(&mut self, bytes: &[u8]) -> bool {
        if !self.mode.writable() {
            return false;
        }
        match self.inner.as_mut() {
            Some(w) => w.write_all(bytes).is_ok(),
            None => false,
        }
    }

    /// Move the cursor to `offset` bytes from the start.
    pub fn seek(&mut self, offset: u64) -> bool {
        match self.inner.as_mut() {
            Some(w) => w.seek(SeekFrom::Start(offset)).is_ok(),
            None => false,
        }
    }

    /// Current offset from the start of the file.
    pub fn tell(&mut self) -> Option<u64> {
        self.inner.as_mut()?.stream_position().ok()
    }

    /// Total length in bytes. The cursor is left where it was.
    pub fn length(&mut self) -> Option<u64> {
        let w = self.inner.as_mut()?;
        let current = w.stream_position().ok()?;
        let end = w.seek(SeekFrom::End(0)).ok()?;
        w.seek(SeekFrom::Start(current)).ok()?;
        Some(end)
    }

    /// Push buffered bytes to the OS.
    pub fn flush(&mut self) -> bool {
        match self.inner.as_mut() {
            Some(w) => w.flush().is_ok(),
            None => false,
        }
    }

    /// Flush and close now, returning whether the flush succeeded.
    pub fn close(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        let Some(w) = self.inner.take() else {
            return true;
        };
        match w.into_inner() {
            Ok(file) => {
                drop(file);
                tracing::debug!(path = %self.path.display(), "file closed");
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e.error(),
                    "flush failed while closing; buffered bytes dropped"
                );
                false
            }
        }
    }
}

impl Drop for ScopedFile {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Read the file at `path`. Fatal if it cannot be opened.
#[track_caller]
pub fn read_contents_from_file(path: impl AsRef<Path>, mode: &str) -> Vec<u8> {
    ScopedFile::open(path, mode).read_all()
}

/// Write `contents` to the file at `path`. Fatal if it cannot be opened;
/// returns whether every byte was written and flushed.
#[track_caller]
pub fn write_contents_to_file(path: impl AsRef<Path>, mode: &str, contents: &[u8]) -> bool {
    let mut f = ScopedFile::open(path, mode);
    f.write(contents) && f.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("r", OpenMode::Read)]
    #[case("rb", OpenMode::Read)]
    #[case("w", OpenMode::Write)]
    #[case("wb", OpenMode::Write)]
    #[case("a", OpenMode::Append)]
    #[case("r+", OpenMode::ReadUpdate)]
    #[case("r+b", OpenMode::ReadUpdate)]
    #[case("rb+", OpenMode::ReadUpdate)]
    #[case("w+", OpenMode::WriteUpdate)]
    #[case("a+", OpenMode::AppendUpdate)]
    fn parses_c_modes(#[case] s: &str, #[case] want: OpenMode) {
        assert_eq!(s.parse::<OpenMode>().unwrap(), want);
    }

    #[rstest]
    #[case("")]
    #[case("x")]
    #[case("rw")]
    #[case("r++")]
    #[case("wbb")]
    #[case("+r")]
    fn rejects_other_modes(#[case] s: &str) {
        let err = s.parse::<OpenMode>().expect_err("invalid mode");
        assert!(matches!(err, FileError::InvalidMode(m) if m == s));
    }

    #[test]
    fn mode_capabilities() {
        assert!(OpenMode::Read.readable() && !OpenMode::Read.writable());
        assert!(!OpenMode::Append.readable() && OpenMode::Append.writable());
        assert!(OpenMode::WriteUpdate.readable() && OpenMode::WriteUpdate.writable());
        assert_eq!(OpenMode::default(), OpenMode::Write);
    }

    #[test]
    fn try_open_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScopedFile::try_open(dir.path().join("absent.txt"), "r").unwrap_err();
        assert!(matches!(err, FileError::Open { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn write_refused_on_read_only_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ro.txt");
        std::fs::write(&path, b"abc").unwrap();
        let mut f = ScopedFile::try_open(&path, "r").unwrap();
        assert!(!f.write(b"xyz"));
        assert_eq!(f.read_all(), b"abc");
    }

    #[test]
    fn read_refused_on_write_only_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wo.txt");
        let mut f = ScopedFile::try_open(&path, "ab").unwrap();
        assert_eq!(f.mode(), OpenMode::Append);
        assert!(f.write(b"abc"));
        assert!(f.read_all().is_empty());
        assert!(f.close());
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn flush_failure_is_reported_not_fatal() {
        let mut f = ScopedFile::try_open("/dev/full", "w").unwrap();
        assert!(f.write(b"x"));
        assert!(!f.flush());
        drop(f);

        let mut f = ScopedFile::try_open("/dev/full", "w").unwrap();
        assert!(f.write(b"x"));
        assert!(!f.close());
    }
}
