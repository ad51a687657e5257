//! Append-only log files
//!
//! Log names are resolved under a storage root (`/lfs` on the board). Each
//! append opens the file with create+append, writes the whole record and
//! closes it again, so a record is never split across two writes.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use sensorhub_core::traits::{FileSink, IoErrorKind, SinkError};

/// Mount point of the board's log filesystem
pub const DEFAULT_STORAGE_ROOT: &str = "/lfs";

/// ENOSPC
const NO_SPACE: i32 = 28;

/// Log files under one storage root
#[derive(Debug, Clone)]
pub struct LogDirectory {
    root: PathBuf,
}

impl LogDirectory {
    /// Create a sink writing under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a log name
    ///
    /// Names must be relative and stay inside the root.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, SinkError> {
        let invalid = SinkError::Io(IoErrorKind::InvalidPath);
        if name.is_empty() {
            return Err(invalid);
        }
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(invalid);
        }
        Ok(self.root.join(relative))
    }
}

impl Default for LogDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_ROOT)
    }
}

impl FileSink for LogDirectory {
    fn append(&mut self, name: &str, record: &str) -> Result<(), SinkError> {
        let path = self.resolve(name)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error(&path, &e))?;
        file.write_all(record.as_bytes())
            .map_err(|e| io_error(&path, &e))?;
        log::trace!("appended {} bytes to {}", record.len(), path.display());
        Ok(())
    }
}

fn io_error(path: &Path, e: &io::Error) -> SinkError {
    log::debug!("{}: {}", path.display(), e);
    let kind = match e.kind() {
        io::ErrorKind::NotFound => IoErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
        _ if e.raw_os_error() == Some(NO_SPACE) => IoErrorKind::StorageFull,
        _ => IoErrorKind::WriteFailed,
    };
    SinkError::Io(kind)
}
