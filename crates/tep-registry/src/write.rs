//! Atomic file writes
//!
//! Content goes to a temporary file in the destination directory and is
//! renamed into place once flushed, so no reader sees a truncated file.

use crate::error::{RegistryError, RegistryResult};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Overwrite policy for [`write_atomic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Replace an existing file (index)
    Replace,
    /// Fail with [`RegistryError::TargetExists`] (documents)
    Refuse,
}

/// Write `contents` to `path` atomically
pub fn write_atomic(path: &Path, contents: &str, overwrite: Overwrite) -> RegistryResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if overwrite == Overwrite::Refuse && path.exists() {
        return Err(RegistryError::TargetExists(path.to_path_buf()));
    }

    let mut file = NamedTempFile::new_in(dir).map_err(|e| RegistryError::io_error(dir, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| RegistryError::io_error(file.path(), e))?;

    let persisted = match overwrite {
        Overwrite::Replace => file.persist(path),
        Overwrite::Refuse => file.persist_noclobber(path),
    };
    persisted.map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            RegistryError::TargetExists(path.to_path_buf())
        } else {
            RegistryError::io_error(path, e.error)
        }
    })?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}
