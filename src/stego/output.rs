// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Scoped output file.
//!
//! [`OutputFile`] writes into a temporary file next to the target and only
//! renames it into place on [`OutputFile::commit`]. Dropping the guard without
//! committing deletes the temporary, so an aborted encode or decode never
//! leaves a partial file behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Output file that exists at its target path only once committed.
pub struct OutputFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl OutputFile {
    /// Open a temporary file in the target's directory.
    pub fn create(target: impl AsRef<Path>) -> io::Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let temp = NamedTempFile::new_in(dir)?;
        Ok(Self { target, temp })
    }

    /// Append `data` to the uncommitted file.
    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.temp.write_all(data)
    }

    /// Flush and atomically move the file into place.
    pub fn commit(mut self) -> io::Result<PathBuf> {
        self.temp.flush()?;
        self.temp.as_file().sync_all()?;
        self.temp.persist(&self.target).map_err(|e| e.error)?;
        tracing::debug!(path = %self.target.display(), "output committed");
        Ok(self.target)
    }
}

/// Remove a file left at `target` by an earlier run. Missing files are fine.
pub fn discard_stale(target: &Path) {
    match fs::remove_file(target) {
        Ok(()) => tracing::debug!(path = %target.display(), "removed stale output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %target.display(), error = %e, "could not remove stale output"),
    }
}
