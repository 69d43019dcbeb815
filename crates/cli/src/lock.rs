// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive access to the state directory.
//!
//! Commands that mutate the queue or caches, and `fieldkit run`, hold an
//! advisory lock on `<state_dir>/fieldkit.lock` so two processes never
//! rewrite the same stored lists concurrently.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::lock_path;
use crate::error::{Error, Result};

/// Held lock; released when dropped.
#[derive(Debug)]
pub struct StateLock {
    _file: File,
    path: PathBuf,
}

impl StateLock {
    /// Acquires the lock without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] if another process holds it.
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        fs::create_dir_all(state_dir)?;
        let path = lock_path(state_dir);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| Error::Locked(path.display().to_string()))?;

        tracing::debug!(path = %path.display(), "acquired state lock");
        Ok(StateLock { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
