// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-process mutual exclusion via advisory file locks
//!
//! A [`Guard`] holds an exclusive `flock` on a lock file for as long as it
//! lives. Dropping it (or calling [`Guard::release`]) unlinks the file and
//! unlocks, in that order. Because the file is unlinked while still locked, a
//! waiter that had opened the old file may win the lock on an orphaned inode;
//! acquisition therefore re-checks that the path still names the locked inode
//! and retries otherwise.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt};
use std::path::{Path, PathBuf};
use std::time::Duration;

use fs2::FileExt;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::clock::Clock;
use crate::config::{DEFAULT_LOCK_TIMEOUT, DEFAULT_RETRY_DELAY};

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("could not obtain lock {} after {attempts} attempts ({elapsed:?})", path.display())]
    Timeout {
        path: PathBuf,
        attempts: u32,
        elapsed: Duration,
    },
    #[error("lock file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How long to keep retrying a contended lock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockPolicy {
    /// Fail once this much time has elapsed since the first attempt
    pub timeout: Duration,
    /// Pause between attempts
    pub retry_delay: Duration,
}

impl LockPolicy {
    pub fn new(timeout: Duration, retry_delay: Duration) -> Self {
        Self {
            timeout,
            retry_delay,
        }
    }
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT, DEFAULT_RETRY_DELAY)
    }
}

/// An exclusive lock on a file path, released on drop
#[derive(Debug)]
pub struct Guard {
    // NOTE(lifetime): None once released
    file: Option<File>,
    path: PathBuf,
}

impl Guard {
    /// Acquire the lock at `path`, retrying contention until `policy.timeout`
    ///
    /// Only contention is retried. Failing to create or lock the file for any
    /// other reason returns immediately.
    pub fn acquire<C: Clock>(
        path: &Path,
        policy: &LockPolicy,
        clock: &C,
    ) -> Result<Self, GuardError> {
        let start = clock.now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            if let Some(guard) = Self::try_acquire(path)? {
                debug!(path = %path.display(), attempts, "lock acquired");
                return Ok(guard);
            }

            let elapsed = clock.now().duration_since(start);
            if elapsed > policy.timeout {
                return Err(GuardError::Timeout {
                    path: path.to_path_buf(),
                    attempts,
                    elapsed,
                });
            }

            trace!(path = %path.display(), attempts, "lock contended, retrying");
            clock.sleep(policy.retry_delay);
        }
    }

    /// Make a single non-blocking attempt; `Ok(None)` means contended
    pub fn try_acquire(path: &Path) -> Result<Option<Self>, GuardError> {
        let io_err = |source| GuardError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .mode(0o600)
            .open(path)
            .map_err(io_err)?;

        match file.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => return Ok(None),
            Err(e) => return Err(io_err(e)),
        }

        // The previous holder unlinked this inode after we opened it
        if !names_same_file(path, &file).map_err(io_err)? {
            trace!(path = %path.display(), "won lock on unlinked file");
            return Ok(None);
        }

        Ok(Some(Self {
            file: Some(file),
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock and remove the lock file
    pub fn release(mut self) {
        self.release_inner();
        debug!(path = %self.path.display(), "lock released");
    }

    fn release_inner(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };

        // Unlink before unlocking so waiters on this inode notice it is gone
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove lock file"),
        }

        if let Err(e) = FileExt::unlock(&file) {
            warn!(path = %self.path.display(), error = %e, "failed to unlock lock file");
        }
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        self.release_inner();
    }
}

fn names_same_file(path: &Path, file: &File) -> io::Result<bool> {
    let held = file.metadata()?;
    match fs::metadata(path) {
        Ok(current) => Ok(current.dev() == held.dev() && current.ino() == held.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
