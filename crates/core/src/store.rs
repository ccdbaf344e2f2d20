// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable named regions holding one JSON value each
//!
//! Regions are plain files in a directory that outlives the process, by
//! default the shared-memory filesystem. Callers must hold the key's
//! [`Guard`](crate::guard::Guard) around load and save; the store itself does
//! no locking.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt state in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode state for {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid store name: {0:?}")]
    InvalidName(String),
}

/// Directory of durable store regions
#[derive(Clone, Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open a store rooted at the given directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Decode the region `name` into `target`
    ///
    /// The region is created if absent. An empty region leaves `target`
    /// untouched and returns `Ok(false)`.
    pub fn load_into<T: DeserializeOwned>(
        &self,
        name: &str,
        target: &mut T,
    ) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .mode(0o600)
            .open(&path)
            .map_err(io_err)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_err)?;

        if bytes.is_empty() {
            debug!(name, "no prior state");
            return Ok(false);
        }

        *target = serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: path.clone(),
            source,
        })?;
        debug!(name, bytes = bytes.len(), "state loaded");
        Ok(true)
    }

    /// Load the region `name`, or `T::default()` if it holds nothing yet
    pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StoreError> {
        let mut value = T::default();
        self.load_into(name, &mut value)?;
        Ok(value)
    }

    /// Replace the full contents of region `name` with `value`
    ///
    /// Writes to a sibling temporary file and renames it into place, so the
    /// region holds either the old value or the new one.
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        let json = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode {
            name: name.to_string(),
            source,
        })?;

        let tmp = self
            .root
            .join(format!(".{}.tmp-{}", name, std::process::id()));
        let write = || -> io::Result<()> {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        };

        if let Err(source) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io { path, source });
        }

        debug!(name, bytes = json.len(), "state saved");
        Ok(())
    }

    /// Whether region `name` holds a value
    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name)
            .ok()
            .and_then(|path| fs::metadata(path).ok())
            .is_some_and(|meta| meta.len() > 0)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
