// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence keys and the resource names derived from them

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::StateConfig;

/// Canonical identifier for one logical check's durable state
///
/// Rendered as `<namespace>.<check>-<discriminator>`, lower-cased, with `%`,
/// path separators and NUL percent-encoded so it is usable as a file name and
/// distinct inputs keep distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PersistenceKey(String);

/// Concrete resources addressed by a persistence key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceNames {
    /// Name of the durable store region
    pub store: String,
    /// Path of the lock file
    pub lock: PathBuf,
}

impl PersistenceKey {
    pub fn derive(namespace: &str, check: &str, discriminator: &str) -> Self {
        let raw = format!("{}.{}-{}", namespace, check, discriminator).to_lowercase();
        let mut key = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '%' => key.push_str("%25"),
                '/' => key.push_str("%2f"),
                '\\' => key.push_str("%5c"),
                '\0' => key.push_str("%00"),
                c => key.push(c),
            }
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Store region name for this key
    pub fn store_name(&self) -> &str {
        &self.0
    }

    /// Lock file path for this key inside `lock_dir`
    pub fn lock_path(&self, lock_dir: &Path) -> PathBuf {
        lock_dir.join(format!(".{}.lock", self.0))
    }

    pub fn resources(&self, config: &StateConfig) -> ResourceNames {
        ResourceNames {
            store: self.store_name().to_string(),
            lock: self.lock_path(&config.lock_dir),
        }
    }
}

impl fmt::Display for PersistenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
