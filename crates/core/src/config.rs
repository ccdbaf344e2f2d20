// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for state persistence and lock policy

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::guard::LockPolicy;

/// Default namespace prefix for persistence keys
pub const DEFAULT_NAMESPACE: &str = "pk";

/// Default total time to wait for a contended lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Default delay between lock attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

const SHARED_MEMORY_DIR: &str = "/dev/shm";
const LOCK_DIR: &str = "/tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration for {var}: {value:?} ({source})")]
    InvalidDuration {
        var: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Where state lives and how long to fight over it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateConfig {
    /// Prefix for every persistence key
    pub namespace: String,
    /// Directory holding durable store regions
    pub store_dir: PathBuf,
    /// Directory holding lock files
    pub lock_dir: PathBuf,
    /// Give up acquiring a lock after this long
    pub lock_timeout: Duration,
    /// Pause between lock attempts
    pub retry_delay: Duration,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            store_dir: default_store_dir(),
            lock_dir: PathBuf::from(LOCK_DIR),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl StateConfig {
    /// Build config from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build config from an arbitrary variable lookup
    ///
    /// Recognized variables: `PK_NAMESPACE`, `PK_STORE_DIR`, `PK_LOCK_DIR`,
    /// `PK_LOCK_TIMEOUT` and `PK_LOCK_RETRY` (durations in humantime format,
    /// e.g. `10s` or `250ms`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(namespace) = non_empty(&lookup, "PK_NAMESPACE")? {
            config.namespace = namespace;
        }
        if let Some(dir) = non_empty(&lookup, "PK_STORE_DIR")? {
            config.store_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty(&lookup, "PK_LOCK_DIR")? {
            config.lock_dir = PathBuf::from(dir);
        }
        if let Some(timeout) = duration(&lookup, "PK_LOCK_TIMEOUT")? {
            config.lock_timeout = timeout;
        }
        if let Some(delay) = duration(&lookup, "PK_LOCK_RETRY")? {
            config.retry_delay = delay;
        }

        Ok(config)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lock_dir = dir.into();
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Lock retry policy derived from this config
    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy::new(self.lock_timeout, self.retry_delay)
    }
}

/// Prefer the shared-memory filesystem so state survives the process but not a reboot
fn default_store_dir() -> PathBuf {
    let shm = Path::new(SHARED_MEMORY_DIR);
    if shm.is_dir() {
        shm.to_path_buf()
    } else {
        std::env::temp_dir()
    }
}

fn non_empty<F>(lookup: &F, var: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
        other => Ok(other),
    }
}

fn duration<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = non_empty(lookup, var)? else {
        return Ok(None);
    };
    humantime::parse_duration(value.trim())
        .map(Some)
        .map_err(|source| ConfigError::InvalidDuration { var, value, source })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
