// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One check invocation from lock to verdict
//!
//! `run_persistent` acquires the key's lock, loads state, probes, saves state
//! and releases the lock. The guard is scoped, so every early return releases
//! it too.

use thiserror::Error;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, StateConfig};
use crate::guard::{Guard, GuardError};
use crate::key::PersistenceKey;
use crate::persistent::{PersistentResource, PersistentValue, ResourceError};
use crate::probe::{Metric, Probe, ProbeError, Warnings};
use crate::store::{Store, StoreError};

/// Fatal failures: the invocation cannot produce a verdict
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("lock error: {0}")]
    Lock(#[from] GuardError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    State(#[source] ResourceError),
}

/// What a probe produced, handed to the evaluator
#[derive(Debug)]
pub struct Outcome {
    pub metrics: Result<Vec<Metric>, ProbeError>,
    pub warnings: Warnings,
}

/// Rendered result of a check: one line of output and an exit status
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub output: String,
    pub exit_code: i32,
}

/// Turns probe outcomes into verdicts (thresholds, severity, formatting)
pub trait Evaluate {
    fn evaluate(&self, outcome: &Outcome) -> Verdict;
}

/// Runs checks against a store under per-key locks
pub struct Coordinator<C: Clock = SystemClock> {
    config: StateConfig,
    store: Store,
    clock: C,
}

impl Coordinator<SystemClock> {
    pub fn new(config: StateConfig) -> Result<Self, CoordinatorError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Coordinator<C> {
    pub fn with_clock(config: StateConfig, clock: C) -> Result<Self, CoordinatorError> {
        let store = Store::open(&config.store_dir)?;
        Ok(Self {
            config,
            store,
            clock,
        })
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Persistence key for `check` in this coordinator's namespace
    pub fn key(&self, check: &str, discriminator: &str) -> PersistenceKey {
        PersistenceKey::derive(&self.config.namespace, check, discriminator)
    }

    /// Run a check whose state persists under `key`
    ///
    /// Lock timeouts and store failures are returned as errors. A failing
    /// probe is not an error here; the evaluator renders it.
    pub fn run_persistent<P, E>(
        &self,
        key: &PersistenceKey,
        probe: P,
        evaluator: &E,
    ) -> Result<Verdict, CoordinatorError>
    where
        P: Probe,
        E: Evaluate,
    {
        let names = key.resources(&self.config);
        let guard = Guard::acquire(&names.lock, &self.config.lock_policy(), &self.clock)?;
        debug!(%key, "running persistent check");

        let mut resource = PersistentResource::new(probe, PersistentValue::new(names.store));
        let verdict = self.collect_and_evaluate(&mut resource, evaluator)?;

        guard.release();
        Ok(verdict)
    }

    /// Run a check that keeps no state between invocations
    pub fn run<P, E>(&self, probe: P, evaluator: &E) -> Result<Verdict, CoordinatorError>
    where
        P: Probe,
        E: Evaluate,
    {
        let mut resource = PersistentResource::new(probe, PersistentValue::ephemeral());
        self.collect_and_evaluate(&mut resource, evaluator)
    }

    fn collect_and_evaluate<P, E>(
        &self,
        resource: &mut PersistentResource<P>,
        evaluator: &E,
    ) -> Result<Verdict, CoordinatorError>
    where
        P: Probe,
        E: Evaluate,
    {
        let mut warnings = Warnings::new();
        let metrics = match resource.collect(&self.store, &mut warnings) {
            Ok(metrics) => Ok(metrics),
            Err(e) if e.is_fatal() => return Err(CoordinatorError::State(e)),
            // Only probe failures remain; their message is the probe's own
            Err(e) => {
                debug!(error = %e, "probe failed");
                Err(ProbeError::new(e.to_string()))
            }
        };

        Ok(evaluator.evaluate(&Outcome { metrics, warnings }))
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
