// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Probes wrapped with load-before and save-after persistence

use std::ops::{Deref, DerefMut};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::error;

use crate::probe::{Metric, Probe, ProbeError, Warnings};
use crate::store::{Store, StoreError};

/// A value bound to an optional store region
///
/// Without a store name, `load` and `save` do nothing.
#[derive(Clone, Debug, Default)]
pub struct PersistentValue<T> {
    name: Option<String>,
    value: T,
}

impl<T> PersistentValue<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Value persisted in the region `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: T::default(),
        }
    }

    /// Value that lives only for this invocation
    pub fn ephemeral() -> Self {
        Self {
            name: None,
            value: T::default(),
        }
    }

    pub fn load(&mut self, store: &Store) -> Result<(), StoreError> {
        match &self.name {
            Some(name) => store.load_into(name, &mut self.value).map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn save(&self, store: &Store) -> Result<(), StoreError> {
        match &self.name {
            Some(name) => store.save(name, &self.value),
            None => Ok(()),
        }
    }
}

impl<T> Deref for PersistentValue<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for PersistentValue<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("unable to load persistent data: {0}")]
    Load(#[source] StoreError),
    #[error("unable to store persistent data: {0}")]
    Save(#[source] StoreError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl ResourceError {
    /// Whether this error must abort the invocation
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ResourceError::Probe(_))
    }
}

/// A probe composed with the state it persists between invocations
pub struct PersistentResource<P: Probe> {
    probe: P,
    state: PersistentValue<P::State>,
}

impl<P: Probe> PersistentResource<P> {
    pub fn new(probe: P, state: PersistentValue<P::State>) -> Self {
        Self { probe, state }
    }

    /// Load state, run the probe, then save state
    ///
    /// Saving happens even when the probe fails, so partial progress is
    /// kept. A probe error takes precedence over a save error.
    pub fn collect(
        &mut self,
        store: &Store,
        warnings: &mut Warnings,
    ) -> Result<Vec<Metric>, ResourceError> {
        self.state.load(store).map_err(ResourceError::Load)?;

        let probed = self.probe.probe(&mut self.state, warnings);
        let saved = self.state.save(store);

        match (probed, saved) {
            (Ok(metrics), Ok(())) => Ok(metrics),
            (Ok(_), Err(e)) => Err(ResourceError::Save(e)),
            (Err(e), Ok(())) => Err(e.into()),
            (Err(probe), Err(save)) => {
                error!(error = %save, "failed to save state after probe error");
                Err(probe.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "persistent_tests.rs"]
mod tests;
