// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Types exchanged between checks and the core

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Value carried by a metric
#[derive(Clone, Debug, PartialEq)]
pub enum MetricValue {
    Numeric(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Numeric(value) => write!(f, "{}", value),
            MetricValue::Text(value) => write!(f, "{}", value),
        }
    }
}

/// One named measurement produced by a probe
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    /// Unit of measure, empty when dimensionless
    pub unit: String,
}

impl Metric {
    pub fn numeric(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Numeric(value),
            unit: unit.into(),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: MetricValue::Text(value.into()),
            unit: String::new(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            MetricValue::Numeric(value) => Some(value),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            MetricValue::Text(value) => Some(value),
            MetricValue::Numeric(_) => None,
        }
    }
}

/// Non-fatal problems noticed while probing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A check's own data collection failed
///
/// Never fatal to the process: it is reported through the evaluator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProbeError(pub String);

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Check-specific measurement routine
///
/// `state` is the value persisted for this check's key (or a default when
/// the check is not persistent). Mutations made to it are saved after the
/// probe returns, whether or not it succeeded.
pub trait Probe {
    type State: Serialize + DeserializeOwned + Default;

    fn probe(
        &mut self,
        state: &mut Self::State,
        warnings: &mut Warnings,
    ) -> Result<Vec<Metric>, ProbeError>;
}
