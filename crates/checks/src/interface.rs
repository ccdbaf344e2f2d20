// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Network interface link state and error counter deltas
//!
//! Reads `class/net/<device>/...` under a sysfs root. An unreadable link
//! state fails the probe; every other attribute degrades to a warning.

use std::path::PathBuf;

use pk_core::{Metric, Probe, ProbeError, Warnings};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{read_integer, read_trimmed};

/// Counters remembered from the previous invocation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceState {
    pub previous_tx_errors: Option<u64>,
    pub previous_rx_errors: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct InterfaceCheck {
    device: String,
    sysfs: PathBuf,
}

impl InterfaceCheck {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            sysfs: PathBuf::from("/sys"),
        }
    }

    pub fn with_sysfs(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs = root.into();
        self
    }

    fn attribute(&self, name: &str) -> PathBuf {
        self.sysfs
            .join("class/net")
            .join(&self.device)
            .join(name)
    }

    fn counter(&self, name: &str) -> Result<u64, String> {
        let value = read_integer(&self.attribute(name)).map_err(|e| e.to_string())?;
        u64::try_from(value).map_err(|_| format!("negative counter [{}]", value))
    }
}

impl Probe for InterfaceCheck {
    type State = InterfaceState;

    fn probe(
        &mut self,
        state: &mut InterfaceState,
        warnings: &mut Warnings,
    ) -> Result<Vec<Metric>, ProbeError> {
        let link = read_trimmed(&self.attribute("operstate"))
            .map_err(|e| ProbeError::new(format!("could not determine link state ({})", e)))?;
        let mut metrics = vec![Metric::text("state", link.to_uppercase())];

        match read_integer(&self.attribute("speed")) {
            // Virtual links report -1
            Ok(speed) if speed >= 0 => metrics.push(Metric::numeric("speed", speed as f64, "M")),
            Ok(_) => {}
            Err(e) => warnings.push(format!("could not determine link speed ({})", e)),
        }

        match read_trimmed(&self.attribute("duplex")) {
            Ok(duplex) => metrics.push(Metric::text("duplex", duplex.to_uppercase())),
            Err(e) => warnings.push(format!("could not determine link duplex ({})", e)),
        }

        let counters = [
            (
                "errors_tx",
                "statistics/tx_errors",
                "transmit",
                &mut state.previous_tx_errors,
            ),
            (
                "errors_rx",
                "statistics/rx_errors",
                "receive",
                &mut state.previous_rx_errors,
            ),
        ];
        for (metric, file, label, previous) in counters {
            match self.counter(file) {
                Ok(current) => {
                    let delta = counter_delta(*previous, current, label, warnings);
                    debug!(device = %self.device, metric, current, delta, "counter read");
                    *previous = Some(current);
                    metrics.push(Metric::numeric(metric, delta as f64, "c"));
                }
                Err(e) => warnings.push(format!("could not determine {} errors ({})", label, e)),
            }
        }

        Ok(metrics)
    }
}

/// Growth since the previous reading; 0 on first run or after a reset
fn counter_delta(previous: Option<u64>, current: u64, label: &str, warnings: &mut Warnings) -> u64 {
    match previous {
        None => 0,
        Some(previous) if current >= previous => current - previous,
        Some(previous) => {
            warnings.push(format!(
                "{} error counter reset ({} -> {})",
                label, previous, current
            ));
            0
        }
    }
}

#[cfg(test)]
#[path = "interface_tests.rs"]
mod tests;
