// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System load averages from `<proc>/loadavg`

use std::path::PathBuf;
use std::thread;

use pk_core::{Metric, Probe, ProbeError, Warnings};

use crate::read_trimmed;

const WINDOWS: [&str; 3] = ["load1", "load5", "load15"];

#[derive(Clone, Debug)]
pub struct LoadCheck {
    proc: PathBuf,
    per_cpu: bool,
}

impl Default for LoadCheck {
    fn default() -> Self {
        Self {
            proc: PathBuf::from("/proc"),
            per_cpu: false,
        }
    }
}

impl LoadCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proc(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc = root.into();
        self
    }

    /// Divide each average by the number of CPUs
    pub fn per_cpu(mut self, enabled: bool) -> Self {
        self.per_cpu = enabled;
        self
    }
}

impl Probe for LoadCheck {
    type State = ();

    fn probe(&mut self, _: &mut (), warnings: &mut Warnings) -> Result<Vec<Metric>, ProbeError> {
        let path = self.proc.join("loadavg");
        let raw = read_trimmed(&path).map_err(|e| {
            ProbeError::new(format!("could not read {} ({})", path.display(), e))
        })?;
        let averages = parse_loadavg(&raw)?;

        let divisor = if self.per_cpu {
            match thread::available_parallelism() {
                Ok(cpus) => cpus.get() as f64,
                Err(e) => {
                    warnings.push(format!("could not count CPUs ({}), reporting totals", e));
                    1.0
                }
            }
        } else {
            1.0
        };

        Ok(WINDOWS
            .iter()
            .zip(averages)
            .map(|(name, value)| Metric::numeric(*name, value / divisor, ""))
            .collect())
    }
}

/// First three fields of a loadavg line
fn parse_loadavg(raw: &str) -> Result<[f64; 3], ProbeError> {
    let mut fields = raw.split_whitespace();
    let mut averages = [0.0; 3];
    for (slot, name) in averages.iter_mut().zip(WINDOWS) {
        let field = fields
            .next()
            .ok_or_else(|| ProbeError::new(format!("loadavg is missing {} [{}]", name, raw)))?;
        *slot = field.parse().map_err(|_| {
            ProbeError::new(format!("could not parse [{}] as {}", field, name))
        })?;
    }
    Ok(averages)
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
