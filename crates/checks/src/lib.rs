// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pk-checks: monitoring checks built on pk-core

pub mod evaluate;
pub mod interface;
pub mod load;

pub use evaluate::{RangeError, Rule, Status, ThresholdEvaluator, ThresholdRange};
pub use interface::{InterfaceCheck, InterfaceState};
pub use load::LoadCheck;

use std::io;
use std::path::Path;
use thiserror::Error;

/// Failure reading a kernel-provided value
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("could not parse [{value}] as {kind}")]
    Parse { value: String, kind: &'static str },
}

/// Read a single-value file, trimmed
fn read_trimmed(path: &Path) -> Result<String, ReadError> {
    Ok(std::fs::read_to_string(path)?.trim().to_string())
}

fn read_integer(path: &Path) -> Result<i64, ReadError> {
    let raw = read_trimmed(path)?;
    raw.parse().map_err(|_| ReadError::Parse {
        value: raw,
        kind: "integer",
    })
}
