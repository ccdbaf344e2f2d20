// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pk interface <name>` - Link state and error counter deltas

use std::path::PathBuf;

use clap::Args;
use pk_checks::{InterfaceCheck, Rule, Status, ThresholdEvaluator, ThresholdRange};
use pk_core::{Coordinator, CoordinatorError, Verdict};

#[derive(Args)]
pub struct InterfaceArgs {
    /// Interface name, e.g. eth0
    pub name: String,

    /// Errors per interval above which the check warns
    #[arg(short, long, default_value_t = 0.0)]
    pub warning: f64,

    /// Errors per interval above which the check is critical
    #[arg(short, long)]
    pub critical: Option<f64>,

    /// Link speed range in Mbit/s (Nagios syntax, e.g. `1000:`); warns when violated
    #[arg(short, long)]
    pub speed: Option<ThresholdRange>,

    /// Expected duplex mode (repeatable, e.g. half, full); warns on mismatch
    #[arg(short, long)]
    pub duplex: Vec<String>,

    /// Root of the sysfs tree
    #[arg(long, default_value = "/sys")]
    pub sysfs: PathBuf,
}

pub fn run(coordinator: &Coordinator, args: InterfaceArgs) -> Result<Verdict, CoordinatorError> {
    let mut evaluator = ThresholdEvaluator::new("interface")
        .with_rule(Rule::expect("state", &["UP"], Status::Critical))
        .with_rule(Rule::expect("duplex", &args.duplex, Status::Warning))
        .with_rule(Rule::upper("errors_tx", Some(args.warning), args.critical))
        .with_rule(Rule::upper("errors_rx", Some(args.warning), args.critical));
    if let Some(range) = args.speed {
        evaluator = evaluator.with_rule(Rule::within("speed", range, Status::Warning));
    }

    let key = coordinator.key("interface", &args.name);
    let check = InterfaceCheck::new(args.name).with_sysfs(args.sysfs);
    coordinator.run_persistent(&key, check, &evaluator)
}
