// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pk load` - System load averages

use std::path::PathBuf;

use clap::Args;
use pk_checks::{LoadCheck, Rule, ThresholdEvaluator};
use pk_core::{Coordinator, CoordinatorError, Verdict};

#[derive(Args)]
pub struct LoadArgs {
    /// Divide the averages by the number of CPUs
    #[arg(long)]
    pub per_cpu: bool,

    /// Load above which the check warns
    #[arg(short, long)]
    pub warning: Option<f64>,

    /// Load above which the check is critical
    #[arg(short, long)]
    pub critical: Option<f64>,

    /// Root of the procfs tree
    #[arg(long, default_value = "/proc")]
    pub proc: PathBuf,
}

pub fn run(coordinator: &Coordinator, args: LoadArgs) -> Result<Verdict, CoordinatorError> {
    let evaluator = ["load1", "load5", "load15"]
        .into_iter()
        .fold(ThresholdEvaluator::new("load"), |evaluator, metric| {
            evaluator.with_rule(Rule::upper(metric, args.warning, args.critical))
        });

    let check = LoadCheck::new().with_proc(args.proc).per_cpu(args.per_cpu);
    coordinator.run(check, &evaluator)
}
