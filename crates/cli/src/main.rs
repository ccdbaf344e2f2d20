// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pk - monitoring checks with state kept between invocations

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{interface, load};
use pk_core::{Coordinator, StateConfig, Verdict};
use tracing::debug;

/// Exit status when no verdict could be produced
const FATAL_EXIT: u8 = 3;

#[derive(Parser)]
#[command(
    name = "pk",
    version,
    about = "Monitoring checks that remember their previous run"
)]
struct Cli {
    /// Log debug detail to stderr (overridden by PK_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link state and error counter growth of a network interface
    Interface(interface::InterfaceArgs),
    /// System load averages
    Load(load::LoadArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli.command) {
        Ok(verdict) => {
            println!("{}", verdict.output);
            ExitCode::from(u8::try_from(verdict.exit_code).unwrap_or(FATAL_EXIT))
        }
        Err(e) => {
            // Each error message already embeds its cause
            eprintln!("pk: {}", e);
            ExitCode::from(FATAL_EXIT)
        }
    }
}

fn run(command: Commands) -> Result<Verdict> {
    let config = StateConfig::from_env()?;
    debug!(?config, "configuration");
    let coordinator = Coordinator::new(config)?;

    let verdict = match command {
        Commands::Interface(args) => interface::run(&coordinator, args)?,
        Commands::Load(args) => load::run(&coordinator, args)?,
    };
    Ok(verdict)
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PK_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
