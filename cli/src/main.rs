// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # SwarmPilot CLI
//!
//! The `swarmpilot` binary drives a roster of robots to their targets.
//!
//! ## Commands
//!
//! - `swarmpilot run [--roster FILE] [--dry-run] [--replay FILE]` - Run the swarm until every robot arrives
//! - `swarmpilot stop [--roster FILE]` - Send STOP to every robot in the roster
//! - `swarmpilot roster validate|show` - Inspect a roster file
//! - `swarmpilot config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;

use commands::{ConfigCommand, RosterCommand, RunArgs, StopArgs};

/// SwarmPilot - Steer a swarm of robots to their targets
#[derive(Parser)]
#[command(name = "swarmpilot")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "SWARMPILOT_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SWARMPILOT_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the swarm until every robot has arrived
    #[command(name = "run")]
    Run(RunArgs),

    /// Emergency stop for every robot in the roster
    #[command(name = "stop")]
    Stop(StopArgs),

    /// Roster inspection
    #[command(name = "roster")]
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Run(args)) => commands::run::execute(args, cli.config).await,
        Some(Commands::Stop(args)) => commands::stop::execute(args, cli.config).await,
        Some(Commands::Roster { command }) => {
            commands::roster::handle_command(command, cli.config).await
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
