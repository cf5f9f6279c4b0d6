// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use swarmpilot_core::domain::swarm_config::{
    PositioningSourceKind, SwarmConfigManifest, CONFIG_PATH_ENV,
};

const MINIMAL_TEMPLATE: &str = include_str!("../../templates/config-minimal.yaml");
const EXAMPLES_TEMPLATE: &str = include_str!("../../templates/config-with-examples.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./swarmpilot.yaml)
        #[arg(short, long, default_value = "./swarmpilot.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = SwarmConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./swarmpilot.yaml");
        println!("  4. ~/.swarmpilot/config.yaml");
        println!("  5. /etc/swarmpilot/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    match &config.spec.roster {
        Some(path) => println!("  Roster: {}", path.display()),
        None => println!("  Roster: {}", "(not set)".dimmed()),
    }
    println!();

    let positioning = &config.spec.positioning;
    println!("{}", "Positioning:".bold());
    match positioning.source {
        PositioningSourceKind::Hedge => {
            println!("  Source: hedge");
            println!("  Device: {}", positioning.device.display());
        }
        PositioningSourceKind::Replay => {
            println!("  Source: replay");
            if let Some(file) = &positioning.replay_file {
                println!("  Replay file: {}", file.display());
            }
        }
    }
    println!();

    let commands = &config.spec.commands;
    println!("{}", "Commands:".bold());
    println!("  User-Agent: {}", commands.user_agent);
    match commands.request_timeout_ms {
        Some(ms) => println!("  Request timeout: {} ms", ms),
        None => println!("  Request timeout: {}", "(none)".dimmed()),
    }
    println!();

    let control = &config.spec.control;
    println!("{}", "Control:".bold());
    println!("  Default epsilon: {}", control.default_epsilon);
    println!("  Forward magnitude: {}", control.forward_magnitude);
    println!("  Seed magnitude: {}", control.seed_magnitude);
    println!("  Startup delay: {} ms", control.startup_delay_ms);
    println!("  Cycle interval: {} ms", control.cycle_interval_ms);
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = SwarmConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        EXAMPLES_TEMPLATE
    } else {
        MINIMAL_TEMPLATE
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
