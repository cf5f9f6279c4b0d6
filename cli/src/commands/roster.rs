// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Roster inspection commands
//!
//! Commands: validate, show

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum RosterCommand {
    /// Parse a roster and report the first malformed line
    Validate {
        /// Roster file (default: spec.roster from configuration)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print the robots and targets of a roster
    Show {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_command(command: RosterCommand, config_override: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_override)?;

    match command {
        RosterCommand::Validate { file } => {
            let (path, roster) = super::load_roster(file, &config)?;
            println!(
                "{}",
                format!("✓ Roster {} is valid ({} robots)", path.display(), roster.len()).green()
            );
        }
        RosterCommand::Show { file, json } => {
            let (path, roster) = super::load_roster(file, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&roster)?);
                return Ok(());
            }

            println!("{}", format!("Roster {}:", path.display()).bold());
            for robot in roster.robots() {
                println!(
                    "  {} {} → {} (±{})",
                    format!("#{}", robot.id).bold(),
                    robot.address,
                    robot.target,
                    robot.epsilon
                );
            }
        }
    }

    Ok(())
}
