// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `swarmpilot stop` - send STOP to every robot in the roster

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use swarmpilot_core::domain::command::{CommandSink, MotionCommand};
use swarmpilot_core::infrastructure::HttpCommandSink;

#[derive(Args)]
pub struct StopArgs {
    /// Roster file (default: spec.roster from configuration)
    #[arg(short, long, value_name = "FILE")]
    roster: Option<PathBuf>,
}

pub async fn execute(args: StopArgs, config_override: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_override)?;
    let (_, roster) = super::load_roster(args.roster, &config)?;
    let sink = HttpCommandSink::from_config(&config.spec.commands)?;

    let mut failed = 0;
    for robot in roster.robots() {
        match sink.send(&robot.address, MotionCommand::Stop).await {
            Ok(()) => println!("  {} robot {} ({})", "✓".green(), robot.id, robot.address),
            Err(e) => {
                failed += 1;
                println!("  {} robot {}: {}", "✗".red(), robot.id, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("STOP not delivered to {} of {} robots", failed, roster.len());
    }
    println!("{}", "✓ All robots stopped".green());
    Ok(())
}
