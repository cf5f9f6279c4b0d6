// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `swarmpilot run` - drive the roster to completion
//!
//! Ctrl-C interrupts the control loop and sends STOP to every robot before exiting.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use swarmpilot_core::domain::command::CommandSink;
use swarmpilot_core::domain::swarm_config::{PositioningSourceKind, SwarmConfigManifest};
use swarmpilot_core::infrastructure::{positioning, HttpCommandSink, RecordingCommandSink};
use swarmpilot_swarm::application::{ControlSettings, SwarmController};
use swarmpilot_swarm::infrastructure::{SwarmEventBus, SwarmEventReceiver};
use swarmpilot_swarm::SwarmEvent;
use tracing::info;

#[derive(Args)]
pub struct RunArgs {
    /// Roster file (default: spec.roster from configuration)
    #[arg(short, long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Log commands instead of sending them to the robots
    #[arg(long)]
    dry_run: bool,

    /// Read positions from a replay file instead of the hedge device
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,
}

pub async fn execute(args: RunArgs, config_override: Option<PathBuf>) -> Result<()> {
    let mut config = SwarmConfigManifest::load_or_default(config_override)
        .context("Failed to load configuration")?;
    if let Some(replay) = args.replay {
        config.spec.positioning.source = PositioningSourceKind::Replay;
        config.spec.positioning.replay_file = Some(replay);
    }
    config
        .validate()
        .context("Configuration validation failed")?;

    let (roster_path, roster) = super::load_roster(args.roster, &config)?;
    info!("Loaded {} robots from {:?}", roster.len(), roster_path);

    let positions = positioning::from_config(&config.spec.positioning)
        .context("Failed to set up position source")?;
    let commands: Arc<dyn CommandSink> = if args.dry_run {
        println!("{}", "Dry run: commands are logged, not sent".yellow());
        Arc::new(RecordingCommandSink::new())
    } else {
        Arc::new(HttpCommandSink::from_config(&config.spec.commands)?)
    };

    let event_bus = SwarmEventBus::with_default_capacity();
    let mut controller = SwarmController::from_roster(
        roster,
        positions,
        commands,
        ControlSettings::from(&config.spec.control),
    )?
    .with_event_bus(event_bus.clone());

    let printer = tokio::spawn(print_events(event_bus.subscribe_swarm(controller.swarm_id())));

    println!(
        "{}",
        format!(
            "Swarm {} starting with {} robots",
            controller.swarm_id(),
            controller.swarm().len()
        )
        .bold()
    );

    let outcome = tokio::select! {
        result = controller.run() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    let result = match outcome {
        Some(Ok(summary)) => {
            println!(
                "{}",
                format!(
                    "✓ All robots arrived after {} cycles ({:.1}s)",
                    summary.cycles,
                    summary.elapsed.as_secs_f64()
                )
                .green()
            );
            Ok(())
        }
        Some(Err(e)) => Err(anyhow::Error::new(e).context("Swarm run failed")),
        None => {
            println!("{}", "Interrupted, stopping all robots".yellow());
            let delivered = controller.halt_all().await;
            println!(
                "STOP delivered to {}/{} robots",
                delivered,
                controller.swarm().len()
            );
            Ok(())
        }
    };

    printer.abort();
    result
}

async fn print_events(mut receiver: SwarmEventReceiver) {
    while let Ok(event) = receiver.recv().await {
        match event {
            SwarmEvent::RobotArrived {
                robot,
                target,
                cycle,
                ..
            } => {
                println!(
                    "{}",
                    format!("  ✓ Robot {} reached {} in cycle {}", robot, target, cycle).green()
                );
            }
            SwarmEvent::CycleCompleted {
                cycle,
                arrived,
                total,
                ..
            } => {
                println!("{}", format!("Cycle {}: {}/{} arrived", cycle, arrived, total).dimmed());
            }
            SwarmEvent::SwarmStarted { .. } | SwarmEvent::SwarmCompleted { .. } => {}
        }
    }
}
