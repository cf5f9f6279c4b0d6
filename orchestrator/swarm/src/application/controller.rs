// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Swarm Controller
//!
//! Drives a [`Swarm`] from roster to completion.
//!
//! # Lifecycle
//!
//! 1. [`SwarmController::start`] starts the position source, waits for it to
//!    settle, primes every agent and sends one uniform FORWARD seed so each
//!    robot has a heading to correct.
//! 2. [`SwarmController::run_cycle`] runs every agent's `turn`, then every
//!    agent's `go`, in roster order.
//! 3. [`SwarmController::run`] repeats cycles until all agents have arrived.
//!
//! Every operation is awaited in order; there is no parallelism between agents.
//! The loop has no iteration cap and only the caller can interrupt it, usually
//! followed by [`SwarmController::halt_all`].

use crate::domain::agent::{GoOutcome, RobotAgent};
use crate::domain::events::SwarmEvent;
use crate::domain::swarm::{Swarm, SwarmId};
use crate::infrastructure::event_bus::SwarmEventBus;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use swarmpilot_core::domain::command::{CommandSink, MotionCommand};
use swarmpilot_core::domain::position::{PositionError, PositionSource};
use swarmpilot_core::domain::robot::RobotConfig;
use swarmpilot_core::domain::roster::{Roster, RosterError};
use swarmpilot_core::domain::swarm_config::ControlConfig;
use swarmpilot_core::infrastructure::RosterParser;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SwarmError {
    #[error("Cannot build a swarm from an empty roster")]
    EmptyRoster,

    #[error("Failed to start position source: {0}")]
    PositionSourceStart(#[source] PositionError),
}

/// Runtime knobs of the control loop, resolved from [`ControlConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSettings {
    pub forward_magnitude: f64,
    pub seed_magnitude: f64,
    pub startup_delay: Duration,
    pub cycle_interval: Duration,
}

impl From<&ControlConfig> for ControlSettings {
    fn from(config: &ControlConfig) -> Self {
        Self {
            forward_magnitude: config.forward_magnitude,
            seed_magnitude: config.seed_magnitude,
            startup_delay: Duration::from_millis(config.startup_delay_ms),
            cycle_interval: Duration::from_millis(config.cycle_interval_ms),
        }
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self::from(&ControlConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub arrived: usize,
    pub total: usize,
    pub all_arrived: bool,
    /// Agent operations that hit a position or transport failure this cycle.
    pub failures: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub swarm_id: SwarmId,
    pub cycles: u64,
    pub elapsed: Duration,
}

pub struct SwarmController {
    swarm: Swarm,
    positions: Arc<dyn PositionSource>,
    settings: ControlSettings,
    event_bus: Option<SwarmEventBus>,
    cycle: u64,
    started: bool,
}

impl SwarmController {
    /// Parse the roster at `path`; one malformed record fails the whole load.
    pub fn load_roster<P: AsRef<Path>>(path: P, epsilon: f64) -> Result<Roster, RosterError> {
        RosterParser::parse_file(path, epsilon)
    }

    /// Build one agent per robot, in the given order.
    pub fn new(
        robots: impl IntoIterator<Item = RobotConfig>,
        positions: Arc<dyn PositionSource>,
        commands: Arc<dyn CommandSink>,
        settings: ControlSettings,
    ) -> Result<Self, SwarmError> {
        let agents: Vec<RobotAgent> = robots
            .into_iter()
            .map(|config| {
                RobotAgent::new(
                    config,
                    positions.clone(),
                    commands.clone(),
                    settings.forward_magnitude,
                )
            })
            .collect();

        if agents.is_empty() {
            return Err(SwarmError::EmptyRoster);
        }

        Ok(Self {
            swarm: Swarm::new(agents),
            positions,
            settings,
            event_bus: None,
            cycle: 0,
            started: false,
        })
    }

    pub fn from_roster(
        roster: Roster,
        positions: Arc<dyn PositionSource>,
        commands: Arc<dyn CommandSink>,
        settings: ControlSettings,
    ) -> Result<Self, SwarmError> {
        Self::new(roster.into_robots(), positions, commands, settings)
    }

    pub fn with_event_bus(mut self, event_bus: SwarmEventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn swarm_id(&self) -> SwarmId {
        self.swarm.id
    }

    /// Number of completed cycles.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub async fn start(&mut self) -> Result<(), SwarmError> {
        let swarm_id = self.swarm.id;
        info!("Starting swarm {} with {} robots", swarm_id, self.swarm.len());

        self.positions
            .start()
            .await
            .map_err(SwarmError::PositionSourceStart)?;

        if !self.settings.startup_delay.is_zero() {
            debug!("Waiting {:?} for positioning to settle", self.settings.startup_delay);
            tokio::time::sleep(self.settings.startup_delay).await;
        }

        for agent in self.swarm.agents_mut() {
            if let Err(e) = agent.prime().await {
                warn!("Robot {}: no starting fix, first turn will hold heading: {}", agent.id(), e);
            }
        }

        let seed = MotionCommand::forward(self.settings.seed_magnitude);
        let mut unseeded = 0;
        for agent in self.swarm.agents() {
            if agent.send(seed).await.is_err() {
                unseeded += 1;
            }
        }
        if unseeded > 0 {
            warn!(
                "Swarm {}: {} of {} robots missed the seed move",
                swarm_id,
                unseeded,
                self.swarm.len()
            );
        }

        self.started = true;
        self.publish(SwarmEvent::SwarmStarted {
            swarm_id,
            robots: self.swarm.len(),
            started_at: Utc::now(),
        });
        Ok(())
    }

    /// One `turn` pass then one `go` pass over every agent.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let cycle = self.cycle + 1;
        let mut failures = 0;

        for agent in self.swarm.agents_mut() {
            if agent.turn().await.is_failure() {
                failures += 1;
            }
        }

        let mut newly_arrived = Vec::new();
        for agent in self.swarm.agents_mut() {
            match agent.go().await {
                GoOutcome::Arrived => newly_arrived.push((agent.id(), agent.config().target)),
                outcome if outcome.is_failure() => failures += 1,
                _ => {}
            }
        }

        self.cycle = cycle;
        let report = CycleReport {
            cycle,
            arrived: self.swarm.arrived_count(),
            total: self.swarm.len(),
            all_arrived: self.swarm.all_arrived(),
            failures,
        };

        for (robot, target) in newly_arrived {
            self.publish(SwarmEvent::RobotArrived {
                swarm_id: self.swarm.id,
                robot,
                target,
                cycle,
                arrived_at: Utc::now(),
            });
        }
        self.publish(SwarmEvent::CycleCompleted {
            swarm_id: self.swarm.id,
            cycle,
            arrived: report.arrived,
            total: report.total,
        });

        debug!(
            "Cycle {}: {}/{} arrived, {} failures",
            cycle, report.arrived, report.total, failures
        );
        report
    }

    /// Start (if needed) and cycle until every robot has arrived.
    pub async fn run(&mut self) -> Result<RunSummary, SwarmError> {
        let started_at = Instant::now();
        if !self.started {
            self.start().await?;
        }

        while !self.swarm.all_arrived() {
            let report = self.run_cycle().await;
            if report.all_arrived {
                break;
            }
            if !self.settings.cycle_interval.is_zero() {
                tokio::time::sleep(self.settings.cycle_interval).await;
            }
        }

        let summary = RunSummary {
            swarm_id: self.swarm.id,
            cycles: self.cycle,
            elapsed: started_at.elapsed(),
        };
        info!(
            "Swarm {} complete: {} robots arrived after {} cycles",
            summary.swarm_id,
            self.swarm.len(),
            summary.cycles
        );
        self.publish(SwarmEvent::SwarmCompleted {
            swarm_id: summary.swarm_id,
            cycles: summary.cycles,
            completed_at: Utc::now(),
        });
        Ok(summary)
    }

    /// Send STOP to every robot, arrived or not. Returns how many were delivered.
    pub async fn halt_all(&self) -> usize {
        warn!("Halting all {} robots of swarm {}", self.swarm.len(), self.swarm.id);
        let mut delivered = 0;
        for agent in self.swarm.agents() {
            if agent.stop().await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    fn publish(&self, event: SwarmEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}
