// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Robot Agent
//!
//! Per-robot steering state and the two per-cycle behaviours:
//!
//! - [`RobotAgent::turn`]: re-aim the robot at its target from the movement
//!   observed since the previous fix.
//! - [`RobotAgent::go`]: either declare arrival or nudge the robot forward.
//!
//! Collaborator failures never escape an agent: they are logged and reported
//! through [`TurnOutcome`] / [`GoOutcome`].
//!
//! # Invariants
//!
//! - `last_position` is written only by the owning agent, at most once per `turn`.
//! - The phase moves `Traveling → Arrived` once and never back.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swarmpilot_core::domain::command::{CommandError, CommandSink, MotionCommand};
use swarmpilot_core::domain::geometry::{self, GeometryError, TurnDirection, Vec2};
use swarmpilot_core::domain::position::{PositionError, PositionFix, PositionSource};
use swarmpilot_core::domain::robot::{RobotConfig, RobotId};
use tracing::{debug, info, warn};

/// Per-agent state machine. `Arrived` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    Traveling,
    Arrived,
}

/// Why a `turn` produced no TURN command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    /// No earlier fix to derive a heading from.
    NoPreviousFix,
    /// The robot did not move since the previous fix.
    Stationary,
    /// The robot sits exactly on its target.
    OnTarget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnOutcome {
    Turned { direction: TurnDirection, radians: f64 },
    HeldHeading(HoldReason),
    /// Agent already arrived; nothing fetched or sent.
    Skipped,
    PositionUnavailable,
    CommandFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoOutcome {
    Advanced,
    /// Arrived during this call.
    Arrived,
    AlreadyArrived,
    PositionUnavailable,
    CommandFailed,
}

impl TurnOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TurnOutcome::PositionUnavailable | TurnOutcome::CommandFailed)
    }
}

impl GoOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, GoOutcome::PositionUnavailable | GoOutcome::CommandFailed)
    }
}

pub struct RobotAgent {
    config: RobotConfig,
    positions: Arc<dyn PositionSource>,
    commands: Arc<dyn CommandSink>,
    forward_magnitude: f64,
    last_position: Option<Vec2>,
    last_timestamp: Option<u64>,
    phase: AgentPhase,
}

impl RobotAgent {
    pub fn new(
        config: RobotConfig,
        positions: Arc<dyn PositionSource>,
        commands: Arc<dyn CommandSink>,
        forward_magnitude: f64,
    ) -> Self {
        Self {
            config,
            positions,
            commands,
            forward_magnitude,
            last_position: None,
            last_timestamp: None,
            phase: AgentPhase::Traveling,
        }
    }

    pub fn id(&self) -> RobotId {
        self.config.id
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn is_arrived(&self) -> bool {
        self.phase == AgentPhase::Arrived
    }

    pub fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// Fetch a fresh fix for this robot without touching agent state.
    pub async fn refresh_position(&self) -> Result<PositionFix, PositionError> {
        self.positions.fix(self.config.id).await
    }

    /// Record the starting position so the first `turn` has a heading reference.
    pub async fn prime(&mut self) -> Result<PositionFix, PositionError> {
        let fix = self.refresh_position().await?;
        self.commit(&fix);
        debug!("Robot {} starts at {}", self.config.id, fix.planar());
        Ok(fix)
    }

    /// Compute the heading correction and send one TURN command.
    pub async fn turn(&mut self) -> TurnOutcome {
        if self.is_arrived() {
            return TurnOutcome::Skipped;
        }

        let fix = match self.refresh_position().await {
            Ok(fix) => fix,
            Err(e) => {
                warn!("Robot {}: no fix for turn, keeping stale position: {}", self.config.id, e);
                return TurnOutcome::PositionUnavailable;
            }
        };
        let current = fix.planar();

        let Some(previous) = self.last_position else {
            self.commit(&fix);
            return TurnOutcome::HeldHeading(HoldReason::NoPreviousFix);
        };

        let (heading, bearing) = geometry::vectors(previous, current, self.config.target);
        let radians = match geometry::angle_between(heading, bearing) {
            Ok(radians) => radians,
            Err(GeometryError::ZeroLength(_)) => {
                let reason = if heading.is_zero() {
                    HoldReason::Stationary
                } else {
                    HoldReason::OnTarget
                };
                debug!("Robot {} holds heading ({:?})", self.config.id, reason);
                self.commit(&fix);
                return TurnOutcome::HeldHeading(reason);
            }
        };

        let direction = geometry::turn_direction(
            geometry::angle_from_origin(heading.x, heading.y),
            geometry::angle_from_origin(bearing.x, bearing.y),
        );

        match self.send(MotionCommand::turn(direction, radians)).await {
            Ok(()) => {
                self.commit(&fix);
                TurnOutcome::Turned { direction, radians }
            }
            Err(_) => TurnOutcome::CommandFailed,
        }
    }

    /// Declare arrival, or send one FORWARD command.
    pub async fn go(&mut self) -> GoOutcome {
        if self.is_arrived() {
            return GoOutcome::AlreadyArrived;
        }

        let fix = match self.refresh_position().await {
            Ok(fix) => fix,
            Err(e) => {
                warn!("Robot {}: no fix for go: {}", self.config.id, e);
                return GoOutcome::PositionUnavailable;
            }
        };

        if self.config.has_arrived(fix.planar()) {
            self.phase = AgentPhase::Arrived;
            info!(
                "Robot {} arrived at {} (target {})",
                self.config.id,
                fix.planar(),
                self.config.target
            );
            return GoOutcome::Arrived;
        }

        match self.send(MotionCommand::forward(self.forward_magnitude)).await {
            Ok(()) => GoOutcome::Advanced,
            Err(_) => GoOutcome::CommandFailed,
        }
    }

    /// Emergency halt. Leaves the phase untouched.
    pub async fn stop(&self) -> Result<(), CommandError> {
        self.send(MotionCommand::Stop).await
    }

    pub async fn backward(&self) -> Result<(), CommandError> {
        self.send(MotionCommand::Backward).await
    }

    /// Deliver a command to this robot, logging transport failures.
    pub async fn send(&self, command: MotionCommand) -> Result<(), CommandError> {
        debug!("Robot {} <- {}", self.config.id, command);
        self.commands
            .send(&self.config.address, command)
            .await
            .inspect_err(|e| warn!("Robot {}: {} not delivered: {}", self.config.id, command, e))
    }

    fn commit(&mut self, fix: &PositionFix) {
        self.last_position = Some(fix.planar());
        self.last_timestamp = Some(fix.timestamp);
    }
}

impl std::fmt::Debug for RobotAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobotAgent")
            .field("config", &self.config)
            .field("last_position", &self.last_position)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use swarmpilot_core::infrastructure::positioning::ReplayPositionSource;
    use swarmpilot_core::infrastructure::RecordingCommandSink;

    const ADDR: &str = "10.0.0.1";

    fn agent(
        target: (f64, f64),
        fixes: &[(f64, f64)],
    ) -> (RobotAgent, Arc<ReplayPositionSource>, Arc<RecordingCommandSink>) {
        let positions =
            Arc::new(ReplayPositionSource::new().with_track(RobotId(1), fixes.iter().copied()));
        let commands = Arc::new(RecordingCommandSink::new());
        let config = RobotConfig::new(RobotId(1), ADDR, Vec2::new(target.0, target.1), 1.0);
        let agent = RobotAgent::new(config, positions.clone(), commands.clone(), 0.5);
        (agent, positions, commands)
    }

    #[tokio::test]
    async fn test_turn_left_toward_target() {
        // heading +x, target straight up from the current position
        let (mut agent, _, commands) = agent((1.0, 5.0), &[(0.0, 0.0), (1.0, 0.0)]);
        agent.prime().await.unwrap();

        match agent.turn().await {
            TurnOutcome::Turned { direction, radians } => {
                assert_eq!(direction, TurnDirection::Left);
                assert!((radians - FRAC_PI_2).abs() < 1e-9);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(agent.last_position(), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(commands.commands_for(ADDR).len(), 1);
    }

    #[tokio::test]
    async fn test_turn_right_toward_target() {
        let (mut agent, _, commands) = agent((1.0, -5.0), &[(0.0, 0.0), (1.0, 0.0)]);
        agent.prime().await.unwrap();

        assert!(matches!(
            agent.turn().await,
            TurnOutcome::Turned { direction: TurnDirection::Right, .. }
        ));
        assert_eq!(commands.commands()[0].command.query_pair().0, "TURN");
    }

    #[tokio::test]
    async fn test_turn_holds_heading_without_reference() {
        let (mut agent, _, commands) = agent((5.0, 5.0), &[(1.0, 1.0)]);

        assert_eq!(
            agent.turn().await,
            TurnOutcome::HeldHeading(HoldReason::NoPreviousFix)
        );
        // the fix is still committed so the next turn has a reference
        assert_eq!(agent.last_position(), Some(Vec2::new(1.0, 1.0)));

        assert_eq!(
            agent.turn().await,
            TurnOutcome::HeldHeading(HoldReason::Stationary)
        );
        assert!(commands.commands().is_empty());
    }

    #[tokio::test]
    async fn test_turn_holds_heading_on_target() {
        let (mut agent, _, commands) = agent((2.0, 0.0), &[(0.0, 0.0), (2.0, 0.0)]);
        agent.prime().await.unwrap();

        assert_eq!(
            agent.turn().await,
            TurnOutcome::HeldHeading(HoldReason::OnTarget)
        );
        assert!(commands.commands().is_empty());
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_previous_position() {
        let (mut agent, positions, commands) = agent((5.0, 5.0), &[(0.0, 0.0), (1.0, 0.0)]);
        agent.prime().await.unwrap();
        commands.mark_unreachable(ADDR);

        assert_eq!(agent.turn().await, TurnOutcome::CommandFailed);
        assert_eq!(agent.last_position(), Some(Vec2::new(0.0, 0.0)));

        positions.mark_unavailable(RobotId(1));
        assert_eq!(agent.turn().await, TurnOutcome::PositionUnavailable);
        assert_eq!(agent.last_position(), Some(Vec2::new(0.0, 0.0)));
    }

    #[tokio::test]
    async fn test_go_is_idempotent_after_arrival() {
        let (mut agent, positions, commands) = agent((10.0, 0.0), &[(5.0, 0.0), (9.5, 0.0)]);

        assert_eq!(agent.go().await, GoOutcome::Advanced);
        assert_eq!(agent.go().await, GoOutcome::Arrived);
        assert!(agent.is_arrived());
        let served = positions.served(RobotId(1));

        for _ in 0..3 {
            assert_eq!(agent.go().await, GoOutcome::AlreadyArrived);
            assert_eq!(agent.turn().await, TurnOutcome::Skipped);
        }

        assert_eq!(agent.phase(), AgentPhase::Arrived);
        assert_eq!(positions.served(RobotId(1)), served);
        assert_eq!(commands.commands_for(ADDR), vec![MotionCommand::forward(0.5)]);
    }

    #[tokio::test]
    async fn test_go_failures_do_not_arrive() {
        let (mut agent, positions, commands) = agent((10.0, 0.0), &[(0.0, 0.0)]);

        commands.mark_unreachable(ADDR);
        assert_eq!(agent.go().await, GoOutcome::CommandFailed);

        positions.mark_unavailable(RobotId(1));
        assert_eq!(agent.go().await, GoOutcome::PositionUnavailable);
        assert_eq!(agent.phase(), AgentPhase::Traveling);
    }

    #[tokio::test]
    async fn test_stop_does_not_change_phase() {
        let (mut agent, _, commands) = agent((0.0, 0.0), &[(0.0, 0.0)]);
        agent.stop().await.unwrap();
        assert_eq!(agent.phase(), AgentPhase::Traveling);

        assert_eq!(agent.go().await, GoOutcome::Arrived);
        agent.stop().await.unwrap();
        agent.backward().await.unwrap();
        assert_eq!(agent.phase(), AgentPhase::Arrived);
        assert_eq!(
            commands.commands_for(ADDR),
            vec![MotionCommand::Stop, MotionCommand::Stop, MotionCommand::Backward]
        );
    }
}
