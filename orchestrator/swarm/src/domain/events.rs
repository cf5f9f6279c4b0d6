// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Swarm lifecycle events published by the controller.

use crate::domain::swarm::SwarmId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swarmpilot_core::domain::geometry::Vec2;
use swarmpilot_core::domain::robot::RobotId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SwarmEvent {
    SwarmStarted {
        swarm_id: SwarmId,
        robots: usize,
        started_at: DateTime<Utc>,
    },
    RobotArrived {
        swarm_id: SwarmId,
        robot: RobotId,
        target: Vec2,
        cycle: u64,
        arrived_at: DateTime<Utc>,
    },
    CycleCompleted {
        swarm_id: SwarmId,
        cycle: u64,
        arrived: usize,
        total: usize,
    },
    SwarmCompleted {
        swarm_id: SwarmId,
        cycles: u64,
        completed_at: DateTime<Utc>,
    },
}

impl SwarmEvent {
    pub fn swarm_id(&self) -> SwarmId {
        match self {
            SwarmEvent::SwarmStarted { swarm_id, .. }
            | SwarmEvent::RobotArrived { swarm_id, .. }
            | SwarmEvent::CycleCompleted { swarm_id, .. }
            | SwarmEvent::SwarmCompleted { swarm_id, .. } => *swarm_id,
        }
    }
}
