// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Aggregate
//!
//! - [`Swarm`]: aggregate root owning one [`RobotAgent`] per roster entry.
//! - [`SwarmId`]: unique identifier (UUID newtype) stamped on every event.
//!
//! # Invariants
//!
//! - Agent order is roster order and never changes; the control loop visits
//!   agents in this order every cycle.
//! - The swarm is complete exactly when every agent is `Arrived`.

use crate::domain::agent::RobotAgent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use swarmpilot_core::domain::robot::RobotId;
use uuid::Uuid;

/// Unique identifier for a [`Swarm`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwarmId(pub Uuid);

impl SwarmId {
    /// Generate a new random `SwarmId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SwarmId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SwarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct Swarm {
    pub id: SwarmId,
    agents: Vec<RobotAgent>,
    /// When the swarm was assembled from the roster.
    pub created_at: DateTime<Utc>,
}

impl Swarm {
    pub fn new(agents: Vec<RobotAgent>) -> Self {
        Self {
            id: SwarmId::new(),
            agents,
            created_at: Utc::now(),
        }
    }

    pub fn agents(&self) -> &[RobotAgent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [RobotAgent] {
        &mut self.agents
    }

    pub fn agent(&self, id: RobotId) -> Option<&RobotAgent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn arrived_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_arrived()).count()
    }

    /// AND over every agent's arrival flag.
    pub fn all_arrived(&self) -> bool {
        self.agents.iter().all(RobotAgent::is_arrived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use swarmpilot_core::domain::geometry::Vec2;
    use swarmpilot_core::domain::robot::RobotConfig;
    use swarmpilot_core::infrastructure::positioning::ReplayPositionSource;
    use swarmpilot_core::infrastructure::RecordingCommandSink;

    #[tokio::test]
    async fn test_all_arrived_tracks_every_agent() {
        let positions = Arc::new(
            ReplayPositionSource::new()
                .with_track(RobotId(1), [(0.0, 0.0)])
                .with_track(RobotId(2), [(0.0, 0.0)]),
        );
        let commands = Arc::new(RecordingCommandSink::new());
        let agents = [(1, 0.0), (2, 10.0)]
            .into_iter()
            .map(|(id, x)| {
                let config = RobotConfig::new(RobotId(id), format!("robot{id}"), Vec2::new(x, 0.0), 1.0);
                RobotAgent::new(config, positions.clone(), commands.clone(), 0.5)
            })
            .collect();

        let mut swarm = Swarm::new(agents);
        assert_eq!(swarm.len(), 2);
        assert!(!swarm.all_arrived());

        swarm.agents_mut()[0].go().await;
        assert_eq!(swarm.arrived_count(), 1);
        assert!(!swarm.all_arrived());
        assert!(swarm.agent(RobotId(1)).unwrap().is_arrived());
        assert!(!swarm.agent(RobotId(2)).unwrap().is_arrived());
    }
}
