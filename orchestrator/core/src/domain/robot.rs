// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Robot identity and per-robot mission configuration.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Immutable description of one roster entry

use crate::domain::geometry::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by the roster and the positioning system (the hedge address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(pub u32);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RobotId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// One robot of the swarm: where to reach it and where it must go.
///
/// Built once at startup from the roster and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    pub id: RobotId,
    /// Network address of the robot's command endpoint (`host` or `host:port`).
    pub address: String,
    pub target: Vec2,
    /// Arrival tolerance, applied independently on each axis.
    pub epsilon: f64,
}

impl RobotConfig {
    pub fn new(id: RobotId, address: impl Into<String>, target: Vec2, epsilon: f64) -> Self {
        Self {
            id,
            address: address.into(),
            target,
            epsilon,
        }
    }

    /// True when `position` lies strictly within `epsilon` of the target on both axes.
    pub fn has_arrived(&self, position: Vec2) -> bool {
        (position.x - self.target.x).abs() < self.epsilon
            && (position.y - self.target.y).abs() < self.epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_arrived_checks_each_axis() {
        let robot = RobotConfig::new(RobotId(1), "10.0.0.5", Vec2::new(10.0, 0.0), 1.0);

        assert!(robot.has_arrived(Vec2::new(9.5, 0.0)));
        assert!(robot.has_arrived(Vec2::new(10.9, -0.9)));
        assert!(!robot.has_arrived(Vec2::new(9.0, 0.0)));
        assert!(!robot.has_arrived(Vec2::new(10.0, 1.5)));
        // diagonal distance exceeds epsilon but each axis is inside
        assert!(robot.has_arrived(Vec2::new(10.8, 0.8)));
    }
}
