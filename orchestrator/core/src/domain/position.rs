// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Position Source Domain Interface
//!
//! Absolute position fixes come from an external positioning system (an
//! ultrasonic beacon network in the field, a replay file on the bench).
//! Units and coordinate frame belong to that system and are consumed opaquely.
//!
//! Implementations live in `infrastructure/positioning/`.

use crate::domain::geometry::Vec2;
use crate::domain::robot::RobotId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A timestamped absolute position reading for one robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub robot: RobotId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Source-defined timestamp (milliseconds for the beacon system).
    pub timestamp: u64,
}

impl PositionFix {
    /// Planar projection used by the steering geometry.
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    #[error("Positioning system has not reported robot {0} yet")]
    NoFix(RobotId),

    #[error("Positioning system unavailable: {0}")]
    Unavailable(String),

    #[error("Positioning I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Polled on demand, one query per robot id.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Begin acquiring fixes. Called once before the first query.
    async fn start(&self) -> Result<(), PositionError> {
        Ok(())
    }

    /// Latest fix for `robot`.
    async fn fix(&self, robot: RobotId) -> Result<PositionFix, PositionError>;
}
