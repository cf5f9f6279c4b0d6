// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Roster
//!
//! The ordered list of robots a swarm run drives. Order is significant: the
//! controller processes agents in roster order every cycle.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Validated, immutable startup configuration

use crate::domain::robot::{RobotConfig, RobotId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Roster line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Roster line {line}: robot id {id} is listed more than once")]
    DuplicateId { line: usize, id: RobotId },

    #[error("Roster is empty")]
    Empty,

    #[error("Failed to read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RosterError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    robots: Vec<RobotConfig>,
}

impl Roster {
    /// Builds a roster, rejecting an empty list and repeated robot ids.
    pub fn new(robots: Vec<RobotConfig>) -> Result<Self, RosterError> {
        if robots.is_empty() {
            return Err(RosterError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, robot) in robots.iter().enumerate() {
            if !seen.insert(robot.id) {
                return Err(RosterError::DuplicateId {
                    line: index + 1,
                    id: robot.id,
                });
            }
        }

        Ok(Self { robots })
    }

    pub fn robots(&self) -> &[RobotConfig] {
        &self.robots
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn into_robots(self) -> Vec<RobotConfig> {
        self.robots
    }
}
