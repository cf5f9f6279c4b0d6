// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Motion Commands
//!
//! Provides the command vocabulary understood by the robots' on-board web
//! server and the outbound port used to deliver it.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Command value objects and the `CommandSink` anti-corruption port
//!
//! Each command travels as a single query pair:
//!
//! | Command | Key | Value |
//! |---------|-----|-------|
//! | `Turn` | `TURN` | signed radians, positive turns left |
//! | `Forward` | `FORWARD` | magnitude |
//! | `Backward` | `BACKWARD` | `ON` |
//! | `Stop` | `STOP` | `ON` |

use crate::domain::geometry::TurnDirection;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MotionCommand {
    Turn { direction: TurnDirection, radians: f64 },
    Forward { magnitude: f64 },
    Backward,
    Stop,
}

impl MotionCommand {
    pub fn turn(direction: TurnDirection, radians: f64) -> Self {
        Self::Turn { direction, radians }
    }

    pub fn forward(magnitude: f64) -> Self {
        Self::Forward { magnitude }
    }

    /// The `(key, value)` query pair sent to the robot.
    pub fn query_pair(&self) -> (&'static str, String) {
        match self {
            MotionCommand::Turn { direction, radians } => {
                let signed = match direction {
                    TurnDirection::Left => radians.abs(),
                    TurnDirection::Right => -radians.abs(),
                };
                // never send "-0"
                let signed = if signed == 0.0 { 0.0 } else { signed };
                ("TURN", signed.to_string())
            }
            MotionCommand::Forward { magnitude } => ("FORWARD", magnitude.to_string()),
            MotionCommand::Backward => ("BACKWARD", "ON".to_string()),
            MotionCommand::Stop => ("STOP", "ON".to_string()),
        }
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, value) = self.query_pair();
        write!(f, "{}={}", key, value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Transport error sending to {address}: {message}")]
    Transport { address: String, message: String },

    #[error("Invalid robot address: {0}")]
    InvalidAddress(String),
}

/// Delivers commands to robots. Fire-and-forget: the robot's reply is not
/// interpreted, only failures to deliver are reported.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send(&self, address: &str, command: MotionCommand) -> Result<(), CommandError>;
}
