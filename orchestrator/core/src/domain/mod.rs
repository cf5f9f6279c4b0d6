// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # SwarmPilot Domain Layer
//!
//! Pure domain types for steering a robot swarm. Ports to the outside world
//! (`PositionSource`, `CommandSink`) are traits here; their adapters live in
//! [`crate::infrastructure`].
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`geometry`] | `Vec2`, `TurnDirection`, `vectors`, `angle_from_origin`, `angle_between`, `turn_direction` |
//! | [`robot`] | `RobotId`, `RobotConfig` |
//! | [`roster`] | `Roster`, `RosterError` |
//! | [`position`] | `PositionFix`, `PositionSource`, `PositionError` |
//! | [`command`] | `MotionCommand`, `CommandSink`, `CommandError` |
//! | [`swarm_config`] | `SwarmConfigManifest` |

pub mod geometry;
pub mod robot;
pub mod roster;
pub mod position;
pub mod command;
pub mod swarm_config;
