// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Domain Layer
//!
//! Robot agents and the swarm aggregate. Agents reach the outside world only
//! through the `PositionSource` and `CommandSink` ports from `swarmpilot-core`.
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`agent`] | `RobotAgent`, `AgentPhase`, `TurnOutcome`, `GoOutcome` |
//! | [`swarm`] | `Swarm`, `SwarmId` |
//! | [`events`] | `SwarmEvent` |

pub mod agent;
pub mod events;
pub mod swarm;

pub use agent::*;
pub use events::*;
pub use swarm::*;
