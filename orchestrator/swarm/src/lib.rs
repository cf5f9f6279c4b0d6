// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `swarmpilot-swarm`: Robot Agents and the Swarm Control Loop
//!
//! Steers every robot of a roster toward its target by alternating heading
//! corrections (`turn`) and forward nudges (`go`) until all robots arrive.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `RobotAgent`, `Swarm`, `SwarmId`, `SwarmEvent` |
//! | [`application`] | Application | `SwarmController` run loop |
//! | [`infrastructure`] | Infrastructure | `SwarmEventBus` |
//!
//! ## Key Concepts
//!
//! - **Cycle**: one pass over all robots in roster order; each travelling robot
//!   gets one `turn` followed by one `go`.
//! - **Arrival**: a robot within `epsilon` of its target on both axes stops
//!   receiving commands for the rest of the run.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use domain::*;
