// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Application Layer
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates agents through startup, control cycles and halt

pub mod controller;

pub use controller::{ControlSettings, CycleReport, RunSummary, SwarmController, SwarmError};
