// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `swarmpilot-core`
//!
//! Domain model and hardware adapters shared by the SwarmPilot crates.
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | geometry, roster, position and command ports, configuration |
//! | [`infrastructure`] | Infrastructure | roster parser, HTTP command sink, beacon and replay position sources |

pub mod domain;
pub mod infrastructure;

pub use domain::*;
