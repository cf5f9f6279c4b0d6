// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Roster Text Parser
//!
//! Parses the line-oriented roster file into a validated [`Roster`].
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Parse external text → Domain objects
//! - **Failure mode:** Fail-fast; one bad line rejects the whole roster
//!
//! # Roster Format
//!
//! ```text
//! 1 192.168.4.21:120.0,45.5
//! 2 192.168.4.22:8080:-30,10
//! ```
//!
//! `<id> <address>:<target_x>,<target_y>`. The target is split off at the
//! last `:`, so the address may carry a port.

use crate::domain::geometry::Vec2;
use crate::domain::robot::{RobotConfig, RobotId};
use crate::domain::roster::{Roster, RosterError};
use std::path::Path;

// ============================================================================
// Parser API
// ============================================================================

pub struct RosterParser;

impl RosterParser {
    /// Parse a roster, assigning `epsilon` as every robot's arrival tolerance
    pub fn parse_str(text: &str, epsilon: f64) -> Result<Roster, RosterError> {
        let robots = text
            .lines()
            .enumerate()
            .map(|(index, line)| Self::parse_line(index + 1, line, epsilon))
            .collect::<Result<Vec<_>, _>>()?;

        Roster::new(robots)
    }

    /// Parse a roster file
    pub fn parse_file<P: AsRef<Path>>(path: P, epsilon: f64) -> Result<Roster, RosterError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let roster = Self::parse_str(&text, epsilon)?;
        tracing::debug!("Parsed {} robots from roster {:?}", roster.len(), path);
        Ok(roster)
    }

    fn parse_line(line_no: usize, line: &str, epsilon: f64) -> Result<RobotConfig, RosterError> {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            return Err(RosterError::malformed(line_no, "blank line"));
        }

        let (name, position) = line
            .rsplit_once(':')
            .ok_or_else(|| RosterError::malformed(line_no, "expected '<id> <address>:<x>,<y>'"))?;

        let mut name_parts = name.split_whitespace();
        let (id, address) = match (name_parts.next(), name_parts.next(), name_parts.next()) {
            (Some(id), Some(address), None) => (id, address),
            _ => {
                return Err(RosterError::malformed(
                    line_no,
                    format!("expected '<id> <address>' before ':', got '{}'", name.trim()),
                ))
            }
        };

        let id: u32 = id
            .parse()
            .map_err(|_| RosterError::malformed(line_no, format!("invalid robot id '{}'", id)))?;

        let (x, y) = position
            .split_once(',')
            .ok_or_else(|| RosterError::malformed(line_no, "expected target '<x>,<y>'"))?;

        let target = Vec2::new(
            Self::parse_coordinate(line_no, "target_x", x)?,
            Self::parse_coordinate(line_no, "target_y", y)?,
        );

        Ok(RobotConfig::new(RobotId(id), address, target, epsilon))
    }

    fn parse_coordinate(line_no: usize, field: &str, raw: &str) -> Result<f64, RosterError> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| RosterError::malformed(line_no, format!("invalid {} '{}'", field, raw.trim())))?;

        if !value.is_finite() {
            return Err(RosterError::malformed(line_no, format!("{} must be finite", field)));
        }
        Ok(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
