// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Replay Position Source
//!
//! Serves pre-recorded fix sequences, one per robot. Every query consumes the
//! next fix of that robot's track; the final fix is repeated forever once the
//! track runs out, as a parked robot would report.
//!
//! Used for bench runs without a beacon network (`positioning.source: replay`)
//! and as the deterministic position feed in controller tests.
//!
//! # File Format
//!
//! ```yaml
//! robots:
//!   - id: 1
//!     fixes:
//!       - { x: 0.0, y: 0.0 }
//!       - { x: 5.0, y: 0.0, z: 0.1 }
//! ```

use crate::domain::position::{PositionError, PositionFix, PositionSource};
use crate::domain::robot::RobotId;
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ReplayFile {
    robots: Vec<ReplayTrack>,
}

#[derive(Debug, Deserialize)]
struct ReplayTrack {
    id: u32,
    fixes: Vec<ReplayPoint>,
}

#[derive(Debug, Deserialize)]
struct ReplayPoint {
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
}

#[derive(Debug, Default)]
struct Track {
    pending: VecDeque<PositionFix>,
    served: u64,
}

#[derive(Default)]
pub struct ReplayPositionSource {
    tracks: Mutex<HashMap<RobotId, Track>>,
    unavailable: Mutex<HashSet<RobotId>>,
}

impl ReplayPositionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper appending planar fixes to `robot`'s track
    pub fn with_track(self, robot: RobotId, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        for (x, y) in points {
            self.push_fix(robot, x, y, 0.0);
        }
        self
    }

    /// Append one fix; its timestamp is its index in the track
    pub fn push_fix(&self, robot: RobotId, x: f64, y: f64, z: f64) {
        let mut tracks = self.tracks.lock();
        let track = tracks.entry(robot).or_default();
        let timestamp = track.served + track.pending.len() as u64;
        track.pending.push_back(PositionFix {
            robot,
            x,
            y,
            z,
            timestamp,
        });
    }

    /// Queries for `robot` fail until [`Self::mark_available`] is called
    pub fn mark_unavailable(&self, robot: RobotId) {
        self.unavailable.lock().insert(robot);
    }

    pub fn mark_available(&self, robot: RobotId) {
        self.unavailable.lock().remove(&robot);
    }

    /// Number of fixes handed out for `robot` so far
    pub fn served(&self, robot: RobotId) -> u64 {
        self.tracks.lock().get(&robot).map(|t| t.served).unwrap_or(0)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ReplayFile = serde_yaml::from_str(yaml).context("Failed to parse replay YAML")?;
        let source = Self::new();

        for track in file.robots {
            if track.fixes.is_empty() {
                anyhow::bail!("Replay track for robot {} has no fixes", track.id);
            }
            for point in track.fixes {
                source.push_fix(RobotId(track.id), point.x, point.y, point.z);
            }
        }

        Ok(source)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read replay file: {:?}", path.as_ref()))?;
        Self::from_yaml_str(&yaml)
    }
}

#[async_trait]
impl PositionSource for ReplayPositionSource {
    async fn fix(&self, robot: RobotId) -> Result<PositionFix, PositionError> {
        if self.unavailable.lock().contains(&robot) {
            return Err(PositionError::Unavailable(format!(
                "robot {} marked unavailable",
                robot
            )));
        }

        let mut tracks = self.tracks.lock();
        let track = tracks.get_mut(&robot).ok_or(PositionError::NoFix(robot))?;

        let next = if track.pending.len() > 1 {
            track.pending.pop_front()
        } else {
            track.pending.front().copied()
        };
        let fix = next.ok_or(PositionError::NoFix(robot))?;

        track.served += 1;
        Ok(fix)
    }
}
