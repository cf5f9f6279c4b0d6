// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Heading Geometry
//!
//! Pure planar vector math used to steer a robot toward its target.
//!
//! Every cycle the agent builds two vectors from three points:
//!
//! - `v1`: the movement since the previous fix (`current − previous`), an
//!   estimate of the robot's heading.
//! - `v2`: the remaining leg (`target − current`), the desired bearing.
//!
//! The angle between them is the turn magnitude; comparing their absolute
//! angles (measured counter-clockwise from the +x axis) gives the direction.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Stateless functions, no I/O, no shared state

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Neg, Sub};

/// A point or displacement in the positioning system's plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude() == 0.0
    }

    /// Unit vector in the same direction, `None` for the zero vector.
    pub fn unit(&self) -> Option<Vec2> {
        let len = self.magnitude();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Vec2::new(self.x / len, self.y / len))
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Which way the robot must rotate to face its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnDirection::Left => write!(f, "left"),
            TurnDirection::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// One of the vectors has no length, so it has no direction.
    #[error("Vector {0} has zero length")]
    ZeroLength(Vec2),
}

/// Builds the heading vector (`prev → curr`) and the bearing vector (`curr → target`).
pub fn vectors(prev: Vec2, curr: Vec2, target: Vec2) -> (Vec2, Vec2) {
    (curr - prev, target - curr)
}

/// Angle of `(x, y)` measured counter-clockwise from the +x axis, in degrees, in `[0, 360)`.
///
/// The zero vector maps to `0.0`; callers that care must check for it first.
pub fn angle_from_origin(x: f64, y: f64) -> f64 {
    let degrees = y.atan2(x).to_degrees();
    let normalized = if degrees < 0.0 { degrees + 360.0 } else { degrees };
    // -1e-17 + 360.0 rounds to 360.0, and atan2 can yield -0.0
    if normalized >= 360.0 || normalized == 0.0 {
        0.0
    } else {
        normalized
    }
}

/// Unsigned angle between two vectors, in radians, in `[0, π]`.
pub fn angle_between(v1: Vec2, v2: Vec2) -> Result<f64, GeometryError> {
    let u1 = v1.unit().ok_or(GeometryError::ZeroLength(v1))?;
    let u2 = v2.unit().ok_or(GeometryError::ZeroLength(v2))?;

    // rounding can push the dot product of near-parallel unit vectors past ±1
    let cos = u1.dot(u2).clamp(-1.0, 1.0);
    Ok(cos.acos().clamp(0.0, PI))
}

/// Decides the rotation direction from the heading angle `angle1` to the
/// bearing angle `angle2`, both in degrees.
///
/// Plain magnitude comparison breaks across the 0°/360° seam, so the two
/// wrap-around quadrant pairs are checked before it.
pub fn turn_direction(angle1: f64, angle2: f64) -> TurnDirection {
    let first_quadrant = |a: f64| (0.0..=90.0).contains(&a);
    let fourth_quadrant = |a: f64| (270.0..=360.0).contains(&a);

    if first_quadrant(angle1) && fourth_quadrant(angle2) {
        TurnDirection::Right
    } else if first_quadrant(angle2) && fourth_quadrant(angle1) {
        TurnDirection::Left
    } else if angle1 > angle2 {
        TurnDirection::Right
    } else {
        TurnDirection::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_vectors() {
        let (v1, v2) = vectors(Vec2::new(1.0, 1.0), Vec2::new(3.0, 2.0), Vec2::new(10.0, -4.0));
        assert_eq!(v1, Vec2::new(2.0, 1.0));
        assert_eq!(v2, Vec2::new(7.0, -6.0));

        let (still, _) = vectors(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0), Vec2::ZERO);
        assert!(still.is_zero());
    }

    #[test]
    fn test_angle_from_origin_axes() {
        for scale in [0.001, 1.0, 250.0] {
            assert_close(angle_from_origin(scale, 0.0), 0.0);
            assert_close(angle_from_origin(0.0, scale), 90.0);
            assert_close(angle_from_origin(-scale, 0.0), 180.0);
            assert_close(angle_from_origin(0.0, -scale), 270.0);
        }
    }

    #[test]
    fn test_angle_from_origin_quadrants() {
        assert_close(angle_from_origin(1.0, 1.0), 45.0);
        assert_close(angle_from_origin(-1.0, 1.0), 135.0);
        assert_close(angle_from_origin(-1.0, -1.0), 225.0);
        assert_close(angle_from_origin(1.0, -1.0), 315.0);
        assert_close(angle_from_origin(1.0, -0.0), 0.0);
    }

    #[test]
    fn test_angle_from_origin_is_monotonic_around_circle() {
        let steps = 3600;
        let mut previous = -1.0;
        for i in 0..steps {
            let theta = (i as f64) * 2.0 * PI / steps as f64;
            let angle = angle_from_origin(theta.cos(), theta.sin());
            assert!((0.0..360.0).contains(&angle), "out of range: {angle}");
            assert!(angle > previous, "not increasing at step {i}: {previous} -> {angle}");
            assert!((angle - theta.to_degrees()).abs() < 1e-6);
            previous = angle;
        }
    }

    #[test]
    fn test_angle_between_self_and_opposite() {
        for v in [Vec2::new(3.0, 4.0), Vec2::new(-0.2, 7.5), Vec2::new(1e-3, -1e-3)] {
            assert_close(angle_between(v, v).unwrap(), 0.0);
            assert_close(angle_between(v, -v).unwrap(), PI);
        }
    }

    #[test]
    fn test_angle_between_right_angle() {
        let angle = angle_between(Vec2::new(2.0, 0.0), Vec2::new(0.0, -5.0)).unwrap();
        assert_close(angle, PI / 2.0);
    }

    #[test]
    fn test_angle_between_zero_vector_is_error() {
        let err = angle_between(Vec2::ZERO, Vec2::new(1.0, 0.0)).unwrap_err();
        assert_eq!(err, GeometryError::ZeroLength(Vec2::ZERO));
        assert!(angle_between(Vec2::new(1.0, 0.0), Vec2::ZERO).is_err());
    }

    #[test]
    fn test_turn_direction_plain_comparison() {
        assert_eq!(turn_direction(120.0, 45.0), TurnDirection::Right);
        assert_eq!(turn_direction(45.0, 120.0), TurnDirection::Left);
        assert_eq!(turn_direction(200.0, 260.0), TurnDirection::Left);
    }

    #[test]
    fn test_turn_direction_wraps_across_zero() {
        // heading just below the +x axis, target just above it
        assert_eq!(turn_direction(350.0, 10.0), TurnDirection::Left);
        assert_eq!(turn_direction(10.0, 350.0), TurnDirection::Right);
        assert_eq!(turn_direction(0.0, 270.0), TurnDirection::Right);
        assert_eq!(turn_direction(270.0, 90.0), TurnDirection::Left);
    }
}
