//! Core data types for motion-recorder
//!
//! This module contains the fundamental value types shared by recording,
//! persistence, playback and analysis.
//!
//! # Main Types
//!
//! - [`Vec3`] - A position in world space (metres)
//! - [`Quat`] - An orientation as a unit quaternion (`x, y, z, w`)
//! - [`Pose`] - Position plus orientation of the tracked target for one frame
//! - [`Sample`] - A pose stamped with the session-relative time it was observed
//! - [`SessionId`] - Operator-assigned integer identifying a recording
//!
//! All components are single precision, matching what the tracking runtime
//! hands over each frame.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation towards `other` by `t` in `[0, 1]`
    pub fn lerp(&self, other: &Vec3, t: f32) -> Vec3 {
        Vec3::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vec3::new(x, y, z)
    }
}

/// A rotation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Quat::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn dot(&self, other: &Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy, or identity for a degenerate quaternion
    pub fn normalized(&self) -> Quat {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return Quat::IDENTITY;
        }
        Quat::new(self.x / len, self.y / len, self.z / len, self.w / len)
    }

    /// Normalized linear interpolation along the shorter arc
    pub fn nlerp(&self, other: &Quat, t: f32) -> Quat {
        let sign = if self.dot(other) < 0.0 { -1.0 } else { 1.0 };
        Quat::new(
            self.x + (other.x * sign - self.x) * t,
            self.y + (other.y * sign - self.y) * t,
            self.z + (other.z * sign - self.z) * t,
            self.w + (other.w * sign - self.w) * t,
        )
        .normalized()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<[f32; 4]> for Quat {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Quat::new(x, y, z, w)
    }
}

/// Position and orientation of the tracked target
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// One timestamped pose observation
///
/// Samples are immutable once recorded; the timestamp is seconds since the
/// session started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f32,
    pub position: Vec3,
    pub orientation: Quat,
}

impl Sample {
    pub fn new(timestamp: f32, position: Vec3, orientation: Quat) -> Self {
        Self {
            timestamp,
            position,
            orientation,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    /// Check that every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite() && self.position.is_finite() && self.orientation.is_finite()
    }

    /// Component-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Sample, epsilon: f32) -> bool {
        let a = self.components();
        let b = other.components();
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= epsilon)
    }

    /// Flattened `[t, px, py, pz, qx, qy, qz, qw]`
    pub fn components(&self) -> [f32; 8] {
        let p = self.position;
        let q = self.orientation;
        [self.timestamp, p.x, p.y, p.z, q.x, q.y, q.z, q.w]
    }
}

/// Operator-assigned session identifier
///
/// `-1` marks a session whose id has not been set yet; nothing is ever
/// persisted under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(i32);

impl SessionId {
    pub const UNASSIGNED: SessionId = SessionId(-1);

    pub const fn new(id: i32) -> Self {
        SessionId(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self != SessionId::UNASSIGNED
    }

    /// Step the id by `delta`, as the operator does with the id buttons
    pub fn offset(self, delta: i32) -> SessionId {
        SessionId(self.0.saturating_add(delta))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        SessionId::UNASSIGNED
    }
}

impl From<i32> for SessionId {
    fn from(id: i32) -> Self {
        SessionId(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(SessionId)
    }
}
