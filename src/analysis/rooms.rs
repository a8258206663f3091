//! Room-grid path inference
//!
//! The study environment is a grid of rooms, each `3 m` wide (x) and `6 m`
//! deep (z), addressed by integer grid coordinates. Walking through a log
//! and classifying every sample's floor position yields which rooms were
//! visited, in what order, and how often they were re-entered.
//!
//! When the environment is built with portals the rooms are spread far
//! apart; every room centre is then scaled by [`PORTAL_SCALE`].

use serde::{Deserialize, Serialize};

use crate::session::MotionLog;

/// Width of a room along x (metres)
pub const ROOM_WIDTH: f32 = 3.0;

/// Depth of a room along z (metres)
pub const ROOM_DEPTH: f32 = 6.0;

/// Room centre multiplier for the portal layout
pub const PORTAL_SCALE: f32 = 100.0;

/// A named room at a grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    /// Grid column (x)
    pub column: i32,
    /// Grid row (z)
    pub row: i32,
}

impl Room {
    pub fn new(name: impl Into<String>, column: i32, row: i32) -> Self {
        Self {
            name: name.into(),
            column,
            row,
        }
    }

    /// World-space centre of the room on the floor plane
    pub fn centre(&self, portals: bool) -> (f32, f32) {
        let scale = if portals { PORTAL_SCALE } else { 1.0 };
        (
            self.column as f32 * ROOM_WIDTH * scale,
            self.row as f32 * ROOM_DEPTH * scale,
        )
    }

    /// Whether the floor point `(x, z)` lies strictly inside the room
    pub fn contains(&self, x: f32, z: f32, portals: bool) -> bool {
        let (cx, cz) = self.centre(portals);
        (x - cx).abs() < ROOM_WIDTH / 2.0 && (z - cz).abs() < ROOM_DEPTH / 2.0
    }
}

/// Set of rooms making up the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub rooms: Vec<Room>,
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self::museum()
    }
}

impl RoomLayout {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// The twenty-room study layout, from `Start` to `End`
    pub fn museum() -> Self {
        let rooms = [
            ("Start", 0, 0),
            ("Dinosaur", 0, 1),
            ("Egypt", 0, 2),
            ("Cherry Blossom", 1, 2),
            ("Clocks", -1, 3),
            ("Signs", 0, 3),
            ("Paintings", 1, 3),
            ("Volcano", -1, 4),
            ("Aquarium", 1, 4),
            ("Giant Ladybug", -1, 5),
            ("Sundial", 0, 5),
            ("Statues", 1, 5),
            ("Ice Cube", -1, 6),
            ("Mammoth", 0, 6),
            ("Pond", 1, 6),
            ("Pots", -1, 7),
            ("Bird Nest", 0, 7),
            ("Beach", -1, 8),
            ("Face", 0, 8),
            ("End", 0, 9),
        ];
        Self::new(
            rooms
                .iter()
                .map(|&(name, column, row)| Room::new(name, column, row))
                .collect(),
        )
    }

    /// First room containing the floor point `(x, z)`
    pub fn room_at(&self, x: f32, z: f32, portals: bool) -> Option<&Room> {
        self.rooms.iter().find(|r| r.contains(x, z, portals))
    }

    pub fn find(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }
}

/// Visits of one room during a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomVisit {
    pub name: String,
    /// Position of this room in first-visit order (0 = first room seen)
    pub order: usize,
    /// Global indices of the room changes that entered this room
    pub sequence: Vec<usize>,
    /// Seconds spent inside the room
    pub dwell_time: f32,
}

impl RoomVisit {
    /// Number of times the room was entered
    pub fn entries(&self) -> usize {
        self.sequence.len()
    }
}

/// Room-level summary of a recorded path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    /// Visited rooms in first-visit order
    pub visited: Vec<RoomVisit>,
    /// Rooms of the layout never entered
    pub unvisited: Vec<String>,
    /// Timestamp of the last sample
    pub total_time: f32,
    /// Samples that fell outside every room
    pub outside_samples: usize,
}

impl PathSummary {
    pub fn visit(&self, name: &str) -> Option<&RoomVisit> {
        self.visited.iter().find(|v| v.name == name)
    }

    /// Names of rooms in first-visit order
    pub fn visit_order(&self) -> Vec<&str> {
        self.visited.iter().map(|v| v.name.as_str()).collect()
    }
}

/// Classify every sample of `log` into rooms and summarise the path
pub fn infer_path(log: &MotionLog, layout: &RoomLayout, portals: bool) -> PathSummary {
    let mut summary = PathSummary::default();
    let mut last_room: Option<usize> = None;
    let mut last_time = 0.0f32;
    let mut room_changes = 0usize;

    for sample in log.samples() {
        // Time since the previous sample counts towards the room it was in
        if let Some(idx) = last_room {
            summary.visited[idx].dwell_time += sample.timestamp - last_time;
        }

        let current = layout
            .room_at(sample.position.x, sample.position.z, portals)
            .map(|room| {
                match summary.visited.iter().position(|v| v.name == room.name) {
                    Some(idx) => idx,
                    None => {
                        summary.visited.push(RoomVisit {
                            name: room.name.clone(),
                            order: summary.visited.len(),
                            sequence: Vec::new(),
                            dwell_time: 0.0,
                        });
                        summary.visited.len() - 1
                    }
                }
            });

        if current.is_none() {
            summary.outside_samples += 1;
        }

        if current != last_room {
            if let Some(idx) = current {
                summary.visited[idx].sequence.push(room_changes);
            }
            room_changes += 1;
        }

        last_room = current;
        last_time = sample.timestamp;
    }

    if summary.outside_samples > 0 {
        tracing::warn!(
            "{} samples were outside every room",
            summary.outside_samples
        );
    }

    summary.total_time = last_time;
    summary.unvisited = layout
        .rooms
        .iter()
        .filter(|r| summary.visit(&r.name).is_none())
        .map(|r| r.name.clone())
        .collect();
    summary
}
