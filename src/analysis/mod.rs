//! Analysis module for recorded motion
//!
//! This module provides offline analysis over saved motion logs:
//! - Room-grid classification of floor positions
//! - Visit order, re-entry sequence and dwell time per room

pub mod rooms;

pub use rooms::{infer_path, PathSummary, Room, RoomLayout, RoomVisit};
