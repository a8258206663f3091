//! Motion recording and playback module
//!
//! This module provides the recording side of motion-recorder: an
//! append-only [`MotionLog`] of pose samples, the [`Session`] state machine
//! that owns it during capture, the operator-facing [`Recorder`] that maps
//! control events onto session transitions, and a [`SessionPlayer`] for
//! replaying saved logs.
//!
//! # Features
//!
//! - Record pose samples on every frame tick with session-relative timestamps
//! - Enforce time ordering and append-only growth of the log
//! - Save under an operator-assigned id, exactly once per session
//! - Play back logs at variable speed, seek and step through samples

pub mod controller;
pub mod player;
pub mod recorder;
pub mod types;

pub use controller::{Recorder, RecorderCommand, Status};
pub use player::{PlaybackState, SessionPlayer};
pub use recorder::Session;
pub use types::{MotionLog, SaveOutcome, SessionState};
