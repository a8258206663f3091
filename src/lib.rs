//! # motion-recorder: Pose motion-log recording for tracked VR objects
//!
//! Records the position and orientation of one tracked object on every frame
//! of a recording session and persists the result under an operator-assigned
//! integer id, so it can be reloaded for playback and analysis.
//!
//! ## Architecture
//!
//! - **Session**: [`MotionLog`] accumulation inside an explicit
//!   `Idle -> Recording -> StoppedUnsaved -> StoppedSaved` state machine
//! - **Store**: [`SessionStore`] trait with a durable file-backed store and an
//!   in-memory store
//! - **Control**: [`Recorder`] maps input events onto session transitions and
//!   produces status messages for a display
//! - **Analysis**: room-grid path inference over saved logs
//!
//! The recorder is driven by an external per-frame tick; nothing in this
//! crate spawns threads or timers.
//!
//! ## Example
//!
//! ```ignore
//! use motion_recorder::{
//!     store::{FileSessionStore, OverwritePolicy},
//!     Pose, Recorder, RecorderCommand,
//! };
//!
//! let store = FileSessionStore::open("sessions", OverwritePolicy::Reject)?;
//! let mut recorder = Recorder::new(store);
//!
//! recorder.handle(RecorderCommand::ToggleDisplay);
//! recorder.handle(RecorderCommand::IncrementId);
//! recorder.handle(RecorderCommand::Start);
//!
//! // every frame
//! recorder.tick(delta_time, Pose::new(position, rotation))?;
//!
//! if let Some(status) = recorder.handle(RecorderCommand::Stop) {
//!     println!("{}", status);
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod frame_rate;
pub mod session;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::RecorderConfig;
pub use error::{RecorderError, Result};
pub use session::{MotionLog, Recorder, RecorderCommand, Session, SessionPlayer, Status};
pub use store::{FileSessionStore, MemorySessionStore, OverwritePolicy, SessionStore};
pub use types::{Pose, Quat, Sample, SessionId, Vec3};
