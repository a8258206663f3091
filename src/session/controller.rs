//! Operator-facing recorder
//!
//! [`Recorder`] ties a [`Session`] to a store and translates the discrete
//! control events of the input layer ([`RecorderCommand`]) into session
//! transitions, reporting the outcome as a [`Status`] for the display.
//! Id edits and forced saves are only honoured while the status display is
//! visible; start and stop are accepted at any time.

use std::fmt;

use crate::error::{RecorderError, Result};
use crate::frame_rate::FrameRateCounter;
use crate::store::SessionStore;
use crate::types::{Pose, SessionId};

use super::recorder::Session;
use super::types::SaveOutcome;

/// Discrete control events from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    /// Decrease the session id by one
    DecrementId,
    /// Increase the session id by one
    IncrementId,
    /// Begin recording
    Start,
    /// End recording and save
    Stop,
    /// Save right away, ending the recording
    ForceSave,
    /// Show or hide the status display
    ToggleDisplay,
}

/// Status message for the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Recording,
    Saved { id: SessionId, forced: bool },
    SaveFailed,
    Id(SessionId),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Recording => write!(f, "Recording..."),
            Status::Saved { id, forced: false } => write!(f, "Saved to ID: {}", id),
            Status::Saved { id, forced: true } => write!(f, "Saved to ID: {} (Forced)", id),
            Status::SaveFailed => write!(f, "Failed to Save"),
            Status::Id(id) => write!(f, "ID: {}", id),
        }
    }
}

impl From<SaveOutcome> for Status {
    fn from(outcome: SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Saved { id, forced } => Status::Saved { id, forced },
            SaveOutcome::AlreadySaved { id } => Status::Saved { id, forced: false },
        }
    }
}

/// A recording session driven by control events and per-frame ticks
#[derive(Debug)]
pub struct Recorder<S: SessionStore> {
    session: Session,
    store: S,
    display_visible: bool,
    status: Option<Status>,
    frame_rate: FrameRateCounter,
}

impl<S: SessionStore> Recorder<S> {
    pub fn new(store: S) -> Self {
        Self {
            session: Session::new(),
            store,
            display_visible: false,
            status: None,
            frame_rate: FrameRateCounter::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn display_visible(&self) -> bool {
        self.display_visible
    }

    /// Most recent status shown on the display
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Frames per second over the last completed second
    pub fn frame_rate(&self) -> Option<u32> {
        self.frame_rate.last_fps()
    }

    /// Per-frame update: record the target pose if recording
    pub fn tick(&mut self, dt: f32, pose: Pose) -> Result<()> {
        self.frame_rate.tick(dt);
        self.session.tick(dt, pose)
    }

    /// Apply a control event
    ///
    /// Returns the new status message, or `None` when the event changed
    /// nothing the display shows. Rejected transitions are logged and leave
    /// the session untouched.
    pub fn handle(&mut self, command: RecorderCommand) -> Option<Status> {
        let status = match command {
            RecorderCommand::ToggleDisplay => {
                self.display_visible = !self.display_visible;
                Ok(None)
            }
            RecorderCommand::Start => self.session.start().map(|_| Some(Status::Recording)),
            RecorderCommand::Stop => match self.session.stop(&mut self.store) {
                Ok(outcome) => Ok(Some(self.saved_status(outcome))),
                Err(e) => Self::save_error(e),
            },
            RecorderCommand::DecrementId | RecorderCommand::IncrementId
                if self.display_visible =>
            {
                let delta = if command == RecorderCommand::IncrementId {
                    1
                } else {
                    -1
                };
                self.session.adjust_id(delta).map(|id| Some(Status::Id(id)))
            }
            RecorderCommand::ForceSave if self.display_visible => {
                match self.session.save_forced(&mut self.store) {
                    Ok(outcome) => Ok(Some(self.saved_status(outcome))),
                    Err(e) => Self::save_error(e),
                }
            }
            _ => Ok(None),
        };

        match status {
            Ok(Some(status)) => {
                tracing::debug!("{:?} -> {}", command, status);
                self.status = Some(status.clone());
                Some(status)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Ignoring {:?}: {}", command, e);
                None
            }
        }
    }

    /// A repeated save reports how the stored copy was written
    fn saved_status(&self, outcome: SaveOutcome) -> Status {
        match outcome {
            SaveOutcome::AlreadySaved { id } => Status::Saved {
                id,
                forced: self.session.was_forced(),
            },
            saved => saved.into(),
        }
    }

    /// Failed saves are reported on the display; other errors are not
    fn save_error(err: RecorderError) -> Result<Option<Status>> {
        match err {
            RecorderError::InvalidState(_) => Err(err),
            other => {
                tracing::warn!("Failed to save session: {}", other);
                Ok(Some(Status::SaveFailed))
            }
        }
    }
}
