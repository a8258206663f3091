//! Recording session state machine
//!
//! A [`Session`] owns one [`MotionLog`] and moves through
//! `Idle -> Recording -> StoppedUnsaved -> StoppedSaved`. Transitions that do
//! not apply to the current state are rejected with `InvalidState` instead of
//! being silently ignored. The store is passed in by the caller for every
//! persisting transition.

use crate::error::{RecorderError, Result};
use crate::store::SessionStore;
use crate::types::{Pose, Quat, SessionId, Vec3};

use super::types::{MotionLog, SaveOutcome, SessionState};

/// One recording session for a single tracked target
#[derive(Debug, Default)]
pub struct Session {
    /// Operator-assigned id (`UNASSIGNED` until set)
    id: SessionId,
    /// Current state
    state: SessionState,
    /// Samples recorded so far
    log: MotionLog,
    /// Seconds since recording started; zero until the first tick
    elapsed: f32,
    /// Whether the persisted copy came from a forced save
    forced: bool,
}

impl Session {
    /// Create an idle session with no id
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle session with a preassigned id
    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if recording
    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    pub fn is_saved(&self) -> bool {
        self.state.is_saved()
    }

    /// Get the recorded log
    pub fn log(&self) -> &MotionLog {
        &self.log
    }

    /// Seconds recorded so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether the saved copy was written by a forced save
    pub fn was_forced(&self) -> bool {
        self.forced
    }

    /// Whether any recording time has accumulated
    pub fn has_started(&self) -> bool {
        self.elapsed > 0.0 || !self.log.is_empty()
    }

    /// Start recording
    pub fn start(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(RecorderError::InvalidState(format!(
                "cannot start a session that is {}",
                self.state.display_name()
            )));
        }

        self.state = SessionState::Recording;
        tracing::info!("Session {} recording", self.id);
        Ok(())
    }

    /// Advance the session clock by `dt` seconds and record `pose`
    ///
    /// Does nothing unless recording.
    pub fn tick(&mut self, dt: f32, pose: Pose) -> Result<()> {
        if !self.is_recording() {
            return Ok(());
        }

        if !dt.is_finite() || dt < 0.0 {
            return Err(RecorderError::OutOfOrder {
                previous: self.elapsed,
                timestamp: self.elapsed + dt,
            });
        }

        let timestamp = self.elapsed + dt;
        self.log.append(timestamp, pose.position, pose.orientation)?;
        self.elapsed = timestamp;
        Ok(())
    }

    /// Record a sample at an explicit session time
    pub fn append(&mut self, timestamp: f32, position: Vec3, orientation: Quat) -> Result<()> {
        if !self.is_recording() {
            return Err(RecorderError::InvalidState(format!(
                "cannot append to a session that is {}",
                self.state.display_name()
            )));
        }

        self.log.append(timestamp, position, orientation)?;
        self.elapsed = timestamp;
        Ok(())
    }

    /// Set the session id
    pub fn set_id(&mut self, id: SessionId) -> Result<()> {
        if self.is_saved() {
            return Err(RecorderError::InvalidState(format!(
                "session already saved under id {}",
                self.id
            )));
        }

        self.id = id;
        tracing::debug!("Session id set to {}", id);
        Ok(())
    }

    /// Step the session id by `delta` and return the new id
    pub fn adjust_id(&mut self, delta: i32) -> Result<SessionId> {
        let id = self.id.offset(delta);
        self.set_id(id)?;
        Ok(id)
    }

    /// Stop recording and save the log
    ///
    /// The log is finalized even if the save fails; the session then stays
    /// `StoppedUnsaved` so the id can be fixed and [`Session::save`] retried.
    pub fn stop<S: SessionStore + ?Sized>(&mut self, store: &mut S) -> Result<SaveOutcome> {
        match self.state {
            SessionState::Recording => {
                self.finish();
                self.persist(store, false)
            }
            SessionState::StoppedSaved => Ok(SaveOutcome::AlreadySaved { id: self.id }),
            state => Err(RecorderError::InvalidState(format!(
                "cannot stop a session that is {}",
                state.display_name()
            ))),
        }
    }

    /// Save a stopped session
    pub fn save<S: SessionStore + ?Sized>(&mut self, store: &mut S) -> Result<SaveOutcome> {
        match self.state {
            SessionState::StoppedUnsaved => self.persist(store, false),
            SessionState::StoppedSaved => Ok(SaveOutcome::AlreadySaved { id: self.id }),
            state => Err(RecorderError::InvalidState(format!(
                "cannot save a session that is {}",
                state.display_name()
            ))),
        }
    }

    /// Save immediately, ending the recording if it is still running
    ///
    /// The recording only ends once the save succeeds; after a failure the
    /// session keeps its state and a running recording keeps growing.
    pub fn save_forced<S: SessionStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<SaveOutcome> {
        match self.state {
            SessionState::StoppedSaved => Ok(SaveOutcome::AlreadySaved { id: self.id }),
            SessionState::Recording | SessionState::StoppedUnsaved if self.has_started() => {
                self.persist(store, true)
            }
            state => Err(RecorderError::InvalidState(format!(
                "nothing recorded to save while {}",
                state.display_name()
            ))),
        }
    }

    /// Discard everything and return to `Idle` with no id
    pub fn reset(&mut self) {
        if self.state == SessionState::StoppedUnsaved && !self.log.is_empty() {
            tracing::warn!(
                "Discarding {} unsaved samples from session {}",
                self.log.len(),
                self.id
            );
        }
        *self = Self::new();
    }

    fn finish(&mut self) {
        if self.state == SessionState::Recording {
            self.log.finalize();
            self.state = SessionState::StoppedUnsaved;
            tracing::info!(
                "Session {} stopped after {:.2}s ({} samples)",
                self.id,
                self.elapsed,
                self.log.len()
            );
        }
    }

    fn persist<S: SessionStore + ?Sized>(
        &mut self,
        store: &mut S,
        forced: bool,
    ) -> Result<SaveOutcome> {
        if !self.id.is_assigned() {
            tracing::warn!("Cannot save session without an id");
            return Err(RecorderError::InvalidId(self.id));
        }

        store.save(self.id, &self.log)?;

        self.finish();
        self.state = SessionState::StoppedSaved;
        self.forced = forced;
        Ok(SaveOutcome::Saved {
            id: self.id,
            forced,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemorySessionStore, MockSessionStore, OverwritePolicy};

    fn pose(x: f32) -> Pose {
        Pose::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY)
    }

    #[test]
    fn test_session_lifecycle() {
        let mut store = MemorySessionStore::default();
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.start().unwrap();
        assert!(session.is_recording());

        session.tick(0.5, pose(0.0)).unwrap();
        session.tick(0.5, pose(1.0)).unwrap();
        assert_eq!(session.elapsed(), 1.0);
        assert_eq!(session.log().len(), 2);

        session.set_id(SessionId::new(3)).unwrap();
        let outcome = session.stop(&mut store).unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                id: SessionId::new(3),
                forced: false
            }
        );
        assert_eq!(session.state(), SessionState::StoppedSaved);
        assert_eq!(store.load(SessionId::new(3)).unwrap(), *session.log());
    }

    #[test]
    fn test_tick_is_noop_when_not_recording() {
        let mut session = Session::new();
        session.tick(0.1, pose(0.0)).unwrap();
        assert!(session.log().is_empty());
        assert_eq!(session.elapsed(), 0.0);
    }

    #[test]
    fn test_tick_rejects_negative_dt() {
        let mut session = Session::new();
        session.start().unwrap();
        session.tick(0.2, pose(0.0)).unwrap();
        assert!(matches!(
            session.tick(-0.1, pose(0.0)),
            Err(RecorderError::OutOfOrder { .. })
        ));
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut session = Session::new();
        session.start().unwrap();
        assert!(matches!(
            session.start(),
            Err(RecorderError::InvalidState(_))
        ));
    }

    #[test]
    fn test_append_requires_recording() {
        let mut session = Session::new();
        assert!(session.append(1.0, Vec3::ZERO, Quat::IDENTITY).is_err());
    }

    #[test]
    fn test_stop_without_id_stays_unsaved_and_can_retry() {
        let mut store = MemorySessionStore::default();
        let mut session = Session::new();
        session.start().unwrap();
        session.tick(0.1, pose(0.0)).unwrap();

        let err = session.stop(&mut store).unwrap_err();
        assert!(matches!(err, RecorderError::InvalidId(_)));
        assert_eq!(session.state(), SessionState::StoppedUnsaved);
        assert!(store.is_empty());

        session.adjust_id(1).unwrap();
        assert_eq!(session.id(), SessionId::new(0));
        session.save(&mut store).unwrap();
        assert!(session.is_saved());
    }

    #[test]
    fn test_second_save_is_noop() {
        let mut store = MockSessionStore::new();
        store.expect_save().times(1).returning(|_, _| Ok(()));

        let mut session = Session::with_id(SessionId::new(1));
        session.start().unwrap();
        session.tick(0.1, pose(0.0)).unwrap();

        session.stop(&mut store).unwrap();
        assert_eq!(
            session.save(&mut store).unwrap(),
            SaveOutcome::AlreadySaved {
                id: SessionId::new(1)
            }
        );
        assert_eq!(
            session.stop(&mut store).unwrap(),
            SaveOutcome::AlreadySaved {
                id: SessionId::new(1)
            }
        );
    }

    #[test]
    fn test_unassigned_id_never_reaches_store() {
        let mut store = MockSessionStore::new();
        store.expect_save().never();

        let mut session = Session::new();
        session.start().unwrap();
        session.tick(0.1, pose(0.0)).unwrap();
        assert!(matches!(
            session.save_forced(&mut store),
            Err(RecorderError::InvalidId(_))
        ));

        // The recording carries on
        assert!(session.is_recording());
        assert!(!session.log().is_finalized());
        session.tick(0.1, pose(1.0)).unwrap();
        assert_eq!(session.log().len(), 2);
    }

    #[test]
    fn test_failed_forced_save_keeps_recording() {
        let mut store = MockSessionStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|id, _| Err(RecorderError::AlreadyExists(id)));

        let mut session = Session::with_id(SessionId::new(4));
        session.start().unwrap();
        session.tick(0.1, pose(0.0)).unwrap();

        assert!(session.save_forced(&mut store).is_err());
        assert_eq!(session.state(), SessionState::Recording);
        session.tick(0.1, pose(1.0)).unwrap();
        assert_eq!(session.log().len(), 2);
    }

    #[test]
    fn test_io_failure_is_surfaced() {
        let mut store = MockSessionStore::new();
        store.expect_save().times(1).returning(|_, _| {
            Err(RecorderError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        });

        let mut session = Session::with_id(SessionId::new(2));
        session.start().unwrap();
        session.tick(0.1, pose(0.0)).unwrap();

        let err = session.stop(&mut store).unwrap_err();
        assert!(matches!(err, RecorderError::Io(_)));
        assert_eq!(session.state(), SessionState::StoppedUnsaved);
    }

    #[test]
    fn test_forced_save_ends_recording() {
        let mut store = MemorySessionStore::default();
        let mut session = Session::with_id(SessionId::new(8));
        session.start().unwrap();
        session.tick(0.1, pose(0.0)).unwrap();

        let outcome = session.save_forced(&mut store).unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                id: SessionId::new(8),
                forced: true
            }
        );
        assert!(session.was_forced());
        assert!(session.log().is_finalized());
        assert!(session.tick(0.1, pose(1.0)).is_ok());
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_forced_save_requires_started_recording() {
        let mut store = MemorySessionStore::default();
        let mut session = Session::with_id(SessionId::new(8));
        assert!(session.save_forced(&mut store).is_err());
        session.start().unwrap();
        assert!(session.save_forced(&mut store).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_id_locked_after_save() {
        let mut store = MemorySessionStore::new(OverwritePolicy::Replace);
        let mut session = Session::with_id(SessionId::new(1));
        session.start().unwrap();
        session.tick(0.1, pose(0.0)).unwrap();
        session.stop(&mut store).unwrap();

        assert!(matches!(
            session.adjust_id(1),
            Err(RecorderError::InvalidState(_))
        ));
        assert_eq!(session.id(), SessionId::new(1));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = Session::with_id(SessionId::new(1));
        session.start().unwrap();
        session.tick(0.1, pose(0.0)).unwrap();
        session.reset();

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.id(), SessionId::UNASSIGNED);
        assert!(session.log().is_empty());
        session.start().unwrap();
    }
}
