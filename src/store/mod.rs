//! Session persistence
//!
//! A [`SessionStore`] maps an operator-assigned [`SessionId`] to a stored
//! [`MotionLog`]. Two stores are provided:
//!
//! - [`FileSessionStore`] - one JSON record per session in a directory,
//!   written durably (temp file, fsync, rename)
//! - [`MemorySessionStore`] - the same records kept in memory
//!
//! # Id policy
//!
//! The unassigned id (`-1`) is never persisted. Whether a save may replace a
//! record already stored under the same id is controlled by
//! [`OverwritePolicy`]; under [`OverwritePolicy::Reject`] re-saving an
//! identical log is still accepted so a double-triggered save is harmless.

pub mod file;
pub mod memory;
pub mod record;
pub mod text;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use record::{SessionRecord, RECORD_FORMAT_VERSION};

use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, Result};
use crate::session::MotionLog;
use crate::types::SessionId;

/// What a save does when the id already holds a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Fail with `AlreadyExists` unless the stored log is identical
    #[default]
    Reject,
    /// Replace the stored record
    Replace,
}

impl std::fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverwritePolicy::Reject => write!(f, "reject"),
            OverwritePolicy::Replace => write!(f, "replace"),
        }
    }
}

/// Persistence boundary for recorded sessions
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Persist `log` under `id`
    ///
    /// Returns only once the record is durable. Fails with `InvalidId` for
    /// the unassigned id without touching any record.
    fn save(&mut self, id: SessionId, log: &MotionLog) -> Result<()>;

    /// Load the full stored record for `id`
    fn load_record(&self, id: SessionId) -> Result<SessionRecord>;

    /// Whether a record exists for `id`
    fn exists(&self, id: SessionId) -> Result<bool>;

    /// All stored ids, ascending
    fn list(&self) -> Result<Vec<SessionId>>;

    /// Delete the record for `id`
    fn remove(&mut self, id: SessionId) -> Result<()>;

    /// Load the motion log stored for `id`
    fn load(&self, id: SessionId) -> Result<MotionLog> {
        self.load_record(id)?.into_log()
    }
}

/// Reject the unassigned id before any storage is touched
pub(crate) fn ensure_assigned(id: SessionId) -> Result<()> {
    if id.is_assigned() {
        Ok(())
    } else {
        tracing::warn!("Refusing to persist session with unassigned id");
        Err(RecorderError::InvalidId(id))
    }
}

/// Decide whether a save under `id` should write
///
/// Returns `Ok(false)` when an identical log is already stored and the write
/// can be skipped. Under `Reject` a stored record that cannot be read fails
/// with its own error (`CorruptData`, `Io`) and is left untouched.
pub(crate) fn check_overwrite<S: SessionStore + ?Sized>(
    store: &S,
    policy: OverwritePolicy,
    id: SessionId,
    log: &MotionLog,
) -> Result<bool> {
    if !store.exists(id)? {
        return Ok(true);
    }

    match policy {
        OverwritePolicy::Replace => {
            tracing::info!("Replacing existing record for session {}", id);
            Ok(true)
        }
        OverwritePolicy::Reject => {
            let existing = store.load(id).map_err(|e| {
                tracing::warn!("Cannot compare with stored session {}: {}", id, e);
                e
            })?;
            if existing == *log {
                tracing::debug!("Session {} already stored with identical samples", id);
                Ok(false)
            } else {
                tracing::warn!("Session {} already holds a different recording", id);
                Err(RecorderError::AlreadyExists(id))
            }
        }
    }
}
