//! Directory-backed session store
//!
//! Each session lives in `<dir>/<id>.json`. Writes go to a hidden temp file
//! in the same directory, are flushed with `sync_all` and then renamed over
//! the final path, so a reader never observes a partially written record.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{RecorderError, Result};
use crate::session::MotionLog;
use crate::types::SessionId;

use super::record::SessionRecord;
use super::{check_overwrite, ensure_assigned, OverwritePolicy, SessionStore};

/// Extension of persisted session records
pub const RECORD_EXTENSION: &str = "json";

/// Session store keeping one record file per id
#[derive(Debug)]
pub struct FileSessionStore {
    dir: PathBuf,
    policy: OverwritePolicy,
}

impl FileSessionStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>, policy: OverwritePolicy) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                RecorderError::from(e).with_context(format!(
                    "Failed to create session directory {:?}",
                    dir
                ))
            })?;
        }

        tracing::debug!("Opened session store at {:?} (policy: {})", dir, policy);
        Ok(Self { dir, policy })
    }

    /// Directory holding the records
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn policy(&self) -> OverwritePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: OverwritePolicy) {
        self.policy = policy;
    }

    /// Path of the record for `id`
    pub fn record_path(&self, id: SessionId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    fn temp_path(&self, id: SessionId) -> PathBuf {
        self.dir.join(format!(".{}.{}.tmp", id, RECORD_EXTENSION))
    }

    fn write_durable(&self, id: SessionId, bytes: &[u8]) -> std::io::Result<()> {
        let tmp = self.temp_path(id);
        let result = (|| {
            let mut file = File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp, self.record_path(id))?;
            sync_dir(&self.dir)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

impl SessionStore for FileSessionStore {
    fn save(&mut self, id: SessionId, log: &MotionLog) -> Result<()> {
        ensure_assigned(id)?;

        if !check_overwrite(&*self, self.policy, id, log)? {
            return Ok(());
        }

        let bytes = SessionRecord::new(id, log).encode()?;
        self.write_durable(id, &bytes).map_err(|e| {
            tracing::warn!("Failed to write session {}: {}", id, e);
            RecorderError::from(e).with_context(format!("Failed to save session {}", id))
        })?;

        tracing::info!(
            "Saved session {} ({} samples, {:.2}s) to {:?}",
            id,
            log.len(),
            log.duration(),
            self.record_path(id)
        );
        Ok(())
    }

    fn load_record(&self, id: SessionId) -> Result<SessionRecord> {
        ensure_assigned(id)?;

        let path = self.record_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RecorderError::NotFound(id));
            }
            Err(e) => {
                return Err(RecorderError::from(e)
                    .with_context(format!("Failed to read session {}", id)));
            }
        };

        let record = SessionRecord::decode(&bytes, id)?;
        tracing::debug!("Loaded session {} from {:?}", id, path);
        Ok(record)
    }

    fn exists(&self, id: SessionId) -> Result<bool> {
        Ok(id.is_assigned() && self.record_path(id).is_file())
    }

    fn list(&self) -> Result<Vec<SessionId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(id) = stem.parse::<SessionId>() {
                if id.is_assigned() {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn remove(&mut self, id: SessionId) -> Result<()> {
        ensure_assigned(id)?;

        match fs::remove_file(self.record_path(id)) {
            Ok(()) => {
                tracing::info!("Removed session {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RecorderError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}
