//! In-memory session store
//!
//! Records are kept as encoded JSON bytes, so loading goes through the same
//! parsing and validation as the file store.

use std::collections::BTreeMap;

use crate::error::{RecorderError, Result};
use crate::session::MotionLog;
use crate::types::SessionId;

use super::record::SessionRecord;
use super::{check_overwrite, ensure_assigned, OverwritePolicy, SessionStore};

/// Session store backed by a map of encoded records
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: BTreeMap<SessionId, Vec<u8>>,
    policy: OverwritePolicy,
}

impl MemorySessionStore {
    pub fn new(policy: OverwritePolicy) -> Self {
        Self {
            records: BTreeMap::new(),
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw encoded bytes stored for `id`
    pub fn raw(&self, id: SessionId) -> Option<&[u8]> {
        self.records.get(&id).map(|b| b.as_slice())
    }

    /// Store arbitrary bytes under `id`, bypassing encoding
    pub fn insert_raw(&mut self, id: SessionId, bytes: Vec<u8>) {
        self.records.insert(id, bytes);
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&mut self, id: SessionId, log: &MotionLog) -> Result<()> {
        ensure_assigned(id)?;

        if !check_overwrite(&*self, self.policy, id, log)? {
            return Ok(());
        }

        let bytes = SessionRecord::new(id, log).encode()?;
        self.records.insert(id, bytes);
        tracing::debug!("Stored session {} in memory ({} samples)", id, log.len());
        Ok(())
    }

    fn load_record(&self, id: SessionId) -> Result<SessionRecord> {
        ensure_assigned(id)?;
        let bytes = self.records.get(&id).ok_or(RecorderError::NotFound(id))?;
        SessionRecord::decode(bytes, id)
    }

    fn exists(&self, id: SessionId) -> Result<bool> {
        Ok(self.records.contains_key(&id))
    }

    fn list(&self) -> Result<Vec<SessionId>> {
        Ok(self.records.keys().copied().collect())
    }

    fn remove(&mut self, id: SessionId) -> Result<()> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or(RecorderError::NotFound(id))
    }
}
