//! Persisted session record (JSON format)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, Result};
use crate::session::MotionLog;
use crate::types::{Sample, SessionId};

/// Current on-disk record layout version
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// A motion log as persisted under its session id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Layout version of this record
    pub format_version: u32,
    /// Session id the record was saved under
    pub id: SessionId,
    /// When the record was written
    pub recorded_at: DateTime<Utc>,
    /// Timestamp of the last sample (seconds)
    pub duration: f32,
    /// Number of samples, checked against `samples` on load
    pub sample_count: usize,
    /// Samples in recording order
    pub samples: Vec<Sample>,
}

impl SessionRecord {
    /// Snapshot a log into a record
    pub fn new(id: SessionId, log: &MotionLog) -> Self {
        Self {
            format_version: RECORD_FORMAT_VERSION,
            id,
            recorded_at: Utc::now(),
            duration: log.duration(),
            sample_count: log.len(),
            samples: log.samples().to_vec(),
        }
    }

    /// Serialize to pretty-printed JSON bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            RecorderError::CorruptData(format!("Failed to serialize session {}: {}", self.id, e))
        })
    }

    /// Parse and validate a record that is expected to belong to `id`
    pub fn decode(bytes: &[u8], id: SessionId) -> Result<Self> {
        let record: SessionRecord = serde_json::from_slice(bytes).map_err(|e| {
            RecorderError::CorruptData(format!("Failed to parse session {}: {}", id, e))
        })?;
        record.validate(id)?;
        Ok(record)
    }

    fn validate(&self, id: SessionId) -> Result<()> {
        if self.format_version != RECORD_FORMAT_VERSION {
            return Err(RecorderError::CorruptData(format!(
                "unsupported record version {} for session {}",
                self.format_version, id
            )));
        }
        if self.id != id {
            return Err(RecorderError::CorruptData(format!(
                "record for session {} found under id {}",
                self.id, id
            )));
        }
        if self.sample_count != self.samples.len() {
            return Err(RecorderError::CorruptData(format!(
                "session {} declares {} samples but holds {}",
                id,
                self.sample_count,
                self.samples.len()
            )));
        }
        Ok(())
    }

    /// Convert into a finalized motion log, re-checking sample order
    pub fn into_log(self) -> Result<MotionLog> {
        let id = self.id;
        MotionLog::from_samples(self.samples).map_err(|e| {
            RecorderError::CorruptData(format!("session {} holds an invalid sequence: {}", id, e))
        })
    }
}
