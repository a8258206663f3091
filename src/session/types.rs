//! Session data types

use crate::error::{RecorderError, Result};
use crate::types::{Quat, Sample, SessionId, Vec3};

/// State of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing recorded yet
    #[default]
    Idle,
    /// Samples are being appended each tick
    Recording,
    /// Recording finished but not persisted yet
    StoppedUnsaved,
    /// Recording finished and persisted
    StoppedSaved,
}

impl SessionState {
    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        matches!(self, SessionState::Recording)
    }

    /// Check if the recording has been stopped (saved or not)
    pub fn is_stopped(&self) -> bool {
        matches!(
            self,
            SessionState::StoppedUnsaved | SessionState::StoppedSaved
        )
    }

    /// Check if the recording has been persisted
    pub fn is_saved(&self) -> bool {
        matches!(self, SessionState::StoppedSaved)
    }

    /// Check if has recorded data
    pub fn has_recording(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// Display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Recording => "Recording",
            SessionState::StoppedUnsaved => "Stopped (unsaved)",
            SessionState::StoppedSaved => "Stopped (saved)",
        }
    }
}

/// Result of a save request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The log was written under this id
    Saved { id: SessionId, forced: bool },
    /// The session had already been saved; nothing was written
    AlreadySaved { id: SessionId },
}

impl SaveOutcome {
    pub fn id(&self) -> SessionId {
        match self {
            SaveOutcome::Saved { id, .. } | SaveOutcome::AlreadySaved { id } => *id,
        }
    }
}

/// Append-only, time-ordered pose samples of one recording session
///
/// Samples are only ever appended, in non-decreasing timestamp order. Once
/// [`MotionLog::finalize`] is called no further samples are accepted.
#[derive(Debug, Clone, Default)]
pub struct MotionLog {
    samples: Vec<Sample>,
    finalized: bool,
}

impl PartialEq for MotionLog {
    fn eq(&self, other: &Self) -> bool {
        self.samples == other.samples
    }
}

impl MotionLog {
    /// Create a new empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            finalized: false,
        }
    }

    /// Build a finalized log from an already recorded sequence
    ///
    /// Fails with [`RecorderError::OutOfOrder`] when the sequence is not
    /// time-ordered or contains non-finite timestamps.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        let mut log = Self::with_capacity(samples.len());
        for sample in samples {
            log.push(sample)?;
        }
        log.finalize();
        Ok(log)
    }

    /// Append a sample
    pub fn append(&mut self, timestamp: f32, position: Vec3, orientation: Quat) -> Result<()> {
        self.push(Sample::new(timestamp, position, orientation))
    }

    /// Append a whole sample, checking ordering
    pub fn push(&mut self, sample: Sample) -> Result<()> {
        if self.finalized {
            return Err(RecorderError::InvalidState(
                "motion log is finalized".to_string(),
            ));
        }

        let previous = self.samples.last().map(|s| s.timestamp).unwrap_or(0.0);
        if !sample.timestamp.is_finite() || sample.timestamp < previous {
            return Err(RecorderError::OutOfOrder {
                previous,
                timestamp: sample.timestamp,
            });
        }

        if !sample.position.is_finite() || !sample.orientation.is_finite() {
            return Err(RecorderError::InvalidSample(format!(
                "non-finite pose at t={}",
                sample.timestamp
            )));
        }

        self.samples.push(sample);
        Ok(())
    }

    /// All samples, in the order they were appended
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the last sample, or zero for an empty log
    pub fn duration(&self) -> f32 {
        self.samples.last().map(|s| s.timestamp).unwrap_or(0.0)
    }

    /// Stop accepting samples
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Find the sample index at or before a given time
    pub fn sample_at(&self, time: f32) -> Option<usize> {
        if self.samples.is_empty() {
            return None;
        }

        let idx = self.samples.partition_point(|s| s.timestamp <= time);
        if idx == 0 {
            Some(0)
        } else {
            Some(idx - 1)
        }
    }

    /// Samples with timestamps inside `[start, end]`
    pub fn window(&self, start: f32, end: f32) -> &[Sample] {
        let lo = self.samples.partition_point(|s| s.timestamp < start);
        let hi = self.samples.partition_point(|s| s.timestamp <= end);
        if lo >= hi {
            &[]
        } else {
            &self.samples[lo..hi]
        }
    }

    /// Total distance travelled by the tracked target
    pub fn path_length(&self) -> f32 {
        self.samples
            .windows(2)
            .map(|w| w[0].position.distance(&w[1].position))
            .sum()
    }
}
