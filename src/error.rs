//! Error handling for motion-recorder
//!
//! This module defines the error taxonomy shared by the motion log, the
//! recording session state machine and the session stores, along with a
//! Result alias used throughout the crate.

use thiserror::Error;

use crate::types::SessionId;

/// Main error type for motion-recorder operations
#[derive(Error, Debug)]
pub enum RecorderError {
    /// A save or load was attempted with the unassigned session id
    #[error("Invalid session id: {0}")]
    InvalidId(SessionId),

    /// An operation was attempted in a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A sample timestamp went backwards or was not finite
    #[error("Out of order sample: timestamp {timestamp} after {previous}")]
    OutOfOrder { previous: f32, timestamp: f32 },

    /// A sample carried a non-finite position or orientation
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// No record stored under the requested id
    #[error("No session stored under id {0}")]
    NotFound(SessionId),

    /// A different log is already stored under the id and the store rejects overwrites
    #[error("Session id {0} already holds a different recording")]
    AlreadyExists(SessionId),

    /// Stored bytes could not be interpreted as a sample sequence
    #[error("Corrupt session data: {0}")]
    CorruptData(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<RecorderError>,
    },
}

impl RecorderError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        RecorderError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any context layers stripped
    pub fn root(&self) -> &RecorderError {
        match self {
            RecorderError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error (or the error it wraps) is a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), RecorderError::NotFound(_))
    }
}

/// Result type alias for motion-recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RecorderError::InvalidId(SessionId::UNASSIGNED);
        assert_eq!(err.to_string(), "Invalid session id: -1");

        let err = RecorderError::NotFound(SessionId::new(7));
        assert_eq!(err.to_string(), "No session stored under id 7");
    }

    #[test]
    fn test_error_with_context() {
        let err = RecorderError::CorruptData("truncated".to_string());
        let with_ctx = err.with_context("Failed to load session 3");
        assert!(with_ctx.to_string().contains("Failed to load session 3"));
        assert!(matches!(with_ctx.root(), RecorderError::CorruptData(_)));
    }

    #[test]
    fn test_is_not_found_through_context() {
        let err = RecorderError::NotFound(SessionId::new(1)).with_context("load");
        assert!(err.is_not_found());
        assert!(!RecorderError::InvalidState("x".into()).is_not_found());
    }

    #[test]
    fn test_out_of_order_display() {
        let err = RecorderError::OutOfOrder {
            previous: 2.0,
            timestamp: 1.5,
        };
        assert!(err.to_string().contains("1.5"));
        assert!(err.to_string().contains("2"));
    }
}
