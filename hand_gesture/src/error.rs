//! Error types for frame construction, configuration, and recordings.
//!
//! None of these escape [`GestureEngine::update`](crate::GestureEngine::update);
//! a bad frame is a skipped tick, not a failure.

use thiserror::Error;

/// A landmark set that cannot form a [`HandFrame`](crate::HandFrame).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("expected 21 landmarks, got {0}")]
    LandmarkCount(usize),

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A [`GestureConfig`](crate::GestureConfig) threshold outside its domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be at most 1.0, got {value}")]
    AboveUnit { field: &'static str, value: f32 },

    #[error("{0} must be longer than zero")]
    ZeroDuration(&'static str),
}

/// Failure while reading or writing a JSON-lines frame recording.
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("recording I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line:   usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode frame record: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T, E = FrameError> = std::result::Result<T, E>;
