// SPDX-License-Identifier: GPL-3.0-only

//! Error types for depth capture, recording, and measurement

use std::fmt;

/// Result type alias using DepthError
pub type DepthResult<T> = Result<T, DepthError>;

/// Top-level error type
#[derive(Debug, Clone)]
pub enum DepthError {
    /// Sensor session errors
    Session(SessionError),
    /// Recording state machine errors
    Recording(RecordingError),
    /// Measurement query errors
    Measure(MeasureError),
    /// Storage/filesystem errors
    Storage(String),
}

/// Sensor session errors
#[derive(Debug, Clone)]
pub enum SessionError {
    /// Session could not be created or is gone
    Unavailable(String),
    /// A sample request failed for a reason other than "depth not ready"
    Sample(String),
}

/// Recording state machine errors
#[derive(Debug, Clone)]
pub enum RecordingError {
    /// start() called while a recording is active
    AlreadyRecording,
    /// stop() called with no recording active
    NotRecording,
    /// Failed to set up the log file or capture loop
    StartFailed(String),
}

/// Measurement query errors
#[derive(Debug, Clone)]
pub enum MeasureError {
    /// Still depth file does not exist
    FileNotFound(String),
    /// Depth log file does not exist or is unreadable
    DepthDataNotFound(String),
    /// Log contains no complete frame records
    FrameNotFound,
    /// A pixel coordinate is outside the frame grid
    InvalidCoordinates {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for DepthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthError::Session(e) => write!(f, "Session error: {}", e),
            DepthError::Recording(e) => write!(f, "Recording error: {}", e),
            DepthError::Measure(e) => write!(f, "Measurement error: {}", e),
            DepthError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Unavailable(msg) => write!(f, "Sensor session unavailable: {}", msg),
            SessionError::Sample(msg) => write!(f, "Sample request failed: {}", msg),
        }
    }
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingError::AlreadyRecording => write!(f, "Recording already in progress"),
            RecordingError::NotRecording => write!(f, "No recording in progress"),
            RecordingError::StartFailed(msg) => write!(f, "Failed to start recording: {}", msg),
        }
    }
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureError::FileNotFound(path) => write!(f, "Depth file not found: {}", path),
            MeasureError::DepthDataNotFound(path) => write!(f, "Depth log not found: {}", path),
            MeasureError::FrameNotFound => write!(f, "No frame found in depth log"),
            MeasureError::InvalidCoordinates {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Coordinates ({}, {}) out of bounds for {}x{} frame",
                x, y, width, height
            ),
        }
    }
}

impl std::error::Error for DepthError {}
impl std::error::Error for SessionError {}
impl std::error::Error for RecordingError {}
impl std::error::Error for MeasureError {}

impl From<SessionError> for DepthError {
    fn from(err: SessionError) -> Self {
        DepthError::Session(err)
    }
}

impl From<RecordingError> for DepthError {
    fn from(err: RecordingError) -> Self {
        DepthError::Recording(err)
    }
}

impl From<MeasureError> for DepthError {
    fn from(err: MeasureError) -> Self {
        DepthError::Measure(err)
    }
}

impl From<std::io::Error> for DepthError {
    fn from(err: std::io::Error) -> Self {
        DepthError::Storage(err.to_string())
    }
}
