// SPDX-License-Identifier: GPL-3.0-only

//! depthcam - depth-sensor frame recorder and measurement queries
//!
//! Captures per-frame depth samples from a sensor session, persists
//! them as an append-only binary log, and answers point-to-point
//! depth-difference queries against a captured still or a timestamp
//! inside a recorded session.
//!
//! # Architecture
//!
//! - [`sensor`]: the depth-sensor session boundary, the per-tick
//!   capture unit, and still capture
//! - [`depthlog`]: the binary frame-log format, writer, and
//!   nearest-timestamp lookup
//! - [`recording`]: the Idle/Recording state machine and the
//!   background capture loop
//! - [`measure`]: bounds-checked sample decoding and depth deltas
//! - [`config`], [`storage`]: configuration and capture-directory
//!   handling

pub mod config;
pub mod constants;
pub mod depthlog;
pub mod errors;
pub mod measure;
pub mod recording;
pub mod sensor;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use depthlog::{DepthFrame, DepthLogWriter, QueuedFrame, RecordIter};
pub use errors::{DepthError, DepthResult, MeasureError, RecordingError, SessionError};
pub use measure::Point;
pub use recording::{RecorderEvent, RecorderState, RecordingController};
pub use sensor::{CaptureOutcome, DepthSensorSession, StillCapture, SyntheticSensor};
