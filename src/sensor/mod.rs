// SPDX-License-Identifier: GPL-3.0-only

//! Depth sensor session boundary
//!
//! The real depth-sensing subsystem (session lifecycle, capability
//! negotiation) lives outside this crate; it is consumed here only
//! through the [`DepthSensorSession`] trait. Session handles are shared
//! as `Arc<Mutex<S>>` so the recording loop and ad hoc still captures
//! exclude each other explicitly instead of by convention.

pub mod capture;
pub mod still;
pub mod synthetic;

pub use capture::{CaptureOutcome, acquire};
pub use still::{StillCapture, capture_still};
pub use synthetic::SyntheticSensor;

use std::sync::{Arc, Mutex};

use crate::errors::SessionError;

/// A depth image delivered by the sensor
#[derive(Debug, Clone)]
pub struct DepthImage {
    /// Grid width in pixels
    pub width: u32,
    /// Grid height in pixels
    pub height: u32,
    /// width*height u16 samples, little-endian, row-major
    pub data: Vec<u8>,
}

/// One sensor sample: color bytes plus an optional depth image
///
/// `depth` is `None` when the sensor reports the depth buffer as not
/// yet available; that is a per-tick condition, not an error.
#[derive(Debug, Clone)]
pub struct SensorSample {
    /// Raw color image bytes (opaque to this crate)
    pub color: Vec<u8>,
    /// Depth image, when the sensor had one ready
    pub depth: Option<DepthImage>,
}

/// External depth-sensing session
///
/// One sample is produced per `resume()`/`sample()`/`pause()` bracket;
/// callers should hold the sensor no longer than one tick.
pub trait DepthSensorSession: Send {
    /// Resume the underlying sensor stream
    fn resume(&mut self) -> Result<(), SessionError>;

    /// Request one sample from the resumed stream
    fn sample(&mut self) -> Result<SensorSample, SessionError>;

    /// Pause the underlying sensor stream
    fn pause(&mut self);

    /// Whether the sensor supports depth capture at all
    fn depth_supported(&self) -> bool;
}

/// Shared, mutually exclusive session handle
pub type SharedSession<S> = Arc<Mutex<S>>;

/// Wrap a session for sharing between the recording loop and still captures
pub fn shared<S: DepthSensorSession>(session: S) -> SharedSession<S> {
    Arc::new(Mutex::new(session))
}
