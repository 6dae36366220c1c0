// SPDX-License-Identifier: GPL-3.0-only

//! Depth frame log: append-only binary format, writer, and lookup
//!
//! A depth log is a sequence of self-describing records with no file
//! header and no trailing index. Each record is written in one append
//! so a crash mid-write corrupts at most the final record; everything
//! before it stays readable.

pub mod format;
pub mod locator;
pub mod writer;

pub use format::RecordIter;
pub use locator::lookup;
pub use writer::DepthLogWriter;

use crate::constants::BYTES_PER_SAMPLE;

/// One sampled depth image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthFrame {
    /// Capture time in milliseconds, non-decreasing within a session
    pub timestamp: i64,
    /// Sample-grid width in pixels
    pub width: u32,
    /// Sample-grid height in pixels
    pub height: u32,
    /// Raw samples: width*height u16 values, little-endian, row-major
    pub payload: Vec<u8>,
}

impl DepthFrame {
    /// Expected payload length for a fully populated frame
    pub fn expected_payload_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_SAMPLE
    }

    /// Whether the payload covers the full sample grid
    ///
    /// A truncated payload is tolerated at read time (missing samples
    /// decode as 0) but is never produced by the writer.
    pub fn is_complete(&self) -> bool {
        self.payload.len() >= self.expected_payload_len()
    }
}

/// A frame mirrored into the in-memory queue during recording
///
/// Identity is the per-session sequence number, never the timestamp:
/// two distinct frames may in principle share a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedFrame {
    /// Monotonically increasing sequence number, starting at 0
    pub seq: u64,
    /// The captured frame
    pub frame: DepthFrame,
}
