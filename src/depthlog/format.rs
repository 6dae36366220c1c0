// SPDX-License-Identifier: GPL-3.0-only

//! Binary record encoding and parsing
//!
//! Record layout, all fields little-endian:
//!
//! ```text
//! timestamp:   i64
//! width:       i32
//! height:      i32
//! payload_len: i32
//! payload:     [u8; payload_len]
//! ```
//!
//! Repeated until end-of-file. A truncated tail (partial header, or a
//! declared payload length exceeding the remaining bytes) ends parsing
//! without error so logs cut short by a crash stay usable.

use std::io::Read;

use tracing::debug;

use super::DepthFrame;
use crate::constants::RECORD_HEADER_LEN;

/// Encode one frame as a complete record
pub fn encode_record(frame: &DepthFrame) -> Vec<u8> {
    let mut buf = Vec::with_capacity(RECORD_HEADER_LEN + frame.payload.len());
    buf.extend_from_slice(&frame.timestamp.to_le_bytes());
    buf.extend_from_slice(&(frame.width as i32).to_le_bytes());
    buf.extend_from_slice(&(frame.height as i32).to_le_bytes());
    buf.extend_from_slice(&(frame.payload.len() as i32).to_le_bytes());
    buf.extend_from_slice(&frame.payload);
    buf
}

/// Iterator over the complete records of a depth log stream
///
/// Stops silently at the first incomplete record: a partial header, a
/// negative declared length, or a payload cut off by end-of-file.
/// `was_truncated()` reports whether the stream ended mid-record.
pub struct RecordIter<R: Read> {
    reader: R,
    truncated: bool,
    done: bool,
}

impl<R: Read> RecordIter<R> {
    /// Wrap a reader positioned at the start of a depth log
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            truncated: false,
            done: false,
        }
    }

    /// Whether the stream ended in the middle of a record
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    /// Fill `buf` from the reader, tolerating a short final read
    ///
    /// Returns the number of bytes actually read; I/O errors are
    /// treated the same as a truncated tail.
    fn read_up_to(&mut self, buf: &mut [u8]) -> usize {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!(error = %e, "Read error while scanning depth log");
                    break;
                }
            }
        }
        filled
    }
}

impl<R: Read> Iterator for RecordIter<R> {
    type Item = DepthFrame;

    fn next(&mut self) -> Option<DepthFrame> {
        if self.done {
            return None;
        }

        let mut header = [0u8; RECORD_HEADER_LEN];
        let got = self.read_up_to(&mut header);
        if got == 0 {
            // Clean end-of-file on a record boundary
            self.done = true;
            return None;
        }
        if got < RECORD_HEADER_LEN {
            debug!(got, "Partial record header at end of depth log");
            self.truncated = true;
            self.done = true;
            return None;
        }

        let timestamp = i64::from_le_bytes(header[0..8].try_into().unwrap());
        let width = i32::from_le_bytes(header[8..12].try_into().unwrap());
        let height = i32::from_le_bytes(header[12..16].try_into().unwrap());
        let payload_len = i32::from_le_bytes(header[16..20].try_into().unwrap());

        if width <= 0 || height <= 0 || payload_len < 0 {
            debug!(width, height, payload_len, "Invalid record header fields");
            self.truncated = true;
            self.done = true;
            return None;
        }

        let mut payload = vec![0u8; payload_len as usize];
        let got = self.read_up_to(&mut payload);
        if got < payload.len() {
            debug!(
                declared = payload.len(),
                got, "Declared payload length exceeds remaining bytes"
            );
            self.truncated = true;
            self.done = true;
            return None;
        }

        Some(DepthFrame {
            timestamp,
            width: width as u32,
            height: height as u32,
            payload,
        })
    }
}
