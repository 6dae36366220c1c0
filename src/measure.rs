// SPDX-License-Identifier: GPL-3.0-only

//! Point-to-point depth measurement
//!
//! Reports the absolute difference between two raw 16-bit depth
//! samples (a depth-axis delta in sensor units), not a geometric
//! distance between two 3-D points.

use std::path::Path;

use tracing::{debug, warn};

use crate::constants::{BYTES_PER_SAMPLE, DEFAULT_STILL_HEIGHT, DEFAULT_STILL_WIDTH};
use crate::depthlog::{DepthFrame, locator};
use crate::errors::{DepthResult, MeasureError};

/// A pixel coordinate in the sample grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Decode the raw 16-bit sample at (x, y)
///
/// Coordinates outside the grid are rejected with `InvalidCoordinates`.
/// A sample address beyond the available payload bytes (truncated or
/// partially corrupt frame) decodes as 0 rather than failing; that
/// degrade-not-abort policy is deliberate and distinct from the
/// coordinate check.
pub fn decode_sample(
    payload: &[u8],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
) -> Result<u16, MeasureError> {
    if x >= width || y >= height {
        return Err(MeasureError::InvalidCoordinates {
            x,
            y,
            width,
            height,
        });
    }

    let index = (y as usize * width as usize + x as usize) * BYTES_PER_SAMPLE;
    if index + 1 >= payload.len() {
        debug!(index, payload_len = payload.len(), "Sample beyond payload, decoding as 0");
        return Ok(0);
    }

    // Low byte first
    Ok(u16::from_le_bytes([payload[index], payload[index + 1]]))
}

/// Depth delta between two pixels of one frame
///
/// Both points are bounds-checked before either is decoded; an
/// out-of-range point fails the whole call, never a partial result.
pub fn measure_delta(
    frame: &DepthFrame,
    p1: Point,
    p2: Point,
) -> Result<u16, MeasureError> {
    check_bounds(frame.width, frame.height, p1)?;
    check_bounds(frame.width, frame.height, p2)?;

    let d1 = decode_sample(&frame.payload, frame.width, frame.height, p1.x, p1.y)?;
    let d2 = decode_sample(&frame.payload, frame.width, frame.height, p2.x, p2.y)?;

    Ok(d1.abs_diff(d2))
}

fn check_bounds(width: u32, height: u32, p: Point) -> Result<(), MeasureError> {
    if p.x >= width || p.y >= height {
        return Err(MeasureError::InvalidCoordinates {
            x: p.x,
            y: p.y,
            width,
            height,
        });
    }
    Ok(())
}

/// Measure a still depth file captured by `capture_still`
///
/// Still files are headerless raw sample dumps with no recorded
/// dimensions, so this falls back to the agreed default resolution.
/// If the capture resolution differed, pixel addressing is silently
/// wrong; recorded logs store width/height per record and do not share
/// this limitation.
pub fn measure_still(depth_path: &Path, p1: Point, p2: Point) -> DepthResult<u16> {
    measure_still_with_resolution(depth_path, DEFAULT_STILL_WIDTH, DEFAULT_STILL_HEIGHT, p1, p2)
}

/// Measure a still depth file assuming the given resolution
pub fn measure_still_with_resolution(
    depth_path: &Path,
    width: u32,
    height: u32,
    p1: Point,
    p2: Point,
) -> DepthResult<u16> {
    let payload = std::fs::read(depth_path)
        .map_err(|_| MeasureError::FileNotFound(depth_path.display().to_string()))?;

    if payload.len() != width as usize * height as usize * BYTES_PER_SAMPLE {
        warn!(
            path = %depth_path.display(),
            bytes = payload.len(),
            assumed_width = width,
            assumed_height = height,
            "Still depth file does not match the assumed resolution"
        );
    }

    let frame = DepthFrame {
        timestamp: 0,
        width,
        height,
        payload,
    };
    Ok(measure_delta(&frame, p1, p2)?)
}

/// Measure the recorded frame nearest `target_ms` in a depth log
pub fn measure_recorded(
    log_path: &Path,
    target_ms: i64,
    p1: Point,
    p2: Point,
) -> DepthResult<u16> {
    let frame = locator::lookup(log_path, target_ms)?.ok_or(MeasureError::FrameNotFound)?;
    debug!(
        target_ms,
        frame_ms = frame.timestamp,
        width = frame.width,
        height = frame.height,
        "Measuring located frame"
    );
    Ok(measure_delta(&frame, p1, p2)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_samples(width: u32, height: u32, samples: &[(u32, u32, u16)]) -> DepthFrame {
        let mut payload = vec![0u8; (width * height) as usize * BYTES_PER_SAMPLE];
        for &(x, y, v) in samples {
            let index = (y as usize * width as usize + x as usize) * BYTES_PER_SAMPLE;
            payload[index..index + 2].copy_from_slice(&v.to_le_bytes());
        }
        DepthFrame {
            timestamp: 0,
            width,
            height,
            payload,
        }
    }

    #[test]
    fn test_decode_roundtrip_full_range() {
        for v in [0u16, 1, 255, 256, 0x1234, 0x8000, u16::MAX] {
            let payload = v.to_le_bytes().to_vec();
            assert_eq!(decode_sample(&payload, 1, 1, 0, 0).unwrap(), v);
        }
    }

    #[test]
    fn test_decode_is_little_endian() {
        // Low byte first: [0x01, 0x02] = 0x0201
        let payload = vec![0x01, 0x02];
        assert_eq!(decode_sample(&payload, 1, 1, 0, 0).unwrap(), 0x0201);
    }

    #[test]
    fn test_decode_rejects_out_of_bounds() {
        let payload = vec![0u8; 8];
        assert!(decode_sample(&payload, 2, 2, 2, 0).is_err());
        assert!(decode_sample(&payload, 2, 2, 0, 2).is_err());
        assert!(decode_sample(&payload, 2, 2, 0, 1).is_ok());
    }

    #[test]
    fn test_decode_short_payload_returns_zero() {
        // 2x2 grid but only one sample's worth of bytes
        let payload = vec![0xFF, 0xFF];
        assert_eq!(decode_sample(&payload, 2, 2, 0, 0).unwrap(), 0xFFFF);
        assert_eq!(decode_sample(&payload, 2, 2, 1, 1).unwrap(), 0);
    }

    #[test]
    fn test_measure_delta_640x480() {
        let frame = frame_with_samples(640, 480, &[(10, 20, 500), (30, 40, 800)]);
        let delta = measure_delta(&frame, Point::new(10, 20), Point::new(30, 40)).unwrap();
        assert_eq!(delta, 300);
    }

    #[test]
    fn test_measure_delta_is_symmetric() {
        let frame = frame_with_samples(8, 8, &[(1, 1, 100), (2, 2, 900)]);
        let a = measure_delta(&frame, Point::new(1, 1), Point::new(2, 2)).unwrap();
        let b = measure_delta(&frame, Point::new(2, 2), Point::new(1, 1)).unwrap();
        assert_eq!(a, 800);
        assert_eq!(a, b);
    }

    #[test]
    fn test_measure_delta_rejects_either_point() {
        let frame = frame_with_samples(4, 4, &[]);
        let err = measure_delta(&frame, Point::new(0, 0), Point::new(4, 0)).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidCoordinates { .. }));
        let err = measure_delta(&frame, Point::new(0, 4), Point::new(0, 0)).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidCoordinates { .. }));
    }

    #[test]
    fn test_measure_still_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = measure_still(
            &dir.path().join("gone.raw"),
            Point::new(0, 0),
            Point::new(1, 1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::errors::DepthError::Measure(MeasureError::FileNotFound(_))
        ));
    }
}
