// SPDX-License-Identifier: GPL-3.0-only

//! Frame Capture Unit
//!
//! Turns one session request into a depth frame or a skip signal. The
//! sensor is bracketed resume → sample → pause per tick; the pause runs
//! on every exit path so the sensor resource is never held across
//! ticks.

use tracing::{debug, trace};

use super::{DepthSensorSession, SensorSample};
use crate::depthlog::DepthFrame;
use crate::errors::SessionError;

/// Result of one capture tick
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    /// A complete depth frame, ready to log
    Frame(DepthFrame),
    /// Depth buffer not yet available; omit this tick from the log
    Skipped,
}

/// Pauses the session when dropped, covering early-exit paths
struct ResumeGuard<'a, S: DepthSensorSession> {
    session: &'a mut S,
}

impl<'a, S: DepthSensorSession> ResumeGuard<'a, S> {
    fn resume(session: &'a mut S) -> Result<Self, SessionError> {
        session.resume()?;
        Ok(Self { session })
    }

    fn sample(&mut self) -> Result<SensorSample, SessionError> {
        self.session.sample()
    }
}

impl<S: DepthSensorSession> Drop for ResumeGuard<'_, S> {
    fn drop(&mut self) {
        self.session.pause();
    }
}

/// Take one bracketed sensor sample
///
/// Resumes, samples, and pauses the session; the pause also runs when
/// the sample request fails.
pub fn sample_once<S: DepthSensorSession>(session: &mut S) -> Result<SensorSample, SessionError> {
    let mut guard = ResumeGuard::resume(session)?;
    guard.sample()
}

/// Acquire one depth frame from the session
///
/// `timestamp_ms` is stamped onto the frame by the caller, which owns
/// the monotonicity guarantee across ticks. A sensor-reported missing
/// depth buffer yields `Skipped`; any other failure propagates.
pub fn acquire<S: DepthSensorSession>(
    session: &mut S,
    timestamp_ms: i64,
) -> Result<CaptureOutcome, SessionError> {
    let sample = sample_once(session)?;

    match sample.depth {
        Some(depth) => {
            trace!(
                timestamp_ms,
                width = depth.width,
                height = depth.height,
                "Captured depth frame"
            );
            Ok(CaptureOutcome::Frame(DepthFrame {
                timestamp: timestamp_ms,
                width: depth.width,
                height: depth.height,
                payload: depth.data,
            }))
        }
        None => {
            debug!(timestamp_ms, "Depth buffer not yet available, skipping tick");
            Ok(CaptureOutcome::Skipped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::DepthImage;

    /// Sensor that records its resume/pause calls
    struct BracketSensor {
        resumed: u32,
        paused: u32,
        fail_sample: bool,
        depth_ready: bool,
    }

    impl DepthSensorSession for BracketSensor {
        fn resume(&mut self) -> Result<(), SessionError> {
            self.resumed += 1;
            Ok(())
        }

        fn sample(&mut self) -> Result<SensorSample, SessionError> {
            if self.fail_sample {
                return Err(SessionError::Sample("sensor died".into()));
            }
            Ok(SensorSample {
                color: vec![0; 4],
                depth: self.depth_ready.then(|| DepthImage {
                    width: 2,
                    height: 2,
                    data: vec![0; 8],
                }),
            })
        }

        fn pause(&mut self) {
            self.paused += 1;
        }

        fn depth_supported(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_acquire_brackets_resume_pause() {
        let mut sensor = BracketSensor {
            resumed: 0,
            paused: 0,
            fail_sample: false,
            depth_ready: true,
        };
        let outcome = acquire(&mut sensor, 1000).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Frame(_)));
        assert_eq!(sensor.resumed, 1);
        assert_eq!(sensor.paused, 1);
    }

    #[test]
    fn test_missing_depth_is_skipped_not_error() {
        let mut sensor = BracketSensor {
            resumed: 0,
            paused: 0,
            fail_sample: false,
            depth_ready: false,
        };
        let outcome = acquire(&mut sensor, 1000).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Skipped));
        assert_eq!(sensor.paused, 1);
    }

    #[test]
    fn test_pause_runs_on_sample_failure() {
        let mut sensor = BracketSensor {
            resumed: 0,
            paused: 0,
            fail_sample: true,
            depth_ready: true,
        };
        assert!(acquire(&mut sensor, 1000).is_err());
        // The guard must still have paused the sensor
        assert_eq!(sensor.paused, 1);
    }

    #[test]
    fn test_frame_carries_caller_timestamp() {
        let mut sensor = BracketSensor {
            resumed: 0,
            paused: 0,
            fail_sample: false,
            depth_ready: true,
        };
        match acquire(&mut sensor, 4242).unwrap() {
            CaptureOutcome::Frame(frame) => assert_eq!(frame.timestamp, 4242),
            CaptureOutcome::Skipped => panic!("expected a frame"),
        }
    }
}
