// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic depth sensor backend
//!
//! Generates deterministic gradient frames without any hardware.
//! Used by the CLI demo commands and by tests that need a live-looking
//! sensor, including its failure modes: a depth warm-up period (depth
//! not yet available) and a hard failure after a set number of samples.

use crate::errors::SessionError;

use super::{DepthImage, DepthSensorSession, SensorSample};

/// Deterministic software sensor
pub struct SyntheticSensor {
    width: u32,
    height: u32,
    resumed: bool,
    samples_taken: u64,
    /// Samples to serve without a depth buffer before depth becomes ready
    depth_warmup: u64,
    /// Fail every sample request once this many have succeeded
    fail_after: Option<u64>,
}

impl SyntheticSensor {
    /// Create a sensor producing `width` x `height` depth grids
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            resumed: false,
            samples_taken: 0,
            depth_warmup: 0,
            fail_after: None,
        }
    }

    /// Serve the first `n` samples without a depth buffer
    pub fn with_depth_warmup(mut self, n: u64) -> Self {
        self.depth_warmup = n;
        self
    }

    /// Fail every sample request after `n` successful ones
    pub fn with_failure_after(mut self, n: u64) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Gradient payload: sample value = (y * width + x), wrapping at u16
    fn depth_payload(&self, tick: u64) -> Vec<u8> {
        let samples: Vec<u16> = (0..self.width as u64 * self.height as u64)
            .map(|i| (i + tick) as u16)
            .collect();
        bytemuck::cast_slice(&samples).to_vec()
    }
}

impl DepthSensorSession for SyntheticSensor {
    fn resume(&mut self) -> Result<(), SessionError> {
        self.resumed = true;
        Ok(())
    }

    fn sample(&mut self) -> Result<SensorSample, SessionError> {
        if !self.resumed {
            return Err(SessionError::Sample("sample while paused".into()));
        }
        if let Some(limit) = self.fail_after {
            if self.samples_taken >= limit {
                return Err(SessionError::Sample("synthetic sensor failure".into()));
            }
        }

        let tick = self.samples_taken;
        self.samples_taken += 1;

        let depth = (tick >= self.depth_warmup).then(|| DepthImage {
            width: self.width,
            height: self.height,
            data: self.depth_payload(tick),
        });

        Ok(SensorSample {
            // Stand-in color plane: one byte per pixel
            color: vec![0x7F; (self.width * self.height) as usize],
            depth,
        })
    }

    fn pause(&mut self) {
        self.resumed = false;
    }

    fn depth_supported(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_requires_resume() {
        let mut sensor = SyntheticSensor::new(2, 2);
        assert!(sensor.sample().is_err());
        sensor.resume().unwrap();
        assert!(sensor.sample().is_ok());
    }

    #[test]
    fn test_depth_warmup_then_ready() {
        let mut sensor = SyntheticSensor::new(2, 2).with_depth_warmup(2);
        sensor.resume().unwrap();
        assert!(sensor.sample().unwrap().depth.is_none());
        assert!(sensor.sample().unwrap().depth.is_none());
        assert!(sensor.sample().unwrap().depth.is_some());
    }

    #[test]
    fn test_failure_after_limit() {
        let mut sensor = SyntheticSensor::new(2, 2).with_failure_after(1);
        sensor.resume().unwrap();
        assert!(sensor.sample().is_ok());
        assert!(sensor.sample().is_err());
    }

    #[test]
    fn test_payload_is_little_endian_gradient() {
        let mut sensor = SyntheticSensor::new(3, 1);
        sensor.resume().unwrap();
        let depth = sensor.sample().unwrap().depth.unwrap();
        assert_eq!(depth.data.len(), 6);
        // Sample at x=2 is 2, low byte first
        assert_eq!(depth.data[4], 2);
        assert_eq!(depth.data[5], 0);
    }
}
